//! Experiment catalog - the fixed model and setting tables
//!
//! The grid is static: five models, six DARES1.0 settings and eight DARES2.0
//! settings. [`plan`] expands it into the ordered list of experiments the
//! batch driver walks.

use std::fmt;

use serde::Serialize;

/// Granularity of the classification task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Grain {
    /// Fine-grained labels.
    Fine,
    /// Coarse-grained (categorised) labels.
    Coarse,
}

impl Grain {
    /// Label used in banners.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fine => "Fine",
            Self::Coarse => "Coarse",
        }
    }
}

impl fmt::Display for Grain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Architecture family passed to the training script as `--model_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelFamily {
    /// BERT-style encoders.
    Bert,
    /// ELECTRA discriminators.
    Electra,
    /// XLM-RoBERTa.
    XlmRoberta,
}

impl ModelFamily {
    /// Value of the `--model_type` argument.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bert => "bert",
            Self::Electra => "electra",
            Self::XlmRoberta => "xlmroberta",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pretrained model under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    /// Hub identifier, passed as `--model_name`.
    pub identifier: &'static str,
    /// Architecture family.
    pub family: ModelFamily,
    /// Short name for banners and the summary.
    pub display_name: &'static str,
}

/// One run-mode configuration of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Setting {
    /// Augmentation strategy, passed as `--run_mode`.
    pub run_mode: &'static str,
    /// Auxiliary column appended to the input; `None` for raw modes.
    pub append_column: Option<&'static str>,
    /// Label granularity.
    pub grain: Grain,
}

impl Setting {
    const fn new(run_mode: &'static str, append_column: Option<&'static str>, grain: Grain) -> Self {
        Self {
            run_mode,
            append_column,
            grain,
        }
    }
}

/// Models, in execution order.
pub static MODELS: [ModelDescriptor; 5] = [
    ModelDescriptor {
        identifier: "CAMeL-Lab/bert-base-arabic-camelbert-mix",
        family: ModelFamily::Bert,
        display_name: "CAMeLBERTmix",
    },
    ModelDescriptor {
        identifier: "aubmindlab/bert-base-arabertv2",
        family: ModelFamily::Bert,
        display_name: "AraBERTv2",
    },
    ModelDescriptor {
        identifier: "aubmindlab/araelectra-base-discriminator",
        family: ModelFamily::Electra,
        display_name: "AraELECTRA",
    },
    ModelDescriptor {
        identifier: "google-bert/bert-base-multilingual-cased",
        family: ModelFamily::Bert,
        display_name: "mBERT",
    },
    ModelDescriptor {
        identifier: "xlm-roberta-base",
        family: ModelFamily::XlmRoberta,
        display_name: "XLM-R",
    },
];

/// DARES1.0 settings: three fine-grained, then three coarse-grained.
pub static DARES1_SETTINGS: [Setting; 6] = [
    Setting::new("raw", None, Grain::Fine),
    Setting::new("append_word", Some("Word"), Grain::Fine),
    Setting::new("append_filename", Some("Arabic_Filename"), Grain::Fine),
    Setting::new("raw_cat", None, Grain::Coarse),
    Setting::new("append_word_categorised", Some("Word"), Grain::Coarse),
    Setting::new("append_filename_categorised", Some("Arabic_Filename"), Grain::Coarse),
];

/// DARES2.0 settings: DARES1.0 plus the `word_file` variants.
pub static DARES2_SETTINGS: [Setting; 8] = [
    Setting::new("raw", None, Grain::Fine),
    Setting::new("append_word", Some("Word"), Grain::Fine),
    Setting::new("append_filename", Some("Arabic_Filename"), Grain::Fine),
    Setting::new("word_file", Some("word_file"), Grain::Fine),
    Setting::new("raw_cat", None, Grain::Coarse),
    Setting::new("append_word_categorised", Some("Word"), Grain::Coarse),
    Setting::new("append_filename_categorised", Some("Arabic_Filename"), Grain::Coarse),
    Setting::new("word_file_cat", Some("word_file_cat"), Grain::Coarse),
];

/// Dataset version under assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Dataset {
    /// DARES1.0
    #[serde(rename = "DARES1.0")]
    Dares1,
    /// DARES2.0
    #[serde(rename = "DARES2.0")]
    Dares2,
}

impl Dataset {
    /// Both versions, in execution order.
    pub const ALL: [Self; 2] = [Self::Dares1, Self::Dares2];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Dares1 => "DARES1.0",
            Self::Dares2 => "DARES2.0",
        }
    }

    /// Python module run with `-m` for this version.
    #[must_use]
    pub const fn module(self) -> &'static str {
        match self {
            Self::Dares1 => "experiments.dares1.0_assess",
            Self::Dares2 => "experiments.dares2.0_assess",
        }
    }

    /// Settings table for this version.
    #[must_use]
    pub fn settings(self) -> &'static [Setting] {
        match self {
            Self::Dares1 => &DARES1_SETTINGS,
            Self::Dares2 => &DARES2_SETTINGS,
        }
    }

    /// Number of experiments this version contributes.
    #[must_use]
    pub fn experiment_count(self) -> usize {
        self.settings().len() * MODELS.len()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single (dataset, model, setting) cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Experiment {
    /// Dataset version.
    pub dataset: Dataset,
    /// Model under test.
    pub model: &'static ModelDescriptor,
    /// Run-mode configuration.
    pub setting: &'static Setting,
}

impl Experiment {
    /// `dataset | model | run_mode`, the key used in the failure listing.
    #[must_use]
    pub fn key(&self) -> String {
        format!(
            "{} | {} | {}",
            self.dataset, self.model.display_name, self.setting.run_mode
        )
    }
}

/// Expand the grid for the given datasets.
///
/// Datasets are visited in the order given; within a dataset the outer loop
/// is over [`MODELS`] and the inner loop over the dataset's settings.
#[must_use]
pub fn plan(datasets: &[Dataset]) -> Vec<Experiment> {
    datasets
        .iter()
        .flat_map(|&dataset| {
            MODELS.iter().flat_map(move |model| {
                dataset.settings().iter().map(move |setting| Experiment {
                    dataset,
                    model,
                    setting,
                })
            })
        })
        .collect()
}
