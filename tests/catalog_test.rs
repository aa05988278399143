//! Experiment grid and command construction tests

use std::path::Path;

use dares_runner::experiment::{
    plan, Dataset, Grain, ModelFamily, DARES1_SETTINGS, DARES2_SETTINGS, MODELS,
};
use dares_runner::{ExperimentCommand, TrainingParams};

// =============================================================================
// Grid
// =============================================================================

#[test]
fn test_total_experiment_count() {
    let total = plan(&Dataset::ALL).len();
    assert_eq!(total, (DARES1_SETTINGS.len() + DARES2_SETTINGS.len()) * MODELS.len());
    assert_eq!(total, 70);
}

#[test]
fn test_dares1_strictly_precedes_dares2() {
    let experiments = plan(&Dataset::ALL);
    let last_dares1 = experiments
        .iter()
        .rposition(|e| e.dataset == Dataset::Dares1)
        .unwrap();
    let first_dares2 = experiments
        .iter()
        .position(|e| e.dataset == Dataset::Dares2)
        .unwrap();
    assert_eq!(last_dares1 + 1, first_dares2);
    assert_eq!(first_dares2, 30);
}

#[test]
fn test_models_outer_settings_inner() {
    for dataset in Dataset::ALL {
        let experiments = plan(&[dataset]);
        let settings = dataset.settings();
        for (i, experiment) in experiments.iter().enumerate() {
            assert_eq!(experiment.model, &MODELS[i / settings.len()]);
            assert_eq!(experiment.setting, &settings[i % settings.len()]);
        }
    }
}

#[test]
fn test_model_table() {
    let families: Vec<ModelFamily> = MODELS.iter().map(|m| m.family).collect();
    assert_eq!(
        families,
        vec![
            ModelFamily::Bert,
            ModelFamily::Bert,
            ModelFamily::Electra,
            ModelFamily::Bert,
            ModelFamily::XlmRoberta,
        ]
    );
    assert_eq!(MODELS[4].identifier, "xlm-roberta-base");
    assert_eq!(MODELS[4].display_name, "XLM-R");
}

#[test]
fn test_fine_settings_precede_coarse() {
    for dataset in Dataset::ALL {
        let grains: Vec<Grain> = dataset.settings().iter().map(|s| s.grain).collect();
        let half = grains.len() / 2;
        assert!(grains[..half].iter().all(|g| *g == Grain::Fine));
        assert!(grains[half..].iter().all(|g| *g == Grain::Coarse));
    }
}

// =============================================================================
// Command construction
// =============================================================================

#[test]
fn test_dares1_run_mode_and_append_column() {
    let params = TrainingParams::default();
    for experiment in plan(&[Dataset::Dares1]) {
        let command = ExperimentCommand::new(Path::new("python"), &experiment, &params);
        assert_eq!(command.arg_value("--run_mode"), Some(experiment.setting.run_mode));

        match experiment.setting.append_column {
            None => assert!(!command.args().iter().any(|a| a == "--append_column")),
            Some(column) => assert_eq!(command.arg_value("--append_column"), Some(column)),
        }
    }
}

#[test]
fn test_fixed_hyperparameters() {
    let experiment = plan(&[Dataset::Dares2])[0];
    let command = ExperimentCommand::new(Path::new("python"), &experiment, &TrainingParams::default());

    assert_eq!(command.program(), Path::new("python"));
    assert_eq!(command.arg_value("-m"), Some("experiments.dares2.0_assess"));
    assert_eq!(command.arg_value("--num_train_epochs"), Some("4"));
    assert_eq!(command.arg_value("--n_fold"), Some("3"));
    assert_eq!(command.arg_value("--cuda_device"), Some("0"));
    assert_eq!(command.arg_value("--lr"), Some("0.00001"));
    assert_eq!(command.arg_value("--save_predictions"), Some("True"));
}

#[test]
fn test_model_arguments() {
    let experiment = plan(&[Dataset::Dares1])[2 * DARES1_SETTINGS.len()];
    let command = ExperimentCommand::new(Path::new("python"), &experiment, &TrainingParams::default());

    assert_eq!(
        command.arg_value("--model_name"),
        Some("aubmindlab/araelectra-base-discriminator")
    );
    assert_eq!(command.arg_value("--model_type"), Some("electra"));
}

#[test]
fn test_overridden_params_flow_into_command() {
    let experiment = plan(&[Dataset::Dares1])[0];
    let params = TrainingParams {
        num_train_epochs: 1,
        n_fold: 5,
        cuda_device: 2,
        lr: 0.0002,
        save_predictions: true,
    };
    let command = ExperimentCommand::new(Path::new("/usr/bin/python3"), &experiment, &params);

    assert_eq!(command.arg_value("--num_train_epochs"), Some("1"));
    assert_eq!(command.arg_value("--n_fold"), Some("5"));
    assert_eq!(command.arg_value("--cuda_device"), Some("2"));
    assert_eq!(command.arg_value("--lr"), Some("0.0002"));
    assert!(command.to_string().starts_with("/usr/bin/python3 -m "));
}
