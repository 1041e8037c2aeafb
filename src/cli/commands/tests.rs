//! CLI command tests

use super::train::{apply_overrides, format_report};
use super::validate::{format_models_info, format_optimizer_info, format_training_info};
use super::*;
use crate::cli::{InfoArgs, OutputFormat, TrainArgs, ValidateArgs};
use crate::config::{parse_config, ModelReport};
use crate::train::History;
use std::path::PathBuf;
use tempfile::TempDir;

const CONFIG: &str = r#"
seed: 2
data:
  samples: 60
  features: 2
  classes: 2
training:
  epochs: 1
  batch_size: 20
optimizer:
  name: sgd
  lr: 0.05
models:
  - name: tiny
    hidden: [4]
"#;

/// Create a minimal valid config file for testing
fn create_test_config(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("run.yaml");
    std::fs::write(&path, CONFIG).unwrap();
    path
}

fn train_args(config: PathBuf) -> TrainArgs {
    TrainArgs {
        config,
        epochs: None,
        batch_size: None,
        lr: None,
        seed: None,
        history: None,
        dry_run: false,
    }
}

fn cli(command: Command) -> Cli {
    Cli {
        command,
        verbose: false,
        quiet: true,
    }
}

#[test]
fn test_apply_overrides() {
    let mut spec = parse_config(CONFIG).unwrap();
    let mut args = train_args(PathBuf::from("unused"));
    args.epochs = Some(7);
    args.lr = Some(0.3);
    args.seed = Some(99);
    apply_overrides(&mut spec, &args);
    assert_eq!(spec.training.epochs, 7);
    assert_eq!(spec.optimizer.learning_rate(), 0.3);
    assert_eq!(spec.seed, 99);
    assert_eq!(spec.training.batch_size, 20);
}

#[test]
fn test_train_writes_history() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    let history = dir.path().join("history.json");
    let mut args = train_args(config);
    args.history = Some(history.clone());

    run_command(cli(Command::Train(args))).unwrap();

    let json = std::fs::read_to_string(history).unwrap();
    let reports: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(reports[0]["model"], "tiny");
    assert_eq!(reports[0]["history"]["epochs"].as_array().map(Vec::len), Some(1));
}

#[test]
fn test_train_rejects_invalid_override() {
    let dir = TempDir::new().unwrap();
    let mut args = train_args(create_test_config(&dir));
    args.batch_size = Some(0);
    let err = run_command(cli(Command::Train(args))).unwrap_err();
    assert!(err.contains("batch size"));
}

#[test]
fn test_train_dry_run() {
    let dir = TempDir::new().unwrap();
    let mut args = train_args(create_test_config(&dir));
    args.dry_run = true;
    assert!(run_command(cli(Command::Train(args))).is_ok());
}

#[test]
fn test_validate_and_info() {
    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);
    assert!(run_command(cli(Command::Validate(ValidateArgs {
        config: config.clone(),
        detailed: true,
    })))
    .is_ok());
    for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Yaml] {
        assert!(run_command(cli(Command::Info(InfoArgs {
            config: config.clone(),
            format,
        })))
        .is_ok());
    }
}

#[test]
fn test_missing_config_reports_error() {
    let err = run_command(cli(Command::Validate(ValidateArgs {
        config: PathBuf::from("/nonexistent/run.yaml"),
        detailed: false,
    })))
    .unwrap_err();
    assert!(err.starts_with("Config error"));
}

#[test]
fn test_format_helpers() {
    let spec = parse_config(CONFIG).unwrap();
    assert!(format_optimizer_info(&spec).contains("Learning rate: 0.05"));
    assert!(format_training_info(&spec).contains("Batch size: 20"));
    assert!(format_models_info(&spec).contains("tiny"));
}

#[test]
fn test_format_report() {
    let mut history = History::default();
    history.epochs.push([("loss".to_string(), 0.5f32)].into_iter().collect());
    history.stopped_early = true;
    let line = format_report(&ModelReport {
        model: "m".into(),
        parameters: 10,
        skipped_steps: 2,
        history,
    });
    assert!(line.contains("loss=0.5000"));
    assert!(line.contains("stopped early"));
    assert!(line.contains("skipped_steps=2"));
}
