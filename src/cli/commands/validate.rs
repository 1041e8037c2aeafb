//! Validate command implementation

use crate::cli::logging::log;
use crate::cli::{LogLevel, ValidateArgs};
use crate::config::{load_config, RunSpec};

/// Format data configuration as a string
pub fn format_data_info(spec: &RunSpec) -> String {
    let data = &spec.data;
    format!(
        "  Samples: {} ({} features, {} classes, spread {})\n  Validation split: {}",
        data.samples, data.features, data.classes, data.spread, data.validation_split
    )
}

/// Format optimizer configuration as a string
pub fn format_optimizer_info(spec: &RunSpec) -> String {
    let mut lines = vec![
        format!("  Optimizer: {}", spec.optimizer.name),
        format!("  Learning rate: {}", spec.optimizer.learning_rate()),
    ];
    if spec.optimizer.momentum > 0.0 {
        lines.push(format!(
            "  Momentum: {} (nesterov: {})",
            spec.optimizer.momentum, spec.optimizer.nesterov
        ));
    }
    lines.join("\n")
}

/// Format training configuration as a string
pub fn format_training_info(spec: &RunSpec) -> String {
    let training = &spec.training;
    let mut lines = vec![
        format!("  Epochs: {}", training.epochs),
        format!("  Batch size: {}", training.batch_size),
        format!("  Loss: {:?}", spec.loss),
        format!(
            "  Metrics: {}",
            spec.metrics.iter().map(|m| m.name()).collect::<Vec<_>>().join(", ")
        ),
    ];
    if let Some(clip) = training.max_grad_norm {
        lines.push(format!("  Gradient clipping: {clip}"));
    }
    if let Some(es) = &training.early_stopping {
        lines.push(format!(
            "  Early stopping: {} (patience {})",
            es.monitor, es.patience
        ));
    }
    lines.join("\n")
}

/// Format model list as a string
pub fn format_models_info(spec: &RunSpec) -> String {
    spec.models
        .iter()
        .map(|m| {
            format!(
                "  Model: {} ({:?}, hidden={:?}, dropout={})",
                m.name, m.kind, m.hidden, m.dropout
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn run_validate(args: ValidateArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("Validating config: {}", args.config.display()),
    );

    let spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;

    log(level, LogLevel::Normal, "Configuration is valid");

    if args.detailed {
        log(level, LogLevel::Normal, "\nData:");
        log(level, LogLevel::Normal, &format_data_info(&spec));
        log(level, LogLevel::Normal, "\nOptimizer:");
        log(level, LogLevel::Normal, &format_optimizer_info(&spec));
        log(level, LogLevel::Normal, "\nTraining:");
        log(level, LogLevel::Normal, &format_training_info(&spec));
        log(level, LogLevel::Normal, "\nModels:");
        log(level, LogLevel::Normal, &format_models_info(&spec));
    }

    Ok(())
}
