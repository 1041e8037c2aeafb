//! Train command implementation

use crate::cli::logging::log;
use crate::cli::{LogLevel, TrainArgs};
use crate::config::{load_config, train_from_spec, validate_config, ModelReport, RunSpec};
use crate::train::LOSS_METRIC;

/// Apply command-line overrides on top of the loaded config
pub fn apply_overrides(spec: &mut RunSpec, args: &TrainArgs) {
    if let Some(epochs) = args.epochs {
        spec.training.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        spec.training.batch_size = batch_size;
    }
    if let Some(lr) = args.lr {
        spec.optimizer.lr = Some(lr);
    }
    if let Some(seed) = args.seed {
        spec.seed = seed;
    }
}

/// One summary line per trained model
pub fn format_report(report: &ModelReport) -> String {
    let mut line = format!(
        "  {:<16} params={:<7} epochs={}",
        report.model,
        report.parameters,
        report.history.len()
    );
    if let Some(last) = report.history.last() {
        for (name, value) in last {
            line.push_str(&format!(" {name}={value:.4}"));
        }
    }
    if report.history.stopped_early {
        line.push_str(" (stopped early)");
    }
    if report.skipped_steps > 0 {
        line.push_str(&format!(" skipped_steps={}", report.skipped_steps));
    }
    line
}

pub fn run_train(args: TrainArgs, level: LogLevel) -> Result<(), String> {
    log(
        level,
        LogLevel::Normal,
        &format!("paso: training from {}", args.config.display()),
    );

    let mut spec = load_config(&args.config).map_err(|e| format!("Config error: {e}"))?;
    apply_overrides(&mut spec, &args);
    validate_config(&spec).map_err(|e| format!("Config error: {e}"))?;

    if args.dry_run {
        log(level, LogLevel::Normal, "Dry run - config validated successfully");
        for model in &spec.models {
            log(
                level,
                LogLevel::Verbose,
                &format!("  Model: {} ({:?}, hidden={:?})", model.name, model.kind, model.hidden),
            );
        }
        log(
            level,
            LogLevel::Verbose,
            &format!("  Epochs: {}", spec.training.epochs),
        );
        return Ok(());
    }

    let reports = train_from_spec(&spec).map_err(|e| format!("Training error: {e}"))?;

    log(level, LogLevel::Normal, "Results:");
    for report in &reports {
        log(level, LogLevel::Normal, &format_report(report));
    }
    if let Some(best) = reports
        .iter()
        .filter_map(|r| r.history.last().and_then(|l| l.get(LOSS_METRIC)).map(|v| (r, *v)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
    {
        log(
            level,
            LogLevel::Verbose,
            &format!("  Lowest final loss: {} ({:.4})", best.0.model, best.1),
        );
    }

    if let Some(path) = &args.history {
        let json = serde_json::to_string_pretty(&reports)
            .map_err(|e| format!("JSON serialization error: {e}"))?;
        std::fs::write(path, json)
            .map_err(|e| format!("Failed to write {}: {e}", path.display()))?;
        log(
            level,
            LogLevel::Normal,
            &format!("History written to {}", path.display()),
        );
    }

    log(level, LogLevel::Normal, "Training complete!");
    Ok(())
}
