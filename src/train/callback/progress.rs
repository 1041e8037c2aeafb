//! Progress callback that reports training through `tracing`

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::train::Logs;

fn format_logs(logs: &Logs) -> String {
    logs.iter()
        .map(|(k, v)| format!("{k}: {v:.4}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Logs a summary line per epoch and every `log_interval` batches
#[derive(Clone, Debug)]
pub struct ProgressLogger {
    log_interval: usize,
}

impl ProgressLogger {
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval: log_interval.max(1),
        }
    }

    pub fn log_interval(&self) -> usize {
        self.log_interval
    }
}

impl Default for ProgressLogger {
    fn default() -> Self {
        Self { log_interval: 10 }
    }
}

impl TrainerCallback for ProgressLogger {
    fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        tracing::debug!(epoch = ctx.epoch + 1, epochs = ctx.max_epochs, lr = ctx.lr, "epoch starting");
        CallbackAction::Continue
    }

    fn on_batch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if ctx.step > 0 && ctx.step % self.log_interval == 0 {
            tracing::debug!(
                "  step {}/{}: {}",
                ctx.step,
                ctx.steps_per_epoch,
                format_logs(&ctx.logs)
            );
        }
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        tracing::info!(
            "epoch {}/{}: {} ({:.1}s)",
            ctx.epoch + 1,
            ctx.max_epochs,
            format_logs(&ctx.logs),
            ctx.elapsed_secs
        );
        CallbackAction::Continue
    }

    fn name(&self) -> &'static str {
        "ProgressLogger"
    }
}
