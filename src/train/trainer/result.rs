//! Training history

use crate::train::Logs;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Per-epoch logs from [`Trainer::fit`](crate::train::Trainer::fit)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// One entry per completed epoch, training and `val_` metrics together
    pub epochs: Vec<Logs>,
    /// Whether a callback stopped training before the last planned epoch
    pub stopped_early: bool,
    /// Total training time in seconds
    pub elapsed_secs: f64,
}

impl History {
    /// Number of completed epochs
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    /// Logs of the last completed epoch
    pub fn last(&self) -> Option<&Logs> {
        self.epochs.last()
    }

    /// One metric across epochs; epochs that lack it are skipped
    pub fn series(&self, name: &str) -> Vec<f32> {
        self.epochs.iter().filter_map(|logs| logs.get(name).copied()).collect()
    }

    /// Best value of a metric under `better`, e.g. `f32::min`
    pub fn best(&self, name: &str, better: fn(f32, f32) -> f32) -> Option<f32> {
        self.series(name).into_iter().reduce(better)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the history as pretty JSON
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|e| Error::io(path, e))
    }
}
