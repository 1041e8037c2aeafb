//! Trainer configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// What a step does when the loss or a gradient is NaN or infinite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonFinitePolicy {
    /// Abort the step with an error before any parameter or metric changes
    #[default]
    Fail,
    /// Drop the step without touching parameters or metrics and keep going
    SkipUpdate,
}

/// Step-level training configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    /// Clip gradients to this global L2 norm before the update
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_grad_norm: Option<f32>,

    /// Handling of non-finite losses and gradients
    #[serde(default)]
    pub non_finite: NonFinitePolicy,

    /// Emit a debug log line every N batches during `fit`
    #[serde(default = "default_log_interval")]
    pub log_interval: usize,
}

fn default_log_interval() -> usize {
    50
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            max_grad_norm: None,
            non_finite: NonFinitePolicy::Fail,
            log_interval: default_log_interval(),
        }
    }
}

impl TrainConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_grad_clip(mut self, max_norm: f32) -> Self {
        self.max_grad_norm = Some(max_norm);
        self
    }

    pub fn with_non_finite(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }

    pub fn with_log_interval(mut self, interval: usize) -> Self {
        self.log_interval = interval;
        self
    }

    /// Reject values the step cannot honor
    pub fn validate(&self) -> Result<()> {
        if let Some(norm) = self.max_grad_norm {
            if !(norm > 0.0 && norm.is_finite()) {
                return Err(Error::Config(format!(
                    "max_grad_norm {norm} must be a positive finite number"
                )));
            }
        }
        if self.log_interval == 0 {
            return Err(Error::Config("log_interval must be > 0".into()));
        }
        Ok(())
    }
}

/// Options for [`Trainer::fit`](crate::train::Trainer::fit)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitOptions {
    pub epochs: usize,
    pub batch_size: usize,
    /// Reshuffle training rows every epoch
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    /// Seed for the shuffle order
    #[serde(default)]
    pub seed: u64,
}

fn default_shuffle() -> bool {
    true
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            epochs: 1,
            batch_size: 32,
            shuffle: true,
            seed: 0,
        }
    }
}

impl FitOptions {
    pub fn new(epochs: usize, batch_size: usize) -> Self {
        Self {
            epochs,
            batch_size,
            ..Self::default()
        }
    }

    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.epochs == 0 {
            return Err(Error::Config("epochs must be > 0".into()));
        }
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be > 0".into()));
        }
        Ok(())
    }
}
