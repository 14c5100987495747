use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ai::Thresholds;
use crate::ai::selector::{DEFAULT_BEST_MOVE_THRESHOLD, DEFAULT_SECOND_BEST_THRESHOLD};
use crate::error::ConfigError;

const DEFAULT_COMPUTER_DELAY_MS: u64 = 1000;

/// Session settings. Every field is optional when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Draws below this play the best move.
    pub best_move_threshold: f64,
    /// Draws below this (and not below `best_move_threshold`) play the
    /// second best move; the rest play the third.
    pub second_best_threshold: f64,
    /// Pause before the computer's move becomes due. Zero plays it on the
    /// next tick.
    pub computer_delay_ms: u64,
    /// Fixed RNG seed for reproducible games; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            best_move_threshold: DEFAULT_BEST_MOVE_THRESHOLD,
            second_best_threshold: DEFAULT_SECOND_BEST_THRESHOLD,
            computer_delay_ms: DEFAULT_COMPUTER_DELAY_MS,
            seed: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unit("best_move_threshold", self.best_move_threshold)?;
        check_unit("second_best_threshold", self.second_best_threshold)?;
        if self.best_move_threshold > self.second_best_threshold {
            return Err(ConfigError::ThresholdOrder {
                best: self.best_move_threshold,
                second: self.second_best_threshold,
            });
        }
        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            best: self.best_move_threshold,
            second: self.second_best_threshold,
        }
    }

    pub fn computer_delay(&self) -> Duration {
        Duration::from_millis(self.computer_delay_ms)
    }
}

fn check_unit(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails the range check too.
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}
