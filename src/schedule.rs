use log::warn;
use serde::{Serialize, Deserialize};

use crate::agent::Summary;
use crate::config::AgentConfig;
use crate::error::{CurioError, Result};

/// Linearly annealed exploration rate.
///
/// Epsilon falls from `initial` to `final_value` over `final_frame` steps and
/// stays at `final_value` afterwards:
///
/// `epsilon(step) = max(initial - step * (initial - final) / final_frame, final)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    initial: f32,
    final_value: f32,
    final_frame: usize,
}

impl EpsilonSchedule {
    pub fn new(initial: f32, final_value: f32, final_frame: usize) -> Result<Self> {
        if final_frame == 0 {
            return Err(CurioError::configuration(
                "final_exploration_frame",
                "must be greater than 0",
            ));
        }
        if !(initial.is_finite() && final_value.is_finite()) || initial < final_value {
            return Err(CurioError::configuration(
                "exploration".to_string(),
                format!("expected finite initial >= final, got {} and {}", initial, final_value),
            ));
        }
        Ok(EpsilonSchedule { initial, final_value, final_frame })
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        Self::new(
            config.initial_exploration,
            config.final_exploration,
            config.final_exploration_frame,
        )
    }

    pub fn initial(&self) -> f32 {
        self.initial
    }

    pub fn final_value(&self) -> f32 {
        self.final_value
    }

    pub fn final_frame(&self) -> usize {
        self.final_frame
    }

    /// Epsilon for a step, without reporting it
    pub fn value(&self, step: usize) -> f32 {
        if step >= self.final_frame {
            return self.final_value;
        }
        let rate = (self.initial - self.final_value) / self.final_frame as f32;
        let annealed = self.initial - step as f32 * rate;
        // min keeps rounding from pushing the value above `initial`
        annealed.max(self.final_value).min(self.initial)
    }

    /// Epsilon for a step, reported to the metrics sink.
    ///
    /// Reporting is best effort: a failing sink is logged and ignored.
    pub fn epsilon<S: Summary + ?Sized>(&self, step: usize, summary: &mut S) -> f32 {
        let epsilon = self.value(step);
        if let Err(err) = summary.epsilon(step, epsilon) {
            warn!("Failed to report epsilon at step {}: {}", step, err);
        }
        epsilon
    }
}
