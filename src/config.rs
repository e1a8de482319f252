//! Agent configuration
//!
//! `AgentConfig` collects every scalar and mode flag the agent core reads.
//! It is plain serde data, so a training driver can keep it next to its own
//! settings in a JSON file.

use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{CurioError, Result};
use crate::types::ActionMode;

/// How the value-uncertainty exploration bonus is obtained
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UncertaintyBonus {
    Disabled,
    /// Action-value uncertainty of the previous observation and the action taken
    ActionValue,
    /// Negated state-value uncertainty of the resulting observation (actor-critic)
    StateValue,
}

/// Count-based exploration bonus settings
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CountBonusConfig {
    pub beta: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub initial_exploration: f32,
    pub final_exploration: f32,
    pub final_exploration_frame: usize,

    /// Selection rule used during training. `Random` is reserved for replay
    /// pre-fill and rejected here.
    pub action_mode: ActionMode,

    pub count_bonus: Option<CountBonusConfig>,
    pub uncertainty_bonus: UncertaintyBonus,
    pub exploration_beta: f32,

    /// Symmetric bound on the training reward; `None` disables clipping
    pub reward_clipping: Option<f32>,

    /// Transitions to collect before learning starts
    pub replay_start_size: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        AgentConfig {
            initial_exploration: 1.0,
            final_exploration: 0.1,
            final_exploration_frame: 1_000_000,
            action_mode: ActionMode::EpsilonGreedy,
            count_bonus: None,
            uncertainty_bonus: UncertaintyBonus::Disabled,
            exploration_beta: 0.01,
            reward_clipping: Some(1.0),
            replay_start_size: 50_000,
        }
    }
}

impl AgentConfig {
    /// Check every field, failing on the first invalid one
    pub fn validate(&self) -> Result<()> {
        if self.final_exploration_frame == 0 {
            return Err(CurioError::configuration(
                "final_exploration_frame",
                "must be greater than 0",
            ));
        }

        for (name, value) in [
            ("initial_exploration", self.initial_exploration),
            ("final_exploration", self.final_exploration),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(CurioError::configuration(
                    name.to_string(),
                    format!("must lie in [0, 1], got {}", value),
                ));
            }
        }

        if self.initial_exploration < self.final_exploration {
            return Err(CurioError::configuration(
                "final_exploration",
                "must not exceed initial_exploration",
            ));
        }

        if self.action_mode == ActionMode::Random {
            return Err(CurioError::configuration(
                "action_mode",
                "Random is only used while populating replay memory",
            ));
        }

        if let Some(count) = &self.count_bonus {
            if !(count.beta.is_finite() && count.beta > 0.0) {
                return Err(CurioError::configuration(
                    "count_bonus.beta".to_string(),
                    format!("must be positive and finite, got {}", count.beta),
                ));
            }
        }

        if !(self.exploration_beta.is_finite() && self.exploration_beta >= 0.0) {
            return Err(CurioError::configuration(
                "exploration_beta".to_string(),
                format!("must be non-negative and finite, got {}", self.exploration_beta),
            ));
        }

        if let Some(clip) = self.reward_clipping {
            if !(clip.is_finite() && clip > 0.0) {
                return Err(CurioError::configuration(
                    "reward_clipping".to_string(),
                    format!("must be positive and finite, got {}", clip),
                ));
            }
        }

        if self.replay_start_size == 0 {
            return Err(CurioError::configuration(
                "replay_start_size",
                "must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Load and validate a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let serialized = serde_json::to_string_pretty(self)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }
}
