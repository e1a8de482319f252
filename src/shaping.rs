//! # Reward shaping
//!
//! The training reward is built in a fixed order:
//!
//! 1. the raw environment reward,
//! 2. plus the count-based bonus of the resulting observation (if enabled),
//! 3. plus the uncertainty bonus `beta / sqrt(-ln(e_value) + 0.01)` (if enabled),
//! 4. clamped to `[-clip, clip]` (if clipping is enabled).
//!
//! `e_value` comes from the oracle: the action-value uncertainty of the
//! previous observation and the action taken, or the negated state-value
//! uncertainty of the resulting observation in actor-critic mode. When the
//! oracle cannot be queried a neutral 0.5 is used instead.

use crate::agent::Oracle;
use crate::config::{AgentConfig, UncertaintyBonus};
use crate::error::{CurioError, Result};
use crate::exploration::ExplorationBonus;
use crate::types::{Action, Observation, ALIVE, PLACEHOLDER_UNCERTAINTY};

/// Floor added to the uncertainty counter before the square root
const COUNTER_FLOOR: f32 = 0.01;

/// `beta / sqrt(-ln(e_value) + 0.01)`
pub fn uncertainty_bonus(beta: f32, e_value: f32) -> f32 {
    let counter = -e_value.ln();
    beta / (counter + COUNTER_FLOOR).sqrt()
}

#[derive(Debug)]
pub struct RewardShaper {
    count_bonus: Option<ExplorationBonus>,
    uncertainty: UncertaintyBonus,
    exploration_beta: f32,
    clip: Option<f32>,
}

impl RewardShaper {
    pub fn new(
        count_bonus: Option<ExplorationBonus>,
        uncertainty: UncertaintyBonus,
        exploration_beta: f32,
        clip: Option<f32>,
    ) -> Result<Self> {
        if let Some(clip) = clip {
            if !(clip.is_finite() && clip > 0.0) {
                return Err(CurioError::configuration(
                    "reward_clipping".to_string(),
                    format!("must be positive and finite, got {}", clip),
                ));
            }
        }
        if !(exploration_beta.is_finite() && exploration_beta >= 0.0) {
            return Err(CurioError::configuration(
                "exploration_beta".to_string(),
                format!("must be non-negative and finite, got {}", exploration_beta),
            ));
        }
        Ok(RewardShaper { count_bonus, uncertainty, exploration_beta, clip })
    }

    /// Build from a validated config. The count bonus estimator is supplied
    /// separately so callers choose its key function.
    pub fn from_config(config: &AgentConfig, count_bonus: Option<ExplorationBonus>) -> Result<Self> {
        Self::new(
            count_bonus,
            config.uncertainty_bonus,
            config.exploration_beta,
            config.reward_clipping,
        )
    }

    pub fn uncertainty_mode(&self) -> UncertaintyBonus {
        self.uncertainty
    }

    pub fn count_bonus(&self) -> Option<&ExplorationBonus> {
        self.count_bonus.as_ref()
    }

    /// The `e_value` feeding the uncertainty bonus for one transition.
    ///
    /// Zero when the bonus is disabled; the placeholder when `oracle` is `None`.
    pub fn uncertainty_value(
        &self,
        observation: &Observation,
        last_observation: &Observation,
        action: Action,
        oracle: Option<&mut dyn Oracle>,
    ) -> Result<f32> {
        let e_value = match (self.uncertainty, oracle) {
            (UncertaintyBonus::Disabled, _) => return Ok(0.0),
            (_, None) => return Ok(PLACEHOLDER_UNCERTAINTY),
            // TODO: confirm the sign convention of the actor-critic estimate
            // with the estimator's owners; it is negated here but not below.
            (UncertaintyBonus::StateValue, Some(oracle)) => {
                -oracle.state_uncertainty(observation, ALIVE)?
            }
            (UncertaintyBonus::ActionValue, Some(oracle)) => {
                oracle.action_uncertainty(last_observation, action, ALIVE)?
            }
        };
        if !e_value.is_finite() {
            return Err(CurioError::numeric("oracle uncertainty", e_value));
        }
        Ok(e_value)
    }

    /// Combine the raw reward with the enabled bonuses and clip.
    ///
    /// Mutates the count-based estimator when it is enabled.
    pub fn process_reward(&mut self, reward: f32, observation: &Observation, e_value: f32) -> Result<f32> {
        if !reward.is_finite() {
            return Err(CurioError::numeric("environment reward", reward));
        }
        let mut reward = reward;

        if let Some(count_bonus) = self.count_bonus.as_mut() {
            reward += count_bonus.bonus(observation);
        }

        if self.uncertainty != UncertaintyBonus::Disabled {
            let bonus = uncertainty_bonus(self.exploration_beta, e_value);
            if !bonus.is_finite() {
                return Err(CurioError::numeric("uncertainty bonus e_value", e_value));
            }
            reward += bonus;
        }

        if let Some(clip) = self.clip {
            reward = reward.clamp(-clip, clip);
        }

        if !reward.is_finite() {
            return Err(CurioError::numeric("training reward", reward));
        }
        Ok(reward)
    }

    /// Full shaping of one transition: query the uncertainty source, then
    /// combine and clip.
    pub fn shape(
        &mut self,
        raw_reward: f32,
        observation: &Observation,
        last_observation: &Observation,
        action: Action,
        oracle: Option<&mut dyn Oracle>,
    ) -> Result<f32> {
        let e_value = self.uncertainty_value(observation, last_observation, action, oracle)?;
        self.process_reward(raw_reward, observation, e_value)
    }
}
