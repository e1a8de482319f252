//! # Action selection
//!
//! Three rules, one per [`ActionMode`]:
//!
//! - **Uncertainty**: `argmax_a value[a] - epsilon * ln(-ln(uncertainty[a]))`.
//!   The term `-ln(-ln u)` has the form of Gumbel noise, so epsilon acts as a
//!   temperature: at 0 the choice is greedy, and it grows more exploratory as
//!   epsilon rises. Uncertainties near 1 push an action's score up.
//! - **EpsilonGreedy**: a random legal action with probability epsilon, the
//!   oracle's greedy action otherwise.
//! - **Random**: a random legal action without touching the oracle. Used to
//!   pre-fill the replay memory.
//!
//! Modes 1 and 2 issue exactly one oracle call per request.

use ndarray::Array1;
use rand::Rng;

use crate::agent::{Environment, Oracle, Summary};
use crate::error::{CurioError, Result};
use crate::schedule::EpsilonSchedule;
use crate::types::{Action, ActionMode, Observation, ALIVE};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActionSelector {
    schedule: EpsilonSchedule,
}

impl ActionSelector {
    pub fn new(schedule: EpsilonSchedule) -> Self {
        ActionSelector { schedule }
    }

    pub fn schedule(&self) -> &EpsilonSchedule {
        &self.schedule
    }

    /// Choose an action for `observation` at training step `step`
    #[allow(clippy::too_many_arguments)]
    pub fn select<E, O, S, R>(
        &self,
        step: usize,
        observation: &Observation,
        mode: ActionMode,
        env: &mut E,
        oracle: &mut O,
        summary: &mut S,
        rng: &mut R,
    ) -> Result<Action>
    where
        E: Environment + ?Sized,
        O: Oracle + ?Sized,
        S: Summary + ?Sized,
        R: Rng,
    {
        match mode {
            ActionMode::Uncertainty => {
                let epsilon = self.schedule.epsilon(step, summary);
                let (values, uncertainties) = oracle.action_values(observation, ALIVE)?;
                uncertainty_argmax(&values, &uncertainties, epsilon, env.num_actions())
            }
            ActionMode::EpsilonGreedy => {
                let epsilon = self.schedule.epsilon(step, summary);
                if rng.gen::<f32>() < epsilon {
                    Ok(env.sample_action())
                } else {
                    let action = oracle.best_action(observation)?;
                    let num_actions = env.num_actions();
                    if action >= num_actions {
                        return Err(CurioError::shape(
                            format!("greedy action < {}", num_actions),
                            action.to_string(),
                        ));
                    }
                    Ok(action)
                }
            }
            ActionMode::Random => Ok(env.sample_action()),
        }
    }
}

/// Index of the highest `value - epsilon * ln(-ln(uncertainty))` score.
///
/// Both arrays must hold one finite entry per action and every uncertainty
/// must lie strictly inside (0, 1). Ties go to the lowest index.
pub fn uncertainty_argmax(
    values: &Array1<f32>,
    uncertainties: &Array1<f32>,
    epsilon: f32,
    num_actions: usize,
) -> Result<Action> {
    if values.len() != num_actions || uncertainties.len() != num_actions {
        return Err(CurioError::shape(
            format!("{} values and uncertainties", num_actions),
            format!("{} values and {} uncertainties", values.len(), uncertainties.len()),
        ));
    }
    if num_actions == 0 {
        return Err(CurioError::shape("at least one action", "empty action space"));
    }

    let mut best: Option<(Action, f32)> = None;
    for (action, (&value, &uncertainty)) in values.iter().zip(uncertainties.iter()).enumerate() {
        if !value.is_finite() {
            return Err(CurioError::numeric(format!("value[{}]", action), value));
        }
        if !(uncertainty > 0.0 && uncertainty < 1.0) {
            return Err(CurioError::numeric(format!("uncertainty[{}]", action), uncertainty));
        }

        let score = value - epsilon * (-uncertainty.ln()).ln();
        if !score.is_finite() {
            return Err(CurioError::numeric(format!("score[{}]", action), score));
        }
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((action, score)),
        }
    }

    best.map(|(action, _)| action)
        .ok_or_else(|| CurioError::shape("at least one action", "no scores"))
}
