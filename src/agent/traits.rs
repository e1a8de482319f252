use ndarray::Array1;

use crate::error::Result;
use crate::types::{Action, Observation, StepOutcome, Transition};

/// The simulator the agent plays in
pub trait Environment {
    /// Start a new episode
    fn reset(&mut self) -> Result<StepOutcome>;

    /// Apply an action and advance one step
    fn step(&mut self, action: Action) -> Result<StepOutcome>;

    /// Uniformly sample a legal action
    fn sample_action(&mut self) -> Action;

    /// Size of the discrete action space
    fn num_actions(&self) -> usize;

    /// Episodes started so far
    fn episode(&self) -> usize;

    fn reset_episode_counter(&mut self);
}

/// Value and uncertainty estimates for observations.
///
/// `alive` is the batch-liveness input of the estimator; single-environment
/// stepping always passes `true`. Each method is one inference call.
pub trait Oracle {
    /// Select the ensemble head used for the next episode
    fn sample_head(&mut self) -> Result<()>;

    /// Greedy action under the current head
    fn best_action(&mut self, observation: &Observation) -> Result<Action>;

    /// Per-action value estimates and per-action uncertainties in (0, 1)
    fn action_values(
        &mut self,
        observation: &Observation,
        alive: bool,
    ) -> Result<(Array1<f32>, Array1<f32>)>;

    /// Uncertainty of the state value
    fn state_uncertainty(&mut self, observation: &Observation, alive: bool) -> Result<f32>;

    /// Uncertainty of the value of `action` in `observation`
    fn action_uncertainty(
        &mut self,
        observation: &Observation,
        action: Action,
        alive: bool,
    ) -> Result<f32>;
}

/// Where transitions go once they are created
pub trait ExperienceStore {
    fn store_new_episode(&mut self, observation: Observation) -> Result<()>;

    fn store_transition(&mut self, transition: Transition) -> Result<()>;

    /// Transitions currently held
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Metrics sink. Failures are reported but never abort the agent.
pub trait Summary {
    fn epsilon(&mut self, step: usize, value: f32) -> Result<()>;

    fn log_episode(&mut self, step: usize, episode: usize) -> Result<()>;
}

/// Discards everything
impl Summary for () {
    fn epsilon(&mut self, _step: usize, _value: f32) -> Result<()> {
        Ok(())
    }

    fn log_episode(&mut self, _step: usize, _episode: usize) -> Result<()> {
        Ok(())
    }
}

impl<S: Summary + ?Sized> Summary for Box<S> {
    fn epsilon(&mut self, step: usize, value: f32) -> Result<()> {
        (**self).epsilon(step, value)
    }

    fn log_episode(&mut self, step: usize, episode: usize) -> Result<()> {
        (**self).log_episode(step, episode)
    }
}
