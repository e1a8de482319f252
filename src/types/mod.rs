use ndarray::ArrayD;
use serde::{Serialize, Deserialize};

/// A frame or a stack of frames, opaque to the agent core
pub type Observation = ArrayD<f32>;

/// Index into the environment's discrete action space
pub type Action = usize;

/// What the environment hands back on `reset` and `step`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f32,
    pub done: bool,
}

impl StepOutcome {
    pub fn new(observation: Observation, reward: f32, done: bool) -> Self {
        StepOutcome { observation, reward, done }
    }
}

/// A stored transition: the action taken, the shaped training reward and
/// the observation it led to.
///
/// Transitions are built once and handed to the experience store by value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub action: Action,
    pub reward: f32,
    pub done: bool,
    pub observation: Observation,
}

/// Which action-selection rule to apply for a single request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionMode {
    /// Score actions by value minus an epsilon-weighted uncertainty term
    Uncertainty,
    /// Random action with probability epsilon, greedy otherwise
    EpsilonGreedy,
    /// Uniform random, never consults the oracle (replay pre-fill)
    Random,
}

/// Whether the oracle may be queried for the uncertainty bonus of a step
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UncertaintySource {
    Oracle,
    /// Use the neutral placeholder instead of querying
    Unavailable,
}

/// Neutral uncertainty value used when the oracle cannot be queried
pub const PLACEHOLDER_UNCERTAINTY: f32 = 0.5;

/// Value of the oracle's `alive` input for single-environment stepping
pub const ALIVE: bool = true;
