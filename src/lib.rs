//! # Curio - Exploration-Driven Agent Core
//!
//! Curio is the decision-and-reward core of a reinforcement-learning agent.
//! It steps an environment one action at a time, chooses actions under an
//! exploration policy, reshapes rewards with exploration bonuses and hands
//! every transition to an experience store for later training.
//!
//! ## Key Features
//!
//! - **Action selection**: epsilon-greedy, uncertainty-scored (bootstrapped
//!   ensembles) and uniform random for replay pre-fill
//! - **Epsilon annealing**: linear schedule reported to a metrics sink
//! - **Reward shaping**: count-based novelty bonus, value-uncertainty bonus
//!   and reward clipping, applied in a fixed order
//! - **Episode control**: game reset, per-step transition capture and
//!   bootstrap population of the replay memory
//!
//! The environment, value oracle, experience store and metrics sink are
//! traits in [`agent`]; the crate ships a [`replay_memory::ReplayMemory`],
//! a [`metrics::MetricsTracker`] and a [`summary::CsvSummary`].
//!
//! ## Module Organization
//!
//! - [`agent`] - Episode/transition controller and collaborator traits
//! - [`builders`] - Builder for assembling an agent
//! - [`config`] - Serializable agent configuration
//! - [`error`] - Error types and result handling
//! - [`exploration`] - Count-based exploration bonus
//! - [`metrics`] - In-memory metrics sink
//! - [`policy`] - Action selection rules
//! - [`replay_memory`] - In-memory experience store
//! - [`schedule`] - Epsilon annealing
//! - [`shaping`] - Reward shaping
//! - [`summary`] - CSV metrics sink
//! - [`types`] - Observations, actions and transitions

pub mod agent;
pub mod builders;
pub mod config;
pub mod error;
pub mod exploration;
pub mod metrics;
pub mod policy;
pub mod replay_memory;
pub mod schedule;
pub mod shaping;
pub mod summary;
pub mod types;

#[cfg(test)]
mod tests;
