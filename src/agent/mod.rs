//! # Agent Control Loop
//!
//! This module holds the episode/transition controller and the traits for the
//! collaborators it drives.
//!
//! ## Collaborators
//!
//! - **Environment**: resets, steps and samples random legal actions
//! - **Oracle**: value and uncertainty estimates, plus ensemble head sampling
//! - **ExperienceStore**: receives the first observation of each episode and
//!   every transition
//! - **Summary**: best-effort metrics sink for epsilon and episode boundaries
//!
//! ## Lifecycle
//!
//! ```text
//! NoEpisode --new_game--> Active --take_action--> Active | Done
//!     ^                                              |
//!     +------------------ error ---------------------+
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! # use curio::agent::{Agent, Environment, Oracle};
//! # use curio::config::AgentConfig;
//! # use curio::replay_memory::ReplayMemory;
//! # fn run<E: Environment, O: Oracle>(env: E, oracle: O) -> curio::error::Result<()> {
//! let config = AgentConfig::default();
//! let mut agent = Agent::new(config, env, oracle, ReplayMemory::new(1_000_000), ())?;
//!
//! agent.populate_replay_memory()?;
//!
//! let mut step = 0;
//! agent.new_game()?;
//! loop {
//!     let action = agent.action(step)?;
//!     let outcome = agent.take_action(action)?;
//!     step += 1;
//!     if outcome.done {
//!         agent.log_episode(step);
//!         agent.new_game()?;
//!     }
//! #   if step > 10 { break; }
//! }
//! # Ok(())
//! # }
//! ```

pub mod traits;

mod controller;
pub use controller::{Agent, EpisodeState};
pub use traits::{Environment, ExperienceStore, Oracle, Summary};
