use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agent::{Agent, Environment, ExperienceStore, Oracle, Summary};
use crate::config::AgentConfig;
use crate::error::Result;
use crate::exploration::ObservationKey;

/// Builder for Agent
///
/// The environment, oracle and store are required up front; everything else
/// has a default.
///
/// ```rust,no_run
/// # use curio::agent::{Environment, Oracle};
/// # use curio::builders::AgentBuilder;
/// # use curio::config::{AgentConfig, CountBonusConfig};
/// # use curio::exploration::QuantizedHashKey;
/// # use curio::metrics::MetricsTracker;
/// # use curio::replay_memory::ReplayMemory;
/// # fn build<E: Environment, O: Oracle>(env: E, oracle: O) -> curio::error::Result<()> {
/// let config = AgentConfig {
///     count_bonus: Some(CountBonusConfig { beta: 0.05 }),
///     ..AgentConfig::default()
/// };
/// let agent = AgentBuilder::new(env, oracle, ReplayMemory::new(100_000))
///     .config(config)
///     .summary(MetricsTracker::default())
///     .observation_key(QuantizedHashKey::new(16, 0.0, 1.0))
///     .seed(7)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct AgentBuilder<E, O, M, S = ()> {
    env: E,
    oracle: O,
    memory: M,
    summary: S,
    config: AgentConfig,
    observation_key: Option<Box<dyn ObservationKey + Send>>,
    seed: Option<u64>,
}

impl<E, O, M> AgentBuilder<E, O, M, ()>
where
    E: Environment,
    O: Oracle,
    M: ExperienceStore,
{
    pub fn new(env: E, oracle: O, memory: M) -> Self {
        AgentBuilder {
            env,
            oracle,
            memory,
            summary: (),
            config: AgentConfig::default(),
            observation_key: None,
            seed: None,
        }
    }
}

impl<E, O, M, S> AgentBuilder<E, O, M, S>
where
    E: Environment,
    O: Oracle,
    M: ExperienceStore,
    S: Summary,
{
    pub fn config(mut self, config: AgentConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the metrics sink
    pub fn summary<S2: Summary>(self, summary: S2) -> AgentBuilder<E, O, M, S2> {
        AgentBuilder {
            env: self.env,
            oracle: self.oracle,
            memory: self.memory,
            summary,
            config: self.config,
            observation_key: self.observation_key,
            seed: self.seed,
        }
    }

    /// Key function for the count-based bonus. Requires `count_bonus` in the config.
    pub fn observation_key<K>(mut self, key: K) -> Self
    where
        K: ObservationKey + Send + 'static,
    {
        self.observation_key = Some(Box::new(key));
        self
    }

    /// Seed the agent's exploration RNG
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Agent<E, O, M, S>> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Agent::assemble(
            self.config,
            self.env,
            self.oracle,
            self.memory,
            self.summary,
            self.observation_key,
            rng,
        )
    }
}
