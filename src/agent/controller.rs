use log::{debug, error, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agent::{Environment, ExperienceStore, Oracle, Summary};
use crate::config::AgentConfig;
use crate::error::{CurioError, Result};
use crate::exploration::{ExplorationBonus, ObservationKey, QuantizedHashKey};
use crate::policy::ActionSelector;
use crate::schedule::EpsilonSchedule;
use crate::shaping::RewardShaper;
use crate::types::{Action, ActionMode, Observation, StepOutcome, Transition, UncertaintySource};

/// Where the controller is in the episode lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EpisodeState {
    /// No episode started yet, or the last one aborted on an error
    NoEpisode,
    Active,
    /// The environment reported `done`; call `new_game` before stepping again
    Done,
}

/// The agent control loop.
///
/// Owns the environment, oracle, experience store and metrics sink, and
/// drives them one synchronous step at a time:
///
/// - [`new_game`](Agent::new_game) samples an ensemble head, resets the
///   environment and registers the first observation with the store.
/// - [`action`](Agent::action) picks an action for the current observation.
/// - [`take_action`](Agent::take_action) steps the environment, shapes the
///   reward and stores exactly one transition.
/// - [`populate_replay_memory`](Agent::populate_replay_memory) plays random
///   episodes until the store holds enough transitions to start learning.
///
/// Any error aborts the current episode and is returned with the episode and
/// frame (or training step) it happened at.
pub struct Agent<E, O, M, S = ()> {
    config: AgentConfig,
    env: E,
    oracle: O,
    memory: M,
    summary: S,
    selector: ActionSelector,
    shaper: RewardShaper,
    state: EpisodeState,
    observation: Option<Observation>,
    frame: usize,
    rng: StdRng,
}

impl<E, O, M, S> Agent<E, O, M, S>
where
    E: Environment,
    O: Oracle,
    M: ExperienceStore,
    S: Summary,
{
    /// Create an agent with the default observation key and an entropy-seeded RNG
    pub fn new(config: AgentConfig, env: E, oracle: O, memory: M, summary: S) -> Result<Self> {
        Self::assemble(config, env, oracle, memory, summary, None, StdRng::from_entropy())
    }

    pub(crate) fn assemble(
        config: AgentConfig,
        env: E,
        oracle: O,
        memory: M,
        summary: S,
        observation_key: Option<Box<dyn ObservationKey + Send>>,
        rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;

        let count_bonus = match (config.count_bonus, observation_key) {
            (Some(count), Some(key)) => Some(ExplorationBonus::with_boxed_key(count.beta, key)?),
            (Some(count), None) => Some(ExplorationBonus::new(count.beta, QuantizedHashKey::default())?),
            (None, Some(_)) => {
                return Err(CurioError::configuration(
                    "observation_key",
                    "supplied but the count bonus is disabled",
                ));
            }
            (None, None) => None,
        };

        let selector = ActionSelector::new(EpsilonSchedule::from_config(&config)?);
        let shaper = RewardShaper::from_config(&config, count_bonus)?;

        Ok(Agent {
            config,
            env,
            oracle,
            memory,
            summary,
            selector,
            shaper,
            state: EpisodeState::NoEpisode,
            observation: None,
            frame: 0,
            rng,
        })
    }

    /// Start a new episode and return the environment's reset outcome
    pub fn new_game(&mut self) -> Result<StepOutcome> {
        let result = self.start_episode();
        match result {
            Ok(outcome) => {
                self.state = EpisodeState::Active;
                self.frame = 0;
                debug!("Episode {} started", self.env.episode());
                Ok(outcome)
            }
            Err(err) => Err(self.abort(err.at_frame(self.env.episode(), 0))),
        }
    }

    fn start_episode(&mut self) -> Result<StepOutcome> {
        self.observation = None;
        self.oracle.sample_head()?;
        let outcome = self.env.reset()?;
        self.memory.store_new_episode(outcome.observation.clone())?;
        self.observation = Some(outcome.observation.clone());
        Ok(outcome)
    }

    /// Epsilon at `step`, reported to the metrics sink
    pub fn epsilon(&mut self, step: usize) -> f32 {
        self.selector.schedule().epsilon(step, &mut self.summary)
    }

    /// Choose an action for the current observation using the configured mode
    pub fn action(&mut self, step: usize) -> Result<Action> {
        self.action_with(step, self.config.action_mode)
    }

    /// Choose an action for the current observation using `mode`
    pub fn action_with(&mut self, step: usize, mode: ActionMode) -> Result<Action> {
        let observation = match self.observation.as_ref() {
            Some(observation) => observation,
            None => {
                return Err(CurioError::EpisodeState(
                    "no current observation; call new_game first".to_string(),
                ))
            }
        };
        let result = self.selector.select(
            step,
            observation,
            mode,
            &mut self.env,
            &mut self.oracle,
            &mut self.summary,
            &mut self.rng,
        );
        result.map_err(|err| self.abort(err.at_step(step)))
    }

    /// Choose an action for an arbitrary observation
    pub fn select_action(&mut self, step: usize, observation: &Observation, mode: ActionMode) -> Result<Action> {
        let result = self.selector.select(
            step,
            observation,
            mode,
            &mut self.env,
            &mut self.oracle,
            &mut self.summary,
            &mut self.rng,
        );
        result.map_err(|err| self.abort(err.at_step(step)))
    }

    /// Step the environment, querying the oracle for the uncertainty bonus.
    ///
    /// Returns the raw environment outcome; the shaped reward goes to the store.
    pub fn take_action(&mut self, action: Action) -> Result<StepOutcome> {
        self.take_action_with(action, UncertaintySource::Oracle)
    }

    /// Step the environment with an explicit uncertainty source
    pub fn take_action_with(&mut self, action: Action, source: UncertaintySource) -> Result<StepOutcome> {
        match self.state {
            EpisodeState::Active => {}
            EpisodeState::NoEpisode => {
                return Err(CurioError::EpisodeState(
                    "no episode in progress; call new_game first".to_string(),
                ))
            }
            EpisodeState::Done => {
                return Err(CurioError::EpisodeState(
                    "episode finished; call new_game first".to_string(),
                ))
            }
        }

        match self.advance(action, source) {
            Ok(outcome) => {
                self.frame += 1;
                if outcome.done {
                    self.state = EpisodeState::Done;
                }
                Ok(outcome)
            }
            Err(err) => Err(self.abort(err.at_frame(self.env.episode(), self.frame + 1))),
        }
    }

    fn advance(&mut self, action: Action, source: UncertaintySource) -> Result<StepOutcome> {
        let outcome = self.env.step(action)?;

        let last_observation = self
            .observation
            .as_ref()
            .ok_or_else(|| CurioError::EpisodeState("episode has no observation".to_string()))?;
        let oracle: Option<&mut dyn Oracle> = match source {
            UncertaintySource::Oracle => Some(&mut self.oracle as &mut dyn Oracle),
            UncertaintySource::Unavailable => None,
        };
        let reward = self.shaper.shape(
            outcome.reward,
            &outcome.observation,
            last_observation,
            action,
            oracle,
        )?;

        self.memory.store_transition(Transition {
            action,
            reward,
            done: outcome.done,
            observation: outcome.observation.clone(),
        })?;
        self.observation = Some(outcome.observation.clone());

        Ok(outcome)
    }

    /// Play uniformly random actions until the store has seen at least
    /// `replay_start_size` transitions and the last episode has finished.
    ///
    /// The oracle is never queried; the uncertainty bonus uses its placeholder.
    /// Resets the environment's episode counter afterwards and returns the
    /// number of transitions stored.
    pub fn populate_replay_memory(&mut self) -> Result<usize> {
        let target = self.config.replay_start_size;
        info!("Populating replay memory with at least {} random transitions", target);

        let mut count = 0;
        let mut done = true;
        while count < target || !done {
            if done {
                self.new_game()?;
            }
            let action = self.action_with(0, ActionMode::Random)?;
            let outcome = self.take_action_with(action, UncertaintySource::Unavailable)?;
            done = outcome.done;
            count += 1;
        }

        self.env.reset_episode_counter();
        info!(
            "Replay memory populated: {} transitions over {} target, store holds {}",
            count,
            target,
            self.memory.len()
        );
        Ok(count)
    }

    /// Report the episode boundary to the metrics sink
    pub fn log_episode(&mut self, step: usize) {
        let episode = self.env.episode();
        if let Err(err) = self.summary.log_episode(step, episode) {
            warn!("Failed to log episode {} at step {}: {}", episode, step, err);
        }
    }

    fn abort(&mut self, err: CurioError) -> CurioError {
        if self.state == EpisodeState::Active {
            error!("Aborting episode {}: {}", self.env.episode(), err);
        }
        self.state = EpisodeState::NoEpisode;
        err
    }

    pub fn state(&self) -> EpisodeState {
        self.state
    }

    /// Steps taken in the current episode
    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn observation(&self) -> Option<&Observation> {
        self.observation.as_ref()
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn shaper(&self) -> &RewardShaper {
        &self.shaper
    }

    pub fn environment(&self) -> &E {
        &self.env
    }

    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn summary(&self) -> &S {
        &self.summary
    }

    /// Give the collaborators back
    pub fn into_parts(self) -> (E, O, M, S) {
        (self.env, self.oracle, self.memory, self.summary)
    }
}
