use rand::seq::SliceRandom;
use rand::thread_rng;
use std::collections::VecDeque;

use crate::agent::ExperienceStore;
use crate::error::{CurioError, Result};
use crate::types::{Action, Observation, Transition};

/// A transition joined with the observation it started from
#[derive(Clone, Debug, PartialEq)]
pub struct Experience {
    pub state: Observation,
    pub action: Action,
    pub reward: f32,
    pub next_state: Observation,
    pub done: bool,
}

/// Bounded in-memory experience store.
///
/// Keeps the most recent `capacity` transitions, each paired with the
/// observation that preceded it, so samples are ready-made
/// `(state, action, reward, next_state, done)` tuples.
#[derive(Clone, Debug)]
pub struct ReplayMemory {
    buffer: VecDeque<Experience>,
    capacity: usize,
    last_observation: Option<Observation>,
    episodes: usize,
}

impl ReplayMemory {
    pub fn new(capacity: usize) -> Self {
        ReplayMemory {
            buffer: VecDeque::with_capacity(capacity.min(1 << 16)),
            capacity,
            last_observation: None,
            episodes: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Episodes registered so far
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &Experience> {
        self.buffer.iter()
    }

    /// Uniformly sample up to `batch_size` distinct experiences
    pub fn sample(&self, batch_size: usize) -> Vec<&Experience> {
        let mut rng = thread_rng();
        let mut indices = (0..self.buffer.len()).collect::<Vec<usize>>();
        indices.shuffle(&mut rng);
        indices.truncate(batch_size);
        indices.into_iter().map(|i| &self.buffer[i]).collect()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.last_observation = None;
    }
}

impl ExperienceStore for ReplayMemory {
    fn store_new_episode(&mut self, observation: Observation) -> Result<()> {
        self.last_observation = Some(observation);
        self.episodes += 1;
        Ok(())
    }

    fn store_transition(&mut self, transition: Transition) -> Result<()> {
        let state = self.last_observation.take().ok_or_else(|| {
            CurioError::EpisodeState("transition stored before store_new_episode".to_string())
        })?;

        if self.capacity == 0 {
            self.last_observation = Some(transition.observation);
            return Ok(());
        }
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(Experience {
            state,
            action: transition.action,
            reward: transition.reward,
            next_state: transition.observation.clone(),
            done: transition.done,
        });
        self.last_observation = Some(transition.observation);
        Ok(())
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }
}
