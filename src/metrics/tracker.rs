use std::collections::VecDeque;
use serde::{Serialize, Deserialize};

use crate::agent::Summary;
use crate::error::Result;

/// Stores agent metrics over time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentMetrics {
    /// `(step, epsilon)` pairs in report order
    pub epsilons: VecDeque<(usize, f32)>,

    /// `(step, episode)` pairs for each finished episode
    pub episodes: VecDeque<(usize, usize)>,
}

/// In-memory metrics sink with a bounded history
pub struct MetricsTracker {
    metrics: AgentMetrics,
    history_size: usize,
    total_epsilon_reports: usize,
}

impl MetricsTracker {
    pub fn new(history_size: usize) -> Self {
        MetricsTracker {
            metrics: AgentMetrics {
                epsilons: VecDeque::with_capacity(history_size),
                episodes: VecDeque::with_capacity(history_size),
            },
            history_size,
            total_epsilon_reports: 0,
        }
    }

    /// Get a reference to the metrics
    pub fn metrics(&self) -> &AgentMetrics {
        &self.metrics
    }

    /// Most recently reported epsilon
    pub fn last_epsilon(&self) -> Option<f32> {
        self.metrics.epsilons.back().map(|&(_, epsilon)| epsilon)
    }

    /// Epsilon reports received, including ones evicted from the history
    pub fn total_epsilon_reports(&self) -> usize {
        self.total_epsilon_reports
    }

    pub fn episodes_logged(&self) -> usize {
        self.metrics.episodes.len()
    }

    /// Clear all metrics
    pub fn clear(&mut self) {
        self.metrics = AgentMetrics::default();
        self.total_epsilon_reports = 0;
    }

    /// Save metrics to file
    pub fn save(&self, path: &str) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self.metrics)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    /// Load metrics from file
    pub fn load(&mut self, path: &str) -> Result<()> {
        let data = std::fs::read_to_string(path)?;
        self.metrics = serde_json::from_str(&data)?;
        Ok(())
    }

    fn push<T>(history: &mut VecDeque<T>, history_size: usize, value: T) {
        if history_size == 0 {
            return;
        }
        if history.len() >= history_size {
            history.pop_front();
        }
        history.push_back(value);
    }
}

impl Summary for MetricsTracker {
    fn epsilon(&mut self, step: usize, value: f32) -> Result<()> {
        Self::push(&mut self.metrics.epsilons, self.history_size, (step, value));
        self.total_epsilon_reports += 1;
        Ok(())
    }

    fn log_episode(&mut self, step: usize, episode: usize) -> Result<()> {
        Self::push(&mut self.metrics.episodes, self.history_size, (step, episode));
        Ok(())
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new(1000)
    }
}
