//! # Count-based exploration bonus
//!
//! `ExplorationBonus` keeps a visitation count per observation key and pays
//! `beta / sqrt(count)` for every observation it sees. The count is bumped
//! before the division, so the first visit already pays `beta` and the bonus
//! never divides by zero.
//!
//! The key function is injected, which lets a driver choose how coarsely
//! frames are grouped:
//!
//! ```rust
//! use curio::exploration::{ExplorationBonus, QuantizedHashKey};
//! use ndarray::{ArrayD, IxDyn};
//!
//! let mut bonus = ExplorationBonus::new(1.0, QuantizedHashKey::default()).unwrap();
//! let frame = ArrayD::zeros(IxDyn(&[4, 84, 84]));
//! assert_eq!(bonus.bonus(&frame), 1.0);
//! assert!(bonus.bonus(&frame) < 1.0);
//! ```

mod key;

pub use key::{ObservationKey, QuantizedHashKey};

use std::collections::HashMap;

use crate::error::{CurioError, Result};
use crate::types::Observation;

pub struct ExplorationBonus {
    beta: f32,
    key_fn: Box<dyn ObservationKey + Send>,
    counts: HashMap<u64, u64>,
}

impl ExplorationBonus {
    pub fn new<K>(beta: f32, key_fn: K) -> Result<Self>
    where
        K: ObservationKey + Send + 'static,
    {
        Self::with_boxed_key(beta, Box::new(key_fn))
    }

    pub fn with_boxed_key(beta: f32, key_fn: Box<dyn ObservationKey + Send>) -> Result<Self> {
        if !(beta.is_finite() && beta > 0.0) {
            return Err(CurioError::configuration(
                "count_bonus.beta".to_string(),
                format!("must be positive and finite, got {}", beta),
            ));
        }
        Ok(ExplorationBonus {
            beta,
            key_fn,
            counts: HashMap::new(),
        })
    }

    pub fn beta(&self) -> f32 {
        self.beta
    }

    /// Record a visit to `observation` and return its bonus
    pub fn bonus(&mut self, observation: &Observation) -> f32 {
        let key = self.key_fn.key(observation);
        let count = self.counts.entry(key).or_insert(0);
        *count += 1;
        self.beta / (*count as f32).sqrt()
    }

    /// Visits recorded so far for the key of `observation`
    pub fn count(&self, observation: &Observation) -> u64 {
        let key = self.key_fn.key(observation);
        self.counts.get(&key).copied().unwrap_or(0)
    }

    /// Number of distinct keys seen
    pub fn distinct_keys(&self) -> usize {
        self.counts.len()
    }
}

impl std::fmt::Debug for ExplorationBonus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorationBonus")
            .field("beta", &self.beta)
            .field("distinct_keys", &self.counts.len())
            .finish()
    }
}
