use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::types::Observation;

/// Maps an observation to the key its visitation count is stored under.
///
/// Any `Fn(&Observation) -> u64` closure is a key function.
pub trait ObservationKey {
    fn key(&self, observation: &Observation) -> u64;
}

impl<F> ObservationKey for F
where
    F: Fn(&Observation) -> u64,
{
    fn key(&self, observation: &Observation) -> u64 {
        self(observation)
    }
}

/// Quantise every element into `levels` buckets over `[low, high]`, then hash
/// the shape and the bucket indices.
///
/// Frames that differ only by noise smaller than one bucket share a key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuantizedHashKey {
    pub levels: u32,
    pub low: f32,
    pub high: f32,
}

impl QuantizedHashKey {
    pub fn new(levels: u32, low: f32, high: f32) -> Self {
        QuantizedHashKey { levels: levels.max(1), low, high }
    }

    fn bucket(&self, value: f32) -> u32 {
        let span = self.high - self.low;
        if !value.is_finite() || span <= 0.0 {
            return 0;
        }
        let scaled = ((value - self.low) / span * self.levels as f32).floor();
        scaled.clamp(0.0, (self.levels - 1) as f32) as u32
    }
}

impl Default for QuantizedHashKey {
    /// Eight grey levels over normalised pixel intensities
    fn default() -> Self {
        QuantizedHashKey::new(8, 0.0, 1.0)
    }
}

impl ObservationKey for QuantizedHashKey {
    fn key(&self, observation: &Observation) -> u64 {
        let mut hasher = DefaultHasher::new();
        observation.shape().hash(&mut hasher);
        for &value in observation.iter() {
            self.bucket(value).hash(&mut hasher);
        }
        hasher.finish()
    }
}
