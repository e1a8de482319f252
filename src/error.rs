use thiserror::Error;

/// Result type for curio operations
pub type Result<T> = std::result::Result<T, CurioError>;

/// Main error type for the agent core
#[derive(Debug, Error)]
pub enum CurioError {
    /// Invalid configuration value, raised at construction
    #[error("Invalid configuration '{name}': {reason}")]
    Configuration {
        name: String,
        reason: String,
    },

    /// A numeric quantity fell outside the domain where it is defined
    #[error("Numeric domain error: {quantity} = {value}")]
    NumericDomain {
        quantity: String,
        value: f32,
    },

    /// Malformed collaborator response
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    Shape {
        expected: String,
        actual: String,
    },

    /// Error raised by the environment, oracle, store or metrics sink
    #[error("{collaborator} failed: {message}")]
    Collaborator {
        collaborator: String,
        message: String,
    },

    /// Operation not allowed in the current episode state
    #[error("Episode state error: {0}")]
    EpisodeState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failure while stepping the environment
    #[error("Step failed (episode {episode}, frame {frame}): {source}")]
    Step {
        episode: usize,
        frame: usize,
        #[source]
        source: Box<CurioError>,
    },

    /// Failure while choosing an action
    #[error("Action selection failed at step {step}: {source}")]
    Selection {
        step: usize,
        #[source]
        source: Box<CurioError>,
    },
}

// Helper functions for common error patterns
impl CurioError {
    pub fn configuration<S: Into<String>>(name: S, reason: S) -> Self {
        CurioError::Configuration {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn numeric<S: Into<String>>(quantity: S, value: f32) -> Self {
        CurioError::NumericDomain {
            quantity: quantity.into(),
            value,
        }
    }

    pub fn shape<S: Into<String>>(expected: S, actual: S) -> Self {
        CurioError::Shape {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn collaborator<S: Into<String>>(collaborator: S, message: S) -> Self {
        CurioError::Collaborator {
            collaborator: collaborator.into(),
            message: message.into(),
        }
    }

    /// Wrap an error raised while stepping the environment
    pub fn at_frame(self, episode: usize, frame: usize) -> Self {
        CurioError::Step {
            episode,
            frame,
            source: Box::new(self),
        }
    }

    /// Wrap an error raised while selecting an action
    pub fn at_step(self, step: usize) -> Self {
        CurioError::Selection {
            step,
            source: Box::new(self),
        }
    }

    /// The innermost error, with any step context removed
    pub fn root(&self) -> &CurioError {
        match self {
            CurioError::Step { source, .. } | CurioError::Selection { source, .. } => source.root(),
            other => other,
        }
    }
}
