//! Error types for the route optimization engine.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// A configuration parameter is out of range. Raised before any search work.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A stop carries unusable data (non-finite coordinates, inverted time window).
    #[error("invalid stop '{id}': {reason}")]
    InvalidStop { id: String, reason: String },
    #[error("unknown algorithm '{0}'")]
    UnknownAlgorithm(String),
    /// An optimizer produced something other than a permutation of its input.
    #[error("invalid route: {0}")]
    InvalidRoute(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    pub fn invalid_stop(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidStop {
            id: id.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_route(message: impl Into<String>) -> Self {
        Self::InvalidRoute(message.into())
    }
}
