//! Error types for swarmlet

use thiserror::Error;

/// Main error type for swarmlet
#[derive(Error, Debug)]
pub enum SwarmletError {
    /// No node survived filtering and scoring
    #[error("no resources available to schedule container")]
    NoFeasibleNode,

    /// Strategy name not known to the registry
    #[error("Unknown placement strategy: {0}")]
    UnknownStrategy(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for swarmlet operations
pub type SwarmletResult<T> = Result<T, SwarmletError>;

impl From<serde_json::Error> for SwarmletError {
    fn from(err: serde_json::Error) -> Self {
        SwarmletError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for SwarmletError {
    fn from(err: toml::de::Error) -> Self {
        SwarmletError::Config(err.to_string())
    }
}
