//! Configuration types for swarmlet

use serde::{Deserialize, Serialize};

use crate::labels::LabelConventions;

/// Strategy used when none is configured
pub const DEFAULT_STRATEGY: &str = "spread";

/// Main scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Name of the placement strategy
    pub strategy: String,
    /// Label conventions
    pub labels: LabelConventions,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            strategy: DEFAULT_STRATEGY.to_string(),
            labels: LabelConventions::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl SchedulerConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::SwarmletError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::SwarmletError::Config(format!("Failed to read config file: {}", e))
        })?;
        toml::from_str(&content)
            .map_err(|e| crate::SwarmletError::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or text)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
