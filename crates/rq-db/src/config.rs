//! Configuration types and parsing for rq.yml

use crate::error::{DbError, DbResult};
use crate::retry::{FixedDelay, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Executor configuration from rq.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutorConfig {
    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Retry policy applied when a call enables retry
    #[serde(default)]
    pub retry: RetryConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Database path (DuckDB file or :memory:)
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> String {
    ":memory:".to_string()
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts when retry is enabled, first attempt included
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_delay_ms() -> u64 {
    DEFAULT_RETRY_DELAY.as_millis() as u64
}

impl RetryConfig {
    /// Fixed-delay policy described by this section
    pub fn policy(&self) -> FixedDelay {
        FixedDelay::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }
}

impl ExecutorConfig {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> DbResult<Self> {
        if !path.exists() {
            return Err(DbError::ConfigError(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DbError::ConfigError(format!("{}: {e}", path.display())))?;
        let config: ExecutorConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a directory
    /// Looks for rq.yml or rq.yaml
    pub fn load_from_dir(dir: &Path) -> DbResult<Self> {
        let yml_path = dir.join("rq.yml");
        let yaml_path = dir.join("rq.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            Err(DbError::ConfigError(format!(
                "config file not found: {}",
                yml_path.display()
            )))
        }
    }

    /// Validate the configuration
    fn validate(&self) -> DbResult<()> {
        if self.retry.max_attempts == 0 {
            return Err(DbError::ConfigError(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.database.path.trim().is_empty() {
            return Err(DbError::ConfigError(
                "database.path cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
