//! Server configuration loaded from TOML.
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 3000
//!
//! [ai]
//! search_depth = 6
//! time_budget_ms = 1500
//! blunder_rate = 0.3
//! think_delay_ms = 1500
//! ```
//!
//! Every key is optional.

use crate::error::ConfigError;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use supertac_ai::{SearchConfig, DEFAULT_BLUNDER_RATE, DEFAULT_DEPTH, DEFAULT_TIME_BUDGET};
use tracing::{debug, info, instrument};

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Listening address.
    #[serde(default)]
    server: ListenConfig,
    /// Computer opponent tuning.
    #[serde(default)]
    ai: AiConfig,
}

/// Listening address.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ListenConfig {
    /// Host or IP to bind.
    #[serde(default = "default_host")]
    host: String,
    /// TCP port.
    #[serde(default = "default_port")]
    port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Computer opponent tuning.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct AiConfig {
    /// Hard-tier search depth in plies.
    #[serde(default = "default_search_depth")]
    search_depth: u8,
    /// Hard-tier wall-clock budget; 0 disables the cutoff.
    #[serde(default = "default_time_budget_ms")]
    time_budget_ms: u64,
    /// Medium-tier blunder probability.
    #[serde(default = "default_blunder_rate")]
    blunder_rate: f64,
    /// Pause before the bot starts thinking.
    #[serde(default = "default_think_delay_ms")]
    think_delay_ms: u64,
}

fn default_search_depth() -> u8 {
    DEFAULT_DEPTH
}

fn default_time_budget_ms() -> u64 {
    DEFAULT_TIME_BUDGET.as_millis() as u64
}

fn default_blunder_rate() -> f64 {
    DEFAULT_BLUNDER_RATE
}

fn default_think_delay_ms() -> u64 {
    1500
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            search_depth: default_search_depth(),
            time_budget_ms: default_time_budget_ms(),
            blunder_rate: default_blunder_rate(),
            think_delay_ms: default_think_delay_ms(),
        }
    }
}

impl AiConfig {
    /// Search settings for the bot.
    pub fn search_config(&self) -> SearchConfig {
        let budget = (self.time_budget_ms > 0).then(|| Duration::from_millis(self.time_budget_ms));
        SearchConfig::new(self.search_depth, budget, self.blunder_rate)
    }

    /// Pause before the bot starts thinking.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self =
            toml::from_str(&content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(host = %config.server.host, port = config.server.port, "Config loaded successfully");
        Ok(config)
    }

    /// Applies command-line overrides of the listening address.
    pub fn with_listen_overrides(mut self, host: Option<String>, port: Option<u16>) -> Self {
        if let Some(host) = host {
            self.server.host = host;
        }
        if let Some(port) = port {
            self.server.port = port;
        }
        self
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: ServerConfig = toml::from_str("").expect("empty is valid");
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(*config.ai().search_config().depth(), DEFAULT_DEPTH);
    }

    #[test]
    fn test_zero_budget_means_unbounded() {
        let ai = AiConfig::default().with_time_budget_ms(0);
        assert_eq!(*ai.search_config().time_budget(), None);
    }

    #[test]
    fn test_overrides_replace_listen_address() {
        let config = ServerConfig::default().with_listen_overrides(Some("0.0.0.0".to_string()), Some(8080));
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
        let config = config.with_listen_overrides(None, None);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }
}
