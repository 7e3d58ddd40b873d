//! Configuration loading and validation for the scanner.
//!
//! Uses serde_yaml to load YAML configuration files, with API credentials
//! taken from environment variables (optionally via a `.env` file).

mod app;
mod arbitrage;
mod duration;
mod error;
mod exchange;

pub use app::AppConfig;
pub use arbitrage::ArbitrageConfig;
pub use error::ConfigError;
pub use exchange::ExchangeConfig;
pub use arbitrage::{DEFAULT_DETECTION_TIMEOUT, DEFAULT_MIN_PROFIT_THRESHOLD};
#[cfg(test)]
pub use exchange::DEFAULT_TAKER_FEE;

use serde::Deserialize;
use std::{collections::BTreeMap, env, fs};

/// Root configuration structure for the scanner.
///
/// Required sections: app, exchanges.
/// Optional sections: arbitrage.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Application-level settings like name and environment.
    pub app: AppConfig,
    /// Maps exchange names to their configurations.
    pub exchanges: BTreeMap<String, ExchangeConfig>,
    /// Detection thresholds and timeouts (optional).
    pub arbitrage: Option<ArbitrageConfig>,
}

impl Config {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Loads `.env` first (if present), then the YAML file, then credentials
    /// from `{EXCHANGE}_API_KEY` and `{EXCHANGE}_API_SECRET`.
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses, loads credentials, and validates a YAML document.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = serde_yaml::from_str(content)?;

        config.load_credentials_from_env();
        config.validate()?;

        Ok(config)
    }

    /// Load credentials from environment variables.
    fn load_credentials_from_env(&mut self) {
        for (name, exchange) in self.exchanges.iter_mut() {
            if !exchange.enabled {
                continue;
            }

            let env_prefix = name.to_uppercase();
            exchange.api_key = env::var(format!("{}_API_KEY", env_prefix)).unwrap_or_default();
            exchange.api_secret =
                env::var(format!("{}_API_SECRET", env_prefix)).unwrap_or_default();
        }
    }

    /// Returns the arbitrage section, or defaults when it is absent.
    pub fn arbitrage(&self) -> ArbitrageConfig {
        self.arbitrage.clone().unwrap_or_default()
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.is_empty() {
            return Err(ConfigError::Validation("app.name is required".into()));
        }

        let mut enabled_exchanges = 0;
        for (name, exchange) in &self.exchanges {
            if !exchange.enabled {
                continue;
            }
            enabled_exchanges += 1;

            exchange
                .taker_fee()
                .map_err(|e| ConfigError::Validation(format!("exchange {}: {}", name, e)))?;

            // Only require credentials outside development
            if !self.app.is_development() && !exchange.has_credentials() {
                return Err(ConfigError::Validation(format!(
                    "exchange {}: API credentials not found (set {}_API_KEY and {}_API_SECRET env vars)",
                    name,
                    name.to_uppercase(),
                    name.to_uppercase()
                )));
            }
        }

        if enabled_exchanges == 0 {
            return Err(ConfigError::Validation(
                "at least one exchange must be enabled".into(),
            ));
        }

        if let Some(ref arbitrage) = self.arbitrage {
            arbitrage.threshold().map_err(ConfigError::Validation)?;
        }

        Ok(())
    }
}
