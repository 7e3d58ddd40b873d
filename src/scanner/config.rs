//! Scanner configuration.

use rust_decimal::Decimal;
use std::time::Duration;

use crate::config::{ArbitrageConfig, DEFAULT_DETECTION_TIMEOUT, DEFAULT_MIN_PROFIT_THRESHOLD};

/// Scanner configuration options.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Minimum net arbitrage rate reported as an opportunity.
    pub min_profit_threshold: Decimal,
    /// Bound on fetching the market list and tickers.
    pub detection_timeout: Duration,
}

impl ScannerConfig {
    pub fn from_arbitrage_config(config: &ArbitrageConfig) -> Result<Self, String> {
        Ok(Self {
            min_profit_threshold: config.threshold()?,
            detection_timeout: config.timeout(),
        })
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            min_profit_threshold: DEFAULT_MIN_PROFIT_THRESHOLD,
            detection_timeout: DEFAULT_DETECTION_TIMEOUT,
        }
    }
}
