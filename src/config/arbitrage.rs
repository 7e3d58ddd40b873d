//! Arbitrage detection configuration.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use super::duration;

/// Minimum net rate reported as an opportunity when none is configured (1%).
pub const DEFAULT_MIN_PROFIT_THRESHOLD: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Default bound on fetching market data for one scan.
pub const DEFAULT_DETECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Triangular arbitrage detection settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArbitrageConfig {
    /// Minimum net arbitrage rate to report (e.g., "0.01" for 1%).
    pub min_profit_threshold: Option<String>,
    /// Timeout for fetching market data during one scan (default: 10s).
    #[serde(default, with = "duration")]
    pub detection_timeout: Duration,
}

impl ArbitrageConfig {
    /// Parsed threshold, falling back to the default.
    pub fn threshold(&self) -> Result<Decimal, String> {
        match self.min_profit_threshold.as_deref() {
            Some(raw) => Decimal::from_str(raw.trim())
                .map_err(|e| format!("min_profit_threshold {:?} is not a decimal: {}", raw, e)),
            None => Ok(DEFAULT_MIN_PROFIT_THRESHOLD),
        }
    }

    /// Configured timeout, or the default when unset.
    pub fn timeout(&self) -> Duration {
        if self.detection_timeout.is_zero() {
            DEFAULT_DETECTION_TIMEOUT
        } else {
            self.detection_timeout
        }
    }
}
