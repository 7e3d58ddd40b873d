//! Exchange configuration.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;

use super::duration;

/// Taker fee applied when an exchange sets no `fee_taker` (0.2%).
pub const DEFAULT_TAKER_FEE: Decimal = Decimal::from_parts(2, 0, 0, false, 3);

/// Settings for a single exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeConfig {
    /// Whether this exchange should be scanned.
    #[serde(default)]
    pub enabled: bool,
    /// API key (loaded from environment variable).
    #[serde(skip)]
    pub api_key: String,
    /// API secret (loaded from environment variable).
    #[serde(skip)]
    pub api_secret: String,
    /// Taker fee as a decimal string (e.g., "0.002" for 0.2%). Defaults to
    /// [`DEFAULT_TAKER_FEE`].
    pub fee_taker: Option<String>,
    /// Maximum API requests per minute.
    pub rate_limit: Option<i32>,
    /// How long a signed request stays valid on the exchange side.
    #[serde(default, with = "duration")]
    pub access_window: Duration,
}

impl ExchangeConfig {
    /// Parses `fee_taker`, which must lie in [0, 1), falling back to the
    /// default when unset.
    pub fn taker_fee(&self) -> Result<Decimal, String> {
        let Some(raw) = self.fee_taker.as_deref() else {
            return Ok(DEFAULT_TAKER_FEE);
        };

        let fee = Decimal::from_str(raw.trim())
            .map_err(|e| format!("fee_taker {:?} is not a decimal: {}", raw, e))?;
        if fee < Decimal::ZERO || fee >= Decimal::ONE {
            return Err(format!("fee_taker {} must be in [0, 1)", fee));
        }

        Ok(fee)
    }

    /// Returns true if both API key and secret are present.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}
