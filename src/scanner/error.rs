//! Scanner error types.

use std::time::Duration;

use crate::arbitrage::ArbitrageError;
use crate::exchanges::ExchangeError;

/// Scanner error type.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("config error: {0}")]
    Config(String),
    #[error("exchange error: {0}")]
    Exchange(#[from] ExchangeError),
    #[error("arbitrage error: {0}")]
    Arbitrage(#[from] ArbitrageError),
    #[error("market data not received within {0:?}")]
    Timeout(Duration),
}
