//! Exchange integration abstractions and implementations.
//!
//! The arbitrage engine never talks to an exchange itself; the scanner pulls
//! market lists and tickers through [`MarketDataSource`].

pub mod bitvavo;
mod utils;

use crate::domain::{MarketInfo, Ticker};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use thiserror::Error;

pub use utils::{is_tradeable_status, parse_optional_decimal};

/// Exchange errors.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// Transport failure or the exchange could not be reached.
    #[error("connection error: {0}")]
    Connection(String),

    /// API error returned by the exchange.
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not match the expected shape.
    #[error("parse error: {0}")]
    Parse(String),

    /// Local request budget exhausted.
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    /// Misconfiguration or other internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;

/// MarketDataSource supplies the snapshot data one scan needs.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Name returns the unique identifier of this exchange (e.g., "bitvavo").
    fn name(&self) -> &str;

    /// Taker fee applied at every swap, as a decimal (0.002 for 0.2%).
    fn taker_fee(&self) -> Decimal;

    /// Returns true if signed endpoints can be called.
    fn has_credentials(&self) -> bool;

    /// Markets lists every tradeable market in "BASE-QUOTE" format.
    async fn markets(&self) -> Result<Vec<MarketInfo>>;

    /// Tickers returns the best bid/ask for every market the venue quotes.
    async fn tickers(&self) -> Result<Vec<Ticker>>;

    /// Balances returns available balances keyed by currency symbol.
    /// Only positive balances are included.
    async fn balances(&self) -> Result<HashMap<String, Decimal>>;
}
