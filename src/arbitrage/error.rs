//! Arbitrage engine error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Precondition failures of the cycle builder and surface rate calculator.
///
/// Missing prices are not errors; the calculator absorbs them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArbitrageError {
    #[error("malformed market symbol {symbol:?}: expected BASE-QUOTE")]
    MalformedMarketSymbol { symbol: String },
    #[error("invalid cycle {cycle}: {reason}")]
    InvalidCycleInvariant { cycle: String, reason: String },
    #[error("fee rate {0} is outside [0, 1)")]
    InvalidFeeRate(Decimal),
}
