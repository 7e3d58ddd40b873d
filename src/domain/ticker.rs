//! Market data delivered by the exchange collaborator.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// MarketInfo is one entry of the venue's market list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketInfo {
    /// Market symbol in "BASE-QUOTE" format (e.g., "BTC-EUR").
    pub market: String,
    /// Smallest base amount step, if the venue reports one.
    pub base_increment: Option<Decimal>,
    /// Smallest quote amount step, if the venue reports one.
    pub quote_increment: Option<Decimal>,
}

/// Ticker is the best bid/ask for one market.
///
/// Either side may be absent when the book is empty on that side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub market: String,
    pub ask: Option<Decimal>,
    pub bid: Option<Decimal>,
}

impl Ticker {
    pub fn new(market: impl Into<String>, ask: Option<Decimal>, bid: Option<Decimal>) -> Self {
        Self {
            market: market.into(),
            ask,
            bid,
        }
    }
}
