//! Tradeable market (currency pair) model.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::arbitrage::ArbitrageError;

/// Separator between base and quote in a market symbol ("BTC-EUR").
pub const SYMBOL_SEPARATOR: char = '-';

/// Market is a traded pair identified by an ordered (base, quote) currency pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Market {
    /// Currency being bought or sold (e.g., "BTC" in "BTC-EUR").
    pub base: String,
    /// Currency the base is priced in (e.g., "EUR" in "BTC-EUR").
    pub quote: String,
}

impl Market {
    /// Parses a "BASE-QUOTE" symbol.
    ///
    /// Fails with `MalformedMarketSymbol` unless the symbol has exactly one
    /// separator with non-empty parts on both sides.
    pub fn parse(symbol: &str) -> Result<Self, ArbitrageError> {
        let malformed = || ArbitrageError::MalformedMarketSymbol {
            symbol: symbol.to_string(),
        };

        let (base, quote) = symbol.split_once(SYMBOL_SEPARATOR).ok_or_else(malformed)?;
        if base.is_empty() || quote.is_empty() || quote.contains(SYMBOL_SEPARATOR) {
            return Err(malformed());
        }

        Ok(Self {
            base: base.to_string(),
            quote: quote.to_string(),
        })
    }

    /// Returns the "BASE-QUOTE" symbol.
    pub fn symbol(&self) -> String {
        self.to_string()
    }

    /// Returns true if the currency is either side of this market.
    pub fn contains(&self, currency: &str) -> bool {
        self.base == currency || self.quote == currency
    }

    /// Returns true if both markets name at least one common currency.
    pub fn shares_currency_with(&self, other: &Market) -> bool {
        self.contains(&other.base) || self.contains(&other.quote)
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.base, SYMBOL_SEPARATOR, self.quote)
    }
}

impl FromStr for Market {
    type Err = ArbitrageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Market::parse(s)
    }
}
