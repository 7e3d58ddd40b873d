//! Triangular cycle model.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use super::Market;
use crate::arbitrage::ArbitrageError;

/// Cycle is three markets whose currencies close a loop across exactly
/// three distinct currencies, each shared by exactly two of the markets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cycle {
    pub pair_a: Market,
    pub pair_b: Market,
    pub pair_c: Market,
    /// Sorted, concatenated market symbols. Equal for every permutation of
    /// the same three markets.
    dedup_key: String,
}

impl Cycle {
    /// Creates a cycle without checking the closure invariant.
    pub fn new(pair_a: Market, pair_b: Market, pair_c: Market) -> Self {
        let dedup_key = Self::key_for(&pair_a, &pair_b, &pair_c);
        Self {
            pair_a,
            pair_b,
            pair_c,
            dedup_key,
        }
    }

    /// Creates a cycle and checks the closure invariant.
    #[cfg(test)]
    pub fn try_new(pair_a: Market, pair_b: Market, pair_c: Market) -> Result<Self, ArbitrageError> {
        let cycle = Self::new(pair_a, pair_b, pair_c);
        cycle.validate()?;
        Ok(cycle)
    }

    /// Builds the deduplication key for a triple of markets.
    fn key_for(pair_a: &Market, pair_b: &Market, pair_c: &Market) -> String {
        let mut symbols = [pair_a.symbol(), pair_b.symbol(), pair_c.symbol()];
        symbols.sort();
        symbols.concat()
    }

    pub fn dedup_key(&self) -> &str {
        &self.dedup_key
    }

    /// Returns the markets as "a,b,c" in traversal order.
    pub fn combined(&self) -> String {
        format!("{},{},{}", self.pair_a, self.pair_b, self.pair_c)
    }

    pub fn markets(&self) -> [&Market; 3] {
        [&self.pair_a, &self.pair_b, &self.pair_c]
    }

    /// Returns a_base, a_quote, b_base, b_quote, c_base, c_quote.
    pub fn symbols(&self) -> [&str; 6] {
        [
            &self.pair_a.base,
            &self.pair_a.quote,
            &self.pair_b.base,
            &self.pair_b.quote,
            &self.pair_c.base,
            &self.pair_c.quote,
        ]
    }

    /// Checks the closure invariant: three distinct markets, no market
    /// trading a currency against itself, and exactly three currencies each
    /// appearing twice across the six symbols.
    pub fn validate(&self) -> Result<(), ArbitrageError> {
        let violation = |reason: &str| ArbitrageError::InvalidCycleInvariant {
            cycle: self.combined(),
            reason: reason.to_string(),
        };

        if self.markets().iter().any(|m| m.base == m.quote) {
            return Err(violation("market trades a currency against itself"));
        }

        if self.pair_a == self.pair_b || self.pair_a == self.pair_c || self.pair_b == self.pair_c {
            return Err(violation("markets are not distinct"));
        }

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for symbol in self.symbols() {
            *counts.entry(symbol).or_default() += 1;
        }

        if counts.len() != 3 || counts.values().any(|&n| n != 2) {
            return Err(violation("expected three currencies appearing twice each"));
        }

        Ok(())
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.combined())
    }
}
