//! Triangular arbitrage opportunity domain model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Cycle, Direction, SurfaceResult, SwapStep};

/// Opportunity represents a cycle direction whose surface rate cleared the
/// configured profit threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    /// Cycle markets in traversal order ("BTC-EUR,ETH-EUR,ETH-BTC").
    pub cycle: String,
    /// Traversal direction that produced the rate.
    pub direction: Direction,
    /// Currency the trade starts and ends in.
    pub entry_currency: String,
    /// The three swaps in execution order.
    pub swaps: Vec<SwapStep>,
    /// Net rate of return after fees (0.01 = 1%).
    pub arbitrage_rate: Decimal,
    /// When this opportunity was detected.
    pub detected_at: DateTime<Utc>,
}

impl Opportunity {
    /// Creates an opportunity from a surface result on the given cycle.
    pub fn from_surface(cycle: &Cycle, result: &SurfaceResult) -> Self {
        Self {
            cycle: cycle.combined(),
            direction: result.direction,
            entry_currency: result.entry_currency().to_string(),
            swaps: result.swaps.to_vec(),
            arbitrage_rate: result.arbitrage_rate,
            detected_at: Utc::now(),
        }
    }

    /// Returns the net rate as a percentage, saturating for rates built on
    /// near-zero quotes.
    pub fn profit_percent(&self) -> Decimal {
        self.arbitrage_rate
            .checked_mul(Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::MAX)
    }

    /// Human-readable route, e.g. "BTC -> EUR -> ETH -> BTC".
    pub fn route(&self) -> String {
        let mut route = self.entry_currency.clone();
        for swap in &self.swaps {
            route.push_str(" -> ");
            route.push_str(&swap.to);
        }
        route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SwapDirection;
    use std::str::FromStr;

    fn opportunity(rate: Decimal) -> Opportunity {
        let step = |market: &str, from: &str, to: &str| SwapStep {
            market: market.to_string(),
            from: from.to_string(),
            to: to.to_string(),
            rate: Decimal::ONE,
            direction: SwapDirection::QuoteToBase,
        };
        Opportunity {
            cycle: "BTC-EUR,ETH-BTC,ETH-EUR".to_string(),
            direction: Direction::Reverse,
            entry_currency: "EUR".to_string(),
            swaps: vec![
                step("BTC-EUR", "EUR", "BTC"),
                step("ETH-BTC", "BTC", "ETH"),
                step("ETH-EUR", "ETH", "EUR"),
            ],
            arbitrage_rate: rate,
            detected_at: Utc::now(),
        }
    }

    #[test]
    fn test_profit_percent() {
        let opp = opportunity(Decimal::from_str("0.0125").unwrap());
        assert_eq!(opp.profit_percent(), Decimal::from_str("1.25").unwrap());
    }

    #[test]
    fn test_profit_percent_saturates_on_huge_rate() {
        let opp = opportunity(Decimal::MAX - Decimal::ONE);
        assert_eq!(opp.profit_percent(), Decimal::MAX);
    }

    #[test]
    fn test_route() {
        assert_eq!(opportunity(Decimal::ZERO).route(), "EUR -> BTC -> ETH -> EUR");
    }
}
