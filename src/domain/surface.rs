//! Surface rate results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Traversal direction around a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Enters pair_a on its base currency.
    Forward,
    /// Enters pair_a on its quote currency.
    Reverse,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Forward, Direction::Reverse];
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Reverse => write!(f, "reverse"),
        }
    }
}

/// SwapDirection tags which side of a market a swap enters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// Gives the market's base, receives its quote, at rate `1 / ask`.
    BaseToQuote,
    /// Gives the market's quote, receives its base, at rate `bid`.
    QuoteToBase,
}

impl std::fmt::Display for SwapDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SwapDirection::BaseToQuote => write!(f, "base_to_quote"),
            SwapDirection::QuoteToBase => write!(f, "quote_to_base"),
        }
    }
}

/// SwapStep is one leg of a triangular trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapStep {
    /// Market symbol the swap trades on.
    pub market: String,
    /// Currency given up.
    pub from: String,
    /// Currency received.
    pub to: String,
    /// Exchange rate applied before fees.
    pub rate: Decimal,
    pub direction: SwapDirection,
}

/// SurfaceResult is the outcome of one traversal direction around a cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceResult {
    pub direction: Direction,
    pub swaps: [SwapStep; 3],
    /// Final amount after three fee-adjusted swaps from one unit, minus one.
    pub arbitrage_rate: Decimal,
}

impl SurfaceResult {
    /// Currency the traversal starts (and should end) in.
    pub fn entry_currency(&self) -> &str {
        &self.swaps[0].from
    }

    /// Returns true if every swap consumes the previous swap's output and
    /// the last swap returns to the entry currency.
    pub fn is_chained(&self) -> bool {
        self.swaps.windows(2).all(|w| w[0].to == w[1].from)
            && self.swaps[2].to == self.swaps[0].from
    }
}

/// SurfaceRates holds both directions for one cycle and snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRates {
    pub forward: SurfaceResult,
    pub reverse: SurfaceResult,
}

impl SurfaceRates {
    /// Returns the direction with the higher arbitrage rate (forward on ties).
    pub fn best(&self) -> &SurfaceResult {
        if self.reverse.arbitrage_rate > self.forward.arbitrage_rate {
            &self.reverse
        } else {
            &self.forward
        }
    }

    pub fn get(&self, direction: Direction) -> &SurfaceResult {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Reverse => &self.reverse,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &SurfaceResult> {
        Direction::ALL.into_iter().map(|direction| self.get(direction))
    }
}
