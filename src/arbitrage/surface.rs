//! Surface rate calculation over top-of-book quotes.
//!
//! Each swap is chosen by which side of the next market holds the running
//! currency: holding the base sells it at `1 / ask`, holding the quote sells
//! it at `bid`. The only other decision is which market comes second, kept
//! in [`Topology`].

use rust_decimal::Decimal;

use super::ArbitrageError;
use crate::domain::{
    Cycle, Direction, Market, PriceSnapshot, SurfaceRates, SurfaceResult, SwapDirection, SwapStep,
};

/// Sentinel for an infinite price or rate.
///
/// A missing ask is priced at `INFINITE`, so buying through it acquires
/// nothing. A rate equal to `INFINITE` (zero ask) collapses the path to zero
/// instead of being multiplied through.
pub const INFINITE: Decimal = Decimal::MAX;

const STARTING_AMOUNT: Decimal = Decimal::ONE;

/// Divides without faulting: a zero denominator yields [`INFINITE`] and an
/// [`INFINITE`] denominator yields zero.
pub fn safe_divide(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return INFINITE;
    }
    if denominator == INFINITE {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(INFINITE)
}

/// Side of a market the running currency sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Base,
    Quote,
}

impl Side {
    /// Locates a currency in a market.
    pub fn of(currency: &str, market: &Market) -> Option<Side> {
        if market.base == currency {
            Some(Side::Base)
        } else if market.quote == currency {
            Some(Side::Quote)
        } else {
            None
        }
    }

    pub const fn swap_direction(self) -> SwapDirection {
        match self {
            Side::Base => SwapDirection::BaseToQuote,
            Side::Quote => SwapDirection::QuoteToBase,
        }
    }

    /// Side of pair_a a traversal enters on.
    pub const fn entry(direction: Direction) -> Side {
        match direction {
            Direction::Forward => Side::Base,
            Direction::Reverse => Side::Quote,
        }
    }
}

/// How the currency produced by the first swap meets pair_b.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// pair_b holds the running currency on the given side; legs go b then c.
    Linked(Side),
    /// pair_b only shares the entry currency; legs go c then b.
    ///
    /// The running currency after the first swap is not on pair_b, so
    /// pair_c must trade second for every swap to consume the previous
    /// swap's output.
    Crossed,
}

impl Topology {
    pub fn classify(running: &str, pair_b: &Market) -> Topology {
        match Side::of(running, pair_b) {
            Some(side) => Topology::Linked(side),
            None => Topology::Crossed,
        }
    }

    /// Markets for the second and third swaps.
    pub fn legs(self, cycle: &Cycle) -> [&Market; 2] {
        match self {
            Topology::Linked(_) => [&cycle.pair_b, &cycle.pair_c],
            Topology::Crossed => [&cycle.pair_c, &cycle.pair_b],
        }
    }
}

/// Computes the fee-adjusted surface rate for both directions of a cycle.
///
/// `fee_rate` is deducted multiplicatively at every swap and must lie in
/// `[0, 1)`. Absent quotes never fail: a missing ask acquires nothing and a
/// missing bid is zero.
pub fn compute_surface_rates(
    cycle: &Cycle,
    snapshot: &PriceSnapshot,
    fee_rate: Decimal,
) -> Result<SurfaceRates, ArbitrageError> {
    if fee_rate < Decimal::ZERO || fee_rate >= Decimal::ONE {
        return Err(ArbitrageError::InvalidFeeRate(fee_rate));
    }
    cycle.validate()?;

    Ok(SurfaceRates {
        forward: compute_direction(cycle, snapshot, fee_rate, Direction::Forward)?,
        reverse: compute_direction(cycle, snapshot, fee_rate, Direction::Reverse)?,
    })
}

fn compute_direction(
    cycle: &Cycle,
    snapshot: &PriceSnapshot,
    fee_rate: Decimal,
    direction: Direction,
) -> Result<SurfaceResult, ArbitrageError> {
    let first = swap(&cycle.pair_a, Side::entry(direction), snapshot);

    let [second_market, third_market] = Topology::classify(&first.to, &cycle.pair_b).legs(cycle);
    let second = next_swap(cycle, second_market, &first.to, snapshot)?;
    let third = next_swap(cycle, third_market, &second.to, snapshot)?;

    let swaps = [first, second, third];
    let arbitrage_rate = net_rate(&swaps, fee_rate);

    Ok(SurfaceResult {
        direction,
        swaps,
        arbitrage_rate,
    })
}

fn next_swap(
    cycle: &Cycle,
    market: &Market,
    running: &str,
    snapshot: &PriceSnapshot,
) -> Result<SwapStep, ArbitrageError> {
    let side = Side::of(running, market).ok_or_else(|| ArbitrageError::InvalidCycleInvariant {
        cycle: cycle.combined(),
        reason: format!("{} is not traded on {}", running, market),
    })?;
    Ok(swap(market, side, snapshot))
}

/// Swaps the currency on `side` of the market for the other one.
fn swap(market: &Market, side: Side, snapshot: &PriceSnapshot) -> SwapStep {
    let (from, to, rate) = match side {
        Side::Base => (
            &market.base,
            &market.quote,
            safe_divide(Decimal::ONE, snapshot.ask(market).unwrap_or(INFINITE)),
        ),
        Side::Quote => (
            &market.quote,
            &market.base,
            snapshot.bid(market).unwrap_or(Decimal::ZERO),
        ),
    };

    SwapStep {
        market: market.symbol(),
        from: from.clone(),
        to: to.clone(),
        rate,
        direction: side.swap_direction(),
    }
}

/// Multiplies one unit through every swap, deducting the fee each time.
fn net_rate(swaps: &[SwapStep], fee_rate: Decimal) -> Decimal {
    let retained = Decimal::ONE - fee_rate;
    let mut amount = STARTING_AMOUNT;

    for swap in swaps {
        if swap.rate == INFINITE {
            amount = Decimal::ZERO;
            break;
        }
        amount = swap
            .rate
            .checked_mul(retained)
            .and_then(|r| amount.checked_mul(r))
            .unwrap_or(Decimal::ZERO);
    }

    amount / STARTING_AMOUNT - Decimal::ONE
}
