//! Triangular cycle discovery.

use std::collections::HashSet;

use tracing::debug;

use super::ArbitrageError;
use crate::domain::{Cycle, Market};

/// Builds every distinct triangular cycle from a list of market symbols.
///
/// Symbols must be "BASE-QUOTE"; the first malformed one aborts the build.
/// Cycles are returned in first-discovered order and each unordered triple
/// of markets appears at most once.
pub fn build_cycles<S: AsRef<str>>(symbols: &[S]) -> Result<Vec<Cycle>, ArbitrageError> {
    let markets = symbols
        .iter()
        .map(|s| Market::parse(s.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(build_cycles_from_markets(&markets))
}

/// Builds every distinct triangular cycle from parsed markets.
fn build_cycles_from_markets(markets: &[Market]) -> Vec<Cycle> {
    let mut cycles = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for pair_a in markets {
        for pair_b in markets {
            if pair_b == pair_a || !pair_b.shares_currency_with(pair_a) {
                continue;
            }

            for pair_c in markets {
                if pair_c == pair_a || pair_c == pair_b {
                    continue;
                }
                if !closes_triangle(pair_a, pair_b, pair_c) {
                    continue;
                }

                let cycle = Cycle::new(pair_a.clone(), pair_b.clone(), pair_c.clone());
                if !seen.insert(cycle.dedup_key().to_string()) {
                    continue;
                }

                cycles.push(cycle);
            }
        }
    }

    debug!(markets = markets.len(), cycles = cycles.len(), "built triangular cycles");

    cycles
}

/// Closure check on pair_c: both of its currencies must appear exactly twice
/// across the six symbols, and it must not trade a currency against itself.
fn closes_triangle(pair_a: &Market, pair_b: &Market, pair_c: &Market) -> bool {
    if pair_c.base == pair_c.quote {
        return false;
    }

    let symbols = [
        &pair_a.base,
        &pair_a.quote,
        &pair_b.base,
        &pair_b.quote,
        &pair_c.base,
        &pair_c.quote,
    ];
    let count = |currency: &String| symbols.iter().filter(|&&s| s == currency).count();

    count(&pair_c.base) == 2 && count(&pair_c.quote) == 2
}
