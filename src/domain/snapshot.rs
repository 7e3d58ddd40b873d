//! Price snapshot scoped to the three markets of one cycle.

use rust_decimal::Decimal;
use std::collections::HashMap;

use super::{Cycle, Market, Ticker};

const ASK_SUFFIX: &str = "_ask";
const BID_SUFFIX: &str = "_bid";

/// PriceSnapshot maps "<market>_ask" / "<market>_bid" to the quoted price.
///
/// Built once per evaluation and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSnapshot {
    prices: HashMap<String, Decimal>,
}

impl PriceSnapshot {
    /// Filters a price feed down to the markets of the cycle.
    ///
    /// Sides missing from the feed stay absent from the snapshot.
    pub fn from_tickers(cycle: &Cycle, tickers: &[Ticker]) -> Self {
        let wanted: Vec<String> = cycle.markets().iter().map(|m| m.symbol()).collect();

        let mut prices = HashMap::with_capacity(6);
        for ticker in tickers.iter().filter(|t| wanted.contains(&t.market)) {
            if let Some(ask) = ticker.ask {
                prices.insert(ask_key(&ticker.market), ask);
            }
            if let Some(bid) = ticker.bid {
                prices.insert(bid_key(&ticker.market), bid);
            }
        }

        Self { prices }
    }

    /// Best ask for the market, if quoted.
    pub fn ask(&self, market: &Market) -> Option<Decimal> {
        self.prices.get(&ask_key(&market.symbol())).copied()
    }

    /// Best bid for the market, if quoted.
    pub fn bid(&self, market: &Market) -> Option<Decimal> {
        self.prices.get(&bid_key(&market.symbol())).copied()
    }
}

#[cfg(test)]
impl PriceSnapshot {
    /// Builds a snapshot from explicit key/price entries.
    pub fn from_entries<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Decimal)>,
        K: Into<String>,
    {
        Self {
            prices: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.prices.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }
}

pub fn ask_key(market: &str) -> String {
    format!("{}{}", market, ASK_SUFFIX)
}

pub fn bid_key(market: &str) -> String {
    format!("{}{}", market, BID_SUFFIX)
}
