//! One-shot triangular arbitrage scan.
//!
//! Pulls the market list and tickers from a [`MarketDataSource`], builds the
//! cycles, and prices every cycle in both directions. Scheduling repeated
//! scans is left to the caller.

mod config;
mod error;
mod stats;

pub use config::ScannerConfig;
pub use error::ScanError;
pub use stats::Stats;

use std::sync::Arc;
use std::time::Instant;

use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::arbitrage::{ArbitrageError, build_cycles, compute_surface_rates};
use crate::config::Config;
use crate::domain::{Cycle, Opportunity, PriceSnapshot, Ticker};
use crate::exchanges::MarketDataSource;

/// Result of one scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// Name of the exchange that was scanned.
    pub exchange: String,
    /// Number of tradeable markets listed.
    pub markets: usize,
    /// Number of distinct triangular cycles found.
    pub cycles: usize,
    /// Directions above the profit threshold, highest rate first.
    pub opportunities: Vec<Opportunity>,
    /// Highest arbitrage rate seen in any direction.
    pub best_rate: Option<Decimal>,
}

/// Scanner coordinates the market data source and the arbitrage engine.
pub struct Scanner {
    source: Arc<dyn MarketDataSource>,
    cfg: ScannerConfig,
    stats: Mutex<Stats>,
}

impl Scanner {
    /// Creates a new Scanner instance.
    pub fn new(source: Arc<dyn MarketDataSource>, cfg: ScannerConfig) -> Self {
        Self {
            source,
            cfg,
            stats: Mutex::new(Stats::default()),
        }
    }

    /// Creates a Scanner using the arbitrage section of the application config.
    pub fn from_config(config: &Config, source: Arc<dyn MarketDataSource>) -> Result<Self, ScanError> {
        let cfg = ScannerConfig::from_arbitrage_config(&config.arbitrage())
            .map_err(ScanError::Config)?;
        Ok(Self::new(source, cfg))
    }

    /// Returns a copy of the current statistics.
    pub async fn stats(&self) -> Stats {
        self.stats.lock().await.clone()
    }

    /// Runs one scan over a fresh market list and ticker snapshot.
    pub async fn scan(&self) -> Result<ScanReport, ScanError> {
        let started = Instant::now();

        let result = self.run_scan().await;

        let mut stats = self.stats.lock().await;
        stats.scans += 1;
        match &result {
            Ok(report) => {
                stats.cycles_evaluated += report.cycles as u64;
                stats.opportunities_detected += report.opportunities.len() as u64;
                if let Some(rate) = report.best_rate {
                    stats.best_rate = Some(stats.best_rate.map_or(rate, |best| best.max(rate)));
                }
                info!(
                    exchange = %report.exchange,
                    markets = report.markets,
                    cycles = report.cycles,
                    opportunities = report.opportunities.len(),
                    elapsed = ?started.elapsed(),
                    "Scan completed"
                );
            }
            Err(e) => {
                stats.failed_scans += 1;
                warn!(error = %e, "Scan failed");
            }
        }

        result
    }

    async fn run_scan(&self) -> Result<ScanReport, ScanError> {
        let timeout = self.cfg.detection_timeout;
        let (markets, tickers) = tokio::time::timeout(timeout, async {
            tokio::try_join!(self.source.markets(), self.source.tickers())
        })
        .await
        .map_err(|_| ScanError::Timeout(timeout))??;

        let symbols: Vec<&str> = markets.iter().map(|m| m.market.as_str()).collect();
        let cycles = build_cycles(&symbols)?;

        info!(
            markets = markets.len(),
            cycles = cycles.len(),
            "Built triangular cycles"
        );

        let (opportunities, best_rate) = self.evaluate(&cycles, &tickers)?;

        Ok(ScanReport {
            exchange: self.source.name().to_string(),
            markets: markets.len(),
            cycles: cycles.len(),
            opportunities,
            best_rate,
        })
    }

    /// Prices every cycle against the tickers and keeps directions above the
    /// profit threshold, highest rate first. Also returns the best rate seen.
    pub fn evaluate(
        &self,
        cycles: &[Cycle],
        tickers: &[Ticker],
    ) -> Result<(Vec<Opportunity>, Option<Decimal>), ArbitrageError> {
        let fee_rate = self.source.taker_fee();
        let mut opportunities = Vec::new();
        let mut best_rate: Option<Decimal> = None;

        for cycle in cycles {
            let snapshot = PriceSnapshot::from_tickers(cycle, tickers);
            let rates = compute_surface_rates(cycle, &snapshot, fee_rate)?;

            let best = rates.best();
            debug!(
                cycle = %cycle,
                forward = %rates.forward.arbitrage_rate,
                reverse = %rates.reverse.arbitrage_rate,
                best = %best.direction,
                "Evaluated cycle"
            );
            best_rate = Some(best_rate.map_or(best.arbitrage_rate, |b| b.max(best.arbitrage_rate)));

            for result in rates.iter() {
                if !result.is_chained() {
                    warn!(
                        cycle = %cycle,
                        direction = %result.direction,
                        "Swaps do not chain back to the entry currency, skipping"
                    );
                    continue;
                }

                if result.arbitrage_rate > self.cfg.min_profit_threshold {
                    let opportunity = Opportunity::from_surface(cycle, result);
                    info!(
                        cycle = %opportunity.cycle,
                        direction = %opportunity.direction,
                        route = %opportunity.route(),
                        profit_percent = %opportunity.profit_percent().round_dp(4),
                        "Arbitrage opportunity found"
                    );
                    opportunities.push(opportunity);
                }
            }
        }

        opportunities.sort_by(|a, b| b.arbitrage_rate.cmp(&a.arbitrage_rate));

        Ok((opportunities, best_rate))
    }

    /// Logs available balances when the source has credentials. Failures are
    /// logged and otherwise ignored.
    pub async fn log_balances(&self) {
        if !self.source.has_credentials() {
            debug!(exchange = %self.source.name(), "No credentials, skipping balances");
            return;
        }

        match self.source.balances().await {
            Ok(balances) => {
                info!(currencies = balances.len(), "Balances received");
                for (currency, amount) in &balances {
                    debug!(currency = %currency, amount = %amount, "balance");
                }
            }
            Err(e) => warn!(error = %e, "Failed to get balances"),
        }
    }
}

#[cfg(test)]
mod tests;
