//! Tests for the scanner against an in-memory market data source.

use super::*;
use crate::domain::{Direction, MarketInfo};
use crate::exchanges::{ExchangeError, Result as ExchangeResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

struct StaticSource {
    markets: Vec<&'static str>,
    tickers: Vec<Ticker>,
    fee: Decimal,
    delay: Duration,
    fail_tickers: bool,
}

impl StaticSource {
    fn example() -> Self {
        Self {
            markets: vec!["BTC-EUR", "ETH-EUR", "ETH-BTC", "XRP-USDT"],
            tickers: vec![
                Ticker::new("BTC-EUR", Some(dec("50000")), Some(dec("49990"))),
                Ticker::new("ETH-EUR", Some(dec("3000")), Some(dec("2995"))),
                Ticker::new("ETH-BTC", Some(dec("0.0650")), Some(dec("0.0640"))),
                Ticker::new("XRP-USDT", Some(dec("0.5")), Some(dec("0.49"))),
            ],
            fee: dec("0.002"),
            delay: Duration::ZERO,
            fail_tickers: false,
        }
    }
}

#[async_trait]
impl MarketDataSource for StaticSource {
    fn name(&self) -> &str {
        "static"
    }

    fn taker_fee(&self) -> Decimal {
        self.fee
    }

    fn has_credentials(&self) -> bool {
        false
    }

    async fn markets(&self) -> ExchangeResult<Vec<MarketInfo>> {
        Ok(self
            .markets
            .iter()
            .map(|m| MarketInfo {
                market: m.to_string(),
                base_increment: None,
                quote_increment: None,
            })
            .collect())
    }

    async fn tickers(&self) -> ExchangeResult<Vec<Ticker>> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fail_tickers {
            return Err(ExchangeError::Connection("feed down".to_string()));
        }
        Ok(self.tickers.clone())
    }

    async fn balances(&self) -> ExchangeResult<HashMap<String, Decimal>> {
        Ok(HashMap::new())
    }
}

fn scanner(source: StaticSource, threshold: &str) -> Scanner {
    Scanner::new(
        Arc::new(source),
        ScannerConfig {
            min_profit_threshold: dec(threshold),
            detection_timeout: Duration::from_millis(200),
        },
    )
}

#[tokio::test]
async fn test_scan_reports_profitable_direction() {
    let scanner = scanner(StaticSource::example(), "0.01");
    let report = scanner.scan().await.unwrap();

    assert_eq!(report.exchange, "static");
    assert_eq!(report.markets, 4);
    assert_eq!(report.cycles, 1);
    assert_eq!(report.opportunities.len(), 1);

    let opportunity = &report.opportunities[0];
    assert_eq!(opportunity.cycle, "BTC-EUR,ETH-EUR,ETH-BTC");
    assert_eq!(opportunity.direction, Direction::Reverse);
    assert_eq!(opportunity.route(), "EUR -> BTC -> ETH -> EUR");
    assert!(opportunity.arbitrage_rate > Decimal::ZERO);
    assert_eq!(report.best_rate, Some(opportunity.arbitrage_rate));

    let stats = scanner.stats().await;
    assert_eq!(stats.scans, 1);
    assert_eq!(stats.cycles_evaluated, 1);
    assert_eq!(stats.opportunities_detected, 1);
}

#[tokio::test]
async fn test_scan_threshold_filters_everything() {
    let scanner = scanner(StaticSource::example(), "0.5");
    let report = scanner.scan().await.unwrap();

    assert_eq!(report.cycles, 1);
    assert!(report.opportunities.is_empty());
    assert!(report.best_rate.is_some());
}

#[tokio::test]
async fn test_scan_missing_tickers_never_fault() {
    let mut source = StaticSource::example();
    source.tickers.clear();
    let report = scanner(source, "0.01").scan().await.unwrap();

    assert!(report.opportunities.is_empty());
    assert_eq!(report.best_rate, Some(dec("-1")));
}

#[tokio::test]
async fn test_scan_malformed_market_fails() {
    let mut source = StaticSource::example();
    source.markets.push("BTCEUR");
    let scanner = scanner(source, "0.01");

    let err = scanner.scan().await.unwrap_err();
    assert!(matches!(
        err,
        ScanError::Arbitrage(ArbitrageError::MalformedMarketSymbol { .. })
    ));
    assert_eq!(scanner.stats().await.failed_scans, 1);
}

#[tokio::test]
async fn test_scan_propagates_source_error() {
    let mut source = StaticSource::example();
    source.fail_tickers = true;

    let err = scanner(source, "0.01").scan().await.unwrap_err();
    assert!(matches!(err, ScanError::Exchange(ExchangeError::Connection(_))));
}

#[tokio::test]
async fn test_scan_times_out() {
    let mut source = StaticSource::example();
    source.delay = Duration::from_secs(5);

    let err = scanner(source, "0.01").scan().await.unwrap_err();
    assert!(matches!(err, ScanError::Timeout(d) if d == Duration::from_millis(200)));
}

#[tokio::test]
async fn test_evaluate_sorts_by_rate() {
    let scanner = scanner(StaticSource::example(), "-1");
    let cycles = build_cycles(&["BTC-EUR", "ETH-EUR", "ETH-BTC"]).unwrap();
    let tickers = StaticSource::example().tickers;

    let (opportunities, best) = scanner.evaluate(&cycles, &tickers).unwrap();

    assert_eq!(opportunities.len(), 2);
    assert!(opportunities[0].arbitrage_rate >= opportunities[1].arbitrage_rate);
    assert_eq!(best, Some(opportunities[0].arbitrage_rate));
}

#[tokio::test]
async fn test_log_balances_without_credentials() {
    let scanner = scanner(StaticSource::example(), "0.01");
    scanner.log_balances().await;
    assert_eq!(scanner.stats().await.scans, 0);
}
