use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{Config, ExchangeConfig};
use crate::domain::{MarketInfo, Ticker};
use crate::exchanges::bitvavo::{Client, ClientError};
use crate::exchanges::{
    ExchangeError, MarketDataSource, Result, is_tradeable_status, parse_optional_decimal,
};

pub(crate) const EXCHANGE_NAME: &str = "bitvavo";

/// Bitvavo market data source.
pub struct BitvavoExchange {
    client: Client,
    taker_fee: Decimal,
    has_credentials: bool,
}

impl BitvavoExchange {
    /// Creates a new BitvavoExchange from the application config.
    ///
    /// Returns an error if Bitvavo is not configured or not enabled.
    pub fn from_config(config: &Config) -> Result<Self> {
        let exchange_config = config.exchanges.get(EXCHANGE_NAME).ok_or_else(|| {
            ExchangeError::Internal(format!("{} not found in config", EXCHANGE_NAME))
        })?;

        if !exchange_config.enabled {
            return Err(ExchangeError::Internal(format!(
                "{} is not enabled",
                EXCHANGE_NAME
            )));
        }

        Self::from_exchange_config(exchange_config)
    }

    pub fn from_exchange_config(exchange_config: &ExchangeConfig) -> Result<Self> {
        let taker_fee = exchange_config
            .taker_fee()
            .map_err(ExchangeError::Internal)?;

        let client = Client::from_config(exchange_config)
            .map_err(|e| ExchangeError::Internal(format!("build http client: {}", e)))?;

        info!(
            exchange = EXCHANGE_NAME,
            taker_fee = %taker_fee,
            rate_limit = client.rate_limit(),
            "created exchange source"
        );

        Ok(Self {
            client,
            taker_fee,
            has_credentials: exchange_config.has_credentials(),
        })
    }
}

#[async_trait]
impl MarketDataSource for BitvavoExchange {
    fn name(&self) -> &str {
        EXCHANGE_NAME
    }

    fn taker_fee(&self) -> Decimal {
        self.taker_fee
    }

    fn has_credentials(&self) -> bool {
        self.has_credentials
    }

    async fn markets(&self) -> Result<Vec<MarketInfo>> {
        let body = self
            .client
            .request(Method::GET, "/markets", None, false)
            .await
            .map_err(|e| map_client_error(e, "get markets"))?;

        let markets = parse_markets(&body)?;
        debug!(markets = markets.len(), "fetched markets");
        Ok(markets)
    }

    async fn tickers(&self) -> Result<Vec<Ticker>> {
        let body = self
            .client
            .request(Method::GET, "/ticker/24h", None, false)
            .await
            .map_err(|e| map_client_error(e, "get tickers"))?;

        let tickers = parse_tickers(&body)?;
        debug!(tickers = tickers.len(), "fetched tickers");
        Ok(tickers)
    }

    async fn balances(&self) -> Result<HashMap<String, Decimal>> {
        if !self.has_credentials {
            return Err(ExchangeError::Internal(
                "balances require API credentials".to_string(),
            ));
        }

        let body = self
            .client
            .request(Method::GET, "/balance", None, true)
            .await
            .map_err(|e| map_client_error(e, "get balances"))?;

        let balances = parse_balances(&body)?;
        debug!(balances = ?balances, "fetched balances");
        Ok(balances)
    }
}

/// Bitvavo market list entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MarketEntry {
    market: String,
    status: Option<String>,
    base_increment: Option<String>,
    quote_increment: Option<String>,
}

/// Bitvavo 24h ticker entry. Bid and ask are null when that side is empty.
#[derive(Debug, Deserialize)]
struct TickerEntry {
    market: String,
    ask: Option<String>,
    bid: Option<String>,
}

/// Bitvavo balance entry.
#[derive(Debug, Deserialize)]
struct BalanceEntry {
    symbol: String,
    available: String,
}

/// Parses `/markets`, keeping tradeable markets only.
pub(crate) fn parse_markets(body: &[u8]) -> Result<Vec<MarketInfo>> {
    let entries: Vec<MarketEntry> = serde_json::from_slice(body)
        .map_err(|e| ExchangeError::Parse(format!("parse markets: {}", e)))?;

    Ok(entries
        .into_iter()
        .filter(|m| is_tradeable_status(m.status.as_deref()))
        .map(|m| MarketInfo {
            market: m.market,
            base_increment: parse_optional_decimal(m.base_increment.as_deref()),
            quote_increment: parse_optional_decimal(m.quote_increment.as_deref()),
        })
        .collect())
}

/// Parses `/ticker/24h`. Unparseable prices are dropped, not fatal.
pub(crate) fn parse_tickers(body: &[u8]) -> Result<Vec<Ticker>> {
    let entries: Vec<TickerEntry> = serde_json::from_slice(body)
        .map_err(|e| ExchangeError::Parse(format!("parse tickers: {}", e)))?;

    Ok(entries
        .into_iter()
        .map(|t| {
            let ask = parse_optional_decimal(t.ask.as_deref());
            let bid = parse_optional_decimal(t.bid.as_deref());
            Ticker::new(t.market, ask, bid)
        })
        .collect())
}

/// Parses `/balance`, keeping positive available amounts.
pub(crate) fn parse_balances(body: &[u8]) -> Result<HashMap<String, Decimal>> {
    let entries: Vec<BalanceEntry> = serde_json::from_slice(body)
        .map_err(|e| ExchangeError::Parse(format!("parse balances: {}", e)))?;

    Ok(entries
        .into_iter()
        .filter_map(|b| {
            let available = parse_optional_decimal(Some(&b.available))?;
            (available > Decimal::ZERO).then_some((b.symbol, available))
        })
        .collect())
}

/// Maps Bitvavo client errors to exchange errors.
fn map_client_error(err: ClientError, context: &str) -> ExchangeError {
    match err {
        ClientError::RateLimitExceeded { current, limit } => {
            ExchangeError::RateLimited(format!("{}: {}/{} per minute", context, current, limit))
        }
        ClientError::Request(e) => ExchangeError::Connection(format!("{}: {}", context, e)),
        ClientError::Json(e) => ExchangeError::Parse(format!("{}: {}", context, e)),
        other => ExchangeError::Api(format!("{}: {}", context, other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TAKER_FEE;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_markets_filters_status() {
        let body = br#"[
            {"market":"BTC-EUR","status":"trading","base":"BTC","quote":"EUR","baseIncrement":"0.00000001","quoteIncrement":"0.01"},
            {"market":"ETH-EUR","status":"halted","base":"ETH","quote":"EUR"},
            {"market":"ETH-BTC","status":"trading"}
        ]"#;
        let markets = parse_markets(body).unwrap();

        assert_eq!(markets.len(), 2);
        assert_eq!(markets[0].market, "BTC-EUR");
        assert_eq!(markets[0].base_increment, Some(dec("0.00000001")));
        assert_eq!(markets[0].quote_increment, Some(dec("0.01")));
        assert_eq!(markets[1].market, "ETH-BTC");
        assert_eq!(markets[1].base_increment, None);
    }

    #[test]
    fn test_parse_tickers_with_null_sides() {
        let body = br#"[
            {"market":"BTC-EUR","open":"49000","bid":"49990","ask":"50000","volume":"12.3"},
            {"market":"ETH-BTC","bid":null,"ask":"0.06"},
            {"market":"ADA-EUR"}
        ]"#;
        let tickers = parse_tickers(body).unwrap();

        assert_eq!(tickers.len(), 3);
        assert_eq!(tickers[0], Ticker::new("BTC-EUR", Some(dec("50000")), Some(dec("49990"))));
        assert_eq!(tickers[1], Ticker::new("ETH-BTC", Some(dec("0.06")), None));
        assert_eq!(tickers[2], Ticker::new("ADA-EUR", None, None));
    }

    #[test]
    fn test_parse_tickers_rejects_non_array() {
        let err = parse_tickers(br#"{"errorCode":205}"#).unwrap_err();
        assert!(matches!(err, ExchangeError::Parse(_)));
    }

    #[test]
    fn test_parse_balances_keeps_positive() {
        let body = br#"[
            {"symbol":"EUR","available":"250.50","inOrder":"0"},
            {"symbol":"BTC","available":"0","inOrder":"0.1"},
            {"symbol":"ETH","available":"0.75","inOrder":"0"}
        ]"#;
        let balances = parse_balances(body).unwrap();

        assert_eq!(balances.len(), 2);
        assert_eq!(balances.get("EUR"), Some(&dec("250.50")));
        assert_eq!(balances.get("ETH"), Some(&dec("0.75")));
        assert!(!balances.contains_key("BTC"));
    }

    #[test]
    fn test_map_rate_limit_error() {
        let err = map_client_error(
            ClientError::RateLimitExceeded {
                current: 5,
                limit: 5,
            },
            "get tickers",
        );
        assert!(matches!(err, ExchangeError::RateLimited(ref m) if m.contains("get tickers")));
    }

    #[test]
    fn test_from_exchange_config() {
        let config = ExchangeConfig {
            enabled: true,
            api_key: String::new(),
            api_secret: String::new(),
            fee_taker: Some("0.0025".to_string()),
            rate_limit: Some(500),
            access_window: std::time::Duration::ZERO,
        };
        let exchange = BitvavoExchange::from_exchange_config(&config).unwrap();

        assert_eq!(exchange.name(), "bitvavo");
        assert_eq!(exchange.taker_fee(), dec("0.0025"));
        assert!(!exchange.has_credentials());
    }

    #[test]
    fn test_from_exchange_config_default_fee() {
        let config = ExchangeConfig {
            enabled: true,
            api_key: String::new(),
            api_secret: String::new(),
            fee_taker: None,
            rate_limit: None,
            access_window: std::time::Duration::ZERO,
        };
        let exchange = BitvavoExchange::from_exchange_config(&config).unwrap();

        assert_eq!(exchange.taker_fee(), DEFAULT_TAKER_FEE);
        assert_eq!(exchange.taker_fee(), dec("0.002"));
    }

    #[test]
    fn test_from_exchange_config_rejects_bad_fee() {
        let config = ExchangeConfig {
            enabled: true,
            api_key: String::new(),
            api_secret: String::new(),
            fee_taker: Some("1.5".to_string()),
            rate_limit: None,
            access_window: std::time::Duration::ZERO,
        };
        let err = BitvavoExchange::from_exchange_config(&config).err().unwrap();
        assert!(matches!(err, ExchangeError::Internal(ref m) if m.contains("fee_taker")));
    }

    #[tokio::test]
    async fn test_balances_require_credentials() {
        let config = ExchangeConfig {
            enabled: true,
            api_key: String::new(),
            api_secret: String::new(),
            fee_taker: Some("0.002".to_string()),
            rate_limit: None,
            access_window: std::time::Duration::ZERO,
        };
        let exchange = BitvavoExchange::from_exchange_config(&config).unwrap();

        let err = exchange.balances().await.unwrap_err();
        assert!(matches!(err, ExchangeError::Internal(_)));
    }
}
