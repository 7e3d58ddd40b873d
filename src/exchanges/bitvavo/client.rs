//! HTTP client for the Bitvavo REST API.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};

use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::ExchangeConfig;

/// Production Bitvavo HTTP API endpoint.
const BASE_HTTP_API_URL: &str = "https://api.bitvavo.com";

/// Path prefix included in both the URL and the signed payload.
const API_PREFIX: &str = "/v2";

/// Default request budget (requests per minute).
const DEFAULT_RATE_LIMIT: i64 = 1000;

/// Default validity window for signed requests in milliseconds.
const DEFAULT_ACCESS_WINDOW_MS: u128 = 10_000;

/// HTTP request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(60);

/// Bitvavo API error.
#[derive(Debug, Error)]
#[error("bitvavo api error {code}: {message}")]
pub struct ApiError {
    pub code: i32,
    pub message: String,
}

/// Client errors.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("rate limit exceeded: {current}/{limit} per minute")]
    RateLimitExceeded { current: i64, limit: i64 },

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid request header: {0}")]
    InvalidHeader(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Configuration for creating a new Client.
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub rate_limit: i64,
    pub access_window_ms: u128,
}

impl ClientConfig {
    pub fn new(api_key: String, api_secret: String, rate_limit: i64) -> Self {
        Self {
            base_url: BASE_HTTP_API_URL.to_string(),
            api_key,
            api_secret,
            rate_limit: if rate_limit > 0 {
                rate_limit
            } else {
                DEFAULT_RATE_LIMIT
            },
            access_window_ms: DEFAULT_ACCESS_WINDOW_MS,
        }
    }

    /// Overrides the signed request validity window. Zero keeps the default.
    pub fn with_access_window(mut self, window: Duration) -> Self {
        if !window.is_zero() {
            self.access_window_ms = window.as_millis();
        }
        self
    }
}

struct RateLimitState {
    window_start: Instant,
}

/// HTTP client for the Bitvavo REST API.
/// Handles request signing and a client-side request budget.
pub struct Client {
    config: ClientConfig,
    http_client: HttpClient,
    request_count: AtomicI64,
    rate_limit_state: Mutex<RateLimitState>,
}

impl Client {
    /// Creates a new Bitvavo API client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            config,
            http_client,
            request_count: AtomicI64::new(0),
            rate_limit_state: Mutex::new(RateLimitState {
                window_start: Instant::now(),
            }),
        })
    }

    /// Creates a new Bitvavo API client from exchange config.
    pub fn from_config(exchange_config: &ExchangeConfig) -> Result<Self> {
        let config = ClientConfig::new(
            exchange_config.api_key.clone(),
            exchange_config.api_secret.clone(),
            exchange_config
                .rate_limit
                .map(i64::from)
                .unwrap_or(DEFAULT_RATE_LIMIT),
        )
        .with_access_window(exchange_config.access_window);
        Self::new(config)
    }

    /// Sends an HTTP request to the Bitvavo API and returns the raw body.
    /// If signed is true, the request carries the Bitvavo-Access-* headers.
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        params: Option<BTreeMap<String, String>>,
        signed: bool,
    ) -> Result<Vec<u8>> {
        self.check_rate_limit()?;

        let path = request_path(endpoint, &params.unwrap_or_default());
        let url = format!("{}{}", self.config.base_url, path);

        let mut request = self.http_client.request(method.clone(), &url);

        if signed {
            let timestamp = chrono::Utc::now().timestamp_millis();
            let signature = sign(&self.config.api_secret, timestamp, &method, &path, "");
            request = request.headers(self.auth_headers(timestamp, &signature)?);
        }

        debug!(
            method = %method,
            endpoint = %endpoint,
            signed = signed,
            "sending request"
        );

        let response = request.send().await?;
        self.increment_request_count();
        debug!(
            requests = self.request_count(),
            limit = self.config.rate_limit,
            "request budget"
        );

        let status = response.status();
        let body = response.bytes().await?;

        if status.is_client_error() || status.is_server_error() {
            return Err(parse_error_response(status, &body));
        }

        Ok(body.to_vec())
    }

    fn auth_headers(&self, timestamp: i64, signature: &str) -> Result<HeaderMap> {
        let value = |v: &str| {
            HeaderValue::from_str(v).map_err(|e| ClientError::InvalidHeader(e.to_string()))
        };

        let mut headers = HeaderMap::new();
        headers.insert("Bitvavo-Access-Key", value(&self.config.api_key)?);
        headers.insert("Bitvavo-Access-Signature", value(signature)?);
        headers.insert("Bitvavo-Access-Timestamp", value(&timestamp.to_string())?);
        headers.insert(
            "Bitvavo-Access-Window",
            value(&self.config.access_window_ms.to_string())?,
        );
        Ok(headers)
    }

    /// Verifies we haven't exceeded the request budget.
    fn check_rate_limit(&self) -> Result<()> {
        let mut state = self
            .rate_limit_state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if state.window_start.elapsed() > RATE_LIMIT_WINDOW {
            self.request_count.store(0, Ordering::SeqCst);
            state.window_start = Instant::now();
        }

        let current = self.request_count.load(Ordering::SeqCst);
        if current >= self.config.rate_limit {
            return Err(ClientError::RateLimitExceeded {
                current,
                limit: self.config.rate_limit,
            });
        }

        Ok(())
    }

    fn increment_request_count(&self) {
        self.request_count.fetch_add(1, Ordering::SeqCst);
    }

    /// Returns the current request count in the window.
    pub fn request_count(&self) -> i64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Returns the maximum requests per minute.
    pub fn rate_limit(&self) -> i64 {
        self.config.rate_limit
    }
}

/// Builds "/v2/endpoint?k=v" with parameters in key order.
pub(crate) fn request_path(endpoint: &str, params: &BTreeMap<String, String>) -> String {
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    if query.is_empty() {
        format!("{}{}", API_PREFIX, endpoint)
    } else {
        format!("{}{}?{}", API_PREFIX, endpoint, query)
    }
}

/// Hex HMAC-SHA256 over `timestamp + METHOD + path + body`.
pub(crate) fn sign(secret: &str, timestamp: i64, method: &Method, path: &str, body: &str) -> String {
    let payload = format!("{}{}{}{}", timestamp, method.as_str(), path, body);

    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(payload.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Creates a ClientError from an error response.
pub(crate) fn parse_error_response(status: StatusCode, body: &[u8]) -> ClientError {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ErrorResponse {
        error_code: Option<i32>,
        error: Option<String>,
    }

    let api_err = match serde_json::from_slice::<ErrorResponse>(body) {
        Ok(resp) => ApiError {
            code: resp.error_code.unwrap_or(status.as_u16() as i32),
            message: resp
                .error
                .unwrap_or_else(|| String::from_utf8_lossy(body).to_string()),
        },
        Err(_) => ApiError {
            code: status.as_u16() as i32,
            message: String::from_utf8_lossy(body).to_string(),
        },
    };

    warn!(code = api_err.code, message = %api_err.message, "api error");

    ClientError::Api(api_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_path_without_params() {
        assert_eq!(request_path("/markets", &BTreeMap::new()), "/v2/markets");
    }

    #[test]
    fn test_request_path_sorts_and_encodes_params() {
        let mut params = BTreeMap::new();
        params.insert("market".to_string(), "BTC-EUR".to_string());
        params.insert("depth".to_string(), "1 0".to_string());

        assert_eq!(
            request_path("/ticker/24h", &params),
            "/v2/ticker/24h?depth=1%200&market=BTC-EUR"
        );
    }

    #[test]
    fn test_sign_matches_reference_digest() {
        let signature = sign("secret", 1_700_000_000_000, &Method::GET, "/v2/balance", "");
        assert_eq!(
            signature,
            "ce9a94857d1ec9779477d9159a19670a80ea11393e31f116950910225cfade55"
        );
    }

    #[test]
    fn test_sign_covers_query_string() {
        let signature = sign(
            "secret",
            1_700_000_000_000,
            &Method::GET,
            "/v2/ticker/24h?market=BTC-EUR",
            "",
        );
        assert_eq!(
            signature,
            "274dbaa4a8b822d0b4ec18fa04e86c8414911b1cf1434f742d9633dd6c19ac70"
        );
    }

    #[test]
    fn test_parse_error_response_with_body() {
        let body = br#"{"errorCode":105,"error":"Your account has been temporarily banned."}"#;
        let err = parse_error_response(StatusCode::FORBIDDEN, body);

        match err {
            ClientError::Api(api) => {
                assert_eq!(api.code, 105);
                assert!(api.message.contains("banned"));
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_parse_error_response_plain_text() {
        let err = parse_error_response(StatusCode::BAD_GATEWAY, b"upstream down");

        match err {
            ClientError::Api(api) => {
                assert_eq!(api.code, 502);
                assert_eq!(api.message, "upstream down");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_rate_limit_budget() {
        let client = Client::new(ClientConfig::new(String::new(), String::new(), 2)).unwrap();
        assert_eq!(client.rate_limit(), 2);

        assert!(client.check_rate_limit().is_ok());
        client.increment_request_count();
        client.increment_request_count();

        let err = client.check_rate_limit().unwrap_err();
        assert!(matches!(
            err,
            ClientError::RateLimitExceeded { current: 2, limit: 2 }
        ));
    }

    #[test]
    fn test_client_config_defaults() {
        let config = ClientConfig::new("k".into(), "s".into(), 0)
            .with_access_window(Duration::ZERO);
        assert_eq!(config.rate_limit, DEFAULT_RATE_LIMIT);
        assert_eq!(config.access_window_ms, DEFAULT_ACCESS_WINDOW_MS);

        let config = config.with_access_window(Duration::from_secs(5));
        assert_eq!(config.access_window_ms, 5000);
    }
}
