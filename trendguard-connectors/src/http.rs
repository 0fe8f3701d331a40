//! HTTP Rate Calibration Source
//!
//! ## Overview
//!
//! Fetches the interaction-rate calibration for one channel from a REST
//! key-value store:
//!
//! ```text
//! GET <base_url>/<path>?source=<channel>
//!
//! 200 OK
//! { "timestamps": [1700000000000, 1700000060000, ...],
//!   "rates":      [20150.0,       19980.5,       ...] }
//! ```
//!
//! Timestamps are milliseconds since the Unix epoch, rates are in Hz. The
//! two arrays must have the same length. Samples do not need to be sorted.
//!
//! ## Retry Policy
//!
//! - Transport errors, 5xx and 429 are retried up to `max_retries` times
//! - Delay doubles from `retry_backoff` on each attempt
//! - Other status codes fail immediately
//!
//! The request is blocking. [`CachedConditionProvider`] calls `fetch` at most
//! once per refresh interval, so one slow request costs at most one cycle.
//!
//! [`CachedConditionProvider`]: trendguard_core::CachedConditionProvider

use crate::{ConnectionStats, ConnectorError};
use base64::Engine as _;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use trendguard_core::{traits::ConditionSource, ConditionError, RateCalibration};

/// HTTP-specific errors
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or request error
    #[error("Request failed: {0}")]
    Request(String),

    /// Server returned error status
    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    /// Response body is not a calibration
    #[error(transparent)]
    Connector(#[from] ConnectorError),
}

impl From<&HttpError> for ConditionError {
    fn from(err: &HttpError) -> Self {
        match err {
            HttpError::Connector(inner) => inner.into(),
            _ => ConditionError::Unavailable,
        }
    }
}

/// Authentication methods
#[derive(Clone)]
pub enum AuthMethod {
    /// No authentication
    None,
    /// Bearer token
    Bearer(String),
    /// Basic authentication
    Basic { username: String, password: String },
}

/// HTTP configuration
#[derive(Clone)]
pub struct HttpConfig {
    /// Base URL of the store
    pub base_url: String,
    /// Path of the calibration object below the base URL
    pub path: String,
    /// Rate channel, sent as the `source` query parameter
    pub channel: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Authentication method
    pub auth: AuthMethod,
    /// Custom headers
    pub headers: BTreeMap<String, String>,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub retry_backoff: Duration,
    /// User agent string
    pub user_agent: String,
}

impl HttpConfig {
    /// Create new configuration for the object at `path`
    pub fn new(base_url: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            path: path.into(),
            channel: None,
            timeout: Duration::from_secs(10),
            auth: AuthMethod::None,
            headers: BTreeMap::new(),
            max_retries: 2,
            retry_backoff: Duration::from_millis(100),
            user_agent: format!("TrendGuard/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Select the rate channel
    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Set bearer token authentication
    pub fn bearer_token(mut self, token: impl Into<String>) -> Self {
        self.auth = AuthMethod::Bearer(token.into());
        self
    }

    /// Set basic authentication
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = AuthMethod::Basic {
            username: username.into(),
            password: password.into(),
        };
        self
    }

    /// Set request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Set the number of retries after the first attempt
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Set the delay before the first retry
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Object URL without the query string
    pub fn object_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    fn validate(&self) -> Result<(), ConnectorError> {
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ConnectorError::ConfigError(
                "Base URL must start with http:// or https://".into(),
            ));
        }
        if self.path.trim_matches('/').is_empty() {
            return Err(ConnectorError::ConfigError("Object path is empty".into()));
        }
        Ok(())
    }
}

/// Wire format of a calibration object
#[derive(Debug, Deserialize)]
struct CalibrationPayload {
    timestamps: Vec<u64>,
    rates: Vec<f64>,
}

/// Decode a calibration object body
pub fn parse_calibration(body: &str) -> Result<RateCalibration, ConnectorError> {
    let payload: CalibrationPayload =
        serde_json::from_str(body).map_err(|e| ConnectorError::InvalidPayload(e.to_string()))?;

    if payload.timestamps.len() != payload.rates.len() {
        return Err(ConnectorError::InvalidPayload(format!(
            "{} timestamps but {} rates",
            payload.timestamps.len(),
            payload.rates.len()
        )));
    }

    let samples = payload.timestamps.into_iter().zip(payload.rates).collect();
    RateCalibration::from_samples(samples)
        .map_err(|e| ConnectorError::InvalidPayload(e.to_string()))
}

/// True for status codes worth retrying
fn is_retryable(status: u16) -> bool {
    status >= 500 || status == 429
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`, saturating
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt.saturating_sub(1)))
}

/// Rate calibration source over HTTP, using the lightweight ureq client
pub struct HttpConditionSource {
    config: HttpConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl HttpConditionSource {
    /// Create new source, validating the configuration
    pub fn new(config: HttpConfig) -> Result<Self, HttpError> {
        config.validate()?;

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    /// Configuration in use
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Request statistics since creation
    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    /// Fetch and decode the calibration, with retries
    pub fn fetch_calibration(&mut self) -> Result<RateCalibration, HttpError> {
        let result = self.get_with_retry().and_then(|body| {
            self.stats.bytes_received += body.len() as u64;
            parse_calibration(&body).map_err(HttpError::from)
        });

        match &result {
            Ok(calibration) => {
                self.stats.fetches_ok += 1;
                log::debug!(
                    "Fetched rate calibration from {} ({} samples)",
                    self.config.object_url(),
                    calibration.samples().len()
                );
            }
            Err(err) => {
                self.stats.fetches_failed += 1;
                self.stats.last_error = Some(err.to_string());
                log::warn!(
                    "Could not fetch rate calibration from {}: {}",
                    self.config.object_url(),
                    err
                );
            }
        }
        result
    }

    fn build_request(&self) -> ureq::Request {
        let mut request = self.agent.get(&self.config.object_url());
        if let Some(channel) = &self.config.channel {
            request = request.query("source", channel);
        }

        match &self.config.auth {
            AuthMethod::None => {}
            AuthMethod::Bearer(token) => {
                request = request.set("Authorization", &format!("Bearer {}", token));
            }
            AuthMethod::Basic { username, password } => {
                let credentials = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                request = request.set("Authorization", &format!("Basic {}", credentials));
            }
        }

        for (name, value) in &self.config.headers {
            request = request.set(name, value);
        }

        request.set("Accept", "application/json")
    }

    fn get_with_retry(&mut self) -> Result<String, HttpError> {
        let request = self.build_request();
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                self.stats.retries += 1;
                std::thread::sleep(backoff_delay(self.config.retry_backoff, attempt));
            }

            match request.clone().call() {
                Ok(response) => {
                    return response
                        .into_string()
                        .map_err(|e| HttpError::Request(e.to_string()));
                }
                Err(ureq::Error::Status(status, response)) => {
                    let error = HttpError::ServerError {
                        status,
                        message: response.into_string().unwrap_or_default(),
                    };
                    if !is_retryable(status) {
                        return Err(error);
                    }
                    last_error = Some(error);
                }
                Err(ureq::Error::Transport(e)) => {
                    last_error = Some(HttpError::Request(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ConnectorError::Timeout.into()))
    }
}

impl ConditionSource for HttpConditionSource {
    fn fetch(&mut self) -> Result<RateCalibration, ConditionError> {
        self.fetch_calibration().map_err(|err| ConditionError::from(&err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpConfig::new("https://calib.example.org/", "/ctp/rates")
            .channel("T0VTX")
            .bearer_token("test-token")
            .timeout_secs(3)
            .max_retries(4)
            .header("X-Custom", "value");

        assert_eq!(config.object_url(), "https://calib.example.org/ctp/rates");
        assert_eq!(config.channel.as_deref(), Some("T0VTX"));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.max_retries, 4);
        assert!(config.headers.contains_key("X-Custom"));

        match config.auth {
            AuthMethod::Bearer(token) => assert_eq!(token, "test-token"),
            _ => panic!("Wrong auth method"),
        }
    }

    #[test]
    fn test_url_validation() {
        assert!(HttpConditionSource::new(HttpConfig::new("not-a-url", "rates")).is_err());
        assert!(HttpConditionSource::new(HttpConfig::new("https://valid.url", "/")).is_err());
        assert!(HttpConditionSource::new(HttpConfig::new("https://valid.url", "rates")).is_ok());
    }

    #[test]
    fn test_parse_calibration() {
        let body = r#"{"timestamps": [2000, 1000], "rates": [20000.0, 10000.0]}"#;
        let calibration = parse_calibration(body).unwrap();

        assert_eq!(calibration.samples(), &[(1000, 10_000.0), (2000, 20_000.0)]);
        assert_eq!(calibration.rate_at(1500), 15_000.0);
    }

    #[test]
    fn test_parse_rejects_bad_payloads() {
        for body in [
            "not json",
            r#"{"timestamps": [1000]}"#,
            r#"{"timestamps": [1000, 2000], "rates": [1.0]}"#,
            r#"{"timestamps": [], "rates": []}"#,
        ] {
            let err = parse_calibration(body).unwrap_err();
            assert!(matches!(err, ConnectorError::InvalidPayload(_)), "{}", body);
            assert_eq!(ConditionError::from(&err), ConditionError::InvalidCalibration);
        }
    }

    #[test]
    fn test_retryable_status() {
        assert!(is_retryable(503));
        assert!(is_retryable(429));
        assert!(!is_retryable(404));
        assert!(!is_retryable(401));
    }

    #[test]
    fn test_backoff_doubles_and_saturates() {
        let base = Duration::from_millis(100);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(400));
        assert_eq!(backoff_delay(base, 40), base.saturating_mul(u32::MAX));
        assert_eq!(backoff_delay(Duration::MAX, 2), Duration::MAX);
    }

    #[test]
    fn test_unreachable_host_is_unavailable() {
        // Port 9 on localhost: connection refused, no retries
        let config = HttpConfig::new("http://127.0.0.1:9", "rates").max_retries(0);
        let mut source = HttpConditionSource::new(config).unwrap();

        assert_eq!(source.fetch(), Err(ConditionError::Unavailable));
        assert_eq!(source.stats().fetches_failed, 1);
        assert!(source.stats().last_error.is_some());
    }
}
