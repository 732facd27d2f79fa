//! HTTP client for currencylayer-style quote endpoints.

use async_trait::async_trait;
use exchange_common::{ExchangeError, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::provider::{QuoteProvider, RawQuotes};

/// Connection settings for the upstream endpoint.
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// Endpoint returning the live quote table.
    pub api_url: String,
    /// Access key appended as `access_key`.
    pub api_key: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for HttpProviderConfig {
    fn default() -> Self {
        Self {
            api_url: "http://api.currencylayer.com/live".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LiveResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    quotes: Option<HashMap<String, serde_json::Number>>,
    #[serde(default)]
    error: Option<LiveError>,
}

#[derive(Debug, Deserialize)]
struct LiveError {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    info: Option<String>,
}

/// Fetches the live quote table over HTTP.
pub struct HttpQuoteProvider {
    client: reqwest::Client,
    config: HttpProviderConfig,
}

impl HttpQuoteProvider {
    /// Create a provider with its own HTTP client.
    pub fn new(config: HttpProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ExchangeError::ConfigurationError(format!("HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    fn into_raw(body: LiveResponse) -> Result<RawQuotes> {
        if let Some(err) = body.error {
            return Err(ExchangeError::ProviderUnavailable(format!(
                "provider error {}: {}",
                err.code.unwrap_or_default(),
                err.info.unwrap_or_else(|| "no details".to_string())
            )));
        }

        let source = body.source.ok_or_else(|| {
            ExchangeError::ProviderUnavailable("response has no source currency".to_string())
        })?;

        let quotes = body
            .quotes
            .map(|quotes| {
                quotes
                    .into_iter()
                    .map(|(key, number)| parse_number(&number).map(|rate| (key, rate)))
                    .collect::<Result<HashMap<_, _>>>()
            })
            .transpose()?;

        Ok(RawQuotes {
            success: body.success,
            source,
            timestamp: body.timestamp,
            quotes,
        })
    }
}

/// Quotes arrive as `f64`; their shortest textual form is parsed so that
/// `1.569095` becomes the decimal `1.569095` rather than its binary expansion.
/// Precision beyond about 15 significant digits is already lost upstream.
fn parse_number(number: &serde_json::Number) -> Result<Decimal> {
    let text = number.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|e| ExchangeError::ProviderUnavailable(format!("bad quote {text}: {e}")))
}

#[async_trait]
impl QuoteProvider for HttpQuoteProvider {
    fn name(&self) -> &str {
        "CURRENCYLAYER"
    }

    #[instrument(skip(self), fields(url = %self.config.api_url))]
    async fn fetch_quotes(&self) -> Result<RawQuotes> {
        let response = self
            .client
            .get(&self.config.api_url)
            .query(&[("access_key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                // Without the URL: it carries the access key.
                let e = e.without_url();
                error!(error = %e, "Quote request failed");
                ExchangeError::ProviderUnavailable(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Quote endpoint returned an error status");
            return Err(ExchangeError::ProviderUnavailable(format!(
                "upstream returned {status}"
            )));
        }

        let body: LiveResponse = response.json().await.map_err(|e| {
            let e = e.without_url();
            error!(error = %e, "Failed to decode quote response");
            ExchangeError::ProviderUnavailable(format!("undecodable response: {e}"))
        })?;

        debug!(
            success = body.success,
            quotes = body.quotes.as_ref().map(|q| q.len()).unwrap_or(0),
            "Quote response received"
        );
        Self::into_raw(body)
    }
}
