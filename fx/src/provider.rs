//! Upstream quote provider abstraction.

use async_trait::async_trait;
use exchange_common::Result;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Quote payload as delivered by a provider, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuotes {
    /// Whether the provider reported success.
    pub success: bool,
    /// Code of the currency every quote is expressed against.
    pub source: String,
    /// Provider-side quote time, unix seconds.
    pub timestamp: Option<i64>,
    /// Quotes keyed either `<source><CODE>` or plain `<CODE>`.
    pub quotes: Option<HashMap<String, Decimal>>,
}

impl RawQuotes {
    /// Build a successful payload from `(key, rate)` pairs.
    pub fn new<K: Into<String>>(
        source: impl Into<String>,
        quotes: impl IntoIterator<Item = (K, Decimal)>,
    ) -> Self {
        Self {
            success: true,
            source: source.into(),
            timestamp: None,
            quotes: Some(quotes.into_iter().map(|(k, v)| (k.into(), v)).collect()),
        }
    }
}

/// Trait for upstream quote providers.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Get the provider name.
    fn name(&self) -> &str;

    /// Fetch the full quote table.
    async fn fetch_quotes(&self) -> Result<RawQuotes>;
}

/// Scripted provider for tests.
#[cfg(any(test, feature = "test-utils"))]
pub struct MockQuoteProvider {
    response: parking_lot::Mutex<Result<RawQuotes>>,
    delay: parking_lot::Mutex<Option<std::time::Duration>>,
    fetches: std::sync::atomic::AtomicUsize,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockQuoteProvider {
    /// Create a provider that always answers with `quotes`.
    pub fn new(quotes: RawQuotes) -> Self {
        Self::with_response(Ok(quotes))
    }

    /// Create a provider that answers with an arbitrary result.
    pub fn with_response(response: Result<RawQuotes>) -> Self {
        Self {
            response: parking_lot::Mutex::new(response),
            delay: parking_lot::Mutex::new(None),
            fetches: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Replace the scripted response.
    pub fn set_response(&self, response: Result<RawQuotes>) {
        *self.response.lock() = response;
    }

    /// Sleep this long before answering.
    pub fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.lock() = Some(delay);
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl QuoteProvider for MockQuoteProvider {
    fn name(&self) -> &str {
        "MOCK"
    }

    async fn fetch_quotes(&self) -> Result<RawQuotes> {
        self.fetches
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.response.lock().clone()
    }
}

/// Provider payload used across the crate's tests.
#[cfg(test)]
pub(crate) fn sample_quotes() -> RawQuotes {
    use rust_decimal_macros::dec;

    RawQuotes::new(
        "USD",
        [
            ("USDAUD", dec!(1.569095)),
            ("USDINR", dec!(83.979299)),
            ("USDBMD", dec!(1)),
            ("USDAZN", dec!(1.702996)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use exchange_common::ExchangeError;

    #[tokio::test]
    async fn test_mock_provider_counts_fetches() {
        let provider = MockQuoteProvider::new(sample_quotes());

        let quotes = provider.fetch_quotes().await.unwrap();
        assert_eq!(quotes.source, "USD");
        assert_eq!(quotes.quotes.as_ref().map(|q| q.len()), Some(4));

        provider.fetch_quotes().await.unwrap();
        assert_eq!(provider.fetch_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_provider_scripted_failure() {
        let provider = MockQuoteProvider::new(sample_quotes());
        provider.set_response(Err(ExchangeError::ProviderUnavailable("down".to_string())));

        let result = provider.fetch_quotes().await;

        assert!(matches!(result, Err(ExchangeError::ProviderUnavailable(_))));
    }
}
