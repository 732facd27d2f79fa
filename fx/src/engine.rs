//! Main exchange engine implementation.

use std::sync::Arc;

use exchange_common::{list_all, Currency, CurrencyInfo, ExchangeError, Result};
use tracing::{debug, info, instrument};

use crate::cache::{CacheStats, QuoteCache, QuoteCacheConfig};
use crate::conversion::{self, ConversionRequest, ConversionResult};
use crate::provider::QuoteProvider;

/// Configuration for the exchange engine.
#[derive(Debug, Clone, Default)]
pub struct ExchangeEngineConfig {
    /// Cache configuration.
    pub cache: QuoteCacheConfig,
}

/// The main exchange engine.
///
/// Codes are validated against the registry before any quotes are fetched, so
/// a request with an unsupported base never reaches the provider.
#[derive(Clone)]
pub struct ExchangeEngine {
    cache: QuoteCache,
}

impl ExchangeEngine {
    /// Create a new engine backed by `provider`.
    pub fn new(provider: Arc<dyn QuoteProvider>, config: ExchangeEngineConfig) -> Self {
        Self {
            cache: QuoteCache::with_config(provider, config.cache),
        }
    }

    /// Rate of `target`, or of every other quoted currency, per one `base`.
    #[instrument(skip(self))]
    pub async fn rate_lookup(&self, base: &str, target: Option<&str>) -> Result<ConversionResult> {
        let base: Currency = base.parse()?;
        let target = target.map(|code| code.parse::<Currency>()).transpose()?;

        let quotes = self.cache.get_quotes().await?;
        let result = conversion::lookup(&quotes, base, target)?;

        debug!(lines = result.lines.len(), "Rate lookup completed");
        Ok(result)
    }

    /// Convert an amount into every requested target.
    #[instrument(skip(self, request), fields(
        base = %request.base,
        amount = %request.amount,
        targets = request.targets.len()
    ))]
    pub async fn convert(&self, request: &ConversionRequest) -> Result<ConversionResult> {
        let base: Currency = request.base.parse()?;
        if !request.targets.iter().any(|code| code.parse::<Currency>().is_ok()) {
            return Err(ExchangeError::NoValidTarget(request.targets.clone()));
        }

        let quotes = self.cache.get_quotes().await?;
        let result = conversion::convert(&quotes, base, request.amount, &request.targets)?;

        info!(
            valid = result.lines.iter().filter(|l| l.is_valid()).count(),
            invalid = result.lines.iter().filter(|l| !l.is_valid()).count(),
            "Conversion completed"
        );
        Ok(result)
    }

    /// Every supported currency.
    pub fn currencies(&self) -> Vec<CurrencyInfo> {
        list_all()
    }

    /// The underlying quote cache.
    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
