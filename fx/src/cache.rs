//! Quote caching with single-flight refresh.

use chrono::{DateTime, Utc};
use exchange_common::Result;
use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::provider::QuoteProvider;
use crate::quote::QuoteSet;

/// Configuration for the quote cache.
#[derive(Debug, Clone, Default)]
pub struct QuoteCacheConfig {
    /// Refresh entries older than this. `None` keeps the first successful
    /// fetch for the life of the process.
    pub ttl: Option<Duration>,
}

impl QuoteCacheConfig {
    /// Build from a TTL in seconds, where zero disables expiry.
    pub fn from_ttl_secs(secs: u64) -> Self {
        Self {
            ttl: (secs > 0).then(|| Duration::from_secs(secs)),
        }
    }
}

type SharedFetch = Shared<BoxFuture<'static, Result<Arc<QuoteSet>>>>;

#[derive(Default)]
struct CacheState {
    entry: Option<Arc<QuoteSet>>,
    in_flight: Option<SharedFetch>,
}

struct Inner {
    provider: Arc<dyn QuoteProvider>,
    config: QuoteCacheConfig,
    state: Mutex<CacheState>,
    hits: AtomicU64,
    fetches: AtomicU64,
    failures: AtomicU64,
}

impl Inner {
    fn is_fresh(&self, quotes: &QuoteSet) -> bool {
        let Some(ttl) = self.config.ttl else {
            return true;
        };

        match Utc::now().signed_duration_since(quotes.fetched_at).to_std() {
            Ok(age) => age < ttl,
            // Fetched "in the future" after a clock step back.
            Err(_) => true,
        }
    }

    async fn refresh(self: Arc<Self>) -> Result<Arc<QuoteSet>> {
        self.fetches.fetch_add(1, Ordering::Relaxed);
        debug!(provider = self.provider.name(), "Fetching quotes");

        let result = self
            .provider
            .fetch_quotes()
            .await
            .and_then(QuoteSet::from_raw)
            .map(Arc::new);

        let mut state = self.state.lock();
        state.in_flight = None;
        match &result {
            Ok(quotes) => {
                info!(
                    provider = self.provider.name(),
                    base = %quotes.base,
                    currencies = quotes.len(),
                    "Quote cache refreshed"
                );
                state.entry = Some(quotes.clone());
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                warn!(
                    provider = self.provider.name(),
                    error = %e,
                    kept_previous = state.entry.is_some(),
                    "Quote refresh failed"
                );
            }
        }

        result
    }
}

/// Holds the latest quote set and refreshes it on demand.
///
/// Concurrent callers that miss share one upstream fetch and all observe its
/// outcome. A failed refresh never touches the cached entry.
#[derive(Clone)]
pub struct QuoteCache {
    inner: Arc<Inner>,
}

impl QuoteCache {
    /// Create a cache that never expires.
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self::with_config(provider, QuoteCacheConfig::default())
    }

    /// Create a cache with custom configuration.
    pub fn with_config(provider: Arc<dyn QuoteProvider>, config: QuoteCacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                provider,
                config,
                state: Mutex::new(CacheState::default()),
                hits: AtomicU64::new(0),
                fetches: AtomicU64::new(0),
                failures: AtomicU64::new(0),
            }),
        }
    }

    /// Get the current quote set, refreshing it if missing or stale.
    pub async fn get_quotes(&self) -> Result<Arc<QuoteSet>> {
        let fetch = {
            let mut state = self.inner.state.lock();

            if let Some(entry) = state.entry.as_ref().filter(|e| self.inner.is_fresh(e)) {
                self.inner.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit");
                return Ok(entry.clone());
            }

            if let Some(fetch) = state.in_flight.clone() {
                debug!("Joining in-flight fetch");
                fetch
            } else {
                debug!("Cache miss");
                let fetch = self.inner.clone().refresh().boxed().shared();
                state.in_flight = Some(fetch.clone());
                fetch
            }
        };

        fetch.await
    }

    /// Get the cached quote set without refreshing, even if stale.
    pub fn cached(&self) -> Option<Arc<QuoteSet>> {
        self.inner.state.lock().entry.clone()
    }

    /// Drop the cached entry so the next call refetches.
    pub fn invalidate(&self) {
        self.inner.state.lock().entry = None;
    }

    /// Name of the upstream provider.
    pub fn provider_name(&self) -> &str {
        self.inner.provider.name()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.inner.hits.load(Ordering::Relaxed),
            fetches: self.inner.fetches.load(Ordering::Relaxed),
            failures: self.inner.failures.load(Ordering::Relaxed),
            fetched_at: self.cached().map(|q| q.fetched_at),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub fetches: u64,
    pub failures: u64,
    pub fetched_at: Option<DateTime<Utc>>,
}
