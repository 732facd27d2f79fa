//! Exchange FX Engine
//!
//! Quote normalization, caching, rebasing and conversion for the exchange
//! service.
//!
//! # Features
//!
//! - Single upstream provider with prefix-stripping normalization
//! - Quote caching with configurable TTL and single-flight refresh
//! - Exact cross-rate rebasing with half-down rounding to six places
//! - Multi-target conversion with per-target error markers
//!
//! # Example
//!
//! ```rust,ignore
//! use exchange_fx::{ExchangeEngine, ExchangeEngineConfig, ConversionRequest};
//!
//! let engine = ExchangeEngine::new(provider, ExchangeEngineConfig::default());
//!
//! // Rate of AUD per one USD
//! let rate = engine.rate_lookup("USD", Some("AUD")).await?;
//!
//! // Convert 100 INR into several currencies
//! let request = ConversionRequest::new("INR", dec!(100), ["USD", "AUD"]);
//! let result = engine.convert(&request).await?;
//! ```

pub mod cache;
pub mod conversion;
pub mod engine;
pub mod http_provider;
pub mod provider;
pub mod quote;
pub mod rebase;

pub use cache::{CacheStats, QuoteCache, QuoteCacheConfig};
pub use conversion::{ConversionLine, ConversionRequest, ConversionResult, INVALID_CURRENCY};
pub use engine::{ExchangeEngine, ExchangeEngineConfig};
pub use http_provider::{HttpProviderConfig, HttpQuoteProvider};
pub use provider::{QuoteProvider, RawQuotes};
pub use quote::QuoteSet;
pub use rebase::{cross_rate, rebase};

#[cfg(any(test, feature = "test-utils"))]
pub use provider::MockQuoteProvider;
