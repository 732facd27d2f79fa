//! Normalized quote sets.

use chrono::{DateTime, Utc};
use exchange_common::{Currency, ExchangeError, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::provider::RawQuotes;

/// Quotes expressed against a single base currency.
///
/// `rates[X]` is the number of units of `X` per one unit of `base`. The base
/// always carries a rate of exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteSet {
    /// Currency every rate is expressed against.
    pub base: Currency,
    /// Rates keyed by currency.
    pub rates: BTreeMap<Currency, Decimal>,
    /// When the set was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl QuoteSet {
    /// Create a quote set, injecting the base self-rate.
    pub fn new(base: Currency, mut rates: BTreeMap<Currency, Decimal>) -> Self {
        rates.insert(base, Decimal::ONE);
        Self {
            base,
            rates,
            fetched_at: Utc::now(),
        }
    }

    /// Normalize a provider payload.
    ///
    /// Keys are stripped of the provider base prefix, codes outside the
    /// registry and non-positive rates are dropped. A payload without a usable
    /// rate table is rejected.
    pub fn from_raw(raw: RawQuotes) -> Result<Self> {
        if !raw.success {
            return Err(ExchangeError::ProviderUnavailable(format!(
                "provider reported failure for source {}",
                raw.source
            )));
        }

        let base: Currency = raw.source.parse().map_err(|_| {
            ExchangeError::ProviderUnavailable(format!(
                "unsupported provider base currency {}",
                raw.source
            ))
        })?;

        let quotes = match raw.quotes {
            Some(quotes) if !quotes.is_empty() => quotes,
            _ => {
                return Err(ExchangeError::ProviderUnavailable(
                    "provider returned no quotes".to_string(),
                ))
            }
        };

        let mut rates = BTreeMap::new();
        for (key, rate) in quotes {
            let code = strip_source_prefix(&key, &raw.source);
            let Ok(currency) = code.parse::<Currency>() else {
                debug!(key = %key, "Dropping quote for unsupported currency");
                continue;
            };

            if rate <= Decimal::ZERO {
                warn!(key = %key, rate = %rate, "Dropping non-positive quote");
                continue;
            }

            rates.insert(currency, rate);
        }

        rates.remove(&base);
        if rates.is_empty() {
            return Err(ExchangeError::ProviderUnavailable(
                "provider returned no supported quotes".to_string(),
            ));
        }

        Ok(Self::new(base, rates))
    }

    /// Get the rate for a currency.
    pub fn rate(&self, currency: Currency) -> Option<Decimal> {
        self.rates.get(&currency).copied()
    }

    /// Check whether a currency is quoted.
    pub fn contains(&self, currency: Currency) -> bool {
        self.rates.contains_key(&currency)
    }

    /// Number of quoted currencies, base included.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if no currency is quoted.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// `USDAUD` with source `USD` becomes `AUD`; plain keys pass through.
fn strip_source_prefix<'a>(key: &'a str, source: &str) -> &'a str {
    match key.strip_prefix(source) {
        Some(code) if key.len() == 6 && source.len() == 3 => code,
        _ => key,
    }
}
