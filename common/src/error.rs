//! Error types for the exchange service.

use thiserror::Error;

/// Main error type for exchange operations.
///
/// Errors are `Clone` so that a single failed upstream fetch can be handed to
/// every caller waiting on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// A currency code is not in the registry (or not quoted by the provider).
    #[error("Invalid Currency : {0}")]
    UnknownCurrency(String),

    /// None of the requested conversion targets is usable.
    #[error("Invalid Currency : [{}]. Please enter at least one valid currency", .0.join(", "))]
    NoValidTarget(Vec<String>),

    /// A conversion amount cannot be applied.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The upstream provider failed or returned no usable rate table.
    #[error("Exchange is not available: {0}")]
    ProviderUnavailable(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ExchangeError {
    /// Whether this error was caused by caller-supplied currency codes.
    pub fn is_unknown_currency(&self) -> bool {
        matches!(
            self,
            ExchangeError::UnknownCurrency(_) | ExchangeError::NoValidTarget(_)
        )
    }

    /// Whether the caller's input caused this error.
    pub fn is_client_error(&self) -> bool {
        self.is_unknown_currency() || matches!(self, ExchangeError::InvalidAmount(_))
    }

    /// Check if this error is retryable.
    ///
    /// Nothing retries automatically; this only tells the caller whether a
    /// later attempt could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExchangeError::ProviderUnavailable(_))
    }

    /// Get a stable error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ExchangeError::UnknownCurrency(_) | ExchangeError::NoValidTarget(_) => {
                "UNKNOWN_CURRENCY"
            }
            ExchangeError::InvalidAmount(_) => "INVALID_AMOUNT",
            ExchangeError::ProviderUnavailable(_) => "PROVIDER_UNAVAILABLE",
            ExchangeError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        }
    }
}

/// Result type alias for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;
