//! Server configuration.

use std::time::Duration;

use exchange_fx::{HttpProviderConfig, QuoteCacheConfig};

/// Main server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen address.
    pub listen_addr: String,
    /// Listen port.
    pub listen_port: u16,
    /// Upstream provider settings.
    pub provider: HttpProviderConfig,
    /// Quote cache policy.
    pub cache: QuoteCacheConfig,
    /// Log level used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0".to_string(),
            listen_port: 8080,
            provider: HttpProviderConfig::default(),
            cache: QuoteCacheConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = lookup("EXCHANGE_LISTEN_ADDR") {
            config.listen_addr = addr;
        }

        if let Some(port) = lookup("EXCHANGE_LISTEN_PORT") {
            if let Ok(port) = port.parse() {
                config.listen_port = port;
            }
        }

        if let Some(url) = lookup("EXCHANGE_API_URL") {
            config.provider.api_url = url;
        }

        if let Some(key) = lookup("EXCHANGE_API_KEY") {
            config.provider.api_key = key;
        }

        if let Some(secs) = lookup("EXCHANGE_API_TIMEOUT_SECS") {
            if let Ok(secs) = secs.parse() {
                config.provider.timeout = Duration::from_secs(secs);
            }
        }

        if let Some(secs) = lookup("EXCHANGE_CACHE_TTL_SECS") {
            if let Ok(secs) = secs.parse() {
                config.cache = QuoteCacheConfig::from_ttl_secs(secs);
            }
        }

        if let Some(level) = lookup("LOG_LEVEL") {
            config.log_level = level;
        }

        config
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.listen_port == 0 {
            return Err("Listen port cannot be 0".to_string());
        }

        if self.provider.api_url.is_empty() {
            return Err("Provider API URL cannot be empty".to_string());
        }

        if self.provider.api_key.is_empty() {
            return Err("Provider API key must be set (EXCHANGE_API_KEY)".to_string());
        }

        if self.provider.timeout.is_zero() {
            return Err("Provider timeout must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_config_needs_api_key() {
        let config = ServerConfig::default();
        assert!(config.validate().is_err());
        assert_eq!(config.cache.ttl, None);
    }

    #[test]
    fn test_config_from_vars() {
        let config = config_from(&[
            ("EXCHANGE_LISTEN_PORT", "9000"),
            ("EXCHANGE_API_KEY", "secret"),
            ("EXCHANGE_API_TIMEOUT_SECS", "3"),
            ("EXCHANGE_CACHE_TTL_SECS", "600"),
            ("LOG_LEVEL", "debug"),
        ]);

        assert!(config.validate().is_ok());
        assert_eq!(config.listen_port, 9000);
        assert_eq!(config.provider.api_key, "secret");
        assert_eq!(config.provider.timeout, Duration::from_secs(3));
        assert_eq!(config.cache.ttl, Some(Duration::from_secs(600)));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_unparsable_values_keep_defaults() {
        let config = config_from(&[("EXCHANGE_LISTEN_PORT", "http"), ("EXCHANGE_CACHE_TTL_SECS", "-1")]);

        assert_eq!(config.listen_port, 8080);
        assert_eq!(config.cache.ttl, None);
    }

    #[test]
    fn test_invalid_config() {
        let mut config = config_from(&[("EXCHANGE_API_KEY", "secret")]);
        config.listen_port = 0;
        assert!(config.validate().is_err());

        let config = config_from(&[("EXCHANGE_API_KEY", "secret"), ("EXCHANGE_API_TIMEOUT_SECS", "0")]);
        assert!(config.validate().is_err());
    }
}
