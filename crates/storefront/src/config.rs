//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `BOUTIQUE_DATA_DIR` - Directory holding persisted cart and wishlist (default: .boutique)
//! - `BOUTIQUE_CATALOG_PATH` - JSON catalog replacing the embedded one
//! - `BOUTIQUE_FREE_SHIPPING_THRESHOLD` - Subtotal above which shipping is free (default: 500000)
//! - `BOUTIQUE_SHIPPING_FLAT_RATE` - Shipping charged below the threshold (default: 15000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use boutique_core::{Price, ShippingPolicy};
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory for the cart and wishlist storage slots
    pub data_dir: PathBuf,
    /// Catalog file overriding the embedded catalog
    pub catalog_path: Option<PathBuf>,
    /// Shipping charges applied to cart summaries
    pub shipping: ShippingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. production, staging)
    pub sentry_environment: Option<String>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: PathBuf::from(".boutique"),
            catalog_path: None,
            shipping: ShippingPolicy::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let defaults_shipping = defaults.shipping;

        let host = parse_or(&lookup, "STOREFRONT_HOST", defaults.host)?;
        let port = parse_or(&lookup, "STOREFRONT_PORT", defaults.port)?;
        let data_dir = lookup("BOUTIQUE_DATA_DIR").map_or(defaults.data_dir, PathBuf::from);
        let catalog_path = non_empty(&lookup, "BOUTIQUE_CATALOG_PATH").map(PathBuf::from);
        let free_threshold = parse_or(
            &lookup,
            "BOUTIQUE_FREE_SHIPPING_THRESHOLD",
            defaults_shipping.free_threshold.amount(),
        )?;
        let flat_rate = parse_or(
            &lookup,
            "BOUTIQUE_SHIPPING_FLAT_RATE",
            defaults_shipping.flat_rate.amount(),
        )?;

        Ok(Self {
            host,
            port,
            data_dir,
            catalog_path,
            shipping: ShippingPolicy {
                free_threshold: Price::new(free_threshold),
                flat_rate: Price::new(flat_rate),
            },
            sentry_dsn: non_empty(&lookup, "SENTRY_DSN"),
            sentry_environment: non_empty(&lookup, "SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable, treating an empty value as unset.
fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Parse a variable, falling back to `default` when it is unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_empty(lookup, key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = StorefrontConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.data_dir, PathBuf::from(".boutique"));
        assert!(config.catalog_path.is_none());
        assert_eq!(config.shipping, ShippingPolicy::default());
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = StorefrontConfig::from_lookup(lookup(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("BOUTIQUE_DATA_DIR", "/var/lib/boutique"),
            ("BOUTIQUE_CATALOG_PATH", "catalog.json"),
            ("BOUTIQUE_FREE_SHIPPING_THRESHOLD", "750000"),
            ("BOUTIQUE_SHIPPING_FLAT_RATE", "20000"),
            ("SENTRY_ENVIRONMENT", "staging"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/boutique"));
        assert_eq!(config.catalog_path, Some(PathBuf::from("catalog.json")));
        assert_eq!(config.shipping.free_threshold, Price::new(750_000));
        assert_eq!(config.shipping.flat_rate, Price::new(20_000));
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let err = StorefrontConfig::from_lookup(lookup(&[("STOREFRONT_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        let result =
            StorefrontConfig::from_lookup(lookup(&[("BOUTIQUE_SHIPPING_FLAT_RATE", "-5")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_sentry_dsn_is_unset() {
        let config = StorefrontConfig::from_lookup(lookup(&[("SENTRY_DSN", "  ")])).unwrap();
        assert!(config.sentry_dsn.is_none());
    }
}
