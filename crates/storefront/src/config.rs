//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_STATIC_DIR` - Directory served under `/static` (default: crates/storefront/static)
//! - `STOREFRONT_CATALOG_PATH` - JSON menu file; the bundled menu is used when unset
//! - `CHECKOUT_BASE_URL` - Messaging link orders are handed to (default: <https://wa.link/tbdv8t>)
//! - `CHECKOUT_TEXT_PARAM` - Query parameter carrying the order text (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use pasteleria_core::CheckoutLink;
use pasteleria_core::checkout::{DEFAULT_BASE_URL, DEFAULT_TEXT_PARAM};
use thiserror::Error;
use url::Url;

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
    /// Public base URL for the storefront
    pub base_url: String,
    /// Directory with CSS, scripts and images
    pub static_dir: PathBuf,
    /// Menu file overriding the bundled catalog
    pub catalog_path: Option<PathBuf>,
    /// Messaging checkout configuration
    pub checkout: CheckoutConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. "production")
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

/// Messaging deep link configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    /// Link the order summary is appended to
    pub base_url: String,
    /// Query parameter name for the order summary
    pub text_param: String,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            text_param: DEFAULT_TEXT_PARAM.to_string(),
        }
    }
}

impl CheckoutConfig {
    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = get_or_default(lookup, "CHECKOUT_BASE_URL", DEFAULT_BASE_URL);
        validate_url(&base_url, "CHECKOUT_BASE_URL")?;

        let text_param = get_or_default(lookup, "CHECKOUT_TEXT_PARAM", DEFAULT_TEXT_PARAM);
        if text_param.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CHECKOUT_TEXT_PARAM".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            text_param,
        })
    }

    /// Build the checkout link helper for this configuration.
    #[must_use]
    pub fn link(&self) -> CheckoutLink {
        CheckoutLink::new(&self.base_url, &self.text_param)
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a value is invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = get_or_default(&lookup, "STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_or_default(&lookup, "STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_or_default(&lookup, "STOREFRONT_BASE_URL", "http://localhost:3000");
        validate_url(&base_url, "STOREFRONT_BASE_URL")?;

        let static_dir = PathBuf::from(get_or_default(
            &lookup,
            "STOREFRONT_STATIC_DIR",
            "crates/storefront/static",
        ));
        let catalog_path = lookup("STOREFRONT_CATALOG_PATH").map(PathBuf::from);

        let checkout = CheckoutConfig::from_lookup(&lookup)?;

        let sentry_dsn = lookup("SENTRY_DSN");
        let sentry_environment = lookup("SENTRY_ENVIRONMENT");
        let sentry_sample_rate = get_rate(&lookup, "SENTRY_SAMPLE_RATE", 1.0)?;
        let sentry_traces_sample_rate = get_rate(&lookup, "SENTRY_TRACES_SAMPLE_RATE", 0.0)?;

        Ok(Self {
            host,
            port,
            base_url,
            static_dir,
            catalog_path,
            checkout,
            sentry_dsn,
            sentry_environment,
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should be marked `Secure`.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Get a sample rate in `[0, 1]`.
fn get_rate(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: f32,
) -> Result<f32, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let rate = raw
        .parse::<f32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !(0.0..=1.0).contains(&rate) {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("must be between 0.0 and 1.0 (got {rate})"),
        ));
    }
    Ok(rate)
}

/// Require an absolute http(s) URL.
fn validate_url(value: &str, key: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url, "http://localhost:3000");
        assert_eq!(config.checkout, CheckoutConfig::default());
        assert_eq!(config.checkout.base_url, "https://wa.link/tbdv8t");
        assert_eq!(config.checkout.text_param, "text");
        assert!(config.catalog_path.is_none());
        assert!(config.sentry_dsn.is_none());
        assert!(!config.is_secure());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("STOREFRONT_HOST", "0.0.0.0"),
            ("STOREFRONT_PORT", "8080"),
            ("STOREFRONT_BASE_URL", "https://dulceantojo.pe"),
            ("STOREFRONT_CATALOG_PATH", "/etc/pasteleria/menu.json"),
            ("CHECKOUT_BASE_URL", "https://api.whatsapp.com/send?phone=51999888777"),
            ("SENTRY_TRACES_SAMPLE_RATE", "0.25"),
        ])
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:8080");
        assert!(config.is_secure());
        assert_eq!(
            config.catalog_path.as_deref(),
            Some(std::path::Path::new("/etc/pasteleria/menu.json"))
        );
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
        assert_eq!(
            config.checkout.link().link_for_message("hola"),
            "https://api.whatsapp.com/send?phone=51999888777&text=hola"
        );
    }

    #[test]
    fn test_invalid_port() {
        let err = load(&[("STOREFRONT_PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "STOREFRONT_PORT"));
    }

    #[test]
    fn test_invalid_checkout_url() {
        assert!(load(&[("CHECKOUT_BASE_URL", "wa.link/abc")]).is_err());
        assert!(load(&[("CHECKOUT_BASE_URL", "ftp://wa.link/abc")]).is_err());
    }

    #[test]
    fn test_empty_text_param() {
        let err = load(&[("CHECKOUT_TEXT_PARAM", "  ")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "CHECKOUT_TEXT_PARAM"));
    }

    #[test]
    fn test_sample_rate_out_of_range() {
        assert!(load(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        assert!(load(&[("SENTRY_SAMPLE_RATE", "abc")]).is_err());
    }
}
