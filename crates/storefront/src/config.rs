//! Cart UI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BAZAAR_API_BASE_URL` - Origin of the cart service (e.g., `https://shop.example.in`)
//!
//! ## Optional
//! - `BAZAAR_CSRF_COOKIE` - Cookie holding the anti-forgery token (default: csrftoken)
//! - `BAZAAR_CSRF_HEADER` - Header the token is echoed in (default: X-CSRFToken)
//! - `BAZAAR_ALERT_VISIBLE_MS` - How long alerts stay visible (default: 3000)
//! - `BAZAAR_ALERT_FADE_MS` - Fade-out time before an alert is removed (default: 150)
//! - `BAZAAR_REQUEST_TIMEOUT_SECS` - Client-side request timeout (default: none)
//! - `BAZAAR_DEDUPE_IN_FLIGHT` - Skip duplicate in-flight cart actions (default: true)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_CSRF_COOKIE: &str = "csrftoken";
const DEFAULT_CSRF_HEADER: &str = "X-CSRFToken";
const DEFAULT_ALERT_VISIBLE_MS: u64 = 3000;
const DEFAULT_ALERT_FADE_MS: u64 = 150;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Top-level configuration for a cart UI session.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Cart service connection settings
    pub api: CartApiConfig,
    /// Controller behaviour
    pub controller: ControllerConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Cart service connection settings.
#[derive(Debug, Clone)]
pub struct CartApiConfig {
    /// Base URL the cart endpoints are resolved against (always ends in `/`)
    pub base_url: Url,
    /// Header carrying the anti-forgery token on mutating calls
    pub csrf_header: String,
    /// Optional client-side timeout; `None` leaves it to the network stack
    pub request_timeout: Option<Duration>,
}

/// Behaviour of the cart UI controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Cookie the anti-forgery token is read from
    pub csrf_cookie: String,
    /// How long an alert stays fully visible
    pub alert_visible: Duration,
    /// Fade-out time between hiding an alert and removing it
    pub alert_fade: Duration,
    /// Allow at most one in-flight request per (action, product)
    pub dedupe_in_flight: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            csrf_cookie: DEFAULT_CSRF_COOKIE.to_string(),
            alert_visible: Duration::from_millis(DEFAULT_ALERT_VISIBLE_MS),
            alert_fade: Duration::from_millis(DEFAULT_ALERT_FADE_MS),
            dedupe_in_flight: true,
        }
    }
}

impl CartApiConfig {
    /// Settings for a service at `base_url` with default header and no timeout.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            csrf_header: DEFAULT_CSRF_HEADER.to_string(),
            request_timeout: None,
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
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let vars = Vars(&lookup);

        let base_url = vars.required("BAZAAR_API_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BAZAAR_API_BASE_URL".to_string(), e.to_string())
        })?;

        let request_timeout = vars
            .optional("BAZAAR_REQUEST_TIMEOUT_SECS")
            .map(|raw| parse_var::<u64>("BAZAAR_REQUEST_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(Duration::from_secs);

        let api = CartApiConfig {
            base_url: with_trailing_slash(base_url),
            csrf_header: vars.or_default("BAZAAR_CSRF_HEADER", DEFAULT_CSRF_HEADER),
            request_timeout,
        };

        let controller = ControllerConfig {
            csrf_cookie: vars.or_default("BAZAAR_CSRF_COOKIE", DEFAULT_CSRF_COOKIE),
            alert_visible: Duration::from_millis(parse_var(
                "BAZAAR_ALERT_VISIBLE_MS",
                &vars.or_default("BAZAAR_ALERT_VISIBLE_MS", "3000"),
            )?),
            alert_fade: Duration::from_millis(parse_var(
                "BAZAAR_ALERT_FADE_MS",
                &vars.or_default("BAZAAR_ALERT_FADE_MS", "150"),
            )?),
            dedupe_in_flight: parse_bool(
                "BAZAAR_DEDUPE_IN_FLIGHT",
                &vars.or_default("BAZAAR_DEDUPE_IN_FLIGHT", "true"),
            )?,
        };

        Ok(Self {
            api,
            controller,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Vars<'a, F: Fn(&str) -> Option<String>>(&'a F);

impl<F: Fn(&str) -> Option<String>> Vars<'_, F> {
    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        (self.0)(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get an optional variable; empty values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|v| !v.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a boolean, got {other:?}"),
        )),
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
