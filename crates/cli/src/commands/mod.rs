//! CLI command implementations.

pub mod cart;
pub mod tools;

use bazaar_storefront::{CartError, ConfigError};
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Cart commands were run without configuration.
    #[error("Cart commands need BAZAAR_API_BASE_URL to be set")]
    MissingConfig,

    /// A cart request failed outside the controller.
    #[error("Cart service error: {0}")]
    Cart(#[from] CartError),

    /// The controller reported a failed action; the alert was printed.
    #[error("Cart action did not complete: {0}")]
    ActionFailed(String),

    /// The requested cookie is not in the cookie string.
    #[error("Cookie not found: {0}")]
    CookieNotFound(String),
}
