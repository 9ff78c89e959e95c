//! Cart error handling with Sentry integration.
//!
//! Every cart request resolves to `Result<T, CartError>`. The controller
//! never lets these escape: server-reported errors are shown to the
//! shopper verbatim, transport errors are captured to Sentry, logged and
//! replaced by a generic retry message.

use thiserror::Error;

/// Shown to the shopper when the request itself failed.
pub const GENERIC_FAILURE_MESSAGE: &str = "An error occurred. Please try again.";

/// Errors produced while talking to the cart service.
#[derive(Debug, Error)]
pub enum CartError {
    /// The service answered with an `error` field.
    #[error("{0}")]
    Server(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the JSON we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl CartError {
    /// Whether this is a transport-level failure rather than a rejection
    /// the server chose to report.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        !matches!(self, Self::Server(_))
    }

    /// The text to put in the danger alert for this error.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Server(message) => message,
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }

    /// Log the error, capturing transport failures to Sentry.
    pub fn report(&self) {
        if self.is_transport() {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Cart request failed"
            );
        } else {
            tracing::warn!(error = %self, "Cart service rejected the request");
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Add to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_displays_verbatim() {
        let err = CartError::Server("Out of stock".to_string());
        assert_eq!(err.to_string(), "Out of stock");
        assert_eq!(err.user_message(), "Out of stock");
        assert!(!err.is_transport());
    }

    #[test]
    fn test_parse_error_is_transport() {
        let err = CartError::from(serde_json::from_str::<serde_json::Value>("<html>").unwrap_err());
        assert!(err.is_transport());
        assert_eq!(err.user_message(), GENERIC_FAILURE_MESSAGE);
        assert!(err.to_string().starts_with("JSON parse error:"));
    }

    #[test]
    fn test_invalid_url_is_transport() {
        let err = CartError::from(url::Url::parse("not a url").unwrap_err());
        assert!(err.is_transport());
    }

    #[test]
    fn test_report_without_sentry_client_is_noop() {
        CartError::Server("nope".to_string()).report();
        CartError::from(url::ParseError::EmptyHost).report();
    }
}
