//! Cart service client.
//!
//! # Architecture
//!
//! - The cart lives on the server; this module only issues requests
//! - [`CartService`] is the seam the controller depends on
//! - [`HttpCartService`] talks to the REST endpoints with `reqwest`
//!
//! # Endpoints
//!
//! | Operation | Method | Path |
//! |---|---|---|
//! | Add item | POST | `api/orders/cart/add/{product_id}/` |
//! | Remove item | POST | `api/orders/cart/remove/{product_id}/` |
//! | Get cart | GET | `api/orders/cart/` |
//!
//! Every call sends the page's cookies; mutating calls also echo the
//! anti-forgery token in a header.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_storefront::cart::{CartService, CartSession, HttpCartService};
//!
//! let service = HttpCartService::new(&config.api)?;
//! let session = CartSession::from_cookies(&page.cookies(), "csrftoken");
//! service.add_item(ProductId::new(7), Quantity::ONE, &session).await?;
//! let snapshot = service.get_cart(&session).await?;
//! ```

mod client;
pub mod types;

pub use client::HttpCartService;
pub use types::*;

use async_trait::async_trait;
use bazaar_core::{ProductId, Quantity, get_cookie};
use secrecy::SecretString;

use crate::error::Result;

/// Credentials a browser attaches to every cart request.
///
/// The cart lives in the server-side session, so requests carry the page's
/// cookies. Mutations additionally echo the anti-forgery token, which the
/// server compares against its cookie.
#[derive(Debug, Default)]
pub struct CartSession {
    /// Raw `Cookie` header value.
    pub cookies: Option<SecretString>,
    /// Anti-forgery token for the mutation header.
    pub csrf_token: Option<SecretString>,
}

impl CartSession {
    /// Build from a `document.cookie`-style string, reading the token from
    /// the cookie named `csrf_cookie`.
    #[must_use]
    pub fn from_cookies(cookies: &str, csrf_cookie: &str) -> Self {
        let trimmed = cookies.trim();
        Self {
            cookies: (!trimmed.is_empty()).then(|| SecretString::from(trimmed.to_owned())),
            csrf_token: get_cookie(trimmed, csrf_cookie).map(SecretString::from),
        }
    }
}

/// Remote cart operations.
///
/// A server-reported rejection comes back as [`crate::CartError::Server`];
/// anything else in the error channel is a transport failure.
#[async_trait]
pub trait CartService: Send + Sync {
    /// Add `quantity` units of a product to the cart.
    async fn add_item(
        &self,
        product_id: ProductId,
        quantity: Quantity,
        session: &CartSession,
    ) -> Result<()>;

    /// Remove a product from the cart.
    async fn remove_item(&self, product_id: ProductId, session: &CartSession) -> Result<()>;

    /// Fetch the current cart.
    async fn get_cart(&self, session: &CartSession) -> Result<CartSnapshot>;
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn test_session_from_cookies() {
        let session = CartSession::from_cookies(" sessionid=s1; csrftoken=tok%2B1 ", "csrftoken");
        assert_eq!(
            session.cookies.as_ref().map(|s| s.expose_secret()),
            Some("sessionid=s1; csrftoken=tok%2B1")
        );
        assert_eq!(
            session.csrf_token.as_ref().map(|s| s.expose_secret()),
            Some("tok+1")
        );
    }

    #[test]
    fn test_session_without_cookies() {
        let session = CartSession::from_cookies("", "csrftoken");
        assert!(session.cookies.is_none());
        assert!(session.csrf_token.is_none());

        let anonymous = CartSession::from_cookies("theme=dark", "csrftoken");
        assert!(anonymous.cookies.is_some());
        assert!(anonymous.csrf_token.is_none());
    }
}
