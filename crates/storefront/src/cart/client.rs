//! REST client for the cart service.
//!
//! Uses `reqwest` for HTTP. Response bodies are read as text first so a
//! non-JSON answer (an HTML error page, say) can be logged before it is
//! turned into a parse error. The body is interpreted whatever the status
//! code: the backend reports rejections as `{"error": ...}` with a 4xx.

use std::sync::Arc;

use async_trait::async_trait;
use bazaar_core::{ProductId, Quantity};
use reqwest::RequestBuilder;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::{debug, instrument, warn};
use url::Url;

use super::{CartService, CartSession, CartSnapshot, MutationResponse};
use crate::config::CartApiConfig;
use crate::error::{CartError, Result};

const CART_PATH: &str = "api/orders/cart/";

/// Request body for the add endpoint.
#[derive(Debug, Serialize)]
struct AddItemBody {
    quantity: Quantity,
}

// =============================================================================
// HttpCartService
// =============================================================================

/// Client for the cart REST endpoints.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpCartService {
    inner: Arc<HttpCartServiceInner>,
}

struct HttpCartServiceInner {
    client: reqwest::Client,
    base_url: Url,
    csrf_header: String,
}

impl HttpCartService {
    /// Create a new cart service client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &CartApiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(HttpCartServiceInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
                csrf_header: config.csrf_header.clone(),
            }),
        })
    }

    /// Base URL the endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// POST to a mutating endpoint and interpret the body.
    async fn post_mutation<B: Serialize + Sync>(
        &self,
        url: Url,
        body: Option<&B>,
        session: &CartSession,
    ) -> Result<()> {
        let mut request = with_cookies(self.inner.client.post(url), session)
            .header(CONTENT_TYPE, "application/json");

        match &session.csrf_token {
            Some(token) => {
                request = request.header(self.inner.csrf_header.as_str(), token.expose_secret());
            }
            None => warn!(
                header = %self.inner.csrf_header,
                "No anti-forgery token available, sending request without it"
            ),
        }

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        let parsed: MutationResponse = parse_body(&response_text, status)?;
        debug!(status = %status, message = ?parsed.message, "Cart mutation answered");
        parsed.into_result()
    }
}

#[async_trait]
impl CartService for HttpCartService {
    #[instrument(skip(self, session))]
    async fn add_item(
        &self,
        product_id: ProductId,
        quantity: Quantity,
        session: &CartSession,
    ) -> Result<()> {
        let url = self.endpoint(&format!("{CART_PATH}add/{product_id}/"))?;
        self.post_mutation(url, Some(&AddItemBody { quantity }), session)
            .await
    }

    #[instrument(skip(self, session))]
    async fn remove_item(&self, product_id: ProductId, session: &CartSession) -> Result<()> {
        let url = self.endpoint(&format!("{CART_PATH}remove/{product_id}/"))?;
        self.post_mutation::<AddItemBody>(url, None, session).await
    }

    #[instrument(skip(self, session))]
    async fn get_cart(&self, session: &CartSession) -> Result<CartSnapshot> {
        let url = self.endpoint(CART_PATH)?;
        let response = with_cookies(self.inner.client.get(url), session)
            .send()
            .await?;
        let status = response.status();
        let response_text = response.text().await?;

        let snapshot: CartSnapshot = parse_body(&response_text, status)?;
        debug!(items = snapshot.item_count(), "Fetched cart");
        Ok(snapshot)
    }
}

/// Attach the page's cookies, as a browser would for a same-origin request.
fn with_cookies(request: RequestBuilder, session: &CartSession) -> RequestBuilder {
    match &session.cookies {
        Some(cookies) => request.header(COOKIE, cookies.expose_secret()),
        None => {
            debug!("No cookies on the page, request carries no session");
            request
        }
    }
}

/// Parse a JSON body, logging a preview of it when that fails.
fn parse_body<T: serde::de::DeserializeOwned>(
    response_text: &str,
    status: reqwest::StatusCode,
) -> Result<T> {
    serde_json::from_str(response_text).map_err(|e| {
        tracing::error!(
            status = %status,
            error = %e,
            body = %response_text.chars().take(500).collect::<String>(),
            "Failed to parse cart service response"
        );
        CartError::Parse(e)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service(base: &str) -> HttpCartService {
        HttpCartService::new(&CartApiConfig::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoints_resolve_against_base() {
        let svc = service("http://localhost:8000");
        assert_eq!(
            svc.endpoint(&format!("{CART_PATH}add/5/")).unwrap().as_str(),
            "http://localhost:8000/api/orders/cart/add/5/"
        );
        assert_eq!(
            svc.endpoint(CART_PATH).unwrap().as_str(),
            "http://localhost:8000/api/orders/cart/"
        );
    }

    #[test]
    fn test_endpoints_keep_path_prefix() {
        let svc = service("https://shop.example.in/store");
        assert_eq!(
            svc.endpoint(&format!("{CART_PATH}remove/12/")).unwrap().as_str(),
            "https://shop.example.in/store/api/orders/cart/remove/12/"
        );
    }

    #[test]
    fn test_add_body_shape() {
        let body = AddItemBody {
            quantity: Quantity::new(3).unwrap(),
        };
        assert_eq!(serde_json::to_string(&body).unwrap(), r#"{"quantity":3}"#);
    }

    #[test]
    fn test_requests_carry_page_cookies() {
        let svc = service("http://localhost:8000");
        let session = CartSession::from_cookies("sessionid=s1; csrftoken=tok", "csrftoken");

        let request = with_cookies(svc.inner.client.get(svc.endpoint(CART_PATH).unwrap()), &session)
            .build()
            .unwrap();

        assert_eq!(
            request.headers().get(COOKIE).unwrap(),
            "sessionid=s1; csrftoken=tok"
        );
    }

    #[test]
    fn test_no_cookie_header_without_cookies() {
        let svc = service("http://localhost:8000");
        let request = with_cookies(
            svc.inner.client.get(svc.endpoint(CART_PATH).unwrap()),
            &CartSession::default(),
        )
        .build()
        .unwrap();

        assert!(request.headers().get(COOKIE).is_none());
    }

    #[test]
    fn test_parse_body_rejects_html() {
        let err = parse_body::<MutationResponse>(
            "<html>Server Error</html>",
            reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        )
        .unwrap_err();
        assert!(matches!(err, CartError::Parse(_)));
    }
}
