//! Integration tests for the Bazaar cart client and controller.
//!
//! Provides [`StubCartServer`], an in-process `axum` server speaking the
//! cart service's REST dialect, so the real HTTP client and controller can
//! be exercised end to end without a backend.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bazaar-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::{BTreeMap, HashMap};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::COOKIE},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use bazaar_core::get_cookie;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

/// Header the stand-in reads the anti-forgery token from.
pub const CSRF_HEADER: &str = "x-csrftoken";

/// Cookie identifying the signed-in session a cart belongs to.
pub const SESSION_COOKIE: &str = "sessionid";

/// Cookie the token header must match on mutating requests.
pub const CSRF_COOKIE: &str = "csrftoken";

/// A product the stand-in knows about.
#[derive(Debug, Clone)]
pub struct CatalogProduct {
    pub id: i32,
    pub name: String,
    pub price: Decimal,
    pub stock: u32,
}

impl CatalogProduct {
    #[must_use]
    pub fn new(id: i32, name: &str, price: Decimal, stock: u32) -> Self {
        Self {
            id,
            name: name.to_string(),
            price,
            stock,
        }
    }
}

/// product ID -> quantity
type Cart = BTreeMap<i32, u32>;

#[derive(Debug, Default)]
struct ServerState {
    catalog: HashMap<i32, CatalogProduct>,
    /// session ID -> cart
    carts: Mutex<HashMap<String, Cart>>,
    /// `Cookie` header seen on each request, in order.
    cookie_headers: Mutex<Vec<Option<String>>>,
    /// Token header seen on each mutating request, in order.
    csrf_tokens: Mutex<Vec<Option<String>>>,
    /// Quantities requested by add calls, in order.
    added_quantities: Mutex<Vec<u32>>,
    broken: AtomicBool,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Builder for [`StubCartServer`].
#[derive(Debug, Default)]
pub struct StubCartServerBuilder {
    catalog: Vec<CatalogProduct>,
    carts: HashMap<String, Cart>,
}

impl StubCartServerBuilder {
    /// Make a product purchasable.
    #[must_use]
    pub fn product(mut self, product: CatalogProduct) -> Self {
        self.catalog.push(product);
        self
    }

    /// Start with `quantity` of product `id` in the cart of `session`.
    #[must_use]
    pub fn in_cart(mut self, session: &str, id: i32, quantity: u32) -> Self {
        self.carts
            .entry(session.to_string())
            .or_default()
            .insert(id, quantity);
        self
    }

    /// Bind to an ephemeral local port and start serving.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start(self) -> std::io::Result<StubCartServer> {
        let state = Arc::new(ServerState {
            catalog: self.catalog.into_iter().map(|p| (p.id, p)).collect(),
            carts: Mutex::new(self.carts),
            ..ServerState::default()
        });

        let app = Router::new()
            .route("/api/orders/cart/", get(cart_detail))
            .route("/api/orders/cart/add/{id}/", post(add_to_cart))
            .route("/api/orders/cart/remove/{id}/", post(remove_from_cart))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, "Stand-in cart server stopped");
            }
        });

        Ok(StubCartServer {
            addr,
            state,
            handle,
        })
    }
}

/// In-process cart service.
///
/// Each `sessionid` cookie has its own cart. Requests without one are
/// refused, and mutations must echo the `csrftoken` cookie in the
/// [`CSRF_HEADER`] header. Stops when dropped.
#[derive(Debug)]
pub struct StubCartServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    handle: JoinHandle<()>,
}

impl StubCartServer {
    #[must_use]
    pub fn builder() -> StubCartServerBuilder {
        StubCartServerBuilder::default()
    }

    /// Origin of the server, e.g. `http://127.0.0.1:41234/`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bound address does not form a URL.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!("http://{}/", self.addr))
    }

    /// Cart contents of `session` as (product ID, quantity) pairs.
    #[must_use]
    pub fn cart(&self, session: &str) -> Vec<(i32, u32)> {
        lock(&self.state.carts)
            .get(session)
            .map(|cart| cart.iter().map(|(k, v)| (*k, *v)).collect())
            .unwrap_or_default()
    }

    /// `Cookie` header seen on each request.
    #[must_use]
    pub fn cookie_headers(&self) -> Vec<Option<String>> {
        lock(&self.state.cookie_headers).clone()
    }

    /// Token header seen on each mutating request that had a session.
    #[must_use]
    pub fn csrf_tokens(&self) -> Vec<Option<String>> {
        lock(&self.state.csrf_tokens).clone()
    }

    /// Quantities requested by add calls.
    #[must_use]
    pub fn added_quantities(&self) -> Vec<u32> {
        lock(&self.state.added_quantities).clone()
    }

    /// When set, every endpoint answers with an HTML gateway error.
    pub fn set_broken(&self, broken: bool) {
        self.state.broken.store(broken, Ordering::SeqCst);
    }
}

impl Drop for StubCartServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Deserialize)]
struct AddBody {
    #[serde(default = "one")]
    quantity: u32,
}

const fn one() -> u32 {
    1
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

fn bad_gateway() -> Response {
    (
        StatusCode::BAD_GATEWAY,
        Html("<html><body><h1>502 Bad Gateway</h1></body></html>"),
    )
        .into_response()
}

fn header(headers: &HeaderMap, name: impl axum::http::header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Record the cookies and resolve the session they name.
fn session(state: &ServerState, headers: &HeaderMap) -> Result<String, Response> {
    let cookies = header(headers, COOKIE);
    lock(&state.cookie_headers).push(cookies.clone());

    cookies
        .as_deref()
        .and_then(|c| get_cookie(c, SESSION_COOKIE))
        .ok_or_else(|| {
            error(
                StatusCode::FORBIDDEN,
                "Authentication credentials were not provided.",
            )
        })
}

/// Record the token header and check it against the token cookie.
fn check_csrf(state: &ServerState, headers: &HeaderMap) -> Result<(), Response> {
    let token = header(headers, CSRF_HEADER);
    lock(&state.csrf_tokens).push(token.clone());

    let expected = header(headers, COOKIE).and_then(|c| get_cookie(&c, CSRF_COOKIE));
    match (token, expected) {
        (Some(token), Some(expected)) if token == expected => Ok(()),
        _ => Err(error(StatusCode::FORBIDDEN, "CSRF verification failed")),
    }
}

/// Session of a mutating request, after the token check.
fn authorize_mutation(state: &ServerState, headers: &HeaderMap) -> Result<String, Response> {
    let session = session(state, headers)?;
    check_csrf(state, headers)?;
    Ok(session)
}

fn price(amount: Decimal) -> Value {
    json!(amount.to_f64().unwrap_or_default())
}

async fn cart_detail(State(state): State<Arc<ServerState>>, headers: HeaderMap) -> Response {
    if state.broken.load(Ordering::SeqCst) {
        return bad_gateway();
    }
    let session = match session(&state, &headers) {
        Ok(session) => session,
        Err(rejection) => return rejection,
    };

    let carts = lock(&state.carts);
    let mut total = Decimal::ZERO;
    let items: Vec<Value> = carts
        .get(&session)
        .into_iter()
        .flatten()
        .filter_map(|(id, quantity)| {
            let product = state.catalog.get(id)?;
            let line_total = product.price * Decimal::from(*quantity);
            total += line_total;
            Some(json!({
                "product": {
                    "id": product.id,
                    "name": product.name,
                    "price": price(product.price),
                    "image": null,
                },
                "quantity": quantity,
                "total": price(line_total),
            }))
        })
        .collect();

    Json(json!({ "items": items, "total": price(total) })).into_response()
}

async fn add_to_cart(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if state.broken.load(Ordering::SeqCst) {
        return bad_gateway();
    }
    let session = match authorize_mutation(&state, &headers) {
        Ok(session) => session,
        Err(rejection) => return rejection,
    };

    let Ok(AddBody { quantity }) = serde_json::from_slice(&body) else {
        return error(StatusCode::BAD_REQUEST, "Invalid request body");
    };
    lock(&state.added_quantities).push(quantity);

    let Some(product) = state.catalog.get(&id) else {
        return error(StatusCode::NOT_FOUND, "Product not found");
    };

    if quantity == 0 {
        return error(StatusCode::BAD_REQUEST, "Quantity must be greater than 0");
    }
    // stock is checked per request, not against what is already in the cart
    if product.stock < quantity {
        return error(StatusCode::BAD_REQUEST, "Not enough stock available");
    }
    *lock(&state.carts)
        .entry(session)
        .or_default()
        .entry(id)
        .or_default() += quantity;

    Json(json!({ "message": "Product added to cart" })).into_response()
}

async fn remove_from_cart(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<i32>,
    headers: HeaderMap,
) -> Response {
    if state.broken.load(Ordering::SeqCst) {
        return bad_gateway();
    }
    let session = match authorize_mutation(&state, &headers) {
        Ok(session) => session,
        Err(rejection) => return rejection,
    };

    let removed = lock(&state.carts)
        .get_mut(&session)
        .and_then(|cart| cart.remove(&id));
    if removed.is_none() {
        return error(StatusCode::BAD_REQUEST, "Product not in cart");
    }

    Json(json!({ "message": "Product removed from cart" })).into_response()
}
