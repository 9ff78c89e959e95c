//! Cart UI controller.
//!
//! Binds shopper actions to cart service calls and keeps the badge, total
//! and alerts on the page in step with the server. Every action is an
//! independent async round trip; errors are handled here and never reach
//! the caller.

mod events;
mod in_flight;

pub use events::{ActionOutcome, ClickTarget, UiEvent};

use std::sync::Arc;

use bazaar_core::{AlertSeverity, ProductId, Quantity};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::cart::{CartService, CartSession, CartSnapshot};
use crate::config::ControllerConfig;
use crate::error::{CartError, Result, add_breadcrumb};
use crate::page::{AlertId, AlertMessage, Page, PageSelectors};

use in_flight::{CartAction, InFlight};

pub const ADDED_MESSAGE: &str = "Product added to cart!";
pub const REMOVED_MESSAGE: &str = "Product removed from cart!";
pub const EMPTY_CART_HTML: &str = r#"<p class="text-center">Your cart is empty.</p>"#;

// =============================================================================
// CartUiController
// =============================================================================

/// Drives the cart widgets on one page.
///
/// Cheaply cloneable via `Arc`; clones share the page, the service and the
/// in-flight bookkeeping.
pub struct CartUiController<S, P> {
    inner: Arc<ControllerInner<S, P>>,
}

struct ControllerInner<S, P> {
    service: S,
    page: P,
    selectors: PageSelectors,
    config: ControllerConfig,
    in_flight: InFlight,
}

impl<S, P> Clone for CartUiController<S, P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, P> CartUiController<S, P>
where
    S: CartService + 'static,
    P: Page + 'static,
{
    /// Create a controller bound to `page`.
    pub fn new(service: S, page: P, selectors: PageSelectors, config: ControllerConfig) -> Self {
        let in_flight = InFlight::new(config.dedupe_in_flight);
        Self {
            inner: Arc::new(ControllerInner {
                service,
                page,
                selectors,
                config,
                in_flight,
            }),
        }
    }

    /// The page this controller drives.
    #[must_use]
    pub fn page(&self) -> &P {
        &self.inner.page
    }

    /// The cart service this controller calls.
    #[must_use]
    pub fn service(&self) -> &S {
        &self.inner.service
    }

    /// The selectors this controller addresses the page with.
    #[must_use]
    pub fn selectors(&self) -> &PageSelectors {
        &self.inner.selectors
    }

    // =========================================================================
    // Event Entry Points
    // =========================================================================

    /// Run the action for `event` in the background.
    ///
    /// Returns immediately. Must be called within a Tokio runtime.
    pub fn dispatch(&self, event: UiEvent) -> JoinHandle<ActionOutcome> {
        let this = self.clone();
        tokio::spawn(async move {
            match event {
                UiEvent::PageLoaded => match this.refresh_cart_count().await {
                    Ok(_) => ActionOutcome::Completed,
                    Err(err) => {
                        err.report();
                        ActionOutcome::Failed
                    }
                },
                UiEvent::AddToCartClicked { product_id } => this.add_to_cart(product_id).await,
                UiEvent::RemoveFromCartClicked { product_id } => {
                    this.remove_from_cart(product_id).await
                }
            }
        })
    }

    /// Dispatch the event for a clicked element, if it is a cart button.
    pub fn on_click(&self, target: &ClickTarget) -> Option<JoinHandle<ActionOutcome>> {
        let event = UiEvent::from_click(target, &self.inner.selectors);
        if event.is_none() {
            debug!(?target, "Click on a non-cart element ignored");
        }
        event.map(|event| self.dispatch(event))
    }

    // =========================================================================
    // Cart Actions
    // =========================================================================

    /// Add a product to the cart.
    ///
    /// The quantity comes from the product's quantity input (1 when the input
    /// is missing or unreadable). On success the count badge is refreshed.
    #[instrument(skip(self))]
    pub async fn add_to_cart(&self, product_id: ProductId) -> ActionOutcome {
        let Some(_guard) = self.inner.in_flight.try_begin(CartAction::Add, product_id) else {
            debug!("Add already in flight, skipping");
            return ActionOutcome::Skipped;
        };

        let quantity = Quantity::from_input(
            self.inner
                .page
                .input_value(&self.inner.selectors.quantity_input(product_id))
                .as_deref(),
        );
        let (id_text, quantity_text) = (product_id.to_string(), quantity.to_string());
        add_breadcrumb(
            "cart",
            "Add to cart",
            Some(&[
                ("product_id", id_text.as_str()),
                ("quantity", quantity_text.as_str()),
            ]),
        );

        let session = self.session();
        match self
            .inner
            .service
            .add_item(product_id, quantity, &session)
            .await
        {
            Ok(()) => {
                info!(%quantity, "Added to cart");
                self.show_alert(AlertSeverity::Success, ADDED_MESSAGE);
                if let Err(err) = self.refresh_cart_count().await {
                    err.report();
                }
                ActionOutcome::Completed
            }
            Err(err) => self.fail(err),
        }
    }

    /// Remove a product from the cart.
    ///
    /// On success the product's cart line is removed from the page and the
    /// total and count are refreshed from one fresh snapshot.
    #[instrument(skip(self))]
    pub async fn remove_from_cart(&self, product_id: ProductId) -> ActionOutcome {
        let Some(_guard) = self
            .inner
            .in_flight
            .try_begin(CartAction::Remove, product_id)
        else {
            debug!("Remove already in flight, skipping");
            return ActionOutcome::Skipped;
        };

        let id_text = product_id.to_string();
        add_breadcrumb(
            "cart",
            "Remove from cart",
            Some(&[("product_id", id_text.as_str())]),
        );

        let session = self.session();
        match self
            .inner
            .service
            .remove_item(product_id, &session)
            .await
        {
            Ok(()) => {
                info!("Removed from cart");
                self.inner
                    .page
                    .remove(&self.inner.selectors.cart_item(product_id));
                self.show_alert(AlertSeverity::Success, REMOVED_MESSAGE);

                match self.inner.service.get_cart(&session).await {
                    Ok(snapshot) => {
                        self.apply_total(&snapshot);
                        self.apply_count(&snapshot);
                    }
                    Err(err) => err.report(),
                }
                ActionOutcome::Completed
            }
            Err(err) => self.fail(err),
        }
    }

    // =========================================================================
    // Cart Display
    // =========================================================================

    /// Fetch the cart and update the count badge.
    ///
    /// # Errors
    ///
    /// Returns the service error; the page is left untouched.
    #[instrument(skip(self))]
    pub async fn refresh_cart_count(&self) -> Result<CartSnapshot> {
        let snapshot = self.inner.service.get_cart(&self.session()).await?;
        self.apply_count(&snapshot);
        Ok(snapshot)
    }

    /// Fetch the cart and update the total, switching to the empty-cart
    /// state when nothing is left.
    ///
    /// # Errors
    ///
    /// Returns the service error; the page is left untouched.
    #[instrument(skip(self))]
    pub async fn refresh_cart_total(&self) -> Result<CartSnapshot> {
        let snapshot = self.inner.service.get_cart(&self.session()).await?;
        self.apply_total(&snapshot);
        Ok(snapshot)
    }

    /// Prepend an alert to the alert container and schedule its removal.
    ///
    /// Returns `None` when the page has no alert container. Must be called
    /// within a Tokio runtime.
    pub fn show_alert(&self, severity: AlertSeverity, message: &str) -> Option<AlertId> {
        let alert = AlertMessage::new(severity, message);
        let id = alert.id;

        if !self
            .inner
            .page
            .prepend_alert(&self.inner.selectors.alert_container, &alert)
        {
            warn!(
                container = %self.inner.selectors.alert_container,
                %message,
                "Alert container missing, alert not shown"
            );
            return None;
        }

        let this = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(this.inner.config.alert_visible).await;
            this.inner.page.hide_alert(id);
            tokio::time::sleep(this.inner.config.alert_fade).await;
            this.inner.page.remove_alert(id);
        });

        Some(id)
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn session(&self) -> CartSession {
        CartSession::from_cookies(&self.inner.page.cookies(), &self.inner.config.csrf_cookie)
    }

    fn apply_count(&self, snapshot: &CartSnapshot) {
        let selector = &self.inner.selectors.cart_count;
        let count = snapshot.item_count();
        if self.inner.page.set_text(selector, &count.to_string()) {
            self.inner.page.set_visible(selector, count > 0);
        }
    }

    fn apply_total(&self, snapshot: &CartSnapshot) {
        let selectors = &self.inner.selectors;
        self.inner
            .page
            .set_text(&selectors.cart_total, &snapshot.formatted_total());

        if snapshot.is_empty() {
            self.inner
                .page
                .set_inner_html(&selectors.cart_items, EMPTY_CART_HTML);
            self.inner.page.set_disabled(&selectors.checkout_button, true);
        }
    }

    fn fail(&self, err: CartError) -> ActionOutcome {
        err.report();
        self.show_alert(AlertSeverity::Danger, err.user_message());
        match err {
            CartError::Server(message) => ActionOutcome::Rejected(message),
            _ => ActionOutcome::Failed,
        }
    }
}
