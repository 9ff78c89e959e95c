//! In-memory page.
//!
//! Holds nodes keyed by the exact selector the controller uses. Good enough
//! to drive the controller from tests and from the command line, and to
//! inspect what a browser page would look like afterwards.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{AlertId, AlertMessage, Page, PageSelectors};

/// A page node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub text: String,
    pub inner_html: Option<String>,
    pub value: Option<String>,
    pub visible: bool,
    pub disabled: bool,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            text: String::new(),
            inner_html: None,
            value: None,
            visible: true,
            disabled: false,
        }
    }
}

impl Element {
    /// An input holding `value`.
    #[must_use]
    pub fn input(value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// A node with text content.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// An alert inserted into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertNode {
    pub alert: AlertMessage,
    /// Container selector the alert was prepended to.
    pub container: String,
    /// Rendered markup, as a browser page would hold it.
    pub html: String,
    /// `false` once the fade-out has started.
    pub shown: bool,
}

#[derive(Debug, Default)]
struct PageState {
    cookies: String,
    elements: HashMap<String, Element>,
    /// Newest first, like nodes prepended to a container.
    alerts: Vec<AlertNode>,
}

/// A page kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageState>,
}

impl MemoryPage {
    /// An empty page with no cookies.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with the cart chrome every storefront page carries: badge,
    /// total, items container, checkout button and alert container.
    #[must_use]
    pub fn with_cart_layout(selectors: &PageSelectors) -> Self {
        Self::new()
            .with_element(&selectors.cart_count, Element::text("0"))
            .with_element(&selectors.cart_total, Element::text(""))
            .with_element(&selectors.cart_items, Element::default())
            .with_element(&selectors.checkout_button, Element::default())
            .with_element(&selectors.alert_container, Element::default())
    }

    /// Set the cookie string.
    #[must_use]
    pub fn with_cookies(self, cookies: impl Into<String>) -> Self {
        self.lock().cookies = cookies.into();
        self
    }

    /// Add or replace a node.
    #[must_use]
    pub fn with_element(self, selector: &str, element: Element) -> Self {
        self.insert(selector, element);
        self
    }

    /// Add or replace a node in place.
    pub fn insert(&self, selector: &str, element: Element) {
        self.lock().elements.insert(selector.to_string(), element);
    }

    /// A copy of a node, if present.
    #[must_use]
    pub fn element(&self, selector: &str) -> Option<Element> {
        self.lock().elements.get(selector).cloned()
    }

    /// Whether a node is present.
    #[must_use]
    pub fn contains(&self, selector: &str) -> bool {
        self.lock().elements.contains_key(selector)
    }

    /// Alerts currently on the page, newest first.
    #[must_use]
    pub fn alerts(&self) -> Vec<AlertNode> {
        self.lock().alerts.clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update(&self, selector: &str, f: impl FnOnce(&mut Element)) -> bool {
        self.lock().elements.get_mut(selector).map(f).is_some()
    }
}

impl Page for MemoryPage {
    fn cookies(&self) -> String {
        self.lock().cookies.clone()
    }

    fn input_value(&self, selector: &str) -> Option<String> {
        self.lock()
            .elements
            .get(selector)
            .and_then(|el| el.value.clone())
    }

    fn remove(&self, selector: &str) -> bool {
        self.lock().elements.remove(selector).is_some()
    }

    fn set_text(&self, selector: &str, text: &str) -> bool {
        self.update(selector, |el| {
            el.text = text.to_string();
            el.inner_html = None;
        })
    }

    fn set_visible(&self, selector: &str, visible: bool) -> bool {
        self.update(selector, |el| el.visible = visible)
    }

    fn set_inner_html(&self, selector: &str, html: &str) -> bool {
        self.update(selector, |el| el.inner_html = Some(html.to_string()))
    }

    fn set_disabled(&self, selector: &str, disabled: bool) -> bool {
        self.update(selector, |el| el.disabled = disabled)
    }

    fn prepend_alert(&self, container: &str, alert: &AlertMessage) -> bool {
        let html = match alert.render_html() {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!(error = %e, alert_id = %alert.id, "Failed to render alert");
                return false;
            }
        };

        let mut state = self.lock();
        if !state.elements.contains_key(container) {
            return false;
        }
        state.alerts.insert(
            0,
            AlertNode {
                alert: alert.clone(),
                container: container.to_string(),
                html,
                shown: true,
            },
        );
        true
    }

    fn hide_alert(&self, id: AlertId) -> bool {
        self.lock()
            .alerts
            .iter_mut()
            .find(|node| node.alert.id == id)
            .map(|node| node.shown = false)
            .is_some()
    }

    fn remove_alert(&self, id: AlertId) -> bool {
        let mut state = self.lock();
        let before = state.alerts.len();
        state.alerts.retain(|node| node.alert.id != id);
        state.alerts.len() != before
    }
}
