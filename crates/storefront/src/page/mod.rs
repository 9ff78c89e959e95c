//! Page access for the cart UI.
//!
//! The controller never reaches into a global document. It is handed a
//! [`Page`] and a set of [`PageSelectors`] when it is built and addresses
//! every node through them, so the same controller runs against a browser
//! binding or the in-memory [`MemoryPage`].

mod alert;
mod memory;

pub use alert::{AlertId, AlertMessage};
pub use memory::{AlertNode, Element, MemoryPage};

use std::sync::Arc;

use bazaar_core::ProductId;

/// Mutable view of the page the cart UI lives on.
///
/// Every mutator returns `false` when the addressed node does not exist;
/// missing nodes are never an error.
pub trait Page: Send + Sync {
    /// The raw `document.cookie` string.
    fn cookies(&self) -> String;

    /// Current value of an input, if the input exists.
    fn input_value(&self, selector: &str) -> Option<String>;

    /// Remove a node from the page.
    fn remove(&self, selector: &str) -> bool;

    /// Replace a node's text content.
    fn set_text(&self, selector: &str, text: &str) -> bool;

    /// Show or hide a node.
    fn set_visible(&self, selector: &str, visible: bool) -> bool;

    /// Replace a node's children with markup.
    fn set_inner_html(&self, selector: &str, html: &str) -> bool;

    /// Enable or disable a control.
    fn set_disabled(&self, selector: &str, disabled: bool) -> bool;

    /// Insert an alert as the first child of `container`.
    fn prepend_alert(&self, container: &str, alert: &AlertMessage) -> bool;

    /// Start an alert's fade-out by dropping its `show` class.
    fn hide_alert(&self, id: AlertId) -> bool;

    /// Detach an alert from the page.
    fn remove_alert(&self, id: AlertId) -> bool;
}

impl<P: Page + ?Sized> Page for Arc<P> {
    fn cookies(&self) -> String {
        (**self).cookies()
    }

    fn input_value(&self, selector: &str) -> Option<String> {
        (**self).input_value(selector)
    }

    fn remove(&self, selector: &str) -> bool {
        (**self).remove(selector)
    }

    fn set_text(&self, selector: &str, text: &str) -> bool {
        (**self).set_text(selector, text)
    }

    fn set_visible(&self, selector: &str, visible: bool) -> bool {
        (**self).set_visible(selector, visible)
    }

    fn set_inner_html(&self, selector: &str, html: &str) -> bool {
        (**self).set_inner_html(selector, html)
    }

    fn set_disabled(&self, selector: &str, disabled: bool) -> bool {
        (**self).set_disabled(selector, disabled)
    }

    fn prepend_alert(&self, container: &str, alert: &AlertMessage) -> bool {
        (**self).prepend_alert(container, alert)
    }

    fn hide_alert(&self, id: AlertId) -> bool {
        (**self).hide_alert(id)
    }

    fn remove_alert(&self, id: AlertId) -> bool {
        (**self).remove_alert(id)
    }
}

/// The selectors the controller expects the page to provide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSelectors {
    /// Prefix of a product's quantity input; the product ID is appended.
    pub quantity_input_prefix: String,
    /// Prefix of a cart line node; the product ID is appended.
    pub cart_item_prefix: String,
    /// Cart count badge.
    pub cart_count: String,
    /// Cart total display.
    pub cart_total: String,
    /// Container holding the cart lines.
    pub cart_items: String,
    /// Checkout control.
    pub checkout_button: String,
    /// Container alerts are prepended to.
    pub alert_container: String,
    /// Class marking add-to-cart buttons.
    pub add_button_class: String,
    /// Class marking remove-from-cart buttons.
    pub remove_button_class: String,
    /// Attribute carrying the product ID on buttons.
    pub product_id_attribute: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            quantity_input_prefix: "#quantity-".to_string(),
            cart_item_prefix: "#cart-item-".to_string(),
            cart_count: ".cart-count".to_string(),
            cart_total: ".cart-total".to_string(),
            cart_items: ".cart-items".to_string(),
            checkout_button: ".checkout-btn".to_string(),
            alert_container: ".container".to_string(),
            add_button_class: "add-to-cart-btn".to_string(),
            remove_button_class: "remove-from-cart-btn".to_string(),
            product_id_attribute: "data-product-id".to_string(),
        }
    }
}

impl PageSelectors {
    /// Selector of the quantity input for a product.
    #[must_use]
    pub fn quantity_input(&self, product_id: ProductId) -> String {
        format!("{}{product_id}", self.quantity_input_prefix)
    }

    /// Selector of the cart line node for a product.
    #[must_use]
    pub fn cart_item(&self, product_id: ProductId) -> String {
        format!("{}{product_id}", self.cart_item_prefix)
    }
}
