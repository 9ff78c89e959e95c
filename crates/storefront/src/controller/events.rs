//! UI events and action outcomes.

use std::collections::{HashMap, HashSet};

use bazaar_core::ProductId;

use crate::page::PageSelectors;

/// Something the shopper did that the controller reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    /// The page finished loading.
    PageLoaded,
    /// An add-to-cart button was clicked.
    AddToCartClicked { product_id: ProductId },
    /// A remove-from-cart button was clicked.
    RemoveFromCartClicked { product_id: ProductId },
}

impl UiEvent {
    /// Translate a clicked element into an event.
    ///
    /// Returns `None` for elements that are not cart buttons or whose
    /// product ID attribute is missing or unparseable.
    #[must_use]
    pub fn from_click(target: &ClickTarget, selectors: &PageSelectors) -> Option<Self> {
        let product_id = target
            .attributes
            .get(&selectors.product_id_attribute)?
            .parse::<ProductId>()
            .ok()?;

        if target.classes.contains(&selectors.add_button_class) {
            Some(Self::AddToCartClicked { product_id })
        } else if target.classes.contains(&selectors.remove_button_class) {
            Some(Self::RemoveFromCartClicked { product_id })
        } else {
            None
        }
    }
}

/// The element a click landed on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickTarget {
    pub classes: HashSet<String>,
    pub attributes: HashMap<String, String>,
}

impl ClickTarget {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.insert(class.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// How a controller action ended.
///
/// Errors never escape the controller; this is all a caller learns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The action went through and the page was updated.
    Completed,
    /// The server rejected the action; carries its message.
    Rejected(String),
    /// The request failed; a generic alert was shown.
    Failed,
    /// An identical request was already in flight.
    Skipped,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(class: &str, id: &str) -> ClickTarget {
        ClickTarget::new()
            .with_class("btn")
            .with_class(class)
            .with_attribute("data-product-id", id)
    }

    #[test]
    fn test_add_and_remove_buttons() {
        let selectors = PageSelectors::default();
        assert_eq!(
            UiEvent::from_click(&button("add-to-cart-btn", "7"), &selectors),
            Some(UiEvent::AddToCartClicked {
                product_id: ProductId::new(7)
            })
        );
        assert_eq!(
            UiEvent::from_click(&button("remove-from-cart-btn", "7"), &selectors),
            Some(UiEvent::RemoveFromCartClicked {
                product_id: ProductId::new(7)
            })
        );
    }

    #[test]
    fn test_other_elements_yield_nothing() {
        let selectors = PageSelectors::default();
        assert_eq!(UiEvent::from_click(&button("btn-primary", "7"), &selectors), None);
        assert_eq!(
            UiEvent::from_click(&button("add-to-cart-btn", "seven"), &selectors),
            None
        );
        assert_eq!(
            UiEvent::from_click(&ClickTarget::new().with_class("add-to-cart-btn"), &selectors),
            None
        );
    }
}
