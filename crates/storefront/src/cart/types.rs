//! Cart service wire types.

use bazaar_core::{ProductId, format_indian_currency};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::{CartError, Result};

// =============================================================================
// Cart Types
// =============================================================================

/// Product details embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartProduct {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Image URL, if the product has one.
    #[serde(default)]
    pub image: Option<String>,
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartItem {
    /// The product this line is for.
    pub product: CartProduct,
    /// Units in the cart.
    pub quantity: u32,
    /// Line total, computed by the server.
    pub total: Decimal,
}

/// The server's view of the cart at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CartSnapshot {
    /// Cart lines in server order.
    #[serde(default)]
    pub items: Vec<CartItem>,
    /// Cart total, computed by the server.
    #[serde(default)]
    pub total: Option<Decimal>,
}

impl CartSnapshot {
    /// Number of lines (distinct products) in the cart.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The total as shown on the page, e.g. `₹1,23,456.78`.
    #[must_use]
    pub fn formatted_total(&self) -> String {
        format_indian_currency(self.total)
    }
}

// =============================================================================
// Mutation Responses
// =============================================================================

/// Body returned by the add and remove endpoints.
///
/// Success bodies may be empty (`{}`) or carry a `message`; rejections
/// carry an `error`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MutationResponse {
    /// Informational message on success.
    #[serde(default)]
    pub message: Option<String>,
    /// Rejection reason.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl MutationResponse {
    /// The rejection reason, if the server reported one.
    ///
    /// Empty strings, `false`, `0` and `null` do not count as errors.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self.error.as_ref()? {
            serde_json::Value::Null | serde_json::Value::Bool(false) => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) if n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON) => None,
            other => Some(other.to_string()),
        }
    }

    /// Turn a reported rejection into [`CartError::Server`].
    ///
    /// # Errors
    ///
    /// Returns `CartError::Server` when the body carries an error.
    pub fn into_result(self) -> Result<()> {
        self.error_message().map_or(Ok(()), |message| Err(CartError::Server(message)))
    }
}
