//! Cart line quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A positive number of units to add to the cart.
///
/// ## Constraints
///
/// - Always at least 1
/// - Parsed from free-form input with leading-integer semantics: `"3"`,
///   `" 3 "` and `"3 boxes"` all read as 3
///
/// ## Examples
///
/// ```
/// use bazaar_core::Quantity;
///
/// assert_eq!(Quantity::from_input(Some("4")).get(), 4);
/// assert_eq!(Quantity::from_input(Some("two")).get(), 1); // non-numeric
/// assert_eq!(Quantity::from_input(Some("-3")).get(), 1);  // clamped
/// assert_eq!(Quantity::from_input(None).get(), 1);        // no input on the page
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Create a quantity, returning `None` for zero.
    #[must_use]
    pub const fn new(value: u32) -> Option<Self> {
        if value == 0 { None } else { Some(Self(value)) }
    }

    /// Create a quantity from any integer, clamping into `1..=u32::MAX`.
    #[must_use]
    pub fn clamped(value: i64) -> Self {
        u32::try_from(value.max(1)).map_or(Self(u32::MAX), Self)
    }

    /// Read a quantity from the value of a quantity input.
    ///
    /// Absent or non-numeric input yields 1; zero and negative values are
    /// clamped to 1.
    #[must_use]
    pub fn from_input(value: Option<&str>) -> Self {
        value
            .and_then(parse_leading_int)
            .map_or(Self::ONE, Self::clamped)
    }

    /// Returns the number of units.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse the integer at the start of `s`, ignoring leading whitespace and
/// anything after the digits. Saturates instead of overflowing.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = s
        .strip_prefix('-')
        .map_or_else(|| (false, s.strip_prefix('+').unwrap_or(s)), |rest| (true, rest));

    let mut seen_digit = false;
    let mut value: i64 = 0;
    for ch in digits.chars() {
        let Some(d) = ch.to_digit(10) else { break };
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(i64::from(d));
    }

    seen_digit.then_some(if negative { -value } else { value })
}
