//! Type-safe price representation using decimal arithmetic.
//!
//! Totals arrive pre-computed from the cart service; this module only turns
//! them into display strings. Rupee amounts use South-Asian digit grouping
//! (the last three integer digits form one group, the rest are grouped in
//! pairs), so `1234567.5` renders as `₹12,34,567.50`.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Format for display, e.g. `₹1,23,456.78` or `$123,456.78`.
    ///
    /// The amount is rounded half away from zero to two places. A negative
    /// sign goes after the currency symbol.
    #[must_use]
    pub fn display(&self) -> String {
        let rounded = self
            .amount
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let fixed = format!("{:.2}", rounded.abs());
        let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

        let grouped = match self.currency_code {
            CurrencyCode::INR => group_digits(int_part, 3, 2),
            _ => group_digits(int_part, 3, 3),
        };
        let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
            "-"
        } else {
            ""
        };

        format!(
            "{}{sign}{grouped}.{frac_part}",
            self.currency_code.symbol()
        )
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.display())
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
    GBP,
}

impl CurrencyCode {
    /// Display symbol for the currency.
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::INR => "₹",
            Self::USD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }
}

/// Format a cart total in rupees.
///
/// A missing amount renders the same as zero: `₹0.00`.
///
/// ```
/// use bazaar_core::format_indian_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_indian_currency(None), "₹0.00");
/// assert_eq!(format_indian_currency(Some(Decimal::new(12_345_675, 1))), "₹12,34,567.50");
/// ```
#[must_use]
pub fn format_indian_currency(amount: Option<Decimal>) -> String {
    Price::new(amount.unwrap_or_default(), CurrencyCode::INR).display()
}

/// Insert commas into a run of ASCII digits, working from the right.
///
/// The rightmost group is `head` digits wide, every group after it `rest`.
fn group_digits(digits: &str, head: usize, rest: usize) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let mut groups: Vec<String> = Vec::new();
    let mut end = chars.len();
    let mut width = head;

    while end > 0 {
        let start = end.saturating_sub(width);
        groups.push(chars.get(start..end).unwrap_or_default().iter().collect());
        end = start;
        width = rest;
    }

    groups.reverse();
    groups.join(",")
}
