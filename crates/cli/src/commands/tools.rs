//! Standalone helpers: price formatting and cookie lookup.

use bazaar_core::{format_indian_currency, get_cookie};
use rust_decimal::Decimal;

use super::CommandError;

/// Print `amount` formatted as the cart total would show it.
#[allow(clippy::print_stdout)]
pub fn price(amount: Decimal) {
    println!("{}", format_indian_currency(Some(amount)));
}

/// Print the decoded value of cookie `name`.
///
/// # Errors
///
/// Returns `CookieNotFound` if the cookie string has no such cookie.
#[allow(clippy::print_stdout)]
pub fn cookie(name: &str, cookies: &str) -> Result<(), CommandError> {
    let value = get_cookie(cookies, name).ok_or_else(|| CommandError::CookieNotFound(name.to_owned()))?;
    println!("{value}");
    Ok(())
}
