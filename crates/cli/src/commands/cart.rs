//! Cart commands.
//!
//! Each command builds an in-memory page carrying the usual cart chrome,
//! runs one controller operation against the configured cart service and
//! prints what the page looks like afterwards.
//!
//! # Environment Variables
//!
//! - `BAZAAR_API_BASE_URL` - Origin of the cart service
//! - `BAZAAR_CSRF_COOKIE` - Cookie holding the anti-forgery token

use std::sync::Arc;

use bazaar_core::ProductId;
use bazaar_storefront::page::Element;
use bazaar_storefront::{
    ActionOutcome, CartUiController, HttpCartService, MemoryPage, PageSelectors, StorefrontConfig,
};

use super::CommandError;

type Controller = CartUiController<HttpCartService, Arc<MemoryPage>>;

fn controller(config: &StorefrontConfig, cookies: &str) -> Result<Controller, CommandError> {
    let service = HttpCartService::new(&config.api)?;
    let selectors = PageSelectors::default();
    let page = Arc::new(MemoryPage::with_cart_layout(&selectors).with_cookies(cookies));
    tracing::debug!(base_url = %service.base_url(), "Cart service client ready");
    Ok(CartUiController::new(
        service,
        page,
        selectors,
        config.controller.clone(),
    ))
}

/// Add a product, reading the quantity the way a quantity input would.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the action fails.
pub async fn add(
    config: &StorefrontConfig,
    cookies: &str,
    product_id: ProductId,
    quantity: Option<&str>,
) -> Result<(), CommandError> {
    let controller = controller(config, cookies)?;
    if let Some(quantity) = quantity {
        controller.page().insert(
            &controller.selectors().quantity_input(product_id),
            Element::input(quantity),
        );
    }

    let outcome = controller.add_to_cart(product_id).await;
    print_page(&controller);
    finish(outcome)
}

/// Remove a product.
///
/// # Errors
///
/// Returns an error if the client cannot be built or the action fails.
pub async fn remove(
    config: &StorefrontConfig,
    cookies: &str,
    product_id: ProductId,
) -> Result<(), CommandError> {
    let controller = controller(config, cookies)?;
    let outcome = controller.remove_from_cart(product_id).await;
    print_page(&controller);
    finish(outcome)
}

/// Show the cart lines, badge and total.
///
/// # Errors
///
/// Returns an error if the cart cannot be fetched.
#[allow(clippy::print_stdout)]
pub async fn show(config: &StorefrontConfig, cookies: &str) -> Result<(), CommandError> {
    let controller = controller(config, cookies)?;
    let snapshot = controller.refresh_cart_total().await?;
    controller.refresh_cart_count().await?;

    for item in &snapshot.items {
        println!(
            "{:>3} x {} (#{})  {}",
            item.quantity,
            item.product.name,
            item.product.id,
            bazaar_core::format_indian_currency(Some(item.total)),
        );
    }
    print_page(&controller);
    Ok(())
}

fn finish(outcome: ActionOutcome) -> Result<(), CommandError> {
    match outcome {
        ActionOutcome::Completed | ActionOutcome::Skipped => Ok(()),
        ActionOutcome::Rejected(message) => Err(CommandError::ActionFailed(message)),
        ActionOutcome::Failed => Err(CommandError::ActionFailed(
            "request failed, see the log for details".to_owned(),
        )),
    }
}

#[allow(clippy::print_stdout)]
fn print_page(controller: &Controller) {
    let page = controller.page();
    let selectors = controller.selectors();

    // oldest first, the page keeps them newest first
    for node in page.alerts().iter().rev() {
        println!("[{}] {}", node.alert.severity, node.alert.message);
    }

    if let Some(badge) = page.element(&selectors.cart_count) {
        if badge.visible {
            println!("Items: {}", badge.text);
        } else {
            println!("Items: none");
        }
    }

    if let Some(total) = page.element(&selectors.cart_total)
        && !total.text.is_empty()
    {
        println!("Total: {}", total.text);
    }

    let checkout_disabled = page
        .element(&selectors.checkout_button)
        .is_some_and(|button| button.disabled);
    if checkout_disabled {
        println!("Your cart is empty.");
    }
}
