//! End-to-end cart flows: controller + HTTP client against the stand-in
//! cart service.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use bazaar_core::{AlertSeverity, ProductId};
use bazaar_integration_tests::{CatalogProduct, StubCartServer};
use bazaar_storefront::error::GENERIC_FAILURE_MESSAGE;
use bazaar_storefront::page::Element;
use bazaar_storefront::{
    ActionOutcome, CartApiConfig, CartService, CartUiController, ClickTarget, ControllerConfig,
    CartSession, HttpCartService, MemoryPage, PageSelectors, UiEvent,
};
use rust_decimal::Decimal;

type Controller = CartUiController<HttpCartService, Arc<MemoryPage>>;

const SESSION: &str = "s1";
const COOKIES: &str = "sessionid=s1; csrftoken=t";

fn product(id: i32, name: &str, price: &str, stock: u32) -> CatalogProduct {
    CatalogProduct::new(id, name, price.parse::<Decimal>().unwrap(), stock)
}

fn controller(server: &StubCartServer, cookies: &str) -> Controller {
    let service = HttpCartService::new(&CartApiConfig::new(server.base_url().unwrap())).unwrap();
    let selectors = PageSelectors::default();
    let page = Arc::new(MemoryPage::with_cart_layout(&selectors).with_cookies(cookies));
    CartUiController::new(service, page, selectors, ControllerConfig::default())
}

#[tokio::test]
async fn test_add_to_cart_updates_badge() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .in_cart(SESSION, 2, 1)
        .product(product(2, "Filter Coffee", "180", 10))
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, "sessionid=s1; csrftoken=tok%2Babc");
    ctl.page().insert("#quantity-1", Element::input("3"));

    let outcome = ctl.add_to_cart(ProductId::new(1)).await;

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(server.cart(SESSION), vec![(1, 3), (2, 1)]);
    assert_eq!(server.added_quantities(), vec![3]);
    assert_eq!(server.csrf_tokens(), vec![Some("tok+abc".to_string())]);

    let page = ctl.page();
    let badge = page.element(".cart-count").unwrap();
    assert_eq!(badge.text, "2");
    assert!(badge.visible);

    let alerts = page.alerts();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].alert.severity, AlertSeverity::Success);
    assert_eq!(alerts[0].alert.message, "Product added to cart!");
}

#[tokio::test]
async fn test_unparseable_quantity_adds_one() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, COOKIES);
    ctl.page().insert("#quantity-1", Element::input("many"));

    ctl.add_to_cart(ProductId::new(1)).await;
    ctl.add_to_cart(ProductId::new(1)).await;

    assert_eq!(server.added_quantities(), vec![1, 1]);
    assert_eq!(server.cart(SESSION), vec![(1, 2)]);
}

#[tokio::test]
async fn test_server_rejection_is_shown_verbatim() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 2))
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, COOKIES);
    ctl.page().insert("#quantity-1", Element::input("5"));

    let outcome = ctl.add_to_cart(ProductId::new(1)).await;

    assert_eq!(
        outcome,
        ActionOutcome::Rejected("Not enough stock available".to_string())
    );
    let alerts = ctl.page().alerts();
    assert_eq!(alerts[0].alert.severity, AlertSeverity::Danger);
    assert_eq!(alerts[0].alert.message, "Not enough stock available");
    assert_eq!(ctl.page().element(".cart-count").unwrap().text, "0");
    assert!(server.cart(SESSION).is_empty());
}

#[tokio::test]
async fn test_unknown_product_is_rejected() {
    let server = StubCartServer::builder().start().await.unwrap();
    let ctl = controller(&server, COOKIES);

    assert_eq!(
        ctl.add_to_cart(ProductId::new(99)).await,
        ActionOutcome::Rejected("Product not found".to_string())
    );
}

#[tokio::test]
async fn test_requests_carry_page_cookies() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, "sessionid=s1; csrftoken=t; theme=dark");

    ctl.add_to_cart(ProductId::new(1)).await;

    let sent = Some("sessionid=s1; csrftoken=t; theme=dark".to_string());
    // the add, then the badge refresh
    assert_eq!(server.cookie_headers(), vec![sent.clone(), sent]);
    assert_eq!(ctl.page().element(".cart-count").unwrap().text, "1");
}

#[tokio::test]
async fn test_missing_token_cookie_is_rejected_by_server() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, "sessionid=s1");

    let outcome = ctl.add_to_cart(ProductId::new(1)).await;

    assert_eq!(
        outcome,
        ActionOutcome::Rejected("CSRF verification failed".to_string())
    );
    assert_eq!(server.csrf_tokens(), vec![None]);
    assert!(server.cart(SESSION).is_empty());
    assert_eq!(ctl.page().alerts()[0].alert.severity, AlertSeverity::Danger);
}

#[tokio::test]
async fn test_missing_session_cookie_is_rejected_by_server() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, "csrftoken=t");

    let outcome = ctl.add_to_cart(ProductId::new(1)).await;

    assert_eq!(
        outcome,
        ActionOutcome::Rejected("Authentication credentials were not provided.".to_string())
    );
    assert!(server.added_quantities().is_empty());
}

#[tokio::test]
async fn test_carts_are_kept_per_session() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .product(product(2, "Filter Coffee", "180", 10))
        .in_cart("s2", 2, 5)
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, COOKIES);

    ctl.add_to_cart(ProductId::new(1)).await;

    assert_eq!(server.cart(SESSION), vec![(1, 1)]);
    assert_eq!(server.cart("s2"), vec![(2, 5)]);
    assert_eq!(ctl.page().element(".cart-count").unwrap().text, "1");
}

#[tokio::test]
async fn test_remove_updates_total_and_count() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .product(product(2, "Filter Coffee", "1234567.5", 10))
        .in_cart(SESSION, 1, 1)
        .in_cart(SESSION, 2, 1)
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, COOKIES);
    ctl.page().insert("#cart-item-1", Element::default());
    ctl.page().insert("#cart-item-2", Element::default());

    let outcome = ctl.remove_from_cart(ProductId::new(1)).await;

    assert_eq!(outcome, ActionOutcome::Completed);
    assert_eq!(server.cart(SESSION), vec![(2, 1)]);

    let page = ctl.page();
    assert!(!page.contains("#cart-item-1"));
    assert!(page.contains("#cart-item-2"));
    assert_eq!(page.element(".cart-total").unwrap().text, "₹12,34,567.50");
    assert_eq!(page.element(".cart-count").unwrap().text, "1");
    assert!(!page.element(".checkout-btn").unwrap().disabled);
    assert_eq!(page.alerts()[0].alert.message, "Product removed from cart!");
}

#[tokio::test]
async fn test_removing_last_item_shows_empty_cart() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .in_cart(SESSION, 1, 2)
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, COOKIES);
    ctl.page().insert("#cart-item-1", Element::default());

    ctl.remove_from_cart(ProductId::new(1)).await;

    let page = ctl.page();
    assert_eq!(page.element(".cart-total").unwrap().text, "₹0.00");
    assert_eq!(
        page.element(".cart-items").unwrap().inner_html.as_deref(),
        Some(r#"<p class="text-center">Your cart is empty.</p>"#)
    );
    assert!(page.element(".checkout-btn").unwrap().disabled);
    let badge = page.element(".cart-count").unwrap();
    assert_eq!(badge.text, "0");
    assert!(!badge.visible);
}

#[tokio::test]
async fn test_remove_missing_product_is_rejected() {
    let server = StubCartServer::builder().start().await.unwrap();
    let ctl = controller(&server, COOKIES);
    ctl.page().insert("#cart-item-5", Element::default());

    let outcome = ctl.remove_from_cart(ProductId::new(5)).await;

    assert_eq!(
        outcome,
        ActionOutcome::Rejected("Product not in cart".to_string())
    );
    assert!(ctl.page().contains("#cart-item-5"));
}

#[tokio::test]
async fn test_html_error_page_shows_generic_alert() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .start()
        .await
        .unwrap();
    server.set_broken(true);
    let ctl = controller(&server, COOKIES);

    let outcome = ctl.add_to_cart(ProductId::new(1)).await;

    assert_eq!(outcome, ActionOutcome::Failed);
    let alerts = ctl.page().alerts();
    assert_eq!(alerts[0].alert.severity, AlertSeverity::Danger);
    assert_eq!(alerts[0].alert.message, GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_unreachable_service_fails_without_panicking() {
    // grab a free port, then release it so nothing is listening
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let base_url = format!("http://{addr}/").parse().unwrap();
    let service = HttpCartService::new(&CartApiConfig::new(base_url)).unwrap();
    let selectors = PageSelectors::default();
    let page = Arc::new(MemoryPage::with_cart_layout(&selectors).with_cookies(COOKIES));
    let ctl = CartUiController::new(service, page, selectors, ControllerConfig::default());

    let outcome = ctl.add_to_cart(ProductId::new(1)).await;

    assert_eq!(outcome, ActionOutcome::Failed);
    assert_eq!(ctl.page().alerts()[0].alert.message, GENERIC_FAILURE_MESSAGE);
}

#[tokio::test]
async fn test_page_load_and_click_dispatch() {
    let server = StubCartServer::builder()
        .product(product(3, "Cardamom", "75", 10))
        .in_cart(SESSION, 3, 4)
        .start()
        .await
        .unwrap();
    let ctl = controller(&server, COOKIES);

    let loaded = ctl.dispatch(UiEvent::PageLoaded).await.unwrap();
    assert_eq!(loaded, ActionOutcome::Completed);
    assert_eq!(ctl.page().element(".cart-count").unwrap().text, "1");

    let click = ClickTarget::new()
        .with_class("btn")
        .with_class("remove-from-cart-btn")
        .with_attribute("data-product-id", "3");
    let removed = ctl.on_click(&click).unwrap().await.unwrap();

    assert_eq!(removed, ActionOutcome::Completed);
    assert!(server.cart(SESSION).is_empty());
    assert_eq!(ctl.page().element(".cart-total").unwrap().text, "₹0.00");
}

#[tokio::test]
async fn test_client_reads_cart_snapshot() {
    let server = StubCartServer::builder()
        .product(product(1, "Masala Chai", "249.50", 10))
        .in_cart(SESSION, 1, 2)
        .start()
        .await
        .unwrap();
    let service = HttpCartService::new(&CartApiConfig::new(server.base_url().unwrap())).unwrap();

    let session = CartSession::from_cookies(COOKIES, "csrftoken");

    let snapshot = service.get_cart(&session).await.unwrap();

    assert_eq!(snapshot.item_count(), 1);
    assert_eq!(snapshot.items[0].quantity, 2);
    assert_eq!(snapshot.items[0].product.name, "Masala Chai");
    assert_eq!(snapshot.total, Some("499".parse().unwrap()));
    assert_eq!(snapshot.formatted_total(), "₹499.00");
}
