//! The checkout wizard over HTTP: step gating, totals, card handling and
//! order placement.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use devico_integration_tests::{TestServer, test_config};
use reqwest::StatusCode;

const CUSTOMER: [(&str, &str); 5] = [
    ("first_name", "Rupa"),
    ("last_name", "Das"),
    ("email", "rupa@example.com"),
    ("phone", "305-555-0123"),
    ("shipping_method", "standard"),
];

const ADDRESS: [(&str, &str); 6] = [
    ("shipping_street", "12 Ocean Dr"),
    ("shipping_city", "Miami"),
    ("shipping_state", "FL"),
    ("shipping_zip_code", "33139"),
    ("shipping_country", "US"),
    ("same_as_shipping", "on"),
];

const PAYMENT: [(&str, &str); 4] = [
    ("card_number", "4111 1111 1111 1111"),
    ("expiry_date", "12/27"),
    ("cvv", "123"),
    ("cardholder_name", "Rupa Das"),
];

/// A dress and two linen shirts: $199.00 before shipping and tax.
async fn fill_cart(server: &TestServer) {
    server.add_to_cart(1).await;
    server.add_to_cart(3).await;
    server.add_to_cart(3).await;
}

async fn advance(server: &TestServer, form: &[(&str, &str)]) {
    let resp = server.post_raw("/checkout/next", form).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER, "step was refused");
    assert_eq!(resp.headers()["location"], "/checkout");
}

async fn reach_review(server: &TestServer) {
    fill_cart(server).await;
    advance(server, &CUSTOMER).await;
    advance(server, &ADDRESS).await;
    advance(server, &PAYMENT).await;
}

// =============================================================================
// Empty cart
// =============================================================================

#[tokio::test]
async fn test_checkout_with_empty_cart_shows_empty_state() {
    let server = TestServer::spawn().await;
    let page = server.page("/checkout").await;
    assert!(page.contains("Your cart is empty"));
    assert!(page.contains("Continue Shopping"));
    assert!(!page.contains("Contact Information"));

    let resp = server.post_raw("/checkout/next", &CUSTOMER).await;
    assert_eq!(resp.headers()["location"], "/checkout");
}

// =============================================================================
// Step gating
// =============================================================================

#[tokio::test]
async fn test_customer_step_requires_every_field() {
    let server = TestServer::spawn().await;
    fill_cart(&server).await;

    let resp = server
        .post_raw("/checkout/next", &[("first_name", "Rupa")])
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Last name is required"));
    assert!(body.contains("Email is required"));
    assert!(body.contains("Phone number is required"));
    assert!(!body.contains("First name is required"));
    // Typed values are kept
    assert!(body.contains("value=\"Rupa\""));

    let resp = server
        .post_raw(
            "/checkout/next",
            &[
                ("first_name", "Rupa"),
                ("last_name", "Das"),
                ("email", "rupa@example"),
                ("phone", "305-555-0123"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(
        resp.text()
            .await
            .unwrap()
            .contains("Please enter a valid email address")
    );
}

#[tokio::test]
async fn test_address_step_requires_billing_unless_same() {
    let server = TestServer::spawn().await;
    fill_cart(&server).await;
    advance(&server, &CUSTOMER).await;
    assert!(server.page("/checkout").await.contains("name=\"shipping_street\""));

    let shipping_only = ADDRESS.get(..5).unwrap();
    let resp = server.post_raw("/checkout/next", shipping_only).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Street address is required"));
    assert!(body.contains("ZIP code is required"));

    advance(&server, &ADDRESS).await;
    assert!(server.page("/checkout").await.contains("Payment Details"));
}

#[tokio::test]
async fn test_payment_step_rejects_bad_card() {
    let server = TestServer::spawn().await;
    fill_cart(&server).await;
    advance(&server, &CUSTOMER).await;
    advance(&server, &ADDRESS).await;

    let resp = server
        .post_raw(
            "/checkout/next",
            &[
                ("card_number", "4111-1111"),
                ("expiry_date", "1"),
                ("cvv", "12"),
                ("cardholder_name", "Rupa Das"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Please enter a valid 16-digit card number"));
    assert!(body.contains("Please enter date in MM/YY format"));
    assert!(body.contains("Please enter a valid CVV"));
    assert!(!body.contains("4111-1111"));
}

#[tokio::test]
async fn test_previous_on_first_step_stays_put() {
    let server = TestServer::spawn().await;
    fill_cart(&server).await;

    let resp = server.post_raw("/checkout/previous", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(server.page("/checkout").await.contains("Contact Information"));
}

#[tokio::test]
async fn test_previous_keeps_entered_values() {
    let server = TestServer::spawn().await;
    fill_cart(&server).await;
    advance(&server, &CUSTOMER).await;

    server.post_raw("/checkout/previous", &[]).await;
    let page = server.page("/checkout").await;
    assert!(page.contains("Contact Information"));
    assert!(page.contains("value=\"rupa@example.com\""));
}

// =============================================================================
// Review
// =============================================================================

#[tokio::test]
async fn test_review_shows_totals_and_masked_card() {
    let server = TestServer::spawn().await;
    reach_review(&server).await;

    let page = server.page("/checkout").await;
    assert!(page.contains("Review Your Order"));
    assert!(page.contains("$199.00"));
    assert!(page.contains("$8.00"));
    assert!(page.contains("$15.92"));
    assert!(page.contains("$222.92"));
    assert!(page.contains("•••• •••• •••• 1111"));
    assert!(!page.contains("4111 1111 1111 1111"));
    assert!(!page.contains("4111111111111111"));
    assert!(page.contains("Same as shipping address"));
}

#[tokio::test]
async fn test_shipping_method_changes_totals() {
    let server = TestServer::spawn().await;
    fill_cart(&server).await;

    let mut customer = CUSTOMER;
    customer[4] = ("shipping_method", "overnight");
    advance(&server, &customer).await;

    let page = server.page("/checkout").await;
    assert!(page.contains("Shipping (Overnight Shipping)"));
    assert!(page.contains("$25.00"));
    assert!(page.contains("$239.92"));
}

#[tokio::test]
async fn test_card_is_kept_but_never_echoed() {
    let server = TestServer::spawn().await;
    reach_review(&server).await;

    server.post_raw("/checkout/previous", &[]).await;
    let page = server.page("/checkout").await;
    assert!(page.contains("Payment Details"));
    assert!(page.contains("Card on file: •••• •••• •••• 1111"));
    assert!(!page.contains("4111 1111 1111 1111"));
    assert!(!page.contains("value=\"123\""));

    advance(
        &server,
        &[
            ("card_number", ""),
            ("expiry_date", "12/27"),
            ("cvv", ""),
            ("cardholder_name", "Rupa Das"),
        ],
    )
    .await;
    assert!(server.page("/checkout").await.contains("Review Your Order"));
}

// =============================================================================
// Placing the order
// =============================================================================

#[tokio::test]
async fn test_place_order_requires_review_step() {
    let server = TestServer::spawn().await;
    fill_cart(&server).await;
    advance(&server, &CUSTOMER).await;

    let resp = server.post_raw("/checkout/place-order", &[]).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    assert_eq!(server.cart_count().await, 3);
}

#[tokio::test]
async fn test_place_order_empties_cart_and_confirms_once() {
    let server = TestServer::spawn().await;
    reach_review(&server).await;

    let resp = server.post_raw("/checkout/place-order", &[]).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/checkout/complete");

    let page = server.page("/checkout/complete").await;
    assert!(page.contains("Order placed successfully!"));
    assert!(page.contains("Order <strong>DV-"));
    assert!(page.contains("$222.92"));
    assert!(page.contains("rupa@example.com"));

    assert_eq!(server.cart_count().await, 0);
    let again = server.page("/checkout/complete").await;
    assert!(!again.contains("Thank you!"));
    assert!(server.page("/checkout").await.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_contact_details_survive_a_completed_order() {
    let server = TestServer::spawn().await;
    reach_review(&server).await;
    server.post("/checkout/place-order", &[]).await;

    server.add_to_cart(2).await;
    let page = server.page("/checkout").await;
    assert!(page.contains("Contact Information"));
    assert!(page.contains("value=\"Rupa\""));
    assert!(!page.contains("Card on file"));
}

#[tokio::test]
async fn test_concurrent_submissions_are_refused() {
    let server = TestServer::spawn_with(devico_storefront::config::StorefrontConfig {
        order_delay: Duration::from_millis(300),
        ..test_config()
    })
    .await;
    reach_review(&server).await;

    let (first, second) = tokio::join!(
        server.post_raw("/checkout/place-order", &[]),
        server.post_raw("/checkout/place-order", &[]),
    );
    let mut statuses = [first.status(), second.status()];
    statuses.sort_by_key(StatusCode::as_u16);
    assert_eq!(statuses, [StatusCode::SEE_OTHER, StatusCode::CONFLICT]);
    assert_eq!(server.cart_count().await, 0);
}

#[tokio::test]
async fn test_cart_emptied_while_processing_fails_the_order() {
    let server = TestServer::spawn_with(devico_storefront::config::StorefrontConfig {
        order_delay: Duration::from_millis(400),
        ..test_config()
    })
    .await;
    reach_review(&server).await;

    let (placed, emptied) = tokio::join!(server.post_raw("/checkout/place-order", &[]), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        server.post_raw("/cart/empty/confirm", &[]).await
    });
    assert_eq!(emptied.status(), StatusCode::SEE_OTHER);
    assert_eq!(placed.status(), StatusCode::SEE_OTHER);
    assert_eq!(placed.headers()["location"], "/checkout");

    assert_eq!(server.cart_count().await, 0);
    let page = server.page("/checkout").await;
    assert!(page.contains("Order failed. Please try again."));
    assert!(page.contains("Your cart is empty"));
    assert!(!server.page("/").await.contains("Thank you!"));
}
