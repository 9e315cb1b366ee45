//! Pages, overlays, headers and base-path mounting.

#![allow(clippy::unwrap_used)]

use devico_core::BasePath;
use devico_integration_tests::{TestServer, test_config};
use devico_storefront::config::StorefrontConfig;
use reqwest::StatusCode;

// =============================================================================
// Pages
// =============================================================================

#[tokio::test]
async fn test_health() {
    let server = TestServer::spawn().await;
    let resp = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");
}

#[tokio::test]
async fn test_home_renders_sections() {
    let server = TestServer::spawn().await;
    let page = server.page("/").await;
    assert!(page.contains("Elegance"));
    assert!(page.contains("Crafted for you:"));
    assert!(page.contains("Floral Dress"));
    assert!(page.contains("$89.00"));
    assert!(page.contains("Reviews from our customers:"));
    assert!(page.contains("data-upper-threshold=\"0.25\""));
    assert!(page.contains("data-snap-active=\"true\""));
}

#[tokio::test]
async fn test_unknown_paths_render_home() {
    let server = TestServer::spawn().await;
    let resp = server
        .client
        .get(server.url("/no/such/page"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let page = resp.text().await.unwrap();
    assert!(page.contains("Crafted for you:"));
}

#[tokio::test]
async fn test_trailing_slash_is_home_throughout() {
    let server = TestServer::spawn().await;
    let page = server.page("/about/?menu=open").await;
    assert!(page.contains("<title>Home | DevīCo</title>"));
    assert!(page.contains("Crafted for you:"));
    assert!(page.contains("<a href=\"/\" aria-current=\"page\">Home</a>"));
    assert!(!page.contains("aria-current=\"page\">About</a>"));
}

#[tokio::test]
async fn test_photo_carousel_selection() {
    let server = TestServer::spawn().await;
    let page = server.page("/?photo=1").await;
    assert!(page.contains("<span>Contemporary</span>"));
    assert!(page.contains("?photo=0#photos"));
    assert!(page.contains("?photo=2#photos"));

    let page = server.page("/?photo=99").await;
    assert!(page.contains("<span>Signature</span>"));
}

#[tokio::test]
async fn test_about_timeline_selection() {
    let server = TestServer::spawn().await;
    let page = server.page("/about").await;
    assert!(page.contains("Our Journey"));
    assert!(page.contains("2023: Company Founded"));
    assert!(page.contains("data-snap-active=\"false\""));

    let page = server.page("/about?milestone=2").await;
    assert!(page.contains("2025: Global Expansion"));
}

// =============================================================================
// Overlays
// =============================================================================

#[tokio::test]
async fn test_menu_overlay_marks_current_page() {
    let server = TestServer::spawn().await;
    let closed = server.page("/about").await;
    assert!(!closed.contains("aria-label=\"Main menu\""));

    let open = server.page("/about?menu=open").await;
    assert!(open.contains("aria-label=\"Main menu\""));
    assert!(open.contains("<a href=\"/about\" aria-current=\"page\">About</a>"));
    assert!(open.contains("class=\"scroll-locked\""));
}

#[tokio::test]
async fn test_cart_drawer_opens_from_query() {
    let server = TestServer::spawn().await;
    assert!(!server.page("/").await.contains("aria-label=\"Shopping cart\""));
    let page = server.page("/?cart=open").await;
    assert!(page.contains("aria-label=\"Shopping cart\""));
    assert!(page.contains("Your cart is empty"));
}

// =============================================================================
// Sign in / sign up
// =============================================================================

#[tokio::test]
async fn test_signin_validation_and_redirect() {
    let server = TestServer::spawn().await;

    let resp = server.post_raw("/signin", &[("email", "not-an-email")]).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Please enter a valid email address"));
    assert!(body.contains("Password is required"));
    assert!(body.contains("value=\"not-an-email\""));

    let resp = server
        .post_raw(
            "/signin",
            &[("email", "rupa@example.com"), ("password", "anything")],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()["location"], "/");
}

#[tokio::test]
async fn test_signup_validation() {
    let server = TestServer::spawn().await;
    let resp = server
        .post_raw(
            "/signup",
            &[
                ("first_name", "Rupa"),
                ("last_name", "Das"),
                ("email", "rupa@example.com"),
                ("password", "Sunlight1"),
                ("confirm_password", "Sunlight2"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = resp.text().await.unwrap();
    assert!(body.contains("Passwords do not match"));
    assert!(body.contains("You must accept the terms and conditions"));
    assert!(body.contains("Password strength: Good"));
    assert!(!body.contains("Sunlight1"));
}

#[tokio::test]
async fn test_signup_then_signin_notice() {
    let server = TestServer::spawn().await;
    let resp = server
        .post(
            "/signup",
            &[
                ("first_name", "Rupa"),
                ("last_name", "Das"),
                ("email", "rupa@example.com"),
                ("password", "Sunlight1!"),
                ("confirm_password", "Sunlight1!"),
                ("accept_terms", "on"),
            ],
        )
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.url().path().ends_with("/signin"));
    let body = resp.text().await.unwrap();
    assert!(body.contains("Account created successfully! Please sign in."));
    assert!(body.contains("Welcome Back"));
}

// =============================================================================
// Headers and static files
// =============================================================================

#[tokio::test]
async fn test_security_and_request_id_headers() {
    let server = TestServer::spawn().await;
    let resp = server.client.get(server.url("/")).send().await.unwrap();
    let headers = resp.headers();
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers.contains_key("content-security-policy"));
    assert!(headers.contains_key("x-request-id"));

    let resp = server
        .client
        .get(server.url("/about"))
        .header("x-request-id", "trace-abc.123")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "trace-abc.123");
}

#[tokio::test]
async fn test_static_stylesheet() {
    let server = TestServer::spawn().await;
    let resp = server
        .client
        .get(server.url("/static/css/main.css"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.text().await.unwrap().contains(".cart-drawer"));
}

// =============================================================================
// Base path
// =============================================================================

#[tokio::test]
async fn test_everything_mounts_under_base_path() {
    let server = TestServer::spawn_with(StorefrontConfig {
        base_path: BasePath::new("/shop"),
        ..test_config()
    })
    .await;

    let about = server.page("/about").await;
    assert!(about.contains("Our Journey"));
    assert!(about.contains("href=\"/shop/static/css/main.css\""));

    let home = server.page("/").await;
    assert!(home.contains("action=\"/shop/cart/add\""));
    assert!(home.contains("src=\"/shop/static/images/products/floral-dress.jpg\""));

    let resp = server
        .post_raw("/cart/add", &[("product_id", "1"), ("return_to", "/about")])
        .await;
    assert_eq!(resp.headers()["location"], "/shop/");
    assert_eq!(server.cart_count().await, 1);

    let css = server
        .client
        .get(server.url("/static/css/main.css"))
        .send()
        .await
        .unwrap();
    assert_eq!(css.status(), StatusCode::OK);
}
