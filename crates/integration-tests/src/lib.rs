//! Integration tests for the Devico storefront.
//!
//! Each test boots its own storefront on `127.0.0.1:0` with short simulated
//! delays and talks to it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p devico-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use devico_storefront::config::StorefrontConfig;
use devico_storefront::state::AppState;
use reqwest::cookie::Jar;
use reqwest::redirect::Policy;
use reqwest::{Client, Response};

/// Simulated order processing time used by the test servers.
pub const TEST_ORDER_DELAY: Duration = Duration::from_millis(50);

/// A running storefront plus a browser-like client.
pub struct TestServer {
    addr: SocketAddr,
    base_path: String,
    /// Follows redirects, like a browser.
    pub client: Client,
    /// Shares cookies with `client` but stops at redirects.
    pub raw: Client,
}

/// Configuration for test servers: no waiting on sign-in/up, a short order
/// delay, static files from the storefront crate.
#[must_use]
pub fn test_config() -> StorefrontConfig {
    StorefrontConfig {
        static_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../storefront/static"),
        order_delay: TEST_ORDER_DELAY,
        signup_delay: Duration::ZERO,
        signin_delay: Duration::ZERO,
        ..StorefrontConfig::default()
    }
}

impl TestServer {
    /// Spawn a storefront mounted at `/`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config()).await
    }

    /// Spawn a storefront with an explicit configuration.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind or the client cannot be built.
    pub async fn spawn_with(config: StorefrontConfig) -> Self {
        let base_path = config.base_path.as_str().trim_end_matches('/').to_string();
        let app = devico_storefront::app(AppState::new(config));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let jar = Arc::new(Jar::default());
        let client = Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .build()
            .expect("Failed to build client");
        let raw = Client::builder()
            .cookie_provider(jar)
            .redirect(Policy::none())
            .build()
            .expect("Failed to build client");

        Self {
            addr,
            base_path,
            client,
            raw,
        }
    }

    /// Absolute URL for a path under the base path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}{path}", self.addr, self.base_path)
    }

    /// GET a page and return its body.
    ///
    /// # Panics
    ///
    /// Panics on transport errors.
    pub async fn page(&self, path: &str) -> String {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("GET failed")
            .text()
            .await
            .expect("Body was not text")
    }

    /// POST a form, following redirects.
    ///
    /// # Panics
    ///
    /// Panics on transport errors.
    pub async fn post(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// POST a form without following the redirect.
    ///
    /// # Panics
    ///
    /// Panics on transport errors.
    pub async fn post_raw(&self, path: &str, form: &[(&str, &str)]) -> Response {
        self.raw
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST failed")
    }

    /// Add a product by id.
    pub async fn add_to_cart(&self, product_id: i32) -> Response {
        self.post("/cart/add", &[("product_id", &product_id.to_string())])
            .await
    }

    /// The cart badge count.
    ///
    /// # Panics
    ///
    /// Panics if the fragment does not hold a number.
    pub async fn cart_count(&self) -> u32 {
        let fragment = self.page("/cart/count").await;
        fragment
            .trim()
            .trim_start_matches("<span class=\"cart-count\">")
            .trim_end_matches("</span>")
            .parse()
            .expect("Cart count was not a number")
    }

    /// The cart drawer total, e.g. `$199.00`.
    ///
    /// # Panics
    ///
    /// Panics if the drawer shows no total.
    pub async fn cart_total(&self) -> String {
        let body = self.page("/?cart=open").await;
        extract(&body, "Total: <strong>", "</strong>")
            .expect("Cart drawer has no total")
            .to_string()
    }
}

/// The text between `start` and the next `end`.
#[must_use]
pub fn extract<'a>(body: &'a str, start: &str, end: &str) -> Option<&'a str> {
    let from = body.find(start)? + start.len();
    let rest = body.get(from..)?;
    rest.find(end).and_then(|to| rest.get(..to))
}
