//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! Every route is mounted under the configured base path.
//!
//! ```text
//! GET  /                       - Home page
//! GET  /about                  - About page
//! GET  /health                 - Health check
//!
//! # Auth (simulated)
//! GET  /signin                 - Sign-in page
//! POST /signin                 - Sign in, then home
//! GET  /signup                 - Sign-up page
//! POST /signup                 - Register, then sign-in page
//!
//! # Cart
//! POST /cart/add               - Add a product
//! POST /cart/update            - Set a line's quantity (0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/empty             - Ask for confirmation
//! POST /cart/empty/confirm     - Empty the cart
//! POST /cart/empty/cancel      - Dismiss the confirmation
//! GET  /cart/count             - Cart count badge (fragment)
//!
//! # Checkout
//! GET  /checkout               - Current wizard step
//! POST /checkout/next          - Save the step's form and advance
//! POST /checkout/previous      - Go back one step
//! POST /checkout/place-order   - Place the order (simulated)
//! GET  /checkout/complete      - Order confirmation on the home page
//!
//! # Anything else
//! GET  /*                      - Home page
//! ```
//!
//! Overlays are driven by query flags: `?cart=open`, `?menu=open` and
//! `?dialog=empty-cart`.

pub mod about;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;

use axum::{
    Router,
    routing::{get, post},
};
use devico_core::app::ORDER_PLACED_MESSAGE;
use devico_core::{BasePath, Cart, Overlays, Page, format_money};

use crate::content;
use crate::middleware::Visitor;
use crate::state::AppState;

// =============================================================================
// Routers
// =============================================================================

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/empty", post(cart::request_empty))
        .route("/empty/confirm", post(cart::confirm_empty))
        .route("/empty/cancel", post(cart::cancel_empty))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/next", post(checkout::next))
        .route("/previous", post(checkout::previous))
        .route("/place-order", post(checkout::place_order))
        .route("/complete", get(checkout::complete))
}

/// Build the main router, relative to the base path.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/about", get(about::show))
        .route("/signin", get(auth::signin_page).post(auth::signin))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/checkout", get(checkout::show))
        .nest("/checkout", checkout_routes())
        .nest("/cart", cart_routes())
}

// =============================================================================
// Shared View Models
// =============================================================================

/// Banners that can be requested with `?notice=`.
#[must_use]
pub fn notice_message(notice: Option<&str>) -> Option<&'static str> {
    match notice? {
        "order-placed" => Some(ORDER_PLACED_MESSAGE),
        "registered" => Some(auth::REGISTERED_MESSAGE),
        _ => None,
    }
}

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartItemView {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart display data for templates.
#[derive(Debug, Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, base: &BasePath) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartItemView {
                    id: item.id.as_i32(),
                    name: item.name.clone(),
                    image: base.join(&item.image),
                    quantity: item.quantity,
                    price: format_money(item.price),
                    line_price: format_money(item.line_total()),
                })
                .collect(),
            subtotal: format_money(cart.total()),
            item_count: cart.item_count(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A navigation menu entry.
#[derive(Debug, Clone)]
pub struct MenuLink {
    pub label: &'static str,
    pub href: String,
    pub active: bool,
}

/// Data every page shares: header, menu, cart drawer, dialog and footer.
pub struct Layout {
    pub base: BasePath,
    pub title: &'static str,
    /// Canonical path of the current page, for highlighting nav links.
    pub active: &'static str,
    pub cart: CartView,
    pub overlays: Overlays,
    pub notice: Option<&'static str>,
    /// Where cart forms send the visitor back to.
    pub return_to: String,
    /// Section snapping runs on the home page only.
    pub snap_active: bool,
    pub empty_cart_title: &'static str,
    pub empty_cart_prompt: &'static str,
    pub footer_blurb: &'static str,
    pub social_links: &'static [(&'static str, &'static str)],
}

impl Layout {
    #[must_use]
    pub fn new(state: &AppState, visitor: &Visitor) -> Self {
        let page = visitor.app.page();
        Self {
            base: state.base().clone(),
            title: page.title(),
            active: page.path(),
            cart: CartView::new(visitor.app.cart(), state.base()),
            overlays: *visitor.app.overlays(),
            notice: notice_message(visitor.query.notice.as_deref()),
            return_to: state.base().href(page),
            snap_active: page == Page::Home,
            empty_cart_title: content::EMPTY_CART_TITLE,
            empty_cart_prompt: content::EMPTY_CART_PROMPT,
            footer_blurb: content::FOOTER_BLURB,
            social_links: &content::SOCIAL_LINKS,
        }
    }

    /// Link to a path under the base path.
    #[must_use]
    pub fn href(&self, path: &str) -> String {
        self.base.join(path)
    }

    /// Link to the current page with the cart drawer open.
    #[must_use]
    pub fn cart_href(&self) -> String {
        format!("{}?cart=open", self.return_to)
    }

    /// Link to the current page with the menu toggled.
    #[must_use]
    pub fn menu_href(&self) -> String {
        if self.overlays.menu_open {
            self.return_to.clone()
        } else {
            format!("{}?menu=open", self.return_to)
        }
    }

    /// Menu entries.
    #[must_use]
    pub fn menu(&self) -> Vec<MenuLink> {
        [Page::Home, Page::About, Page::SignIn, Page::SignUp]
            .into_iter()
            .map(|page| MenuLink {
                label: page.title(),
                href: self.base.href(page),
                active: page.path() == self.active,
            })
            .collect()
    }
}

/// Accept a post-action redirect target only if it stays on this site under
/// the base path.
#[must_use]
pub fn sanitize_return_to(base: &BasePath, candidate: Option<&str>) -> String {
    let home = base.href(Page::Home);
    let Some(candidate) = candidate else {
        return home;
    };
    let local = candidate.starts_with('/')
        && !candidate.starts_with("//")
        && !candidate.contains('\\')
        && !candidate.chars().any(char::is_control);
    let path = candidate.split(['?', '#']).next().unwrap_or_default();
    let under_base = base.is_root()
        || path == base.as_str()
        || path.starts_with(&format!("{}/", base.as_str()));
    if local && under_base {
        candidate.to_string()
    } else {
        home
    }
}

/// Append a query flag to a path that may already carry a query string.
#[must_use]
pub fn with_query(path: &str, flag: &str) -> String {
    let (path, fragment) = path.split_once('#').map_or((path, None), |(p, f)| (p, Some(f)));
    let separator = if path.contains('?') { '&' } else { '?' };
    match fragment {
        Some(fragment) => format!("{path}{separator}{flag}#{fragment}"),
        None => format!("{path}{separator}{flag}"),
    }
}

/// Liveness health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}
