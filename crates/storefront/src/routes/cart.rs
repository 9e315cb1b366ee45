//! Cart route handlers.
//!
//! Every action posts a `return_to` path and redirects back to it, so the
//! cart drawer stays open when it was used from the drawer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use devico_core::{Command, ProductId};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::routes::{sanitize_return_to, with_query};
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub return_to: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: i32,
    pub quantity: u32,
    pub return_to: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: i32,
    pub return_to: Option<String>,
}

/// Forms that only carry a return path.
#[derive(Debug, Deserialize)]
pub struct ReturnForm {
    pub return_to: Option<String>,
}

/// Cart count badge fragment template.
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Add a product to the cart.
#[instrument(skip(state, visitor))]
pub async fn add(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let id = ProductId::new(form.product_id);
    let product = state
        .catalog()
        .find(id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    add_breadcrumb("cart", "Added product", Some(&[("product_id", &id.to_string())]));
    visitor.app.dispatch(Command::AddToCart(product));
    visitor.commit().await?;

    Ok(back(&state, form.return_to.as_deref()))
}

/// Set a line's quantity. Zero removes the line.
#[instrument(skip(state, visitor))]
pub async fn update(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    visitor.app.dispatch(Command::UpdateQuantity {
        id: ProductId::new(form.product_id),
        quantity: form.quantity,
    });
    visitor.commit().await?;

    Ok(back(&state, form.return_to.as_deref()))
}

/// Remove a line.
#[instrument(skip(state, visitor))]
pub async fn remove(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Redirect> {
    visitor
        .app
        .dispatch(Command::RemoveItem(ProductId::new(form.product_id)));
    visitor.commit().await?;

    Ok(back(&state, form.return_to.as_deref()))
}

/// Ask for confirmation before emptying the cart.
#[instrument(skip(state))]
pub async fn request_empty(
    State(state): State<AppState>,
    Form(form): Form<ReturnForm>,
) -> Redirect {
    let target = sanitize_return_to(state.base(), form.return_to.as_deref());
    Redirect::to(&with_query(&target, "dialog=empty-cart"))
}

/// Empty the cart after confirmation.
#[instrument(skip(state, visitor))]
pub async fn confirm_empty(
    State(state): State<AppState>,
    mut visitor: Visitor,
    Form(form): Form<ReturnForm>,
) -> Result<Redirect> {
    visitor.app.dispatch(Command::RequestEmptyCart);
    visitor.app.dispatch(Command::ConfirmEmptyCart);
    visitor.commit().await?;
    add_breadcrumb("cart", "Emptied cart", None);

    Ok(back(&state, form.return_to.as_deref()))
}

/// Dismiss the confirmation, keeping the cart.
#[instrument(skip(state))]
pub async fn cancel_empty(
    State(state): State<AppState>,
    Form(form): Form<ReturnForm>,
) -> Redirect {
    back(&state, form.return_to.as_deref())
}

/// Cart count badge fragment.
#[instrument(skip(visitor))]
pub async fn count(visitor: Visitor) -> CartCountTemplate {
    CartCountTemplate {
        count: visitor.app.cart().item_count(),
    }
}

fn back(state: &AppState, return_to: Option<&str>) -> Redirect {
    Redirect::to(&sanitize_return_to(state.base(), return_to))
}
