//! Shopping cart model.
//!
//! The cart is an ordered list of line items with at most one line per
//! product. It is owned by the application state container
//! ([`crate::app::Storefront`]); views only ever see `&Cart`.

use rust_decimal::Decimal;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::Product;
use crate::types::ProductId;

/// One entry in the cart: a product and how many of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product identifier (unique per product, not per line).
    pub id: ProductId,
    pub name: String,
    #[serde(
        serialize_with = "rust_decimal::serde::float::serialize",
        deserialize_with = "price_from_number"
    )]
    pub price: Decimal,
    pub image: String,
    pub quantity: u32,
}

/// Stored prices must be JSON numbers; numeric strings are rejected.
fn price_from_number<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    Decimal::try_from(value).map_err(D::Error::custom)
}

impl CartLineItem {
    fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Price multiplied by quantity, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Whether this line satisfies the line-item invariants
    /// (`quantity >= 1`, `price >= 0`).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.quantity >= 1 && !self.price.is_sign_negative()
    }
}

/// The shopping cart.
///
/// Serializes as a bare JSON array of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from untrusted line items.
    ///
    /// Invalid lines are dropped and repeated product IDs are merged into the
    /// first occurrence, so the one-line-per-product invariant holds even for
    /// hand-edited storage.
    #[must_use]
    pub fn from_items(items: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items.into_iter().filter(CartLineItem::is_valid) {
            match cart.items.iter_mut().find(|line| line.id == item.id) {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line for a product.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|line| line.id == id)
    }

    /// Add one unit of a product.
    ///
    /// Increments the existing line for this product, or appends a new line
    /// with quantity 1.
    pub fn add(&mut self, product: &Product) {
        match self.items.iter_mut().find(|line| line.id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => self.items.push(CartLineItem::from_product(product)),
        }
    }

    /// Set the quantity of a line. A quantity of zero removes the line.
    ///
    /// Unknown product IDs are ignored. No upper bound is enforced.
    pub fn update_quantity(&mut self, id: ProductId, quantity: u32) {
        if quantity == 0 {
            self.remove(id);
            return;
        }
        if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
            line.quantity = quantity;
        }
    }

    /// Remove the line for a product, if present.
    pub fn remove(&mut self, id: ProductId) {
        self.items.retain(|line| line.id != id);
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of price × quantity over all lines, unrounded.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }
}
