//! The fixed product catalog shown in the "Crafted for you" carousel.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::ProductId;

/// A product that can be added to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Image URL, relative to the static asset root.
    pub image: String,
}

impl Product {
    fn new(id: i32, name: &str, price: i64, image: &str) -> Self {
        Self {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Decimal::from(price),
            image: format!("/static/images/products/{image}"),
        }
    }
}

/// Read-only product list.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog from an explicit product list.
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// All products in display order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product by ID.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(vec![
            Product::new(1, "Floral Dress", 89, "floral-dress.jpg"),
            Product::new(2, "Linen Dress", 75, "linen-dress.jpg"),
            Product::new(3, "Linen Shirt", 55, "linen-shirt.jpg"),
            Product::new(4, "Floral Shirt", 65, "floral-shirt.jpg"),
            Product::new(5, "Pink Shirt", 60, "pink-shirt.jpg"),
            Product::new(6, "White Linen Shirt", 70, "white-linen-shirt.jpg"),
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_has_six_products() {
        let catalog = Catalog::default();
        assert_eq!(catalog.products().len(), 6);
    }

    #[test]
    fn test_find_by_id() {
        let catalog = Catalog::default();
        let dress = catalog.find(ProductId::new(1)).unwrap();
        assert_eq!(dress.name, "Floral Dress");
        assert_eq!(dress.price, Decimal::from(89));
        assert!(catalog.find(ProductId::new(99)).is_none());
    }
}
