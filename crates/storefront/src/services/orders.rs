//! Simulated order placement.
//!
//! No payment is processed and nothing leaves the process: placing an order
//! waits for the configured delay and hands back a confirmation.

use std::time::Duration;

use chrono::{DateTime, Utc};
use devico_core::checkout::OrderTotals;
use devico_core::{Cart, format_money};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, instrument};
use uuid::Uuid;

/// Reasons an order cannot be placed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The cart was emptied while the order was being placed.
    #[error("cart is empty")]
    EmptyCart,
}

/// What the visitor sees after a successful order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub reference: String,
    pub email: String,
    pub item_count: u32,
    pub total: String,
    pub placed_at: DateTime<Utc>,
}

/// Places orders after a fixed delay.
#[derive(Debug, Clone)]
pub struct OrderService {
    delay: Duration,
}

impl OrderService {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Simulated processing time.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the processing time. Cancel-safe: dropping the future
    /// places nothing.
    pub async fn process(&self) {
        tokio::time::sleep(self.delay).await;
    }

    /// Record the order for `cart`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::EmptyCart`] if there is nothing to order.
    #[instrument(skip(self, cart, totals), fields(items = cart.item_count()))]
    pub fn place(
        &self,
        cart: &Cart,
        totals: &OrderTotals,
        email: &str,
    ) -> Result<OrderConfirmation, OrderError> {
        if cart.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let reference = order_reference(Uuid::new_v4());
        let confirmation = OrderConfirmation {
            reference,
            email: email.to_string(),
            item_count: cart.item_count(),
            total: format_money(totals.total),
            placed_at: Utc::now(),
        };
        info!(reference = %confirmation.reference, total = %confirmation.total, "order placed");
        Ok(confirmation)
    }
}

/// Short human-readable reference, e.g. `DV-1A2B3C4D`.
fn order_reference(id: Uuid) -> String {
    let simple = id.simple().to_string().to_uppercase();
    format!("DV-{}", simple.get(..8).unwrap_or(&simple))
}
