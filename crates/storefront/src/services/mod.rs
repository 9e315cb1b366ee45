//! Storefront services.
//!
//! - [`checkout`] - Per-session checkout wizards held in memory
//! - [`orders`] - Simulated order placement

pub mod checkout;
pub mod orders;

pub use checkout::{CheckoutSlot, CheckoutSlots, SubmissionGuard};
pub use orders::{OrderConfirmation, OrderError, OrderService};
