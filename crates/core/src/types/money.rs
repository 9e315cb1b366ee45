//! Currency formatting.
//!
//! Amounts are carried as exact [`Decimal`] values everywhere in the domain
//! model. Rounding to cents happens only here, when a value is displayed.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places shown for USD amounts.
pub const CURRENCY_PRECISION: u32 = 2;

/// Round an amount to currency precision (half away from zero).
#[must_use]
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount for display, e.g. `$222.92`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = round_to_cents(amount);
    rounded.rescale(CURRENCY_PRECISION);
    format!("${rounded}")
}
