//! Multi-step checkout wizard.
//!
//! Four ordered steps, each gated by a validator:
//!
//! ```text
//! CustomerInfo(1) → Address(2) → Payment(3) → Review(4)
//! ```
//!
//! Moving forward requires the current step's validator to pass; moving back
//! is always allowed. Orders can only be placed from the review step, which
//! re-validates payment and holds a loading flag while the (simulated)
//! submission is outstanding.
//!
//! Customer info, addresses and preferences are mirrored to the persistent
//! store. Card number and CVV never are.

mod payment;
mod totals;
mod validation;

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use payment::{PaymentInfo, format_card_number, format_expiry_date};
pub use totals::{OrderTotals, ShippingMethod, TAX_RATE};
pub use validation::{
    AddressKind, FieldErrors, field, validate_address, validate_customer, validate_payment,
};
pub(crate) use validation::check_email;

use crate::cart::Cart;
use crate::storage::{Persisted, PersistentStore, Storage, keys};

/// Banner shown when a submission fails.
pub const ORDER_FAILED_MESSAGE: &str = "Order failed. Please try again.";

/// Countries offered in address forms: (code, label).
pub const COUNTRIES: [(&str, &str); 3] = [
    ("US", "United States"),
    ("CA", "Canada"),
    ("MX", "Mexico"),
];

/// A wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Step {
    #[default]
    CustomerInfo = 1,
    Address = 2,
    Payment = 3,
    Review = 4,
}

impl Step {
    pub const ALL: [Self; 4] = [Self::CustomerInfo, Self::Address, Self::Payment, Self::Review];

    /// 1-based position.
    #[must_use]
    pub const fn number(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CustomerInfo => "Customer Info",
            Self::Address => "Shipping",
            Self::Payment => "Payment",
            Self::Review => "Review",
        }
    }

    const fn next(self) -> Self {
        match self {
            Self::CustomerInfo => Self::Address,
            Self::Address => Self::Payment,
            Self::Payment | Self::Review => Self::Review,
        }
    }

    const fn previous(self) -> Self {
        match self {
            Self::CustomerInfo | Self::Address => Self::CustomerInfo,
            Self::Payment => Self::Address,
            Self::Review => Self::Payment,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Step 1 input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl CustomerInfo {
    /// Whether every field is empty.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        [&self.first_name, &self.last_name, &self.email, &self.phone]
            .iter()
            .all(|value| value.is_empty())
    }
}

impl Persisted for CustomerInfo {}

/// A postal address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

impl Default for Address {
    fn default() -> Self {
        Self {
            street: String::new(),
            city: String::new(),
            state: String::new(),
            zip_code: String::new(),
            country: "US".to_string(),
        }
    }
}

/// Persisted shape of both addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutAddresses {
    pub shipping: Address,
    pub billing: Address,
}

impl Persisted for CheckoutAddresses {}

/// Persisted non-sensitive preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPreferences {
    pub use_same_as_billing: bool,
    pub selected_shipping_method: ShippingMethod,
    pub cardholder_name: String,
}

impl Persisted for CheckoutPreferences {}

/// Refused wizard transitions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// The step's validator failed.
    #[error("{step} has {} invalid field(s)", .errors.len())]
    Invalid { step: Step, errors: FieldErrors },

    /// An order is already being submitted.
    #[error("order submission already in progress")]
    AlreadySubmitting,

    /// Orders can only be placed from the review step.
    #[error("orders can only be placed from the review step (currently on {0})")]
    NotOnReview(Step),

    /// Completion or failure was reported with nothing in flight.
    #[error("no order submission in progress")]
    NotSubmitting,
}

/// Checkout wizard state.
#[derive(Debug, Default)]
pub struct CheckoutWizard {
    step: Step,
    customer: CustomerInfo,
    shipping_address: Address,
    billing_address: Address,
    payment: PaymentInfo,
    use_same_as_billing: bool,
    shipping_method: ShippingMethod,
    errors: FieldErrors,
    submitting: bool,
}

impl CheckoutWizard {
    /// A wizard on step 1 with empty forms.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A wizard on step 1, restoring whatever the store holds.
    ///
    /// Corrupt keys are dropped by the store and leave their fields at
    /// defaults.
    pub fn hydrate<S: Storage>(store: &mut PersistentStore<S>) -> Self {
        let mut wizard = Self::new();
        if let Some(customer) = store.load::<CustomerInfo>(keys::CHECKOUT_CUSTOMER) {
            wizard.customer = customer;
        }
        if let Some(addresses) = store.load::<CheckoutAddresses>(keys::CHECKOUT_ADDRESSES) {
            wizard.shipping_address = addresses.shipping;
            wizard.billing_address = addresses.billing;
        }
        if let Some(preferences) = store.load::<CheckoutPreferences>(keys::CHECKOUT_PREFERENCES) {
            wizard.use_same_as_billing = preferences.use_same_as_billing;
            wizard.shipping_method = preferences.selected_shipping_method;
            wizard.payment.cardholder_name = preferences.cardholder_name;
        }
        wizard
    }

    /// Mirror the non-sensitive state to the store.
    ///
    /// Customer info is written only once something was typed, addresses
    /// only once either street is filled. Preferences are always written.
    pub fn persist<S: Storage>(&self, store: &mut PersistentStore<S>) {
        if !self.customer.is_blank() {
            store.save(keys::CHECKOUT_CUSTOMER, &self.customer);
        }
        if !self.shipping_address.street.is_empty() || !self.billing_address.street.is_empty() {
            store.save(
                keys::CHECKOUT_ADDRESSES,
                &CheckoutAddresses {
                    shipping: self.shipping_address.clone(),
                    billing: self.billing_address.clone(),
                },
            );
        }
        store.save(keys::CHECKOUT_PREFERENCES, &self.preferences());
    }

    #[must_use]
    pub fn preferences(&self) -> CheckoutPreferences {
        CheckoutPreferences {
            use_same_as_billing: self.use_same_as_billing,
            selected_shipping_method: self.shipping_method,
            cardholder_name: self.payment.cardholder_name.clone(),
        }
    }

    #[must_use]
    pub const fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub const fn customer(&self) -> &CustomerInfo {
        &self.customer
    }

    #[must_use]
    pub const fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    #[must_use]
    pub const fn billing_address(&self) -> &Address {
        &self.billing_address
    }

    #[must_use]
    pub const fn payment(&self) -> &PaymentInfo {
        &self.payment
    }

    #[must_use]
    pub const fn use_same_as_billing(&self) -> bool {
        self.use_same_as_billing
    }

    #[must_use]
    pub const fn shipping_method(&self) -> ShippingMethod {
        self.shipping_method
    }

    /// Errors from the last refused transition.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether an order submission is outstanding.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn totals(&self, cart: &Cart) -> OrderTotals {
        OrderTotals::compute(cart, self.shipping_method)
    }

    pub fn apply_customer(&mut self, customer: CustomerInfo) {
        self.customer = customer;
    }

    /// Replace both addresses. With "same as shipping" on, billing follows
    /// shipping and `billing` is ignored.
    pub fn apply_addresses(&mut self, shipping: Address, billing: Option<Address>) {
        self.shipping_address = shipping;
        if self.use_same_as_billing {
            self.billing_address = self.shipping_address.clone();
        } else if let Some(billing) = billing {
            self.billing_address = billing;
        }
    }

    pub fn apply_payment(&mut self, payment: PaymentInfo) {
        self.payment = payment;
    }

    pub fn set_shipping_method(&mut self, method: ShippingMethod) {
        self.shipping_method = method;
    }

    /// Toggle "billing same as shipping". Turning it on copies the shipping
    /// address into billing.
    pub fn set_same_as_billing(&mut self, same: bool) {
        self.use_same_as_billing = same;
        if same {
            self.billing_address = self.shipping_address.clone();
        }
    }

    /// Run the current step's validator.
    #[must_use]
    pub fn validate_step(&self) -> FieldErrors {
        match self.step {
            Step::CustomerInfo => validate_customer(&self.customer),
            Step::Address => {
                let mut errors = validate_address(&self.shipping_address, AddressKind::Shipping);
                if !self.use_same_as_billing {
                    errors.merge(validate_address(&self.billing_address, AddressKind::Billing));
                }
                errors
            }
            Step::Payment => validate_payment(&self.payment),
            Step::Review => FieldErrors::new(),
        }
    }

    /// Advance one step if the current step validates.
    ///
    /// Review is terminal: calling `next` there is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Invalid`] with the field errors, which are
    /// also kept for rendering.
    pub fn next(&mut self) -> Result<Step, CheckoutError> {
        let errors = self.validate_step();
        if !errors.is_empty() {
            debug!(step = %self.step, fields = errors.len(), "checkout step refused");
            self.errors = errors.clone();
            return Err(CheckoutError::Invalid {
                step: self.step,
                errors,
            });
        }
        self.step = self.step.next();
        self.errors = FieldErrors::new();
        Ok(self.step)
    }

    /// Go back one step (no-op on step 1). Always clears errors.
    pub fn previous(&mut self) -> Step {
        self.step = self.step.previous();
        self.errors = FieldErrors::new();
        self.step
    }

    /// Start placing the order: re-validate payment and raise the loading
    /// flag.
    ///
    /// # Errors
    ///
    /// Refused when not on the review step, when a submission is already in
    /// flight, or when payment no longer validates.
    pub fn begin_submission(&mut self) -> Result<(), CheckoutError> {
        if self.step != Step::Review {
            return Err(CheckoutError::NotOnReview(self.step));
        }
        if self.submitting {
            return Err(CheckoutError::AlreadySubmitting);
        }
        let errors = validate_payment(&self.payment);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(CheckoutError::Invalid {
                step: Step::Payment,
                errors,
            });
        }
        self.errors = FieldErrors::new();
        self.submitting = true;
        Ok(())
    }

    /// The order went through: drop card number, CVV and expiry date and
    /// lower the loading flag.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NotSubmitting`] if no submission was started.
    pub fn complete_submission(&mut self) -> Result<(), CheckoutError> {
        if !self.submitting {
            return Err(CheckoutError::NotSubmitting);
        }
        self.payment.clear_sensitive();
        self.submitting = false;
        Ok(())
    }

    /// The order failed: show the general banner and stay on review.
    pub fn fail_submission(&mut self) {
        self.submitting = false;
        self.errors = FieldErrors::general(ORDER_FAILED_MESSAGE);
    }

    /// Lower the loading flag without an outcome (the request went away).
    pub fn abandon_submission(&mut self) {
        self.submitting = false;
    }
}
