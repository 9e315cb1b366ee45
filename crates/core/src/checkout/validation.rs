//! Step validators.
//!
//! Each validator maps the step's input to field-level messages. An empty
//! [`FieldErrors`] means the step may be left.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use secrecy::ExposeSecret;

use super::payment::PaymentInfo;
use super::{Address, CustomerInfo};
use crate::types::{Email, EmailError};

static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{16}$").expect("Invalid regex"));

static EXPIRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}/\d{2}$").expect("Invalid regex"));

static CVV_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{3,4}$").expect("Invalid regex"));

/// Form field keys, shared with the templates.
pub mod field {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const SHIPPING_STREET: &str = "shippingStreet";
    pub const SHIPPING_CITY: &str = "shippingCity";
    pub const SHIPPING_STATE: &str = "shippingState";
    pub const SHIPPING_ZIP_CODE: &str = "shippingZipCode";
    pub const BILLING_STREET: &str = "billingStreet";
    pub const BILLING_CITY: &str = "billingCity";
    pub const BILLING_STATE: &str = "billingState";
    pub const BILLING_ZIP_CODE: &str = "billingZipCode";
    pub const CARD_NUMBER: &str = "cardNumber";
    pub const EXPIRY_DATE: &str = "expiryDate";
    pub const CVV: &str = "cvv";
    pub const CARDHOLDER_NAME: &str = "cardholderName";
    pub const PASSWORD: &str = "password";
    pub const CONFIRM_PASSWORD: &str = "confirmPassword";
    pub const TERMS: &str = "terms";
    /// Form-wide banner.
    pub const GENERAL: &str = "general";
}

/// Field key → message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, &'static str>);

impl FieldErrors {
    /// No errors.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// A single form-wide message.
    #[must_use]
    pub fn general(message: &'static str) -> Self {
        let mut errors = Self::new();
        errors.insert(field::GENERAL, message);
        errors
    }

    pub fn insert(&mut self, field: &'static str, message: &'static str) {
        self.0.insert(field, message);
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.0.get(field).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    /// Merge `other` into `self`.
    pub fn merge(&mut self, other: Self) {
        self.0.extend(other.0);
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Check an email field, reporting into `key`.
pub(crate) fn check_email(errors: &mut FieldErrors, key: &'static str, value: &str) {
    match Email::parse(value) {
        Ok(_) => {}
        Err(EmailError::Empty) => errors.insert(key, "Email is required"),
        Err(EmailError::TooLong { .. } | EmailError::InvalidShape) => {
            errors.insert(key, "Please enter a valid email address");
        }
    }
}

/// Step 1.
#[must_use]
pub fn validate_customer(info: &CustomerInfo) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if blank(&info.first_name) {
        errors.insert(field::FIRST_NAME, "First name is required");
    }
    if blank(&info.last_name) {
        errors.insert(field::LAST_NAME, "Last name is required");
    }
    check_email(&mut errors, field::EMAIL, &info.email);
    if blank(&info.phone) {
        errors.insert(field::PHONE, "Phone number is required");
    }
    errors
}

/// Which address a form block edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    Shipping,
    Billing,
}

impl AddressKind {
    const fn keys(self) -> [&'static str; 4] {
        match self {
            Self::Shipping => [
                field::SHIPPING_STREET,
                field::SHIPPING_CITY,
                field::SHIPPING_STATE,
                field::SHIPPING_ZIP_CODE,
            ],
            Self::Billing => [
                field::BILLING_STREET,
                field::BILLING_CITY,
                field::BILLING_STATE,
                field::BILLING_ZIP_CODE,
            ],
        }
    }
}

/// One address block of step 2.
#[must_use]
pub fn validate_address(address: &Address, kind: AddressKind) -> FieldErrors {
    let [street, city, state, zip] = kind.keys();
    let mut errors = FieldErrors::new();
    if blank(&address.street) {
        errors.insert(street, "Street address is required");
    }
    if blank(&address.city) {
        errors.insert(city, "City is required");
    }
    if blank(&address.state) {
        errors.insert(state, "State is required");
    }
    if blank(&address.zip_code) {
        errors.insert(zip, "ZIP code is required");
    }
    errors
}

/// Step 3, re-run before an order is placed.
#[must_use]
pub fn validate_payment(info: &PaymentInfo) -> FieldErrors {
    let mut errors = FieldErrors::new();

    let card_number = info.card_number().expose_secret();
    if blank(card_number) {
        errors.insert(field::CARD_NUMBER, "Card number is required");
    } else {
        let compact: String = card_number.chars().filter(|c| !c.is_whitespace()).collect();
        if !CARD_NUMBER_RE.is_match(&compact) {
            errors.insert(field::CARD_NUMBER, "Please enter a valid 16-digit card number");
        }
    }

    if blank(&info.expiry_date) {
        errors.insert(field::EXPIRY_DATE, "Expiry date is required");
    } else if !EXPIRY_RE.is_match(&info.expiry_date) {
        errors.insert(field::EXPIRY_DATE, "Please enter date in MM/YY format");
    }

    let cvv = info.cvv().expose_secret();
    if blank(cvv) {
        errors.insert(field::CVV, "CVV is required");
    } else if !CVV_RE.is_match(cvv) {
        errors.insert(field::CVV, "Please enter a valid CVV");
    }

    if blank(&info.cardholder_name) {
        errors.insert(field::CARDHOLDER_NAME, "Cardholder name is required");
    }

    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn customer() -> CustomerInfo {
        CustomerInfo {
            first_name: "Antara".to_string(),
            last_name: "Borthakur".to_string(),
            email: "antara@example.com".to_string(),
            phone: "555-0100".to_string(),
        }
    }

    fn raw_payment(card_number: &str, expiry: &str, cvv: &str) -> PaymentInfo {
        let mut info = PaymentInfo::from_input(card_number, "", cvv, "Antara Borthakur");
        info.expiry_date = expiry.to_string();
        info
    }

    #[test]
    fn test_customer_valid() {
        assert!(validate_customer(&customer()).is_empty());
    }

    #[test]
    fn test_customer_blank_fields() {
        let errors = validate_customer(&CustomerInfo {
            first_name: "  ".to_string(),
            ..CustomerInfo::default()
        });
        assert_eq!(errors.get(field::FIRST_NAME), Some("First name is required"));
        assert_eq!(errors.get(field::LAST_NAME), Some("Last name is required"));
        assert_eq!(errors.get(field::EMAIL), Some("Email is required"));
        assert_eq!(errors.get(field::PHONE), Some("Phone number is required"));
    }

    #[test]
    fn test_customer_email_shape() {
        let errors = validate_customer(&CustomerInfo {
            email: "antara@example".to_string(),
            ..customer()
        });
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(field::EMAIL), Some("Please enter a valid email address"));
    }

    #[test]
    fn test_address_keys_follow_kind() {
        let errors = validate_address(&Address::default(), AddressKind::Billing);
        assert_eq!(errors.get(field::BILLING_STREET), Some("Street address is required"));
        assert_eq!(errors.get(field::BILLING_CITY), Some("City is required"));
        assert_eq!(errors.get(field::BILLING_STATE), Some("State is required"));
        assert_eq!(errors.get(field::BILLING_ZIP_CODE), Some("ZIP code is required"));
        assert!(errors.get(field::SHIPPING_STREET).is_none());
    }

    #[test]
    fn test_card_number_with_spaces_passes() {
        let errors = validate_payment(&raw_payment("4111 1111 1111 1111", "12/27", "123"));
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_card_number_with_dashes_fails() {
        let errors = validate_payment(&raw_payment("4111-1111", "12/27", "123"));
        assert_eq!(
            errors.get(field::CARD_NUMBER),
            Some("Please enter a valid 16-digit card number")
        );
    }

    #[test]
    fn test_payment_formats() {
        let errors = validate_payment(&raw_payment("", "1227", "12"));
        assert_eq!(errors.get(field::CARD_NUMBER), Some("Card number is required"));
        assert_eq!(errors.get(field::EXPIRY_DATE), Some("Please enter date in MM/YY format"));
        assert_eq!(errors.get(field::CVV), Some("Please enter a valid CVV"));

        let errors = validate_payment(&raw_payment("4111111111111111", "12/27", "1234"));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_payment_requires_cardholder() {
        let mut info = raw_payment("4111111111111111", "12/27", "123");
        info.cardholder_name = " ".to_string();
        let errors = validate_payment(&info);
        assert_eq!(errors.get(field::CARDHOLDER_NAME), Some("Cardholder name is required"));
    }

    #[test]
    fn test_merge_and_general() {
        let mut errors = FieldErrors::general("Order failed. Please try again.");
        errors.merge(validate_address(&Address::default(), AddressKind::Shipping));
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get(field::GENERAL), Some("Order failed. Please try again."));
    }
}
