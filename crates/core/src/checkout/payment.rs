//! Card payment details.
//!
//! Card number and CVV are [`SecretString`]s: they are redacted from `Debug`
//! output, zeroized on drop and have no serde implementation, so they cannot
//! reach the persistent store.

use secrecy::{ExposeSecret, SecretString};

/// Payment form state.
#[derive(Debug)]
pub struct PaymentInfo {
    card_number: SecretString,
    /// `MM/YY`.
    pub expiry_date: String,
    cvv: SecretString,
    pub cardholder_name: String,
}

impl Default for PaymentInfo {
    fn default() -> Self {
        Self {
            card_number: SecretString::from(String::new()),
            expiry_date: String::new(),
            cvv: SecretString::from(String::new()),
            cardholder_name: String::new(),
        }
    }
}

impl PaymentInfo {
    /// Build payment details from raw form input, normalizing as the form
    /// fields do while typing.
    #[must_use]
    pub fn from_input(card_number: &str, expiry_date: &str, cvv: &str, cardholder_name: &str) -> Self {
        Self {
            card_number: SecretString::from(format_card_number(card_number)),
            expiry_date: format_expiry_date(expiry_date),
            cvv: SecretString::from(digits_only(cvv)),
            cardholder_name: cardholder_name.to_string(),
        }
    }

    /// The card number as entered (grouped in fours).
    #[must_use]
    pub fn card_number(&self) -> &SecretString {
        &self.card_number
    }

    /// The card verification value.
    #[must_use]
    pub fn cvv(&self) -> &SecretString {
        &self.cvv
    }

    /// Whether a card number has been entered.
    #[must_use]
    pub fn has_card_number(&self) -> bool {
        !self.card_number.expose_secret().trim().is_empty()
    }

    /// Card number for display on the review step, e.g.
    /// `•••• •••• •••• 1111`.
    #[must_use]
    pub fn masked_card_number(&self) -> String {
        let digits: Vec<char> = self
            .card_number
            .expose_secret()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let start = digits.len().saturating_sub(4);
        let last_four: String = digits.get(start..).unwrap_or_default().iter().collect();
        format!("•••• •••• •••• {last_four}")
    }

    /// Drop the card number, CVV and expiry date. The cardholder name stays.
    pub fn clear_sensitive(&mut self) {
        self.card_number = SecretString::from(String::new());
        self.cvv = SecretString::from(String::new());
        self.expiry_date.clear();
    }
}

fn digits_only(value: &str) -> String {
    value.chars().filter(char::is_ascii_digit).collect()
}

/// Group card digits in fours, dropping anything that is not a digit and
/// anything past the sixteenth digit.
///
/// Fewer than four digits are returned ungrouped.
#[must_use]
pub fn format_card_number(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() < 4 {
        return digits;
    }
    let digits: Vec<char> = digits.chars().take(16).collect();
    digits
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalize expiry input to `MM/YY`, inserting the slash once two digits
/// have been typed.
#[must_use]
pub fn format_expiry_date(value: &str) -> String {
    let digits = digits_only(value);
    if digits.len() < 2 {
        return digits;
    }
    let month = digits.get(..2).unwrap_or_default();
    let year = digits.get(2..digits.len().min(4)).unwrap_or_default();
    format!("{month}/{year}")
}
