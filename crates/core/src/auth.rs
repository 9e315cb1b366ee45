//! Sign-in and sign-up forms.
//!
//! Both forms are validated locally and then "submitted" after a simulated
//! delay. No account is created or looked up anywhere.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::checkout::{FieldErrors, check_email, field};

/// Minimum password length for new accounts.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Banner shown when a registration fails.
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

/// Sign-up form input.
#[derive(Debug)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub accept_terms: bool,
    pub subscribe_newsletter: bool,
}

impl Default for SignUpForm {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            password: SecretString::from(String::new()),
            confirm_password: SecretString::from(String::new()),
            accept_terms: false,
            subscribe_newsletter: true,
        }
    }
}

impl SignUpForm {
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if self.first_name.trim().is_empty() {
            errors.insert(field::FIRST_NAME, "First name is required");
        }
        if self.last_name.trim().is_empty() {
            errors.insert(field::LAST_NAME, "Last name is required");
        }
        check_email(&mut errors, field::EMAIL, &self.email);

        let password = self.password.expose_secret();
        if password.is_empty() {
            errors.insert(field::PASSWORD, "Password is required");
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.insert(field::PASSWORD, "Password must be at least 8 characters");
        } else if !(has_lower(password) && has_upper(password) && has_digit(password)) {
            errors.insert(
                field::PASSWORD,
                "Password must contain uppercase, lowercase, and number",
            );
        }

        let confirm = self.confirm_password.expose_secret();
        if confirm.is_empty() {
            errors.insert(field::CONFIRM_PASSWORD, "Please confirm your password");
        } else if confirm != password {
            errors.insert(field::CONFIRM_PASSWORD, "Passwords do not match");
        }

        if !self.accept_terms {
            errors.insert(field::TERMS, "You must accept the terms and conditions");
        }

        errors
    }

    #[must_use]
    pub fn password_strength(&self) -> PasswordStrength {
        PasswordStrength::of(self.password.expose_secret())
    }
}

/// Sign-in form input.
#[derive(Debug)]
pub struct SignInForm {
    pub email: String,
    pub password: SecretString,
    pub remember_me: bool,
}

impl SignInForm {
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        check_email(&mut errors, field::EMAIL, &self.email);
        if self.password.expose_secret().is_empty() {
            errors.insert(field::PASSWORD, "Password is required");
        }
        errors
    }
}

fn has_lower(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_lowercase())
}

fn has_upper(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_uppercase())
}

fn has_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit())
}

/// Password strength meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PasswordStrength {
    Weak,
    Fair,
    Good,
    Strong,
}

impl PasswordStrength {
    /// One point each for: length ≥ 8, a lowercase letter, an uppercase
    /// letter, a digit, a symbol.
    #[must_use]
    pub fn score(password: &str) -> u8 {
        let checks = [
            password.chars().count() >= MIN_PASSWORD_LENGTH,
            has_lower(password),
            has_upper(password),
            has_digit(password),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ];
        checks.into_iter().map(u8::from).sum()
    }

    #[must_use]
    pub fn of(password: &str) -> Self {
        match Self::score(password) {
            0 | 1 => Self::Weak,
            2 | 3 => Self::Fair,
            4 => Self::Good,
            _ => Self::Strong,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Weak => "Weak",
            Self::Fair => "Fair",
            Self::Good => "Good",
            Self::Strong => "Strong",
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
