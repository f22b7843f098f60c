//! Field validators and validation result types.
//!
//! Validators are pure: they look at one value and return the error message
//! for it, if any. The order draft is the only caller that stores results.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::checkout::PaymentMethod;

pub const ENTER_EMAIL: &str = "Enter email";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const ENTER_PHONE: &str = "Enter phone number";
pub const INVALID_PHONE: &str = "Invalid phone number";
pub const ENTER_ADDRESS: &str = "Enter delivery address";
pub const SELECT_PAYMENT: &str = "Select payment method";

/// A draft field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Payment,
    Address,
    Email,
    Phone,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Payment => "payment",
            Field::Address => "address",
            Field::Email => "email",
            Field::Phone => "phone",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name → error message. An empty message means the field is valid.
pub type ValidationErrors = BTreeMap<Field, String>;

/// Payload of a field-updated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    /// The raw value as entered.
    pub value: String,
    pub is_valid: bool,
    /// Error message, empty when valid.
    pub error: String,
}

impl FieldUpdate {
    pub fn valid(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_valid: true,
            error: String::new(),
        }
    }

    pub fn invalid(value: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_valid: false,
            error: error.into(),
        }
    }

    /// Build from a validator result.
    pub fn from_check(value: impl Into<String>, check: Result<(), &'static str>) -> Self {
        match check {
            Ok(()) => Self::valid(value),
            Err(message) => Self::invalid(value, message),
        }
    }
}

/// Result of validating the fields of one checkout step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FormValidation {
    /// True iff every field of the step is valid.
    pub is_valid: bool,
    /// Errors for the step's fields only.
    pub errors: ValidationErrors,
}

impl FormValidation {
    /// Combine per-field checks. Validity is the conjunction of all checks.
    pub fn from_checks(checks: impl IntoIterator<Item = (Field, Result<(), &'static str>)>) -> Self {
        let mut errors = ValidationErrors::new();
        let mut is_valid = true;
        for (field, check) in checks {
            let message = match check {
                Ok(()) => String::new(),
                Err(message) => {
                    is_valid = false;
                    message.to_string()
                }
            };
            errors.insert(field, message);
        }
        Self { is_valid, errors }
    }

    /// Error for one field, `None` if valid or not part of this step.
    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors
            .get(&field)
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    /// First non-empty error in field order, for a single-line error slot.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.values().map(String::as_str).find(|m| !m.is_empty())
    }

    /// Fields that failed.
    pub fn invalid_fields(&self) -> Vec<Field> {
        self.errors
            .iter()
            .filter(|(_, m)| !m.is_empty())
            .map(|(f, _)| *f)
            .collect()
    }
}

/// Email must be non-blank and contain `@`.
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.trim().is_empty() {
        return Err(ENTER_EMAIL);
    }
    if !email.contains('@') {
        return Err(INVALID_EMAIL);
    }
    Ok(())
}

/// Keep only ASCII digits and `+`.
pub fn clean_phone(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Cleaned phone numbers must match this.
const PHONE_PATTERN: &str = r"^(\+7|8)[0-9]{10}$";

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern compiles"))
}

/// Phone must clean to `+7XXXXXXXXXX` or `8XXXXXXXXXX`.
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    if phone.trim().is_empty() {
        return Err(ENTER_PHONE);
    }
    if !phone_pattern().is_match(&clean_phone(phone)) {
        return Err(INVALID_PHONE);
    }
    Ok(())
}

/// Address must be non-blank.
pub fn validate_address(address: &str) -> Result<(), &'static str> {
    if address.trim().is_empty() {
        return Err(ENTER_ADDRESS);
    }
    Ok(())
}

/// A payment method must be selected.
pub fn validate_payment(payment: Option<PaymentMethod>) -> Result<(), &'static str> {
    match payment {
        Some(_) => Ok(()),
        None => Err(SELECT_PAYMENT),
    }
}
