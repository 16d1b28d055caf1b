//! Per-field validation rules for the auth form.
//!
//! Rules run imperatively on every submit attempt. Each field reports only its
//! first failing rule; fields are checked independently of each other.

use std::collections::BTreeMap;

use super::model::{Field, FormMode, FormValues};

/// Characters that satisfy the password special-character rule.
pub const SPECIAL_CHARACTERS: &str = r"!@#$%^&*()_+{}[]:;<>,.?~\/-";

pub const USERNAME_MIN_LEN: usize = 3;
pub const PASSWORD_MIN_LEN: usize = 5;

pub const USERNAME_REQUIRED: &str = "Username is required";
pub const USERNAME_TOO_SHORT: &str = "Username must be at least 3 characters";
pub const EMAIL_REQUIRED: &str = "Email is required";
pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_WEAK: &str =
    "Password must be at least 5 characters and contain at least one special character";

/// Field name to message mapping for the fields that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<Field, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

}

/// Validate the fields rendered in `mode`.
#[must_use]
pub fn validate(mode: FormMode, values: &FormValues) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for &field in mode.fields() {
        if let Some(message) = check_field(field, values.get(field)) {
            errors.insert(field, message);
        }
    }
    errors
}

/// First failing rule of `field` for `value`.
#[must_use]
pub fn check_field(field: Field, value: &str) -> Option<&'static str> {
    match field {
        Field::Username => check_username(value),
        Field::Email => check_email(value),
        Field::Password => check_password(value),
    }
}

fn check_username(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some(USERNAME_REQUIRED);
    }
    (input_length(value) < USERNAME_MIN_LEN).then_some(USERNAME_TOO_SHORT)
}

// Presence only; format is left to the browser's `type="email"` input.
fn check_email(value: &str) -> Option<&'static str> {
    value.is_empty().then_some(EMAIL_REQUIRED)
}

fn check_password(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some(PASSWORD_REQUIRED);
    }
    let long_enough = input_length(value) >= PASSWORD_MIN_LEN;
    if long_enough && has_special_character(value) {
        None
    } else {
        Some(PASSWORD_TOO_WEAK)
    }
}

/// Length as the browser reports it: UTF-16 code units.
fn input_length(value: &str) -> usize {
    value.encode_utf16().count()
}

/// Whether `value` contains at least one of [`SPECIAL_CHARACTERS`].
#[must_use]
pub fn has_special_character(value: &str) -> bool {
    value.chars().any(|c| SPECIAL_CHARACTERS.contains(c))
}
