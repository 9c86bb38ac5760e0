//! Controlled forms: listing create/edit, OTP registration, sign-in.
//!
//! Every form keeps its own field errors. Submission is refused while any
//! error is present; backend failures come back as a blocking [`Toast`].

use std::collections::BTreeMap;

pub mod property;
pub mod registration;
pub mod signin;

pub use property::{FormMode, PropertyForm};
pub use registration::{RegistrationFlow, RegistrationStep, OTP_RESEND_COOLDOWN};
pub use signin::SignInForm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Price,
    City,
    State,
    Address,
    ListingKind,
    Phone,
    Otp,
    FullName,
    Email,
    Password,
    ConfirmPassword,
    Identifier,
    Rating,
    Comment,
}

/// Inline, per-field error messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn clear(&mut self, field: Field) {
        self.0.remove(&field);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// Blocking alert shown after a backend failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
}

impl Toast {
    pub fn error(title: &str, err: &crate::error::Error) -> Self {
        Self {
            title: title.to_string(),
            message: err.toast_message(),
        }
    }
}

/// What the page should do after a submit attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Client-side validation failed; errors are on the form
    Invalid,
    /// Moved on to the next step of a multi-step flow
    Advanced,
    /// Done; navigate to this path
    Navigate(String),
    /// Backend refused or was unreachable
    Failed(Toast),
}

/// Strip separators and a `+977`/`977` prefix; `Some` only for 10 digits.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();
    let digits = digits.strip_prefix('+').unwrap_or(&digits);
    let digits = if digits.len() == 13 {
        digits.strip_prefix("977").unwrap_or(digits)
    } else {
        digits
    };

    (digits.len() == 10 && digits.chars().all(|c| c.is_ascii_digit())).then(|| digits.to_string())
}

pub fn is_valid_otp(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}

pub fn looks_like_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    }
}
