//! Submitted HTML forms and their field rules
//!
//! Every form deserializes with `#[serde(default)]` so a missing field is an
//! empty string and gets reported by the validators instead of failing the
//! extractor with a bare 400.

use serde::Deserialize;
use std::fmt;
use validator::{Validate, ValidationErrors};

/// Ordered list of user-facing validation messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<String>);

impl FormErrors {
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    /// Flatten validator output, walking fields in declaration order
    fn from_validation(errors: &ValidationErrors, fields: &[&str]) -> Self {
        let by_field = errors.field_errors();
        let mut out = Self::default();

        for field in fields {
            let Some(field_errors) = by_field.get(*field) else {
                continue;
            };
            for error in field_errors.iter() {
                match &error.message {
                    Some(message) => out.push(message.to_string()),
                    None => out.push(format!("Invalid {}", field.replace('_', " "))),
                }
            }
        }

        out
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

/// A form whose validator output can be reported field by field
pub trait FormFields: Validate {
    const FIELDS: &'static [&'static str];

    fn check(&self) -> Result<(), FormErrors> {
        self.validate()
            .map_err(|e| FormErrors::from_validation(&e, Self::FIELDS))
    }
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct SignUpForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 6, max = 20, message = "Username must be between 6 and 20 characters long"))]
    pub username: String,
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters long"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords must match"))]
    pub confirm_password: String,
}

impl FormFields for SignUpForm {
    const FIELDS: &'static [&'static str] = &["email", "username", "password", "confirm_password"];
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    /// Where to go after a successful login
    pub next: Option<String>,
}

impl FormFields for LoginForm {
    const FIELDS: &'static [&'static str] = &["email", "password"];
}

/// Used both for changing a password and for redeeming a reset token
#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct NewPasswordForm {
    #[validate(length(min = 6, max = 20, message = "Password must be between 6 and 20 characters long"))]
    pub new_password: String,
    #[validate(must_match(other = "new_password", message = "Passwords must match"))]
    pub confirm_password: String,
}

impl FormFields for NewPasswordForm {
    const FIELDS: &'static [&'static str] = &["new_password", "confirm_password"];
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ChangeUsernameForm {
    #[validate(length(min = 6, max = 20, message = "Username must be between 6 and 20 characters long"))]
    pub new_username: String,
}

impl FormFields for ChangeUsernameForm {
    const FIELDS: &'static [&'static str] = &["new_username"];
}

#[derive(Debug, Default, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct RequestResetForm {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

impl FormFields for RequestResetForm {
    const FIELDS: &'static [&'static str] = &["email"];
}

/// Body of a post or a comment
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct TextForm {
    pub text: String,
}

impl TextForm {
    /// Text exactly as typed, `None` when it is blank
    pub fn content(&self) -> Option<&str> {
        (!self.text.trim().is_empty()).then_some(self.text.as_str())
    }
}

/// `?next=` on the login page
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// Accept only same-site absolute paths as a post-login destination
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}
