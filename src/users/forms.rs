use serde::Deserialize;

use crate::forms::{is_valid_email, FieldError};

/// Raw registration form fields. Missing fields deserialize as empty so the
/// page re-renders with notices instead of rejecting the request outright.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.email.is_empty() {
            errors.push(FieldError::required("email"));
        } else if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email address."));
        }
        if self.password.is_empty() {
            errors.push(FieldError::required("password"));
        } else if self.password.len() < 8 {
            errors.push(FieldError::new(
                "password",
                "Field must be at least 8 characters long.",
            ));
        }
        errors
    }
}

/// Raw login form fields. `remember_me` arrives only when the checkbox is
/// ticked, so presence is the flag.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub remember_me: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.email.is_empty() {
            errors.push(FieldError::required("email"));
        } else if !is_valid_email(&self.email) {
            errors.push(FieldError::new("email", "Invalid email address."));
        }
        if self.password.is_empty() {
            errors.push(FieldError::required("password"));
        }
        errors
    }

    pub fn remember(&self) -> bool {
        self.remember_me.is_some()
    }
}
