use std::sync::LazyLock;

use regex::Regex;

use crate::utils::error::{CustomError, FieldError};

const MIN_PASSWORD_LENGTH: usize = 5;
const MIN_TEXT_LENGTH: usize = 5;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]{2,}$").expect("email pattern compiles")
});

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Non-empty and at least `min` characters long.
fn long_enough(value: &str, min: usize) -> bool {
    !value.is_empty() && value.chars().count() >= min
}

fn finish(errors: Vec<FieldError>) -> Result<(), CustomError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CustomError::invalid_input(errors))
    }
}

pub fn validate_signup(email: &str, password: &str) -> Result<(), CustomError> {
    let mut errors = Vec::new();

    if !is_valid_email(email) {
        errors.push(FieldError::new("Email is invalid"));
    }
    if !long_enough(password, MIN_PASSWORD_LENGTH) {
        errors.push(FieldError::new("Password too short"));
    }

    finish(errors)
}

pub fn validate_post(title: &str, content: &str) -> Result<(), CustomError> {
    let mut errors = Vec::new();

    if !long_enough(title, MIN_TEXT_LENGTH) {
        errors.push(FieldError::new("Title is invalid"));
    }
    if !long_enough(content, MIN_TEXT_LENGTH) {
        errors.push(FieldError::new("Content is invalid"));
    }

    finish(errors)
}
