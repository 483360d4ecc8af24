use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

/// A single failed field check, reported inside a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub message: String,
}

impl FieldError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum CustomError {
    #[error("{0}")]
    UnauthenticatedError(String),

    #[error("{message}")]
    ValidationError {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("{0}")]
    ForbiddenError(String),

    #[error("{0}")]
    NotFoundError(String),

    #[error("{0}")]
    ConflictError(String),

    #[error("{0}")]
    BadRequestError(String),

    #[error("{0}")]
    InternalServerError(String),
}

impl CustomError {
    pub fn not_authenticated() -> Self {
        CustomError::UnauthenticatedError("Not authenticated!".to_string())
    }

    pub fn invalid_input(errors: Vec<FieldError>) -> Self {
        CustomError::ValidationError {
            message: "Invalid input!".to_string(),
            errors,
        }
    }

    /// Logs the driver failure and hides its details from the caller.
    pub fn store(context: &str, err: impl std::fmt::Display) -> Self {
        log::error!("{context}: {err}");
        CustomError::InternalServerError(context.to_string())
    }

    fn data(&self) -> Value {
        match self {
            CustomError::ValidationError { errors, .. } => json!(errors),
            _ => Value::Null,
        }
    }
}

impl ResponseError for CustomError {
    fn status_code(&self) -> StatusCode {
        match *self {
            CustomError::UnauthenticatedError(..) => StatusCode::UNAUTHORIZED,
            CustomError::ValidationError { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            CustomError::ForbiddenError(..) => StatusCode::FORBIDDEN,
            CustomError::NotFoundError(..) => StatusCode::NOT_FOUND,
            CustomError::ConflictError(..) => StatusCode::CONFLICT,
            CustomError::BadRequestError(..) => StatusCode::BAD_REQUEST,
            CustomError::InternalServerError(..) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string(),
            "code": self.status_code().as_u16(),
            "data": self.data(),
        }))
    }
}
