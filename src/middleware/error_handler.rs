use actix_web::error::JsonPayloadError;
use actix_web::{Error, HttpRequest};

use crate::utils::error::CustomError;

/// Renders body parse failures in the same shape as every other error.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    log::debug!("Rejected request body: {err}");
    CustomError::BadRequestError(format!("Invalid request body: {err}")).into()
}
