use actix_web::{HttpResponse, ResponseError};

use crate::utils::error::CustomError;

pub async fn not_found() -> HttpResponse {
    CustomError::NotFoundError("Route does not exist".to_string()).error_response()
}
