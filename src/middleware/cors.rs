use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::Method;
use actix_web::middleware::{DefaultHeaders, Next};
use actix_web::{Error, HttpResponse};

pub fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", "*"))
        .add(("Access-Control-Allow-Headers", "*"))
}

/// Answers every `OPTIONS` request with an empty 200.
pub async fn preflight(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    if req.method() == Method::OPTIONS {
        return Ok(req
            .into_response(HttpResponse::Ok().finish())
            .map_into_right_body());
    }

    next.call(req)
        .await
        .map(|res| res.map_into_left_body())
}
