use actix_web::{http::StatusCode, HttpResponse};

use super::message_response;

#[tracing::instrument(
    "Checking if api is online"
)]
pub async fn health_check() -> HttpResponse{
    message_response(StatusCode::OK, "Working")
}
