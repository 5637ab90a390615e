use std::fmt::Debug;

use actix_web::{error::{InternalError, JsonPayloadError}, http::StatusCode, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

// Body of every error and of plain success responses
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiMessage{
    pub message: String
}

impl ApiMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self{ message: message.into() }
    }
}

pub fn message_response(status: StatusCode, message: impl Into<String>) -> HttpResponse{
    HttpResponse::build(status).json(ApiMessage::new(message))
}

// Malformed or mistyped json bodies answer 400 with an ApiMessage
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error{
    let response = message_response(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", err));
    InternalError::from_response(err, response).into()
}

// Logs the cause and answers 500 with a generic ApiMessage
pub fn internal_error<E: Debug>(message: &'static str, cause: E) -> actix_web::Error{
    tracing::error!(error = ?cause, "{}", message);
    let response = message_response(StatusCode::INTERNAL_SERVER_ERROR, message);
    InternalError::from_response(message, response).into()
}
