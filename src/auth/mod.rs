use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use thiserror::Error;

use crate::{domain::user_level::UserLevel, routes::message_response, utils::error_fmt_chain};

pub mod extractors;

#[derive(Error)]
pub enum AuthError{
    #[error("User is not logged in")]
    NotLoggedIn,
    #[error("Only {required} users can do this, user is {actual}")]
    WrongLevel{
        required: UserLevel,
        actual: UserLevel
    },
    #[error("Failed due to internal error")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            AuthError::WrongLevel{ .. } => StatusCode::FORBIDDEN,
            AuthError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        message_response(self.status_code(), self.to_string())
    }
}
