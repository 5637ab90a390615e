use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::{db_interaction::get_user_by_username, domain::username::Username, password::verify_password, routes::message_response, session_state::TypedSession, utils::{error_fmt_chain, get_pooled_connection, DbPool}};

#[derive(Deserialize, Debug)]
pub struct LoginRequest{
    pub username: String,
    pub password: SecretString
}

#[derive(Error)]
pub enum LoginError{
    #[error("Username or password is incorrect")]
    InvalidCredentials,
    #[error("Not able to login user")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for LoginError {
    fn status_code(&self) -> StatusCode {
        match self {
            LoginError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            LoginError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        message_response(self.status_code(), self.to_string())
    }
}

#[tracing::instrument(
    "Logging in user",
    skip(pool, request, session),
    fields(username = %request.username, user_id = tracing::field::Empty)
)]
pub async fn login(
    pool: web::Data<DbPool>,
    request: web::Json<LoginRequest>,
    session: TypedSession
) -> Result<HttpResponse, LoginError>{
    let request = request.into_inner();

    // A username that could never have signed up can't match anyone
    let username = match Username::parse(request.username) {
        Ok(username) => username,
        Err(_) => return Err(LoginError::InvalidCredentials)
    };

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = match get_user_by_username(conn, username).await? {
        Some(user) => user,
        None => {
            tracing::info!("No user registered with this username");
            return Err(LoginError::InvalidCredentials)
        }
    };

    let verified = verify_password(request.password, SecretString::from(user.password_hash))
        .await
        .context("Failed to verify password")?;

    if !verified {
        tracing::info!("Passwords did not match");
        return Err(LoginError::InvalidCredentials)
    }

    tracing::Span::current().record("user_id", tracing::field::display(&user.user_id));

    session.renew();
    session.insert_user_id(user.user_id)
        .context("Failed to insert associated user_id to session")?;

    Ok(message_response(StatusCode::OK, "User successfully logged in"))
}
