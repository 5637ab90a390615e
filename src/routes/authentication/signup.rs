use std::{error::Error, fmt::Debug};

use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use anyhow::Context;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::{db_interaction::{insert_user_into_database, UserInsertError}, domain::{user_level::UserLevel, username::Username}, routes::message_response, utils::{error_fmt_chain, get_pooled_connection, not_blank, DbPool}};

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;

#[derive(Deserialize, Debug, Validate)]
pub struct SignUpRequest{
    #[validate(
        length(min = 1, max = 128, message = "name must be 1 to 128 characters long"),
        custom(function = "not_blank")
    )]
    pub name: String,
    pub username: String,
    pub password: SecretString,
    #[serde(default)]
    pub level: UserLevel
}

#[derive(Serialize, Deserialize, Debug)]
pub struct SignUpResponse{
    pub message: String,
    pub user_id: Uuid
}

#[derive(Error)]
pub enum SignUpError{
    #[error("{0}")]
    ValidationError(String),
    #[error("{0}")]
    UsernameTaken(#[source] UserInsertError),
    #[error("Not able to sign up user")]
    UnexpectedError(#[from] anyhow::Error)
}

impl Debug for SignUpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)?;
        error_fmt_chain(f, &self.source())
    }
}

impl ResponseError for SignUpError {
    fn status_code(&self) -> StatusCode {
        match self {
            SignUpError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SignUpError::UsernameTaken(_) => StatusCode::CONFLICT,
            SignUpError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse<actix_web::body::BoxBody> {
        message_response(self.status_code(), self.to_string())
    }
}

fn check_password(password: &SecretString) -> Result<(), SignUpError>{
    let length = password.expose_secret().chars().count();
    if (MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&length) {
        Ok(())
    } else {
        Err(SignUpError::ValidationError(format!(
            "password must be {} to {} characters long",
            MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
        )))
    }
}

#[tracing::instrument(
    "Signing up user",
    skip(pool, request),
    fields(username = %request.username, level = %request.level)
)]
pub async fn signup(
    pool: web::Data<DbPool>,
    request: web::Json<SignUpRequest>
) -> Result<HttpResponse, SignUpError> {
    request.validate()
        .map_err(|e| SignUpError::ValidationError(e.to_string()))?;
    check_password(&request.password)?;

    let request = request.into_inner();
    let username = Username::parse(request.username)
        .map_err(SignUpError::ValidationError)?;

    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user_id = insert_user_into_database(
        conn,
        request.name.trim().to_string(),
        username,
        request.password,
        request.level
    )
    .await
    .map_err(|e| {
        match e {
            UserInsertError::UsernameTaken(_) => SignUpError::UsernameTaken(e),
            _ => SignUpError::UnexpectedError(e.into())
        }
    })?;

    Ok(HttpResponse::Ok().json(SignUpResponse{
        message: "User successfully registered".to_string(),
        user_id
    }))
}
