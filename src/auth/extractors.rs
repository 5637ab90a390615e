use actix_session::SessionExt;
use actix_web::{web, FromRequest, HttpRequest};
use anyhow::Context;
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::{db_interaction::get_user_by_id, domain::user_level::UserLevel, session_state::TypedSession, utils::{get_pooled_connection, DbPool}};

use super::AuthError;

/// The logged in user, with the level currently stored in the database.
#[derive(Debug, Clone, Copy)]
pub struct LoggedInUser{
    pub user_id: Uuid,
    pub level: UserLevel
}

impl LoggedInUser {
    pub fn require(self, required: UserLevel) -> Result<Self, AuthError>{
        if self.level == required {
            Ok(self)
        } else {
            Err(AuthError::WrongLevel{ required, actual: self.level })
        }
    }
}

// Extractor for level 0 users
pub struct IsCustomer(pub LoggedInUser);

// Extractor for level 1 users
pub struct IsVendor(pub LoggedInUser);

// Extractor for level 2 users
pub struct IsAdmin(pub LoggedInUser);

#[tracing::instrument(
    "Resolving logged in user from session",
    skip_all
)]
async fn resolve_user(session: TypedSession, pool: Option<web::Data<DbPool>>) -> Result<LoggedInUser, AuthError>{
    let user_id = match session.get_user_id() {
        Ok(Some(user_id)) => user_id,
        Ok(None) => return Err(AuthError::NotLoggedIn),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable session");
            session.log_out();
            return Err(AuthError::NotLoggedIn)
        }
    };

    let pool = pool.context("Database pool is not registered as app data")?;
    let conn = get_pooled_connection(&pool)
        .await
        .context("Failed to get connection from pool")?;

    let user = match get_user_by_id(conn, user_id).await? {
        Some(user) => user,
        None => {
            tracing::info!(%user_id, "Session refers to a user that no longer exists");
            session.log_out();
            return Err(AuthError::NotLoggedIn)
        }
    };

    let level = user.user_level()
        .context("Stored user level is out of range")?;

    Ok(LoggedInUser{ user_id, level })
}

fn resolve_from_request(req: &HttpRequest) -> LocalBoxFuture<'static, Result<LoggedInUser, AuthError>>{
    let session = TypedSession(req.get_session());
    let pool = req.app_data::<web::Data<DbPool>>().cloned();

    Box::pin(resolve_user(session, pool))
}

impl FromRequest for LoggedInUser {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        resolve_from_request(req)
    }
}

impl FromRequest for IsCustomer {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = resolve_from_request(req);
        Box::pin(async move {
            Ok(IsCustomer(user.await?.require(UserLevel::Customer)?))
        })
    }
}

impl FromRequest for IsVendor {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = resolve_from_request(req);
        Box::pin(async move {
            Ok(IsVendor(user.await?.require(UserLevel::Vendor)?))
        })
    }
}

impl FromRequest for IsAdmin {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = resolve_from_request(req);
        Box::pin(async move {
            Ok(IsAdmin(user.await?.require(UserLevel::Admin)?))
        })
    }
}
