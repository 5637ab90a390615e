use actix_web::{http::StatusCode, HttpResponse};

use crate::{routes::message_response, session_state::TypedSession};

// Only reachable behind RequireLogin
#[tracing::instrument(
    "Logging out currently logged in user",
    skip_all
)]
pub async fn logout(
    session: TypedSession
) -> HttpResponse {
    session.log_out();
    message_response(StatusCode::OK, "User is successfully logged out")
}
