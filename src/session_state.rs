use actix_session::{Session, SessionExt, SessionGetError, SessionInsertError};
use actix_web::{dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform}, FromRequest};
use futures_util::future::{ready, LocalBoxFuture, Ready};
use tracing::Instrument;
use uuid::Uuid;

use crate::auth::AuthError;

const USER_ID_KEY: &str = "user_id";

/// Session keyed by the logged in user's id and nothing else.
#[derive(Clone)]
pub struct TypedSession(pub Session);

impl TypedSession {
    pub fn get_user_id(&self) -> Result<Option<Uuid>, SessionGetError>{
        self.0.get::<Uuid>(USER_ID_KEY)
    }

    pub fn insert_user_id(&self, user_id: Uuid) -> Result<(), SessionInsertError>{
        self.0.insert(USER_ID_KEY, user_id)
    }

    pub fn renew(&self){
        self.0.renew();
    }

    pub fn log_out(&self){
        self.0.purge();
    }
}

impl FromRequest for TypedSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &actix_web::HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let session = req.get_session();
        ready(Ok(TypedSession(session)))
    }
}

// Rejects requests without a user in the session before the handler runs
pub struct RequireLogin;

impl<S> Transform<S, ServiceRequest> for RequireLogin
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static,
{
    type Response = ServiceResponse;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireLoginMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireLoginMiddleware{service}))
    }
}

pub struct RequireLoginMiddleware<S>{
    service: S
}

impl<S> Service<ServiceRequest> for RequireLoginMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse, Error = actix_web::Error>,
    S::Future: 'static
{
        type Error = actix_web::Error;
        type Response = S::Response;
        type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

        forward_ready!(service);

        #[tracing::instrument(
            "Checking if user is logged in",
            skip(self, req)
        )]
        fn call(&self, req: ServiceRequest) -> Self::Future {
            let session = TypedSession(req.get_session());
            let current_span = tracing::Span::current();

            let logged_in = match session.get_user_id() {
                Ok(user_id) => user_id.is_some(),
                Err(e) => {
                    tracing::warn!(error = %e, "Discarding unreadable session");
                    session.log_out();
                    false
                }
            };

            if !logged_in {
                return Box::pin(ready(
                    Err(actix_web::Error::from(AuthError::NotLoggedIn))
                ).instrument(current_span))
            }

            let fut = self.service.call(req);

            Box::pin(async move {
                let res = fut.await?;
                Ok(res)
            }
            .instrument(current_span))
        }
}
