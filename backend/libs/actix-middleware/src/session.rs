//! Session-cookie identity middleware
//!
//! Reads the signed session cookie, verifies it with the shared
//! `TokenSigner` and stores the user id in request extensions. Requests
//! without a valid cookie pass through anonymously; routes decide for
//! themselves whether a session is required.

use actix_web::{
    cookie::{time, Cookie, SameSite},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use crypto_core::{TokenSigner, SESSION_TOKEN};
use futures::future::{ready, Ready};
use std::sync::Arc;

/// Name of the cookie carrying the session token
pub const SESSION_COOKIE: &str = "postboard_session";

/// User id taken from a verified session cookie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUserId(pub i64);

/// Session authentication middleware
#[derive(Clone)]
pub struct SessionAuth {
    signer: Arc<TokenSigner>,
    cookie_name: &'static str,
}

impl SessionAuth {
    pub fn new(signer: Arc<TokenSigner>) -> Self {
        Self {
            signer,
            cookie_name: SESSION_COOKIE,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = SessionAuthService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionAuthService {
            service,
            signer: self.signer.clone(),
            cookie_name: self.cookie_name,
        }))
    }
}

pub struct SessionAuthService<S> {
    service: S,
    signer: Arc<TokenSigner>,
    cookie_name: &'static str,
}

impl<S> SessionAuthService<S> {
    fn identify(&self, req: &ServiceRequest) -> Option<SessionUserId> {
        let cookie = req.cookie(self.cookie_name)?;

        let claims = match self.signer.verify(cookie.value(), SESSION_TOKEN) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Ignoring invalid session cookie");
                return None;
            }
        };

        match claims.sub.parse::<i64>() {
            Ok(id) => Some(SessionUserId(id)),
            Err(e) => {
                tracing::warn!(error = %e, sub = %claims.sub, "Session token carries a malformed user id");
                None
            }
        }
    }
}

impl<S, B> Service<ServiceRequest> for SessionAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = S::Future;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(user_id) = self.identify(&req) {
            req.extensions_mut().insert(user_id);
        }

        self.service.call(req)
    }
}

/// FromRequest implementation for SessionUserId
impl actix_web::FromRequest for SessionUserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        match req.extensions().get::<SessionUserId>() {
            Some(user_id) => ready(Ok(*user_id)),
            None => ready(Err(actix_web::error::ErrorUnauthorized(
                "User not authenticated",
            ))),
        }
    }
}

/// Cookie that establishes a session
pub fn session_cookie(token: String, max_age: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(max_age.num_seconds()))
        .finish()
}

/// Cookie that tells the browser to drop the session
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish();
    cookie.make_removal();
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test as actix_test, web, App};
    use chrono::Duration;
    use crypto_core::PASSWORD_RESET_TOKEN;

    const SECRET: &[u8] = b"middleware-test-secret-value";

    async fn whoami(user: Option<SessionUserId>) -> String {
        user.map(|u| u.0.to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }

    async fn call_with_cookie(signer: Arc<TokenSigner>, cookie: Option<String>) -> web::Bytes {
        let app = actix_test::init_service(
            App::new()
                .wrap(SessionAuth::new(signer))
                .route("/", web::get().to(whoami)),
        )
        .await;

        let mut req = actix_test::TestRequest::get().uri("/");
        if let Some(value) = cookie {
            req = req.cookie(Cookie::new(SESSION_COOKIE, value));
        }

        actix_test::call_and_read_body(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn valid_cookie_identifies_user() {
        let signer = Arc::new(TokenSigner::from_secret(SECRET).unwrap());
        let token = signer.issue("42", SESSION_TOKEN, Duration::hours(1)).unwrap().token;

        let body = call_with_cookie(signer, Some(token)).await;
        assert_eq!(body, web::Bytes::from_static(b"42"));
    }

    #[actix_web::test]
    async fn missing_cookie_is_anonymous() {
        let signer = Arc::new(TokenSigner::from_secret(SECRET).unwrap());

        let body = call_with_cookie(signer, None).await;
        assert_eq!(body, web::Bytes::from_static(b"anonymous"));
    }

    #[actix_web::test]
    async fn reset_token_is_not_a_session() {
        let signer = Arc::new(TokenSigner::from_secret(SECRET).unwrap());
        let token = signer
            .issue("42", PASSWORD_RESET_TOKEN, Duration::hours(1))
            .unwrap()
            .token;

        let body = call_with_cookie(signer, Some(token)).await;
        assert_eq!(body, web::Bytes::from_static(b"anonymous"));
    }

    #[actix_web::test]
    async fn forged_cookie_is_anonymous() {
        let signer = Arc::new(TokenSigner::from_secret(SECRET).unwrap());
        let other = TokenSigner::from_secret(b"some-other-secret-entirely").unwrap();
        let token = other.issue("42", SESSION_TOKEN, Duration::hours(1)).unwrap().token;

        let body = call_with_cookie(signer, Some(token)).await;
        assert_eq!(body, web::Bytes::from_static(b"anonymous"));
    }

    #[test]
    fn removal_cookie_expires_immediately() {
        let cookie = expired_session_cookie();
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
    }
}
