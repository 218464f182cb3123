//! Shared fixtures for postboard-service integration tests
#![allow(dead_code)]

use actix_middleware::SESSION_COOKIE;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::header;
use async_trait::async_trait;
use chrono::Duration;
use crypto_core::{TokenSigner, SESSION_TOKEN};
use db_pool::{create_pool, DbConfig};
use postboard_service::flash::{decode_flashes, Flash, FLASH_COOKIE};
use postboard_service::forms::SignUpForm;
use postboard_service::models::User;
use postboard_service::services::{Mailer, OutgoingEmail};
use postboard_service::{AppError, AppState, AuthSettings, MIGRATOR};
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &[u8] = b"integration-test-signing-secret";
pub const PASSWORD: &str = "secret123";

/// Mailer that keeps every message instead of sending it
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }

    /// Token from the link in the most recent reset email
    pub fn last_reset_token(&self) -> Option<String> {
        let sent = self.sent.lock().unwrap();
        let body = &sent.last()?.body;
        let start = body.find("/reset-password/")? + "/reset-password/".len();
        let token = body[start..].split_whitespace().next()?;
        Some(token.to_string())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutgoingEmail) -> postboard_service::Result<()> {
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

/// Mailer whose SMTP relay is always down
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: OutgoingEmail) -> postboard_service::Result<()> {
        Err(AppError::Mail("smtp down".to_string()))
    }
}

/// `state` with its mailer replaced
pub fn with_mailer(state: &AppState, mailer: Arc<dyn Mailer>) -> AppState {
    AppState {
        mailer,
        ..state.clone()
    }
}

/// Fresh in-memory database with the schema applied
pub async fn test_state() -> (AppState, Arc<RecordingMailer>) {
    let db = create_pool(DbConfig::in_memory("postboard-test"))
        .await
        .expect("create in-memory pool");
    MIGRATOR.run(&db).await.expect("run migrations");

    let mailer = Arc::new(RecordingMailer::default());
    let state = AppState {
        db,
        tokens: Arc::new(TokenSigner::from_secret(TEST_SECRET).expect("signer")),
        mailer: mailer.clone(),
        settings: AuthSettings::default(),
    };

    (state, mailer)
}

/// Build the full application around `state`
macro_rules! init_app {
    ($state:expr) => {{
        let state: postboard_service::AppState = $state.clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(state.clone()))
                .wrap(actix_middleware::SessionAuth::new(state.tokens.clone()))
                .wrap(
                    actix_middleware::RequestLogging::new()
                        .redact_after(postboard_service::handlers::RESET_TOKEN_PREFIX),
                )
                .configure(postboard_service::routes::configure),
        )
        .await
    }};
}
pub(crate) use init_app;

pub async fn create_user(state: &AppState, email: &str, username: &str) -> User {
    state
        .auth_service()
        .register(&SignUpForm {
            email: email.to_string(),
            username: username.to_string(),
            password: PASSWORD.to_string(),
            confirm_password: PASSWORD.to_string(),
        })
        .await
        .expect("register user")
}

/// A valid session cookie for `user`, as a login would set it
pub fn session_for(state: &AppState, user: &User) -> Cookie<'static> {
    let issued = state
        .tokens
        .issue(&user.id.to_string(), SESSION_TOKEN, Duration::hours(1))
        .expect("issue session");
    Cookie::new(SESSION_COOKIE, issued.token)
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

pub fn response_cookie<B>(resp: &ServiceResponse<B>, name: &str) -> Option<Cookie<'static>> {
    resp.response()
        .cookies()
        .find(|c| c.name() == name)
        .map(|c| c.into_owned())
}

/// Messages queued for the next page
pub fn flashes<B>(resp: &ServiceResponse<B>) -> Vec<Flash> {
    response_cookie(resp, FLASH_COOKIE)
        .and_then(|c| decode_flashes(c.value()))
        .unwrap_or_default()
}

pub fn flash_texts<B>(resp: &ServiceResponse<B>) -> Vec<String> {
    flashes(resp).into_iter().map(|f| f.message).collect()
}

pub async fn body_text<B>(resp: ServiceResponse<B>) -> String
where
    B: actix_web::body::MessageBody,
{
    let bytes = actix_web::test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub async fn count(state: &AppState, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(&state.db)
        .await
        .expect("count rows")
}
