/// Postboard Service Library
///
/// A small server-rendered social board: accounts, posts and comments.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers, one module per area
/// - `routes`: route table
/// - `services`: business logic layer
/// - `db`: SQLite repositories
/// - `models`: stored rows and view structs
/// - `forms`: submitted forms and their validation rules
/// - `templates`: HTML pages
/// - `flash`: one-shot status messages
/// - `session`: current-user extractor
/// - `error`: error types and their HTML responses
/// - `config`: configuration from the environment
/// - `telemetry`: tracing subscriber setup
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod telemetry;
pub mod templates;

pub use config::Config;
pub use error::{AppError, Result};

use crypto_core::TokenSigner;
use services::{AuthService, CommentService, Mailer, PostService, ProfileService};
use sqlx::SqlitePool;
use std::sync::Arc;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Token lifetimes and link settings
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub session_ttl_secs: i64,
    pub reset_token_ttl_secs: i64,
    /// Overrides the request-derived base of emailed links
    pub public_base_url: Option<String>,
    pub secure_cookies: bool,
}

impl AuthSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            session_ttl_secs: config.session_ttl_secs,
            reset_token_ttl_secs: config.reset_token_ttl_secs,
            public_base_url: config
                .public_base_url
                .as_ref()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            secure_cookies: config.secure_cookies,
        }
    }
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_secs: 7 * 24 * 60 * 60,
            reset_token_ttl_secs: 1800,
            public_base_url: None,
            secure_cookies: false,
        }
    }
}

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub tokens: Arc<TokenSigner>,
    pub mailer: Arc<dyn Mailer>,
    pub settings: AuthSettings,
}

impl AppState {
    pub fn auth_service(&self) -> AuthService {
        AuthService::new(
            self.db.clone(),
            self.tokens.clone(),
            self.mailer.clone(),
            self.settings.clone(),
        )
    }

    pub fn post_service(&self) -> PostService {
        PostService::new(self.db.clone())
    }

    pub fn comment_service(&self) -> CommentService {
        CommentService::new(self.db.clone())
    }

    pub fn profile_service(&self) -> ProfileService {
        ProfileService::new(self.db.clone())
    }
}
