//! # Actix Middleware Library
//!
//! Shared middleware components for Postboard Actix services
//!
//! ## Modules
//! - `session`: signed session-cookie identity
//! - `logging`: per-request tracing events

pub mod logging;
pub mod session;

pub use logging::{redact_path, RequestLogging};
pub use session::{
    expired_session_cookie, session_cookie, SessionAuth, SessionUserId, SESSION_COOKIE,
};
