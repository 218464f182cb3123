/// Error types for postboard-service
///
/// User-facing variants carry the exact text shown to the visitor and are
/// normally recovered by the handler (flash + redirect or re-render). Anything
/// that escapes a handler is turned into an HTML response here.
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use crypto_core::CryptoError;
use thiserror::Error;

use crate::flash::{self, Flash, Level};
use crate::forms::FormErrors;
use crate::templates::errors::error_page;

pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";
pub const INVALID_TOKEN_MESSAGE: &str = "That is an invalid or expired token";
const MAIL_FAILED_MESSAGE: &str = "The email could not be sent. Please try again later.";
const INTERNAL_MESSAGE: &str = "Something went wrong on our side. Please try again later.";

/// Result type for postboard-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {0}")]
    Validation(FormErrors),

    #[error("Wrong Password")]
    WrongPassword,

    #[error("Email is not registered")]
    EmailNotRegistered,

    #[error("That is an invalid or expired token")]
    InvalidToken,

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PermissionDenied(String),

    /// Carries the path to return to after logging in
    #[error("login required for {0}")]
    LoginRequired(String),

    #[error("mail delivery failed: {0}")]
    Mail(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(FormErrors::single(message))
    }

    /// Whether the visitor should see this error as a flash message
    pub fn is_user_facing(&self) -> bool {
        !matches!(
            self,
            AppError::LoginRequired(_) | AppError::Database(_) | AppError::Internal(_)
        )
    }

    /// Flash messages describing a user-facing error
    pub fn to_flashes(&self) -> Vec<Flash> {
        match self {
            AppError::Validation(errors) => errors
                .messages()
                .iter()
                .map(|m| Flash::new(Level::Error, m.clone()))
                .collect(),
            AppError::InvalidToken => vec![Flash::new(Level::Warning, INVALID_TOKEN_MESSAGE)],
            AppError::Mail(_) => vec![Flash::new(Level::Error, MAIL_FAILED_MESSAGE)],
            AppError::LoginRequired(_) => vec![Flash::new(Level::Info, LOGIN_REQUIRED_MESSAGE)],
            AppError::Database(_) | AppError::Internal(_) => {
                vec![Flash::new(Level::Error, INTERNAL_MESSAGE)]
            }
            other => vec![Flash::new(Level::Error, other.to_string())],
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Validation(errors) => errors.to_string(),
            AppError::Mail(_) => MAIL_FAILED_MESSAGE.to_string(),
            AppError::Database(_) | AppError::Internal(_) | AppError::LoginRequired(_) => {
                INTERNAL_MESSAGE.to_string()
            }
            other => other.to_string(),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::WrongPassword | AppError::EmailNotRegistered | AppError::InvalidToken => {
                StatusCode::UNAUTHORIZED
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            AppError::LoginRequired(_) => StatusCode::FOUND,
            AppError::Mail(_) => StatusCode::BAD_GATEWAY,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::LoginRequired(next) = self {
            let location = format!("/login?next={}", urlencoding::encode(next));
            return flash::redirect_with(&location, &self.to_flashes()).finish();
        }

        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(error_page(status, &self.public_message()))
    }
}

impl From<CryptoError> for AppError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::PasswordMismatch => AppError::WrongPassword,
            CryptoError::TokenExpired
            | CryptoError::InvalidToken(_)
            | CryptoError::TokenTypeMismatch { .. } => AppError::InvalidToken,
            other => AppError::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::header;

    #[test]
    fn login_required_redirects_with_next() {
        let resp = AppError::LoginRequired("/posts/alice smith".into()).error_response();

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap(),
            "/login?next=%2Fposts%2Falice%20smith"
        );

        let cookie = resp
            .cookies()
            .find(|c| c.name() == flash::FLASH_COOKIE)
            .unwrap();
        let carried = flash::decode_flashes(cookie.value()).unwrap();
        assert_eq!(carried[0].message, LOGIN_REQUIRED_MESSAGE);
    }

    #[test]
    fn user_facing_errors_keep_their_status() {
        assert_eq!(
            AppError::NotFound("Post does not exist".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::PermissionDenied("No permission to delete this post".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::validation("x").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let err = AppError::Internal("connection string sqlite:///secret.db".into());
        assert!(!err.is_user_facing());
        assert!(!err.public_message().contains("secret"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn invalid_token_flashes_a_warning() {
        let flashes = AppError::InvalidToken.to_flashes();
        assert_eq!(flashes, vec![Flash::new(Level::Warning, INVALID_TOKEN_MESSAGE)]);
    }

    #[test]
    fn validation_flashes_every_message() {
        let mut errors = FormErrors::single("Email is already taken");
        errors.push("Username is already taken");

        let flashes = AppError::Validation(errors).to_flashes();
        assert_eq!(flashes.len(), 2);
        assert_eq!(flashes[1].message, "Username is already taken");
    }

    #[test]
    fn crypto_errors_map_to_domain_errors() {
        assert!(matches!(
            AppError::from(CryptoError::PasswordMismatch),
            AppError::WrongPassword
        ));
        assert!(matches!(
            AppError::from(CryptoError::TokenExpired),
            AppError::InvalidToken
        ));
        assert!(matches!(
            AppError::from(CryptoError::PasswordHash("boom".into())),
            AppError::Internal(_)
        ));
    }
}
