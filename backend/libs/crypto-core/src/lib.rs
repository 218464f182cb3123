//! Cryptographic primitives shared by Postboard services
//!
//! - `password`: Argon2id password hashing and verification
//! - `token`: signed, expiring HS256 tokens for sessions and password resets
//! - `hash`: SHA-256 digests used to index issued tokens

pub mod hash;
pub mod password;
pub mod token;

pub use hash::{sha256, sha256_hex};
pub use password::{hash_password, verify_password};
pub use token::{Claims, IssuedToken, TokenSigner, PASSWORD_RESET_TOKEN, SESSION_TOKEN};

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("failed to hash password: {0}")]
    PasswordHash(String),

    #[error("password does not match")]
    PasswordMismatch,

    #[error("signing secret must be at least {min} bytes")]
    WeakSecret { min: usize },

    #[error("failed to sign token: {0}")]
    TokenSigning(String),

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("unexpected token type: expected {expected}, found {found}")]
    TokenTypeMismatch { expected: String, found: String },
}

pub type Result<T> = std::result::Result<T, CryptoError>;
