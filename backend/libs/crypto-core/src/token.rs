/// Signed, expiring tokens for Postboard
///
/// One HS256 key signs every token the application hands out. The
/// `token_type` claim separates session cookies from password-reset links so
/// a token minted for one purpose is never accepted for the other.
///
/// ## Usage
///
/// ```rust
/// use chrono::Duration;
/// use crypto_core::token::{TokenSigner, SESSION_TOKEN};
///
/// let signer = TokenSigner::from_secret(b"a-long-random-signing-secret").unwrap();
/// let issued = signer.issue("42", SESSION_TOKEN, Duration::days(7)).unwrap();
/// let claims = signer.verify(&issued.token, SESSION_TOKEN).unwrap();
/// assert_eq!(claims.sub, "42");
/// ```
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{CryptoError, Result};

// ============================================================================
// Constants
// ============================================================================

/// Token type carried by login session cookies
pub const SESSION_TOKEN: &str = "session";

/// Token type carried by password-reset links
pub const PASSWORD_RESET_TOKEN: &str = "password_reset";

/// Minimum signing secret length in bytes
pub const MIN_SECRET_LENGTH: usize = 16;

const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

// ============================================================================
// Data Structures
// ============================================================================

/// Claims carried by every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Token type: "session" or "password_reset"
    pub token_type: String,
    /// Unique token id
    pub jti: String,
}

/// A freshly signed token together with the claims it carries
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

// ============================================================================
// Signer
// ============================================================================

#[derive(Clone)]
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSigner")
            .field("algorithm", &TOKEN_ALGORITHM)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

impl TokenSigner {
    /// Build a signer from the application secret
    ///
    /// ## Errors
    ///
    /// Returns `WeakSecret` if the secret is shorter than `MIN_SECRET_LENGTH`.
    pub fn from_secret(secret: &[u8]) -> Result<Self> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(CryptoError::WeakSecret {
                min: MIN_SECRET_LENGTH,
            });
        }

        let mut validation = Validation::new(TOKEN_ALGORITHM);
        validation.validate_exp = true;
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        })
    }

    /// Sign a new token for `subject` that expires after `ttl`
    pub fn issue(&self, subject: &str, token_type: &str, ttl: Duration) -> Result<IssuedToken> {
        let now = Utc::now();

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            token_type: token_type.to_string(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| CryptoError::TokenSigning(e.to_string()))?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify signature, expiry and purpose of a token
    ///
    /// ## Errors
    ///
    /// - `TokenExpired` once `exp` has passed
    /// - `TokenTypeMismatch` if the token was minted for another purpose
    /// - `InvalidToken` for malformed or badly signed input
    pub fn verify(&self, token: &str, expected_type: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => CryptoError::TokenExpired,
                _ => CryptoError::InvalidToken(e.to_string()),
            }
        })?;

        if data.claims.token_type != expected_type {
            tracing::debug!(
                expected = expected_type,
                found = %data.claims.token_type,
                "token presented for the wrong purpose"
            );
            return Err(CryptoError::TokenTypeMismatch {
                expected: expected_type.to_string(),
                found: data.claims.token_type,
            });
        }

        Ok(data.claims)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &[u8] = b"test-secret-for-unit-tests-only";

    fn signer() -> TokenSigner {
        TokenSigner::from_secret(TEST_SECRET).unwrap()
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = signer();
        let issued = signer.issue("7", SESSION_TOKEN, Duration::hours(1)).unwrap();

        assert_eq!(issued.token.matches('.').count(), 2); // JWT has 3 parts

        let claims = signer.verify(&issued.token, SESSION_TOKEN).unwrap();
        assert_eq!(claims, issued.claims);
        assert_eq!(claims.sub, "7");
    }

    #[test]
    fn test_short_secret_rejected() {
        assert!(matches!(
            TokenSigner::from_secret(b"short"),
            Err(CryptoError::WeakSecret { .. })
        ));
    }

    #[test]
    fn test_expired_token() {
        let signer = signer();
        let issued = signer
            .issue("7", PASSWORD_RESET_TOKEN, Duration::seconds(-5))
            .unwrap();

        assert!(matches!(
            signer.verify(&issued.token, PASSWORD_RESET_TOKEN),
            Err(CryptoError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_purpose_rejected() {
        let signer = signer();
        let issued = signer.issue("7", SESSION_TOKEN, Duration::hours(1)).unwrap();

        assert!(matches!(
            signer.verify(&issued.token, PASSWORD_RESET_TOKEN),
            Err(CryptoError::TokenTypeMismatch { .. })
        ));
    }

    #[test]
    fn test_other_secret_rejected() {
        let issued = signer().issue("7", SESSION_TOKEN, Duration::hours(1)).unwrap();
        let other = TokenSigner::from_secret(b"a-completely-different-secret").unwrap();

        assert!(matches!(
            other.verify(&issued.token, SESSION_TOKEN),
            Err(CryptoError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(signer().verify("invalid.token.here", SESSION_TOKEN).is_err());
        assert!(signer().verify("", SESSION_TOKEN).is_err());
    }

    #[test]
    fn test_each_token_has_unique_id() {
        let signer = signer();
        let a = signer.issue("7", PASSWORD_RESET_TOKEN, Duration::hours(1)).unwrap();
        let b = signer.issue("7", PASSWORD_RESET_TOKEN, Duration::hours(1)).unwrap();
        assert_ne!(a.claims.jti, b.claims.jti);
        assert_ne!(a.token, b.token);
    }
}
