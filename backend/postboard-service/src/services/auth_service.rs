/// Account service - registration, login sessions, credential changes and
/// password resets
use crate::db::{is_unique_violation_on, password_reset_repo, user_repo};
use crate::error::{AppError, Result};
use crate::forms::{ChangeUsernameForm, FormFields, LoginForm, NewPasswordForm, RequestResetForm, SignUpForm};
use crate::models::User;
use crate::services::email::{Mailer, OutgoingEmail};
use crate::AuthSettings;
use chrono::Duration;
use crypto_core::{
    hash_password, sha256_hex, verify_password, IssuedToken, TokenSigner, PASSWORD_RESET_TOKEN,
    SESSION_TOKEN,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::{info, warn};

pub const EMAIL_TAKEN: &str = "Email is already taken";
pub const USERNAME_TAKEN: &str = "Username is already taken";
pub const RESET_EMAIL_UNKNOWN: &str = "Email you typed is not registered";

pub struct AuthService {
    pool: SqlitePool,
    tokens: Arc<TokenSigner>,
    mailer: Arc<dyn Mailer>,
    settings: AuthSettings,
}

impl AuthService {
    pub fn new(
        pool: SqlitePool,
        tokens: Arc<TokenSigner>,
        mailer: Arc<dyn Mailer>,
        settings: AuthSettings,
    ) -> Self {
        Self {
            pool,
            tokens,
            mailer,
            settings,
        }
    }

    /// Create an account
    ///
    /// Field rules and uniqueness are checked together so the visitor sees
    /// every problem at once.
    pub async fn register(&self, form: &SignUpForm) -> Result<User> {
        let mut errors = form.check().err().unwrap_or_default();

        if !form.email.is_empty() && user_repo::email_exists(&self.pool, &form.email).await? {
            errors.push(EMAIL_TAKEN);
        }
        if !form.username.is_empty()
            && user_repo::username_exists(&self.pool, &form.username).await?
        {
            errors.push(USERNAME_TAKEN);
        }
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        let password_hash = hash_password(&form.password)?;

        let user = user_repo::create_user(&self.pool, &form.email, &form.username, &password_hash)
            .await
            .map_err(|e| {
                if is_unique_violation_on(&e, "users.email") {
                    AppError::validation(EMAIL_TAKEN)
                } else if is_unique_violation_on(&e, "users.username") {
                    AppError::validation(USERNAME_TAKEN)
                } else {
                    AppError::Database(e)
                }
            })?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and sign a session token
    pub async fn login(&self, form: &LoginForm) -> Result<(User, IssuedToken)> {
        form.check().map_err(AppError::Validation)?;

        let user = user_repo::find_by_email(&self.pool, &form.email)
            .await?
            .ok_or(AppError::EmailNotRegistered)?;

        if let Err(e) = verify_password(&form.password, &user.password) {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(e.into());
        }

        let session = self.tokens.issue(
            &user.id.to_string(),
            SESSION_TOKEN,
            Duration::seconds(self.settings.session_ttl_secs),
        )?;

        info!(user_id = user.id, "User logged in");
        Ok((user, session))
    }

    pub async fn change_password(&self, user_id: i64, form: &NewPasswordForm) -> Result<()> {
        form.check().map_err(AppError::Validation)?;

        let password_hash = hash_password(&form.new_password)?;
        user_repo::update_password(&self.pool, user_id, &password_hash).await?;

        info!(user_id, "Password changed");
        Ok(())
    }

    pub async fn change_username(&self, user_id: i64, form: &ChangeUsernameForm) -> Result<()> {
        form.check().map_err(AppError::Validation)?;

        if user_repo::username_exists(&self.pool, &form.new_username).await? {
            return Err(AppError::validation(USERNAME_TAKEN));
        }

        user_repo::update_username(&self.pool, user_id, &form.new_username)
            .await
            .map_err(|e| {
                if is_unique_violation_on(&e, "users.username") {
                    AppError::validation(USERNAME_TAKEN)
                } else {
                    AppError::Database(e)
                }
            })?;

        info!(user_id, "Username changed");
        Ok(())
    }

    /// Issue a single-use reset token and email its link
    ///
    /// `request_base` is used for the link unless `PUBLIC_BASE_URL` is set.
    /// Returns the raw token.
    pub async fn request_password_reset(
        &self,
        form: &RequestResetForm,
        request_base: &str,
    ) -> Result<String> {
        form.check().map_err(AppError::Validation)?;

        let user = user_repo::find_by_email(&self.pool, &form.email)
            .await?
            .ok_or_else(|| AppError::validation(RESET_EMAIL_UNKNOWN))?;

        let issued = self.tokens.issue(
            &user.id.to_string(),
            PASSWORD_RESET_TOKEN,
            Duration::seconds(self.settings.reset_token_ttl_secs),
        )?;

        let base = self
            .settings
            .public_base_url
            .as_deref()
            .unwrap_or(request_base)
            .trim_end_matches('/');
        let link = format!("{base}/reset-password/{}", issued.token);

        // nothing is recorded until the mail is out, so a failed send leaves
        // earlier links usable
        self.mailer
            .send(OutgoingEmail::password_reset(&user.email, &link))
            .await?;

        let mut tx = self.pool.begin().await?;
        password_reset_repo::invalidate_user_tokens(&mut *tx, user.id).await?;
        password_reset_repo::record_reset_token(
            &mut *tx,
            user.id,
            &sha256_hex(issued.token.as_bytes()),
            issued.claims.exp,
        )
        .await?;
        tx.commit().await?;

        info!(user_id = user.id, jti = %issued.claims.jti, "Password reset email sent");
        Ok(issued.token)
    }

    /// Resolve a reset token to its user without consuming it
    pub async fn check_reset_token(&self, token: &str) -> Result<i64> {
        let user_id = self.verify_reset_signature(token)?;

        if !password_reset_repo::is_redeemable(&self.pool, &sha256_hex(token.as_bytes())).await? {
            return Err(AppError::InvalidToken);
        }

        Ok(user_id)
    }

    /// Set a new password with a reset token, consuming the token
    ///
    /// The ledger update and the password update commit together; a second
    /// redemption of the same token finds no live ledger row.
    pub async fn redeem_reset_token(&self, token: &str, form: &NewPasswordForm) -> Result<i64> {
        let user_id = self.verify_reset_signature(token)?;
        form.check().map_err(AppError::Validation)?;

        let password_hash = hash_password(&form.new_password)?;

        let mut tx = self.pool.begin().await?;

        let owner =
            password_reset_repo::consume_reset_token(&mut *tx, &sha256_hex(token.as_bytes()))
                .await?;
        if owner != Some(user_id) {
            warn!(user_id, "Reset token is unknown, used or expired");
            return Err(AppError::InvalidToken);
        }

        user_repo::update_password(&mut *tx, user_id, &password_hash).await?;
        password_reset_repo::invalidate_user_tokens(&mut *tx, user_id).await?;
        tx.commit().await?;

        info!(user_id, "Password reset completed");
        Ok(user_id)
    }

    fn verify_reset_signature(&self, token: &str) -> Result<i64> {
        let claims = self.tokens.verify(token, PASSWORD_RESET_TOKEN)?;
        claims.sub.parse::<i64>().map_err(|_| AppError::InvalidToken)
    }
}
