//! Ledger of issued password-reset tokens
//!
//! Only the SHA-256 of a token is stored. A row is live while `used_at` is
//! NULL and `expires_at` (unix seconds) lies in the future.

use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn record_reset_token<'e, E>(
    executor: E,
    user_id: i64,
    token_hash: &str,
    expires_at: i64,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        r#"
        INSERT INTO password_resets (user_id, token_hash, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .bind(Utc::now())
    .execute(executor)
    .await?;

    Ok(())
}

/// Mark a live token as used, returning the user it belongs to
///
/// Yields `None` when the token is unknown, expired or already consumed.
/// The conditional UPDATE makes concurrent redemptions race on a single row.
pub async fn consume_reset_token<'e, E>(
    executor: E,
    token_hash: &str,
) -> Result<Option<i64>, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let now = Utc::now();

    sqlx::query_scalar::<_, i64>(
        r#"
        UPDATE password_resets
        SET used_at = ?
        WHERE token_hash = ? AND used_at IS NULL AND expires_at > ?
        RETURNING user_id
        "#,
    )
    .bind(now)
    .bind(token_hash)
    .bind(now.timestamp())
    .fetch_optional(executor)
    .await
}

/// Whether a token could still be redeemed, without consuming it
pub async fn is_redeemable(pool: &SqlitePool, token_hash: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM password_resets
            WHERE token_hash = ? AND used_at IS NULL AND expires_at > ?
        )
        "#,
    )
    .bind(token_hash)
    .bind(Utc::now().timestamp())
    .fetch_one(pool)
    .await
}

/// Retire every live token of a user
pub async fn invalidate_user_tokens<'e, E>(executor: E, user_id: i64) -> Result<u64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let result = sqlx::query(
        "UPDATE password_resets SET used_at = ? WHERE user_id = ? AND used_at IS NULL",
    )
    .bind(Utc::now())
    .bind(user_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}
