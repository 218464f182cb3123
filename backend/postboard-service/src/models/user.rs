use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// User model
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub username: String,
    /// Argon2id PHC string
    pub password: String,
    pub date_created: DateTime<Utc>,
}

/// A user together with their activity counts
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub post_count: i64,
    pub comment_count: i64,
}
