use crate::db::user_repo;
use crate::error::{AppError, Result};
use crate::models::Profile;
use sqlx::SqlitePool;

pub const PROFILE_MISSING: &str = "Profile does not exist";

pub struct ProfileService {
    pool: SqlitePool,
}

impl ProfileService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_profile(&self, username: &str) -> Result<Profile> {
        let user = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(PROFILE_MISSING.to_string()))?;

        let (post_count, comment_count) = user_repo::activity_counts(&self.pool, user.id).await?;

        Ok(Profile {
            user,
            post_count,
            comment_count,
        })
    }
}
