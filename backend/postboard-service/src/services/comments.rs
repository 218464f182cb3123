/// Comment service - handles comment creation, deletion and listings
use crate::db::{comment_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::forms::TextForm;
use crate::models::{Comment, CommentView, User};
use crate::services::parse_id;
use crate::services::posts::{POST_MISSING, USERNAME_MISSING};
use sqlx::SqlitePool;
use tracing::info;

pub const COMMENT_EMPTY: &str = "Comment can't be empty";
pub const COMMENT_MISSING: &str = "Comment does not exist";
pub const COMMENT_DELETE_FORBIDDEN: &str = "You don't have permission to delete that comment";

pub struct CommentService {
    pool: SqlitePool,
}

impl CommentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_comment(
        &self,
        author: i64,
        raw_post_id: &str,
        form: &TextForm,
    ) -> Result<Comment> {
        let text = form
            .content()
            .ok_or_else(|| AppError::validation(COMMENT_EMPTY))?;

        let post = match parse_id(raw_post_id) {
            Some(id) => post_repo::find_by_id(&self.pool, id).await?,
            None => None,
        }
        .ok_or_else(|| AppError::NotFound(POST_MISSING.to_string()))?;

        let comment = comment_repo::create_comment(&self.pool, post.id, author, text)
            .await
            .map_err(|e| {
                // the post was deleted between the lookup and the insert
                let post_gone = matches!(
                    &e,
                    sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation()
                );
                if post_gone {
                    AppError::NotFound(POST_MISSING.to_string())
                } else {
                    AppError::Database(e)
                }
            })?;

        info!(user_id = author, post_id = post.id, comment_id = comment.id, "Comment created");
        Ok(comment)
    }

    /// Delete a comment; allowed for its author and for the parent post's author
    pub async fn delete_comment(&self, user_id: i64, raw_comment_id: &str) -> Result<()> {
        let comment = match parse_id(raw_comment_id) {
            Some(id) => comment_repo::find_view_by_id(&self.pool, id).await?,
            None => None,
        }
        .ok_or_else(|| AppError::NotFound(COMMENT_MISSING.to_string()))?;

        if !comment.can_be_deleted_by(user_id) {
            return Err(AppError::PermissionDenied(
                COMMENT_DELETE_FORBIDDEN.to_string(),
            ));
        }

        if !comment_repo::delete_comment(&self.pool, comment.id).await? {
            return Err(AppError::NotFound(COMMENT_MISSING.to_string()));
        }

        info!(user_id, comment_id = comment.id, post_id = comment.post_id, "Comment deleted");
        Ok(())
    }

    pub async fn list_comments_by_user(
        &self,
        username: &str,
    ) -> Result<(User, Vec<CommentView>)> {
        let user = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(USERNAME_MISSING.to_string()))?;

        let comments = comment_repo::list_views_by_author(&self.pool, user.id).await?;
        Ok((user, comments))
    }
}
