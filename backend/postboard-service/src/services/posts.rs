/// Post service - handles post creation, deletion and listings
use crate::db::{comment_repo, post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::forms::TextForm;
use crate::models::{Post, PostView, User};
use crate::services::parse_id;
use sqlx::SqlitePool;
use std::collections::HashMap;
use tracing::info;

pub const POST_EMPTY: &str = "Post can't be empty";
pub const POST_MISSING: &str = "Post does not exist";
pub const POST_DELETE_FORBIDDEN: &str = "No permission to delete this post";
pub const POST_ID_MISSING: &str = "Post with that id does not exist";
pub const USERNAME_MISSING: &str = "Username does not exist";

pub struct PostService {
    pool: SqlitePool,
}

impl PostService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_post(&self, author: i64, form: &TextForm) -> Result<Post> {
        let text = form.content().ok_or_else(|| AppError::validation(POST_EMPTY))?;

        let post = post_repo::create_post(&self.pool, author, text).await?;

        info!(user_id = author, post_id = post.id, "Post created");
        Ok(post)
    }

    /// Delete a post written by `user_id`; its comments are removed with it
    pub async fn delete_post(&self, user_id: i64, raw_post_id: &str) -> Result<()> {
        let post = match parse_id(raw_post_id) {
            Some(id) => post_repo::find_by_id(&self.pool, id).await?,
            None => None,
        }
        .ok_or_else(|| AppError::NotFound(POST_MISSING.to_string()))?;

        if post.author != user_id {
            return Err(AppError::PermissionDenied(POST_DELETE_FORBIDDEN.to_string()));
        }

        if !post_repo::delete_post(&self.pool, post.id).await? {
            return Err(AppError::NotFound(POST_MISSING.to_string()));
        }

        info!(user_id, post_id = post.id, "Post deleted");
        Ok(())
    }

    /// Home feed: every post, newest first, with its comments
    pub async fn list_posts(&self) -> Result<Vec<PostView>> {
        let posts = post_repo::list_views(&self.pool).await?;
        self.attach_comments(posts).await
    }

    pub async fn list_posts_by_user(&self, username: &str) -> Result<(User, Vec<PostView>)> {
        let user = user_repo::find_by_username(&self.pool, username)
            .await?
            .ok_or_else(|| AppError::NotFound(USERNAME_MISSING.to_string()))?;

        let posts = post_repo::list_views_by_author(&self.pool, user.id).await?;
        let posts = self.attach_comments(posts).await?;

        Ok((user, posts))
    }

    pub async fn get_post(&self, raw_post_id: &str) -> Result<PostView> {
        let post = match parse_id(raw_post_id) {
            Some(id) => post_repo::find_view_by_id(&self.pool, id).await?,
            None => None,
        }
        .ok_or_else(|| AppError::NotFound(POST_ID_MISSING.to_string()))?;

        let mut posts = self.attach_comments(vec![post]).await?;
        posts
            .pop()
            .ok_or_else(|| AppError::Internal("post vanished while loading comments".into()))
    }

    async fn attach_comments(&self, mut posts: Vec<PostView>) -> Result<Vec<PostView>> {
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();

        let mut by_post: HashMap<i64, Vec<_>> = HashMap::new();
        for comment in comment_repo::list_views_for_posts(&self.pool, &ids).await? {
            by_post.entry(comment.post_id).or_default().push(comment);
        }

        for post in &mut posts {
            post.comments = by_post.remove(&post.id).unwrap_or_default();
        }

        Ok(posts)
    }
}
