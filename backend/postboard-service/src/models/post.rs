use chrono::{DateTime, Utc};
use sqlx::FromRow;

use super::CommentView;

#[derive(Debug, Clone, FromRow)]
pub struct Post {
    pub id: i64,
    pub text: String,
    pub date_created: DateTime<Utc>,
    pub author: i64,
}

/// Post joined with its author's username and its comments
#[derive(Debug, Clone, FromRow)]
pub struct PostView {
    pub id: i64,
    pub text: String,
    pub date_created: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    #[sqlx(skip)]
    pub comments: Vec<CommentView>,
}

impl PostView {
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == user_id
    }
}
