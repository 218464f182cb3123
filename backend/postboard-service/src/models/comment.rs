use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Comment {
    pub id: i64,
    pub text: String,
    pub date_created: DateTime<Utc>,
    pub author: i64,
    pub post_id: i64,
}

/// Comment joined with its author's username and the parent post's author
#[derive(Debug, Clone, FromRow)]
pub struct CommentView {
    pub id: i64,
    pub text: String,
    pub date_created: DateTime<Utc>,
    pub author_id: i64,
    pub author_username: String,
    pub post_id: i64,
    pub post_author_id: i64,
}

impl CommentView {
    /// The comment's author and the parent post's author may both delete it
    pub fn can_be_deleted_by(&self, user_id: i64) -> bool {
        self.author_id == user_id || self.post_author_id == user_id
    }
}
