use crate::models::{Comment, CommentView};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const COMMENT_VIEW_COLUMNS: &str = r#"
    SELECT c.id, c.text, c.date_created, c.author AS author_id, u.username AS author_username,
           c.post_id, p.author AS post_author_id
    FROM comments c
    JOIN users u ON u.id = c.author
    JOIN posts p ON p.id = c.post_id
"#;

/// Create a new comment on a post
pub async fn create_comment(
    pool: &SqlitePool,
    post_id: i64,
    author: i64,
    text: &str,
) -> Result<Comment, sqlx::Error> {
    sqlx::query_as::<_, Comment>(
        r#"
        INSERT INTO comments (text, date_created, author, post_id)
        VALUES (?, ?, ?, ?)
        RETURNING id, text, date_created, author, post_id
        "#,
    )
    .bind(text)
    .bind(Utc::now())
    .bind(author)
    .bind(post_id)
    .fetch_one(pool)
    .await
}

/// Get a single comment by ID, with the parent post's author
pub async fn find_view_by_id(
    pool: &SqlitePool,
    comment_id: i64,
) -> Result<Option<CommentView>, sqlx::Error> {
    sqlx::query_as::<_, CommentView>(&format!("{COMMENT_VIEW_COLUMNS} WHERE c.id = ?"))
        .bind(comment_id)
        .fetch_optional(pool)
        .await
}

/// Comments for a set of posts, oldest first within each post
pub async fn list_views_for_posts(
    pool: &SqlitePool,
    post_ids: &[i64],
) -> Result<Vec<CommentView>, sqlx::Error> {
    if post_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(COMMENT_VIEW_COLUMNS);
    query.push(" WHERE c.post_id IN (");
    let mut separated = query.separated(", ");
    for id in post_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(") ORDER BY c.date_created ASC, c.id ASC");

    query.build_query_as::<CommentView>().fetch_all(pool).await
}

/// Comments written by one user, newest first
pub async fn list_views_by_author(
    pool: &SqlitePool,
    author: i64,
) -> Result<Vec<CommentView>, sqlx::Error> {
    sqlx::query_as::<_, CommentView>(&format!(
        "{COMMENT_VIEW_COLUMNS} WHERE c.author = ? ORDER BY c.date_created DESC, c.id DESC"
    ))
    .bind(author)
    .fetch_all(pool)
    .await
}

pub async fn delete_comment(pool: &SqlitePool, comment_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM comments WHERE id = ?")
        .bind(comment_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
