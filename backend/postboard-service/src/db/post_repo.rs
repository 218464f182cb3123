use crate::models::{Post, PostView};
use chrono::Utc;
use sqlx::SqlitePool;

const POST_VIEW_COLUMNS: &str = r#"
    SELECT p.id, p.text, p.date_created, p.author AS author_id, u.username AS author_username
    FROM posts p
    JOIN users u ON u.id = p.author
"#;

/// Create a new post
pub async fn create_post(pool: &SqlitePool, author: i64, text: &str) -> Result<Post, sqlx::Error> {
    sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (text, date_created, author)
        VALUES (?, ?, ?)
        RETURNING id, text, date_created, author
        "#,
    )
    .bind(text)
    .bind(Utc::now())
    .bind(author)
    .fetch_one(pool)
    .await
}

/// Get a single post by ID
pub async fn find_by_id(pool: &SqlitePool, post_id: i64) -> Result<Option<Post>, sqlx::Error> {
    sqlx::query_as::<_, Post>("SELECT id, text, date_created, author FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// Get a single post with its author's username
pub async fn find_view_by_id(
    pool: &SqlitePool,
    post_id: i64,
) -> Result<Option<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(&format!("{POST_VIEW_COLUMNS} WHERE p.id = ?"))
        .bind(post_id)
        .fetch_optional(pool)
        .await
}

/// All posts, newest first
pub async fn list_views(pool: &SqlitePool) -> Result<Vec<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(&format!(
        "{POST_VIEW_COLUMNS} ORDER BY p.date_created DESC, p.id DESC"
    ))
    .fetch_all(pool)
    .await
}

/// Posts written by one user, newest first
pub async fn list_views_by_author(
    pool: &SqlitePool,
    author: i64,
) -> Result<Vec<PostView>, sqlx::Error> {
    sqlx::query_as::<_, PostView>(&format!(
        "{POST_VIEW_COLUMNS} WHERE p.author = ? ORDER BY p.date_created DESC, p.id DESC"
    ))
    .bind(author)
    .fetch_all(pool)
    .await
}

/// Delete a post; its comments go with it through `ON DELETE CASCADE`
pub async fn delete_post(pool: &SqlitePool, post_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(post_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
