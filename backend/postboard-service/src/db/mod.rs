pub mod comment_repo;
pub mod password_reset_repo;
pub mod post_repo;
pub mod user_repo;

/// Whether `err` is a UNIQUE violation on `table.column`
///
/// SQLite reports the offending column in the message
/// (`UNIQUE constraint failed: users.email`).
pub fn is_unique_violation_on(err: &sqlx::Error, column: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.is_unique_violation() && db_err.message().contains(column)
        }
        _ => false,
    }
}
