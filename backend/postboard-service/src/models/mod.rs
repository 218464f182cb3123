/// Data models for postboard-service
///
/// - `User`: registered account
/// - `Post`, `PostView`: posts as stored and as rendered with author and comments
/// - `Comment`, `CommentView`: comments as stored and as rendered
pub mod comment;
pub mod post;
pub mod user;

pub use comment::{Comment, CommentView};
pub use post::{Post, PostView};
pub use user::{Profile, User};
