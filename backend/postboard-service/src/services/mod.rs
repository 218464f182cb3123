/// Business logic layer
///
/// - `auth_service`: accounts, sessions and password resets
/// - `posts`: post creation, deletion and listings
/// - `comments`: comment creation, deletion and listings
/// - `profiles`: per-user profile pages
/// - `email`: outbound mail
pub mod auth_service;
pub mod comments;
pub mod email;
pub mod posts;
pub mod profiles;

pub use auth_service::AuthService;
pub use comments::CommentService;
pub use email::{EmailService, Mailer, OutgoingEmail};
pub use posts::PostService;
pub use profiles::ProfileService;

/// Ids arrive as raw path segments; anything non-numeric names nothing
pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}
