use crate::handlers::{auth, comments, health, posts, profile};
use actix_web::web;

/// Register every route of the application
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health))
        // auth
        .route("/login", web::get().to(auth::login_form))
        .route("/login", web::post().to(auth::login))
        .route("/sign-up", web::get().to(auth::sign_up_form))
        .route("/sign-up", web::post().to(auth::sign_up))
        .route("/logout", web::get().to(auth::logout))
        .route("/change-password", web::get().to(auth::change_password_form))
        .route("/change-password", web::post().to(auth::change_password))
        .route("/change-username", web::get().to(auth::change_username_form))
        .route("/change-username", web::post().to(auth::change_username))
        .route("/reset-password", web::get().to(auth::reset_request_form))
        .route("/reset-password", web::post().to(auth::reset_request))
        .route("/reset-password/{token}", web::get().to(auth::reset_token_form))
        .route("/reset-password/{token}", web::post().to(auth::reset_token))
        // posts
        .route("/", web::get().to(posts::home))
        .route("/home", web::get().to(posts::home))
        .route("/create-post", web::get().to(posts::create_post_form))
        .route("/create-post", web::post().to(posts::create_post))
        .route("/delete-post/{id}", web::get().to(posts::delete_post))
        .route("/posts/{username}", web::get().to(posts::user_posts))
        .route("/post/{post_id}", web::get().to(posts::single_post))
        // comments
        .route("/create-comment/{post_id}", web::post().to(comments::create_comment))
        .route("/delete-comment/{comment_id}", web::get().to(comments::delete_comment))
        .route("/comments/{username}", web::get().to(comments::user_comments))
        // profiles
        .route("/profile/{username}", web::get().to(profile::profile));
}
