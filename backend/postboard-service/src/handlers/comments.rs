/// Comment handlers
use super::{flash_and_redirect, HOME};
use crate::error::Result;
use crate::flash::FlashMessages;
use crate::forms::TextForm;
use crate::session::CurrentUser;
use crate::templates::posts as pages;
use crate::AppState;
use actix_web::{http::StatusCode, web, HttpResponse};

pub async fn create_comment(
    state: web::Data<AppState>,
    user: CurrentUser,
    mut flash: FlashMessages,
    post_id: web::Path<String>,
    form: web::Form<TextForm>,
) -> Result<HttpResponse> {
    match state
        .comment_service()
        .create_comment(user.id, &post_id, &form)
        .await
    {
        Ok(_) => {
            flash.success("Comment created");
            Ok(flash.redirect(HOME))
        }
        Err(e) => flash_and_redirect(e, flash, HOME),
    }
}

pub async fn delete_comment(
    state: web::Data<AppState>,
    user: CurrentUser,
    mut flash: FlashMessages,
    comment_id: web::Path<String>,
) -> Result<HttpResponse> {
    match state
        .comment_service()
        .delete_comment(user.id, &comment_id)
        .await
    {
        Ok(()) => {
            flash.success("Comment deleted");
            Ok(flash.redirect(HOME))
        }
        Err(e) => flash_and_redirect(e, flash, HOME),
    }
}

pub async fn user_comments(
    state: web::Data<AppState>,
    user: CurrentUser,
    flash: FlashMessages,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    match state.comment_service().list_comments_by_user(&username).await {
        Ok((author, comments)) => Ok(flash.render(StatusCode::OK, |shown| {
            pages::user_comments_page(&user, shown, &author.username, &comments)
        })),
        Err(e) => flash_and_redirect(e, flash, HOME),
    }
}
