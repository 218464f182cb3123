/// Post handlers - feed, single post, per-user listing, create and delete
use super::{flash_and_redirect, HOME};
use crate::error::Result;
use crate::flash::FlashMessages;
use crate::forms::TextForm;
use crate::session::CurrentUser;
use crate::templates::posts as pages;
use crate::AppState;
use actix_web::{http::StatusCode, web, HttpResponse};

pub async fn home(
    state: web::Data<AppState>,
    user: CurrentUser,
    flash: FlashMessages,
) -> Result<HttpResponse> {
    let posts = state.post_service().list_posts().await?;

    Ok(flash.render(StatusCode::OK, |shown| {
        pages::home_page(&user, shown, &posts)
    }))
}

pub async fn create_post_form(user: CurrentUser, flash: FlashMessages) -> HttpResponse {
    flash.render(StatusCode::OK, |shown| {
        pages::create_post_page(&user, shown, "")
    })
}

pub async fn create_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    mut flash: FlashMessages,
    form: web::Form<TextForm>,
) -> Result<HttpResponse> {
    match state.post_service().create_post(user.id, &form).await {
        Ok(_) => {
            flash.success("Post created!");
            Ok(flash.redirect(HOME))
        }
        Err(e) if e.is_user_facing() => {
            flash.extend(e.to_flashes());
            Ok(flash.render(StatusCode::OK, |shown| {
                pages::create_post_page(&user, shown, &form.text)
            }))
        }
        Err(e) => Err(e),
    }
}

pub async fn delete_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    mut flash: FlashMessages,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    match state.post_service().delete_post(user.id, &post_id).await {
        Ok(()) => {
            flash.success("Post deleted");
            Ok(flash.redirect(HOME))
        }
        Err(e) => flash_and_redirect(e, flash, HOME),
    }
}

pub async fn user_posts(
    state: web::Data<AppState>,
    user: CurrentUser,
    flash: FlashMessages,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    match state.post_service().list_posts_by_user(&username).await {
        Ok((author, posts)) => Ok(flash.render(StatusCode::OK, |shown| {
            pages::user_posts_page(&user, shown, &author.username, &posts)
        })),
        Err(e) => flash_and_redirect(e, flash, HOME),
    }
}

pub async fn single_post(
    state: web::Data<AppState>,
    user: CurrentUser,
    flash: FlashMessages,
    post_id: web::Path<String>,
) -> Result<HttpResponse> {
    match state.post_service().get_post(&post_id).await {
        Ok(post) => Ok(flash.render(StatusCode::OK, |shown| {
            pages::single_post_page(&user, shown, &post)
        })),
        Err(e) => flash_and_redirect(e, flash, HOME),
    }
}
