/// Account handlers - login, registration, credential changes and
/// password reset
use super::{flash_and_redirect, request_base_url, HOME, LOGIN};
use crate::error::{AppError, Result};
use crate::flash::FlashMessages;
use crate::forms::{
    safe_next, ChangeUsernameForm, LoginForm, NewPasswordForm, NextQuery, RequestResetForm,
    SignUpForm,
};
use crate::session::CurrentUser;
use crate::templates::auth as pages;
use crate::AppState;
use actix_middleware::{expired_session_cookie, session_cookie};
use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use chrono::Duration;

const RESET_REQUEST: &str = "/reset-password";

pub async fn login_form(
    viewer: Option<CurrentUser>,
    flash: FlashMessages,
    query: web::Query<NextQuery>,
) -> HttpResponse {
    if viewer.is_some() {
        return flash.redirect(HOME);
    }

    let next = safe_next(query.next.as_deref());
    flash.render(StatusCode::OK, |shown| pages::login_page(shown, "", next))
}

pub async fn login(
    state: web::Data<AppState>,
    viewer: Option<CurrentUser>,
    mut flash: FlashMessages,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    if viewer.is_some() {
        return Ok(flash.redirect(HOME));
    }
    let form = form.into_inner();
    let next = safe_next(form.next.as_deref());

    match state.auth_service().login(&form).await {
        Ok((_, session)) => {
            flash.success("Logged in successfully");
            let cookie = session_cookie(
                session.token,
                Duration::seconds(state.settings.session_ttl_secs),
                state.settings.secure_cookies,
            );
            Ok(flash.into_redirect(next.unwrap_or(HOME)).cookie(cookie).finish())
        }
        Err(e) if e.is_user_facing() => {
            flash.extend(e.to_flashes());
            Ok(flash.render(StatusCode::OK, |shown| {
                pages::login_page(shown, &form.email, next)
            }))
        }
        Err(e) => Err(e),
    }
}

pub async fn sign_up_form(viewer: Option<CurrentUser>, flash: FlashMessages) -> HttpResponse {
    if viewer.is_some() {
        return flash.redirect(HOME);
    }
    flash.render(StatusCode::OK, |shown| pages::sign_up_page(shown, "", ""))
}

pub async fn sign_up(
    state: web::Data<AppState>,
    viewer: Option<CurrentUser>,
    mut flash: FlashMessages,
    form: web::Form<SignUpForm>,
) -> Result<HttpResponse> {
    if viewer.is_some() {
        return Ok(flash.redirect(HOME));
    }

    match state.auth_service().register(&form).await {
        Ok(_) => {
            flash.success("Account created!");
            Ok(flash.redirect(LOGIN))
        }
        Err(e) if e.is_user_facing() => {
            flash.extend(e.to_flashes());
            Ok(flash.render(StatusCode::OK, |shown| {
                pages::sign_up_page(shown, &form.email, &form.username)
            }))
        }
        Err(e) => Err(e),
    }
}

pub async fn logout(_user: CurrentUser, flash: FlashMessages) -> HttpResponse {
    flash
        .into_redirect(LOGIN)
        .cookie(expired_session_cookie())
        .finish()
}

pub async fn change_password_form(user: CurrentUser, flash: FlashMessages) -> HttpResponse {
    flash.render(StatusCode::OK, |shown| {
        pages::change_password_page(&user, shown)
    })
}

pub async fn change_password(
    state: web::Data<AppState>,
    user: CurrentUser,
    mut flash: FlashMessages,
    form: web::Form<NewPasswordForm>,
) -> Result<HttpResponse> {
    match state.auth_service().change_password(user.id, &form).await {
        Ok(()) => {
            flash.success("Password updated!");
            Ok(flash.redirect(HOME))
        }
        Err(e) if e.is_user_facing() => {
            flash.extend(e.to_flashes());
            Ok(flash.render(StatusCode::OK, |shown| {
                pages::change_password_page(&user, shown)
            }))
        }
        Err(e) => Err(e),
    }
}

pub async fn change_username_form(user: CurrentUser, flash: FlashMessages) -> HttpResponse {
    flash.render(StatusCode::OK, |shown| {
        pages::change_username_page(&user, shown, "")
    })
}

pub async fn change_username(
    state: web::Data<AppState>,
    user: CurrentUser,
    mut flash: FlashMessages,
    form: web::Form<ChangeUsernameForm>,
) -> Result<HttpResponse> {
    match state.auth_service().change_username(user.id, &form).await {
        Ok(()) => {
            flash.success("Username updated!");
            Ok(flash.redirect(HOME))
        }
        Err(e) if e.is_user_facing() => {
            flash.extend(e.to_flashes());
            Ok(flash.render(StatusCode::OK, |shown| {
                pages::change_username_page(&user, shown, &form.new_username)
            }))
        }
        Err(e) => Err(e),
    }
}

pub async fn reset_request_form(viewer: Option<CurrentUser>, flash: FlashMessages) -> HttpResponse {
    if viewer.is_some() {
        return flash.redirect(HOME);
    }
    flash.render(StatusCode::OK, |shown| pages::reset_request_page(shown, ""))
}

pub async fn reset_request(
    req: HttpRequest,
    state: web::Data<AppState>,
    viewer: Option<CurrentUser>,
    mut flash: FlashMessages,
    form: web::Form<RequestResetForm>,
) -> Result<HttpResponse> {
    if viewer.is_some() {
        return Ok(flash.redirect(HOME));
    }

    let base = request_base_url(&req);
    match state.auth_service().request_password_reset(&form, &base).await {
        Ok(_) => {
            flash.info("An email has been sent with instructions to reset your password.");
            Ok(flash.redirect(LOGIN))
        }
        Err(e) if e.is_user_facing() => {
            if let AppError::Mail(detail) = &e {
                tracing::error!(error = %detail, "Password reset email could not be delivered");
            }
            flash.extend(e.to_flashes());
            Ok(flash.render(StatusCode::OK, |shown| {
                pages::reset_request_page(shown, &form.email)
            }))
        }
        Err(e) => Err(e),
    }
}

pub async fn reset_token_form(
    state: web::Data<AppState>,
    viewer: Option<CurrentUser>,
    flash: FlashMessages,
    token: web::Path<String>,
) -> Result<HttpResponse> {
    if viewer.is_some() {
        return Ok(flash.redirect(HOME));
    }

    match state.auth_service().check_reset_token(&token).await {
        Ok(_) => Ok(flash.render(StatusCode::OK, |shown| {
            pages::reset_password_page(shown, &token)
        })),
        Err(e) => flash_and_redirect(e, flash, RESET_REQUEST),
    }
}

pub async fn reset_token(
    state: web::Data<AppState>,
    viewer: Option<CurrentUser>,
    mut flash: FlashMessages,
    token: web::Path<String>,
    form: web::Form<NewPasswordForm>,
) -> Result<HttpResponse> {
    if viewer.is_some() {
        return Ok(flash.redirect(HOME));
    }

    match state.auth_service().redeem_reset_token(&token, &form).await {
        Ok(_) => {
            flash.success("Your password has been updated! You are now able to log in");
            Ok(flash.redirect(LOGIN))
        }
        Err(e @ AppError::Validation(_)) => {
            flash.extend(e.to_flashes());
            Ok(flash.render(StatusCode::OK, |shown| {
                pages::reset_password_page(shown, &token)
            }))
        }
        Err(e) => flash_and_redirect(e, flash, RESET_REQUEST),
    }
}
