/// HTTP handlers for postboard-service
///
/// Handlers recover user-facing errors themselves: the message becomes a
/// flash and the visitor is redirected or shown the form again. Only
/// infrastructure failures and missing sessions propagate as `AppError`.
pub mod auth;
pub mod comments;
pub mod health;
pub mod posts;
pub mod profile;

use crate::error::{AppError, Result};
use crate::flash::FlashMessages;
use actix_web::{HttpRequest, HttpResponse};

pub const HOME: &str = "/home";
pub const LOGIN: &str = "/login";
/// Path prefix whose next segment is a live reset token
pub const RESET_TOKEN_PREFIX: &str = "/reset-password/";

/// Flash a user-facing error and redirect; anything else propagates
pub(crate) fn flash_and_redirect(
    err: AppError,
    mut flash: FlashMessages,
    location: &str,
) -> Result<HttpResponse> {
    if !err.is_user_facing() {
        return Err(err);
    }
    flash.extend(err.to_flashes());
    Ok(flash.redirect(location))
}

/// Scheme and host the visitor used, for links sent by email
pub(crate) fn request_base_url(req: &HttpRequest) -> String {
    let info = req.connection_info();
    format!("{}://{}", info.scheme(), info.host())
}
