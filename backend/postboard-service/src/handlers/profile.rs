use super::{flash_and_redirect, HOME};
use crate::error::Result;
use crate::flash::FlashMessages;
use crate::session::CurrentUser;
use crate::templates::profile::profile_page;
use crate::AppState;
use actix_web::{http::StatusCode, web, HttpResponse};

pub async fn profile(
    state: web::Data<AppState>,
    user: CurrentUser,
    flash: FlashMessages,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    match state.profile_service().get_profile(&username).await {
        Ok(profile) => Ok(flash.render(StatusCode::OK, |shown| {
            profile_page(&user, shown, &profile)
        })),
        Err(e) => flash_and_redirect(e, flash, HOME),
    }
}
