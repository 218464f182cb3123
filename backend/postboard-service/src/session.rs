/// Current-user extraction
///
/// `SessionAuth` (from actix-middleware) leaves the verified user id in the
/// request extensions. `CurrentUser` turns it into a loaded `User`, and sends
/// anonymous visitors to the login page.
use crate::db::user_repo;
use crate::error::AppError;
use crate::models::User;
use crate::AppState;
use actix_middleware::SessionUserId;
use actix_web::{dev::Payload, web, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use std::ops::Deref;

/// The logged-in user; extracting it makes a route login-only
///
/// Use `Option<CurrentUser>` on pages that only anonymous visitors should see.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req.extensions().get::<SessionUserId>().copied();
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let next = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string());

        Box::pin(async move {
            let Some(SessionUserId(user_id)) = user_id else {
                return Err(AppError::LoginRequired(next));
            };
            let state =
                state.ok_or_else(|| AppError::Internal("application state not configured".into()))?;

            match user_repo::find_by_id(&state.db, user_id).await? {
                Some(user) => Ok(CurrentUser(user)),
                None => {
                    // account vanished after the cookie was issued
                    tracing::debug!(user_id, "Session refers to an unknown user");
                    Err(AppError::LoginRequired(next))
                }
            }
        })
    }
}
