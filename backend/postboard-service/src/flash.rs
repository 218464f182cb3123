//! One-shot status messages carried across a redirect
//!
//! Messages queued before a redirect travel in the `_flash` cookie as
//! base64-encoded JSON. The next page that renders them clears the cookie,
//! so each message is shown exactly once.

use actix_web::{
    cookie::{Cookie, SameSite},
    dev::Payload,
    http::{header, StatusCode},
    FromRequest, HttpRequest, HttpResponse, HttpResponseBuilder,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "_flash";

/// Keeps the cookie comfortably below browser size limits
const MAX_MESSAGES: usize = 10;

/// Message category, rendered as a Bootstrap alert style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
    Info,
    Warning,
}

impl Level {
    pub fn alert_class(self) -> &'static str {
        match self {
            Level::Success => "alert-success",
            Level::Error => "alert-danger",
            Level::Info => "alert-info",
            Level::Warning => "alert-warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

pub fn encode_flashes(flashes: &[Flash]) -> Option<String> {
    serde_json::to_vec(flashes)
        .ok()
        .map(|json| URL_SAFE_NO_PAD.encode(json))
}

pub fn decode_flashes(value: &str) -> Option<Vec<Flash>> {
    let json = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&json).ok()
}

fn flash_cookie(value: String) -> Cookie<'static> {
    Cookie::build(FLASH_COOKIE, value)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = flash_cookie(String::new());
    cookie.make_removal();
    cookie
}

/// Redirect that carries `flashes` to the next page
pub fn redirect_with(location: &str, flashes: &[Flash]) -> HttpResponseBuilder {
    let mut builder = HttpResponse::Found();
    builder.insert_header((header::LOCATION, location));

    match encode_flashes(flashes) {
        Some(value) if !flashes.is_empty() => {
            builder.cookie(flash_cookie(value));
        }
        _ => {
            builder.cookie(removal_cookie());
        }
    }

    builder
}

/// Messages received with the request plus those queued while handling it
#[derive(Debug, Default)]
pub struct FlashMessages {
    pending: Vec<Flash>,
    had_cookie: bool,
}

impl FlashMessages {
    pub fn push(&mut self, level: Level, message: impl Into<String>) {
        if self.pending.len() >= MAX_MESSAGES {
            self.pending.remove(0);
        }
        self.pending.push(Flash::new(level, message));
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Level::Success, message)
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message)
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message)
    }

    pub fn extend(&mut self, flashes: impl IntoIterator<Item = Flash>) {
        for flash in flashes {
            self.push(flash.level, flash.message);
        }
    }

    pub fn pending(&self) -> &[Flash] {
        &self.pending
    }

    /// 302 to `location`; every pending message is shown on the next page
    pub fn into_redirect(self, location: &str) -> HttpResponseBuilder {
        redirect_with(location, &self.pending)
    }

    pub fn redirect(self, location: &str) -> HttpResponse {
        self.into_redirect(location).finish()
    }

    /// Render a page that displays and thereby consumes every pending message
    pub fn render<F>(self, status: StatusCode, page: F) -> HttpResponse
    where
        F: FnOnce(&[Flash]) -> String,
    {
        let body = page(&self.pending);
        let mut builder = HttpResponse::build(status);
        builder.content_type("text/html; charset=utf-8");
        if self.had_cookie {
            builder.cookie(removal_cookie());
        }
        builder.body(body)
    }
}

impl FromRequest for FlashMessages {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(cookie) = req.cookie(FLASH_COOKIE) else {
            return ready(Ok(Self::default()));
        };

        let pending = decode_flashes(cookie.value()).unwrap_or_else(|| {
            tracing::debug!("Discarding undecodable flash cookie");
            Vec::new()
        });

        ready(Ok(Self {
            pending,
            had_cookie: true,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn cookie_value_decodes_back() {
        let flashes = vec![
            Flash::new(Level::Success, "Post created!"),
            Flash::new(Level::Warning, "That is an invalid or expired token"),
        ];
        let encoded = encode_flashes(&flashes).unwrap();

        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(decode_flashes(&encoded), Some(flashes));
    }

    #[test]
    fn garbage_cookie_yields_nothing() {
        assert_eq!(decode_flashes("%%%not-base64"), None);
        assert_eq!(decode_flashes(&URL_SAFE_NO_PAD.encode(b"{}")), None);
    }

    #[actix_web::test]
    async fn extractor_reads_incoming_messages() {
        let value = encode_flashes(&[Flash::new(Level::Info, "hello")]).unwrap();
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, value))
            .to_http_request();

        let flashes = FlashMessages::extract(&req).await.unwrap();
        assert_eq!(flashes.pending(), &[Flash::new(Level::Info, "hello")]);
    }

    #[actix_web::test]
    async fn redirect_carries_incoming_and_new_messages() {
        let value = encode_flashes(&[Flash::new(Level::Info, "first")]).unwrap();
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, value))
            .to_http_request();

        let mut flashes = FlashMessages::extract(&req).await.unwrap();
        flashes.error("second");
        let resp = flashes.redirect("/home");

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/home");

        let cookie = resp
            .cookies()
            .find(|c| c.name() == FLASH_COOKIE)
            .expect("flash cookie set");
        let carried = decode_flashes(cookie.value()).unwrap();
        assert_eq!(
            carried,
            vec![
                Flash::new(Level::Info, "first"),
                Flash::new(Level::Error, "second")
            ]
        );
    }

    #[actix_web::test]
    async fn rendering_clears_the_cookie() {
        let value = encode_flashes(&[Flash::new(Level::Success, "done")]).unwrap();
        let req = TestRequest::default()
            .cookie(Cookie::new(FLASH_COOKIE, value))
            .to_http_request();

        let flashes = FlashMessages::extract(&req).await.unwrap();
        let resp = flashes.render(StatusCode::OK, |shown| {
            assert_eq!(shown.len(), 1);
            shown[0].message.clone()
        });

        let cookie = resp
            .cookies()
            .find(|c| c.name() == FLASH_COOKIE)
            .expect("removal cookie set");
        assert_eq!(cookie.value(), "");
    }

    #[test]
    fn queue_is_bounded() {
        let mut flashes = FlashMessages::default();
        for i in 0..(MAX_MESSAGES + 3) {
            flashes.info(format!("message {i}"));
        }
        assert_eq!(flashes.pending().len(), MAX_MESSAGES);
        assert_eq!(flashes.pending()[0].message, "message 3");
    }

    #[test]
    fn levels_map_to_bootstrap_alerts() {
        assert_eq!(Level::Error.alert_class(), "alert-danger");
        assert_eq!(Level::Success.alert_class(), "alert-success");
    }
}
