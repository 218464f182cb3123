//! Request logging middleware
//!
//! Emits one tracing event per completed request. Server errors are logged
//! at `error`, client errors at `warn`, everything else at `info`. When the
//! session middleware identified a user, the id is attached to the event.
//! Path segments that carry credentials can be masked with
//! `RequestLogging::redact_after`.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::Instant;

use crate::session::SessionUserId;

const REDACTED: &str = "[REDACTED]";

/// Middleware that logs HTTP requests and responses
#[derive(Clone, Default)]
pub struct RequestLogging {
    secret_prefixes: Vec<&'static str>,
}

impl RequestLogging {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask the path segment that follows `prefix`, e.g. `/reset-password/`
    pub fn redact_after(mut self, prefix: &'static str) -> Self {
        self.secret_prefixes.push(prefix);
        self
    }
}

/// `path` with the segment after any matching prefix replaced
pub fn redact_path(path: &str, secret_prefixes: &[&str]) -> String {
    for prefix in secret_prefixes {
        if let Some(rest) = path.strip_prefix(prefix) {
            if rest.is_empty() {
                continue;
            }
            let tail = rest.find('/').map(|i| &rest[i..]).unwrap_or("");
            return format!("{prefix}{REDACTED}{tail}");
        }
    }
    path.to_string()
}

impl<S, B> Transform<S, ServiceRequest> for RequestLogging
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggingService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggingService {
            service,
            secret_prefixes: self.secret_prefixes.clone(),
        }))
    }
}

pub struct RequestLoggingService<S> {
    service: S,
    secret_prefixes: Vec<&'static str>,
}

impl<S, B> Service<ServiceRequest> for RequestLoggingService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().clone();
        let path = redact_path(req.path(), &self.secret_prefixes);

        let fut = self.service.call(req);

        Box::pin(async move {
            let res = fut.await?;
            let duration_ms = start.elapsed().as_millis() as u64;
            let status = res.status().as_u16();
            let user_id = res
                .request()
                .extensions()
                .get::<SessionUserId>()
                .map(|id| id.0);

            if res.status().is_server_error() {
                tracing::error!(%method, %path, status, duration_ms, ?user_id, "HTTP request failed");
            } else if res.status().is_client_error() {
                tracing::warn!(%method, %path, status, duration_ms, ?user_id, "HTTP request rejected");
            } else {
                tracing::info!(%method, %path, status, duration_ms, ?user_id, "HTTP request completed");
            }

            Ok(res)
        })
    }
}
