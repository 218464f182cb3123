use super::{escape_html, layout};
use actix_web::http::StatusCode;

pub fn error_page(status: StatusCode, message: &str) -> String {
    let reason = status.canonical_reason().unwrap_or("Error");
    let content = format!(
        r#"<div class="jumbotron">
  <h1 class="display-4">{code} {reason}</h1>
  <p class="lead">{message}</p>
  <a class="btn btn-primary" href="/home">Back to home</a>
</div>"#,
        code = status.as_u16(),
        message = escape_html(message),
    );
    layout(reason, None, &[], &content)
}
