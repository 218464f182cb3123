//! Server-side HTML pages
//!
//! Pages are assembled with `format!` around a shared Bootstrap layout.
//! Every piece of user-supplied text goes through `escape_html` before it is
//! interpolated.

pub mod auth;
pub mod errors;
pub mod posts;
pub mod profile;

use crate::flash::Flash;
use crate::models::User;
use chrono::{DateTime, Utc};

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape a value for use as a single URL path segment
pub fn path_segment(raw: &str) -> String {
    urlencoding::encode(raw).into_owned()
}

pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

fn navbar(viewer: Option<&User>) -> String {
    let links = match viewer {
        Some(user) => format!(
            r#"<a class="nav-item nav-link" href="/home">Home</a>
        <a class="nav-item nav-link" href="/create-post">Create a post</a>
        <a class="nav-item nav-link" href="/profile/{profile}">{username}</a>
        <a class="nav-item nav-link" href="/logout">Logout</a>"#,
            profile = path_segment(&user.username),
            username = escape_html(&user.username),
        ),
        None => r#"<a class="nav-item nav-link" href="/login">Login</a>
        <a class="nav-item nav-link" href="/sign-up">Sign Up</a>"#
            .to_string(),
    };

    format!(
        r#"<nav class="navbar navbar-expand-lg navbar-dark bg-dark">
  <a class="navbar-brand" href="/home">Postboard</a>
  <div class="navbar-nav">
        {links}
  </div>
</nav>"#
    )
}

fn flash_alerts(flashes: &[Flash]) -> String {
    flashes
        .iter()
        .map(|flash| {
            format!(
                r#"<div class="alert {class} alert-dismissible fade show" role="alert">{message}<button type="button" class="close" data-dismiss="alert">&times;</button></div>"#,
                class = flash.level.alert_class(),
                message = escape_html(&flash.message),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Wrap `content` in the shared page chrome
pub fn layout(title: &str, viewer: Option<&User>, flashes: &[Flash], content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/css/bootstrap.min.css">
  <title>{title}</title>
</head>
<body>
{navbar}
<div class="container mt-3">
{alerts}
{content}
</div>
<script src="https://cdn.jsdelivr.net/npm/jquery@3.5.1/dist/jquery.slim.min.js"></script>
<script src="https://cdn.jsdelivr.net/npm/bootstrap@4.6.2/dist/js/bootstrap.bundle.min.js"></script>
</body>
</html>"#,
        title = escape_html(title),
        navbar = navbar(viewer),
        alerts = flash_alerts(flashes),
    )
}
