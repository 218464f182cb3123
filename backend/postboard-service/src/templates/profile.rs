use super::{escape_html, format_date, layout, path_segment};
use crate::flash::Flash;
use crate::models::{Profile, User};

pub fn profile_page(viewer: &User, flashes: &[Flash], profile: &Profile) -> String {
    let user = &profile.user;
    let own_settings = if viewer.id == user.id {
        r#"<a class="btn btn-outline-secondary btn-sm" href="/change-username">Change username</a>
    <a class="btn btn-outline-secondary btn-sm" href="/change-password">Change password</a>"#
    } else {
        ""
    };

    let content = format!(
        r#"<div class="card">
  <div class="card-body">
    <h2 class="card-title">{username}</h2>
    <p class="card-text text-muted">Member since {joined}</p>
    <p class="card-text">
      <a href="/posts/{segment}">{posts} post(s)</a> &middot;
      <a href="/comments/{segment}">{comments} comment(s)</a>
    </p>
    {own_settings}
  </div>
</div>"#,
        username = escape_html(&user.username),
        segment = path_segment(&user.username),
        joined = format_date(&user.date_created),
        posts = profile.post_count,
        comments = profile.comment_count,
    );

    layout(&user.username, Some(viewer), flashes, &content)
}
