use super::{escape_html, format_date, layout, path_segment};
use crate::flash::Flash;
use crate::models::{CommentView, PostView, User};

fn comment_item(viewer: &User, comment: &CommentView) -> String {
    let delete = if comment.can_be_deleted_by(viewer.id) {
        format!(
            r#" <a class="text-danger small" href="/delete-comment/{}">Delete</a>"#,
            comment.id
        )
    } else {
        String::new()
    };

    format!(
        r#"<li class="list-group-item"><a href="/profile/{profile}">{author}</a>: {text} <small class="text-muted">{date}</small>{delete}</li>"#,
        profile = path_segment(&comment.author_username),
        author = escape_html(&comment.author_username),
        text = escape_html(&comment.text),
        date = format_date(&comment.date_created),
    )
}

/// A post with its comments and a comment form
pub fn post_card(viewer: &User, post: &PostView) -> String {
    let delete = if post.is_authored_by(viewer.id) {
        format!(
            r#"<a class="btn btn-sm btn-outline-danger float-right" href="/delete-post/{}">Delete</a>"#,
            post.id
        )
    } else {
        String::new()
    };

    let comments: String = post
        .comments
        .iter()
        .map(|c| comment_item(viewer, c))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<div class="card mb-3">
  <div class="card-header">
    <a href="/profile/{profile}">{author}</a> &middot; <a href="/posts/{profile}">all posts</a>
    {delete}
  </div>
  <div class="card-body">
    <p class="card-text">{text}</p>
    <ul class="list-group list-group-flush">{comments}</ul>
    <form class="form-inline mt-2" method="POST" action="/create-comment/{id}">
      <input type="text" class="form-control mr-2" name="text" placeholder="Comment something!">
      <button type="submit" class="btn btn-primary btn-sm">Comment</button>
    </form>
  </div>
  <div class="card-footer text-muted"><a href="/post/{id}">{date}</a> &middot; {count} comment(s)</div>
</div>"#,
        id = post.id,
        profile = path_segment(&post.author_username),
        author = escape_html(&post.author_username),
        text = escape_html(&post.text),
        date = format_date(&post.date_created),
        count = post.comments.len(),
    )
}

fn post_list(viewer: &User, posts: &[PostView]) -> String {
    if posts.is_empty() {
        return r#"<p class="text-muted">No posts yet.</p>"#.to_string();
    }
    posts
        .iter()
        .map(|p| post_card(viewer, p))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn home_page(viewer: &User, flashes: &[Flash], posts: &[PostView]) -> String {
    let content = format!(
        r#"<h1 class="mb-3">Posts</h1>
{posts}
<a class="btn btn-primary" href="/create-post">Create a post</a>"#,
        posts = post_list(viewer, posts),
    );
    layout("Home", Some(viewer), flashes, &content)
}

pub fn user_posts_page(
    viewer: &User,
    flashes: &[Flash],
    username: &str,
    posts: &[PostView],
) -> String {
    let content = format!(
        r#"<h1 class="mb-3">Posts by {username}</h1>
{posts}"#,
        username = escape_html(username),
        posts = post_list(viewer, posts),
    );
    layout(username, Some(viewer), flashes, &content)
}

pub fn single_post_page(viewer: &User, flashes: &[Flash], post: &PostView) -> String {
    layout("Post", Some(viewer), flashes, &post_card(viewer, post))
}

pub fn create_post_page(viewer: &User, flashes: &[Flash], text: &str) -> String {
    let content = format!(
        r#"<h1 class="mb-3">Create a post</h1>
<form method="POST" action="/create-post">
  <div class="form-group">
    <textarea class="form-control" name="text" id="text" rows="4">{text}</textarea>
  </div>
  <button type="submit" class="btn btn-primary">Post</button>
</form>"#,
        text = escape_html(text),
    );
    layout("Create a post", Some(viewer), flashes, &content)
}

pub fn user_comments_page(
    viewer: &User,
    flashes: &[Flash],
    username: &str,
    comments: &[CommentView],
) -> String {
    let items = if comments.is_empty() {
        r#"<li class="list-group-item text-muted">No comments yet.</li>"#.to_string()
    } else {
        comments
            .iter()
            .map(|c| {
                format!(
                    r#"{item}<li class="list-group-item small"><a href="/post/{post_id}">on post #{post_id}</a></li>"#,
                    item = comment_item(viewer, c),
                    post_id = c.post_id,
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    let content = format!(
        r#"<h1 class="mb-3">Comments by {username}</h1>
<ul class="list-group">{items}</ul>"#,
        username = escape_html(username),
    );
    layout(username, Some(viewer), flashes, &content)
}
