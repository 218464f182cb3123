use super::{escape_html, layout, path_segment};
use crate::flash::Flash;
use crate::models::User;

fn input(label: &str, name: &str, kind: &str, value: &str) -> String {
    format!(
        r#"<div class="form-group">
    <label for="{name}">{label}</label>
    <input type="{kind}" class="form-control" id="{name}" name="{name}" value="{value}">
  </div>"#,
        value = escape_html(value),
    )
}

fn card(heading: &str, action: &str, fields: &[String], submit: &str, footer: &str) -> String {
    format!(
        r#"<div class="row justify-content-center">
<div class="col-md-6">
<h3 class="mb-3">{heading}</h3>
<form method="POST" action="{action}">
  {fields}
  <button type="submit" class="btn btn-primary">{submit}</button>
</form>
{footer}
</div>
</div>"#,
        fields = fields.join("\n  "),
    )
}

pub fn login_page(flashes: &[Flash], email: &str, next: Option<&str>) -> String {
    let mut fields = vec![
        input("Email", "email", "email", email),
        input("Password", "password", "password", ""),
    ];
    if let Some(next) = next {
        fields.push(format!(
            r#"<input type="hidden" name="next" value="{}">"#,
            escape_html(next)
        ));
    }

    let content = card(
        "Login",
        "/login",
        &fields,
        "Log in",
        r#"<p class="mt-3"><a href="/reset-password">Forgot password?</a> &middot; <a href="/sign-up">Create an account</a></p>"#,
    );
    layout("Login", None, flashes, &content)
}

pub fn sign_up_page(flashes: &[Flash], email: &str, username: &str) -> String {
    let fields = [
        input("Email", "email", "email", email),
        input("Username", "username", "text", username),
        input("Password", "password", "password", ""),
        input("Confirm Password", "confirm_password", "password", ""),
    ];

    let content = card(
        "Sign Up",
        "/sign-up",
        &fields,
        "Sign up",
        r#"<p class="mt-3">Already have an account? <a href="/login">Log in</a></p>"#,
    );
    layout("Sign Up", None, flashes, &content)
}

pub fn change_password_page(viewer: &User, flashes: &[Flash]) -> String {
    let fields = [
        input("New Password", "new_password", "password", ""),
        input("Confirm Password", "confirm_password", "password", ""),
    ];

    let content = card("Change Password", "/change-password", &fields, "Submit", "");
    layout("Change Password", Some(viewer), flashes, &content)
}

pub fn change_username_page(viewer: &User, flashes: &[Flash], new_username: &str) -> String {
    let fields = [input("New Username", "new_username", "text", new_username)];

    let content = card("Change Username", "/change-username", &fields, "Submit", "");
    layout("Change Username", Some(viewer), flashes, &content)
}

pub fn reset_request_page(flashes: &[Flash], email: &str) -> String {
    let fields = [input("Email", "email", "email", email)];

    let content = card(
        "Reset Password",
        "/reset-password",
        &fields,
        "Request password reset",
        "",
    );
    layout("Reset Password", None, flashes, &content)
}

pub fn reset_password_page(flashes: &[Flash], token: &str) -> String {
    let fields = [
        input("New Password", "new_password", "password", ""),
        input("Confirm Password", "confirm_password", "password", ""),
    ];

    let action = format!("/reset-password/{}", path_segment(token));
    let content = card("Reset Password", &action, &fields, "Reset password", "");
    layout("Reset Password", None, flashes, &content)
}
