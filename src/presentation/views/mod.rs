use axum::http::StatusCode;
use axum::response::Html;
use htmlescape::encode_minimal;

use crate::presentation::middleware::authentication::{MaybeUser, Principal};
use crate::presentation::pages::{LOGIN_PATH, LOGOUT_PATH, MANAGE_PATH, REGISTER_PATH};

pub mod account;
pub mod diagnostics;
pub mod home;

/// Escapes text and double-quoted attribute values.
pub(crate) fn text(value: &str) -> String {
    encode_minimal(value)
}

/// Shared page chrome: navigation, sign-in state, stylesheet and footer.
pub fn layout(title: &str, user: Option<&Principal>, body: &str) -> String {
    let account_nav = match user {
        Some(p) => format!(
            "<li><a href=\"{manage}\" title=\"Manage\">Hello {email}!</a></li>\n\
             <li><form method=\"post\" action=\"{logout}?returnUrl=%2F\"><button type=\"submit\" class=\"link\">Logout</button></form></li>",
            manage = MANAGE_PATH,
            logout = LOGOUT_PATH,
            email = text(&p.email),
        ),
        None => format!(
            "<li><a href=\"{register}\">Register</a></li>\n<li><a href=\"{login}\">Login</a></li>",
            register = REGISTER_PATH,
            login = LOGIN_PATH,
        ),
    };
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\" />\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\" />\n\
         <title>{title} - Web</title>\n<link rel=\"stylesheet\" href=\"/css/site.css\" />\n</head>\n<body>\n\
         <header>\n<nav>\n<a href=\"/\">Web</a>\n<ul>\n<li><a href=\"/\">Home</a></li>\n\
         <li><a href=\"/Home/Privacy\">Privacy</a></li>\n</ul>\n<ul>\n{account_nav}\n</ul>\n</nav>\n</header>\n\
         <main class=\"container\" role=\"main\">\n{body}\n</main>\n\
         <footer>&copy; {year} - Web - <a href=\"/Home/Privacy\">Privacy</a></footer>\n\
         <script src=\"/js/site.js\"></script>\n</body>\n</html>\n",
        title = text(title),
        account_nav = account_nav,
        body = body,
        year = chrono::Utc::now().format("%Y"),
    )
}

pub fn validation_summary(errors: &[String]) -> String {
    if errors.is_empty() {
        return String::new();
    }
    let items: String = errors
        .iter()
        .map(|e| format!("<li>{}</li>", text(e)))
        .collect();
    format!("<div class=\"validation-summary\" role=\"alert\"><ul>{items}</ul></div>")
}

pub fn not_found(user: Option<&Principal>, message: &str) -> String {
    layout(
        "Not Found",
        user,
        &format!("<h1>Not Found</h1>\n<p>{}</p>", text(message)),
    )
}

pub async fn not_found_response(MaybeUser(user): MaybeUser) -> (StatusCode, Html<String>) {
    (
        StatusCode::NOT_FOUND,
        Html(not_found(
            user.as_ref(),
            "Sorry, there's nothing at this address.",
        )),
    )
}
