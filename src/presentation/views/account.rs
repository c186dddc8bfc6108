use crate::domain::identity::IdentityUser;
use crate::presentation::pages::{LOGIN_PATH, MANAGE_CHANGE_PASSWORD_PATH, REGISTER_PATH};

use super::{text, validation_summary};

fn with_return_url(path: &str, return_url: Option<&str>) -> String {
    match return_url {
        Some(url) => format!("{path}?ReturnUrl={}", urlencoding::encode(url)),
        None => path.to_string(),
    }
}

pub fn login(email: &str, errors: &[String], return_url: Option<&str>) -> String {
    format!(
        "<h1>Log in</h1>\n<section>\n\
         <form class=\"stacked\" method=\"post\" action=\"{action}\">\n\
         <h2>Use a local account to log in.</h2>\n{summary}\n\
         <label for=\"email\">Email</label>\n\
         <input id=\"email\" name=\"email\" type=\"email\" autocomplete=\"username\" value=\"{email}\" required data-autofocus />\n\
         <label for=\"password\">Password</label>\n\
         <input id=\"password\" name=\"password\" type=\"password\" autocomplete=\"current-password\" required />\n\
         <label><input name=\"remember_me\" type=\"checkbox\" value=\"true\" /> Remember me?</label>\n\
         <p><button type=\"submit\">Log in</button></p>\n\
         <p><a href=\"{register}\">Register as a new user</a></p>\n\
         </form>\n</section>",
        action = text(&with_return_url(LOGIN_PATH, return_url)),
        summary = validation_summary(errors),
        email = text(email),
        register = text(&with_return_url(REGISTER_PATH, return_url)),
    )
}

pub fn register(email: &str, errors: &[String], return_url: Option<&str>) -> String {
    format!(
        "<h1>Register</h1>\n\
         <form class=\"stacked\" method=\"post\" action=\"{action}\">\n\
         <h2>Create a new account.</h2>\n{summary}\n\
         <label for=\"email\">Email</label>\n\
         <input id=\"email\" name=\"email\" type=\"email\" autocomplete=\"username\" value=\"{email}\" required data-autofocus />\n\
         <label for=\"password\">Password</label>\n\
         <input id=\"password\" name=\"password\" type=\"password\" autocomplete=\"new-password\" required />\n\
         <label for=\"confirm_password\">Confirm Password</label>\n\
         <input id=\"confirm_password\" name=\"confirm_password\" type=\"password\" autocomplete=\"new-password\" required />\n\
         <p><button type=\"submit\">Register</button></p>\n\
         </form>",
        action = text(&with_return_url(REGISTER_PATH, return_url)),
        summary = validation_summary(errors),
        email = text(email),
    )
}

/// No e-mail sender is configured, so the confirmation link is shown directly.
pub fn register_confirmation(email: &str, confirm_link: &str) -> String {
    format!(
        "<h1>Register confirmation</h1>\n\
         <p>An account was created for {email}. No email sender is configured, so confirm it here: \
         <a id=\"confirm-link\" href=\"{link}\">Click here to confirm your account</a></p>",
        email = text(email),
        link = text(confirm_link),
    )
}

pub fn confirm_email(confirmed: bool) -> String {
    let message = if confirmed {
        "Thank you for confirming your email."
    } else {
        "Error confirming your email."
    };
    format!("<h1>Confirm email</h1>\n<p>{message}</p>")
}

pub fn access_denied() -> String {
    "<h1 class=\"text-danger\">Access denied</h1>\n<p class=\"text-danger\">You do not have access to this resource.</p>".into()
}

pub fn manage(user: &IdentityUser) -> String {
    let confirmed = if user.email_confirmed {
        "confirmed"
    } else {
        "not confirmed"
    };
    format!(
        "<h1>Manage your account</h1>\n<dl>\n\
         <dt>Username</dt><dd>{user_name}</dd>\n\
         <dt>Email</dt><dd>{email} ({confirmed})</dd>\n\
         <dt>Member since</dt><dd>{since}</dd>\n</dl>\n\
         <p><a href=\"{change_password}\">Change password</a></p>",
        user_name = text(&user.user_name),
        email = text(&user.email),
        confirmed = confirmed,
        since = user.created_at.format("%Y-%m-%d"),
        change_password = MANAGE_CHANGE_PASSWORD_PATH,
    )
}

pub fn change_password(errors: &[String], changed: bool) -> String {
    let status = if changed {
        "<p class=\"alert\" role=\"status\">Your password has been changed.</p>\n"
    } else {
        ""
    };
    format!(
        "<h1>Change password</h1>\n{status}\
         <form class=\"stacked\" method=\"post\" action=\"{action}\">\n{summary}\n\
         <label for=\"old_password\">Current password</label>\n\
         <input id=\"old_password\" name=\"old_password\" type=\"password\" autocomplete=\"current-password\" required data-autofocus />\n\
         <label for=\"new_password\">New password</label>\n\
         <input id=\"new_password\" name=\"new_password\" type=\"password\" autocomplete=\"new-password\" required />\n\
         <label for=\"confirm_password\">Confirm new password</label>\n\
         <input id=\"confirm_password\" name=\"confirm_password\" type=\"password\" autocomplete=\"new-password\" required />\n\
         <p><button type=\"submit\">Update password</button></p>\n\
         </form>",
        action = MANAGE_CHANGE_PASSWORD_PATH,
        summary = validation_summary(errors),
    )
}
