use serde::Deserialize;

pub mod account;

pub const LOGIN_PATH: &str = "/Identity/Account/Login";
pub const LOGOUT_PATH: &str = "/Identity/Account/Logout";
pub const REGISTER_PATH: &str = "/Identity/Account/Register";
pub const REGISTER_CONFIRMATION_PATH: &str = "/Identity/Account/RegisterConfirmation";
pub const CONFIRM_EMAIL_PATH: &str = "/Identity/Account/ConfirmEmail";
pub const ACCESS_DENIED_PATH: &str = "/Identity/Account/AccessDenied";
pub const MANAGE_PATH: &str = "/Identity/Account/Manage";
pub const MANAGE_CHANGE_PASSWORD_PATH: &str = "/Identity/Account/Manage/ChangePassword";

/// Every page path, as written in links. Routing matches them case-insensitively.
pub const PAGE_PATHS: &[&str] = &[
    LOGIN_PATH,
    LOGOUT_PATH,
    REGISTER_PATH,
    REGISTER_CONFIRMATION_PATH,
    CONFIRM_EMAIL_PATH,
    ACCESS_DENIED_PATH,
    MANAGE_PATH,
    MANAGE_CHANGE_PASSWORD_PATH,
];

#[derive(Debug, Default, Deserialize)]
pub struct ReturnUrlQuery {
    #[serde(rename = "ReturnUrl", alias = "returnUrl", alias = "returnurl")]
    pub return_url: Option<String>,
}

pub fn login_url(return_url: &str) -> String {
    format!("{LOGIN_PATH}?ReturnUrl={}", urlencoding::encode(return_url))
}

/// Same-site relative URL: `/x` or `~/x`, but not `//x` or `/\x`.
pub fn is_local_url(url: &str) -> bool {
    if url.chars().any(char::is_control) {
        return false;
    }
    let rest = match url.strip_prefix("~/") {
        Some(rest) => rest,
        None => match url.strip_prefix('/') {
            Some(rest) => rest,
            None => return false,
        },
    };
    !(rest.starts_with('/') || rest.starts_with('\\'))
}

/// Where to send the user after an account action; falls back to `/`.
pub fn local_return_url(return_url: Option<&str>) -> String {
    match return_url {
        Some(url) if is_local_url(url) => match url.strip_prefix('~') {
            Some(rest) => rest.to_string(),
            None => url.to_string(),
        },
        _ => "/".to_string(),
    }
}
