use axum::extract::{Form, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{MethodRouter, get, post};
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use super::{
    ACCESS_DENIED_PATH, CONFIRM_EMAIL_PATH, LOGIN_PATH, LOGOUT_PATH, MANAGE_CHANGE_PASSWORD_PATH,
    MANAGE_PATH, REGISTER_CONFIRMATION_PATH, REGISTER_PATH, ReturnUrlQuery, is_local_url,
    local_return_url,
};
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::identity::IdentityError;
use crate::application::use_cases::identity::change_password::{
    ChangePassword, ChangePasswordRequest,
};
use crate::application::use_cases::identity::confirm_email::ConfirmEmail;
use crate::application::use_cases::identity::current_user::GetCurrentUser;
use crate::application::use_cases::identity::register::{Register, RegisterRequest};
use crate::application::use_cases::identity::sign_in::{SignIn, SignInRequest};
use crate::bootstrap::app_context::AppContext;
use crate::domain::identity::{IdentityUser, normalize};
use crate::presentation::error::AppError;
use crate::presentation::found;
use crate::presentation::middleware::authentication::{
    CurrentUser, MaybeUser, build_session_cookie, clear_session_cookie,
};
use crate::presentation::views::{self, layout};

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChangePasswordQuery {
    #[serde(default)]
    pub changed: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterConfirmationQuery {
    pub email: Option<String>,
    #[serde(rename = "returnUrl", alias = "ReturnUrl")]
    pub return_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfirmEmailQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub code: Option<String>,
}

/// Pages are registered lowercase; requests reach them through path canonicalization.
fn register_pages(
    mut router: Router<AppContext>,
    pages: Vec<(&str, MethodRouter<AppContext>)>,
) -> Router<AppContext> {
    for (path, handler) in pages {
        router = router.route(&path.to_lowercase(), handler);
    }
    router
}

pub fn anonymous_routes() -> Router<AppContext> {
    register_pages(
        Router::new(),
        vec![
            (REGISTER_PATH, get(register_page).post(register_submit)),
            (REGISTER_CONFIRMATION_PATH, get(register_confirmation)),
            (CONFIRM_EMAIL_PATH, get(confirm_email)),
            (LOGIN_PATH, get(login_page).post(login_submit)),
            (LOGOUT_PATH, post(logout)),
            (ACCESS_DENIED_PATH, get(access_denied)),
        ],
    )
}

pub fn protected_routes() -> Router<AppContext> {
    register_pages(
        Router::new(),
        vec![
            (MANAGE_PATH, get(manage)),
            (
                MANAGE_CHANGE_PASSWORD_PATH,
                get(change_password_page).post(change_password_submit),
            ),
        ],
    )
}

fn sign_in_response(
    ctx: &AppContext,
    user: &IdentityUser,
    persistent: bool,
    redirect_to: &str,
) -> Result<Response, AppError> {
    let ttl = ctx.cfg.auth_cookie_expires_secs;
    let token = ctx.tokens().issue_session(user, ttl)?;
    let cookie = build_session_cookie(&token, persistent.then_some(ttl), ctx.cfg.auth_cookie_secure);
    let mut res = found(redirect_to);
    res.headers_mut()
        .append(header::SET_COOKIE, HeaderValue::from_str(&cookie)?);
    tracing::info!(user_id = %user.id, persistent, "user_signed_in");
    Ok(res)
}

fn sign_out_cookie(ctx: &AppContext) -> Result<HeaderValue, AppError> {
    Ok(HeaderValue::from_str(&clear_session_cookie(
        ctx.cfg.auth_cookie_secure,
    ))?)
}

async fn register_page(
    MaybeUser(user): MaybeUser,
    Query(q): Query<ReturnUrlQuery>,
) -> Html<String> {
    let body = views::account::register("", &[], q.return_url.as_deref());
    Html(layout("Register", user.as_ref(), &body))
}

async fn register_submit(
    State(ctx): State<AppContext>,
    MaybeUser(user): MaybeUser,
    Query(q): Query<ReturnUrlQuery>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    let repo = ctx.user_repo();
    let policy = ctx.password_policy();
    let uc = Register {
        repo: repo.as_ref(),
        policy: &policy,
    };
    let dto = RegisterRequest {
        email: form.email.clone(),
        password: form.password.clone(),
        confirm_password: form.confirm_password.clone(),
    };
    match uc.execute(&dto).await {
        Ok(registered) => {
            if ctx.cfg.require_confirmed_account {
                let mut url = format!(
                    "{REGISTER_CONFIRMATION_PATH}?email={}",
                    urlencoding::encode(&registered.email)
                );
                if let Some(r) = q.return_url.as_deref().filter(|u| is_local_url(u)) {
                    url.push_str(&format!("&returnUrl={}", urlencoding::encode(r)));
                }
                return Ok(found(&url));
            }
            let redirect_to = local_return_url(q.return_url.as_deref());
            sign_in_response(&ctx, &registered, false, &redirect_to)
        }
        Err(IdentityError::Storage(e)) => Err(e.into()),
        Err(e) => {
            let body =
                views::account::register(&form.email, &e.messages(), q.return_url.as_deref());
            Ok(Html(layout("Register", user.as_ref(), &body)).into_response())
        }
    }
}

async fn register_confirmation(
    State(ctx): State<AppContext>,
    MaybeUser(principal): MaybeUser,
    Query(q): Query<RegisterConfirmationQuery>,
) -> Result<Response, AppError> {
    let Some(email) = q.email.as_deref().filter(|e| !e.trim().is_empty()) else {
        return Ok(found("/"));
    };
    let Some(user) = ctx
        .user_repo()
        .find_by_normalized_email(&normalize(email))
        .await?
    else {
        let body = views::not_found(
            principal.as_ref(),
            &format!("Unable to load user with email '{email}'."),
        );
        return Ok((StatusCode::NOT_FOUND, Html(body)).into_response());
    };

    let code = ctx.tokens().issue_email_confirmation(&user)?;
    let mut link = format!(
        "{CONFIRM_EMAIL_PATH}?userId={}&code={}",
        user.id,
        urlencoding::encode(&code)
    );
    if let Some(r) = q.return_url.as_deref().filter(|u| is_local_url(u)) {
        link.push_str(&format!("&returnUrl={}", urlencoding::encode(r)));
    }
    let body = views::account::register_confirmation(&user.email, &link);
    Ok(Html(layout("Register confirmation", principal.as_ref(), &body)).into_response())
}

async fn confirm_email(
    State(ctx): State<AppContext>,
    MaybeUser(principal): MaybeUser,
    Query(q): Query<ConfirmEmailQuery>,
) -> Result<Response, AppError> {
    let (Some(raw_id), Some(code)) = (q.user_id.as_deref(), q.code.as_deref()) else {
        return Ok(found("/"));
    };
    let Ok(user_id) = Uuid::parse_str(raw_id) else {
        let body = views::not_found(
            principal.as_ref(),
            &format!("Unable to load user with ID '{raw_id}'."),
        );
        return Ok((StatusCode::NOT_FOUND, Html(body)).into_response());
    };

    let repo = ctx.user_repo();
    let uc = ConfirmEmail {
        repo: repo.as_ref(),
        tokens: ctx.tokens(),
    };
    let confirmed = match uc.execute(user_id, code).await {
        Ok(()) => true,
        Err(IdentityError::Storage(e)) => return Err(e.into()),
        Err(e) => {
            tracing::debug!(%user_id, error = %e, "email_confirmation_rejected");
            false
        }
    };
    let body = views::account::confirm_email(confirmed);
    Ok(Html(layout("Confirm email", principal.as_ref(), &body)).into_response())
}

async fn login_page(MaybeUser(user): MaybeUser, Query(q): Query<ReturnUrlQuery>) -> Html<String> {
    let body = views::account::login("", &[], q.return_url.as_deref());
    Html(layout("Log in", user.as_ref(), &body))
}

async fn login_submit(
    State(ctx): State<AppContext>,
    MaybeUser(user): MaybeUser,
    Query(q): Query<ReturnUrlQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let repo = ctx.user_repo();
    let uc = SignIn {
        repo: repo.as_ref(),
        require_confirmed_account: ctx.cfg.require_confirmed_account,
    };
    let dto = SignInRequest {
        email: form.email.clone(),
        password: form.password.clone(),
    };
    match uc.execute(&dto).await {
        Ok(signed_in) => {
            let persistent = matches!(form.remember_me.as_deref(), Some("true" | "on"));
            let redirect_to = local_return_url(q.return_url.as_deref());
            sign_in_response(&ctx, &signed_in, persistent, &redirect_to)
        }
        Err(IdentityError::Storage(e)) => Err(e.into()),
        Err(e) => {
            let body = views::account::login(&form.email, &e.messages(), q.return_url.as_deref());
            Ok(Html(layout("Log in", user.as_ref(), &body)).into_response())
        }
    }
}

async fn logout(
    State(ctx): State<AppContext>,
    MaybeUser(user): MaybeUser,
    Query(q): Query<ReturnUrlQuery>,
) -> Result<Response, AppError> {
    if let Some(p) = &user {
        tracing::info!(user_id = %p.user_id, "user_signed_out");
    }
    let mut res = found(&local_return_url(q.return_url.as_deref()));
    res.headers_mut()
        .append(header::SET_COOKIE, sign_out_cookie(&ctx)?);
    Ok(res)
}

async fn access_denied(MaybeUser(user): MaybeUser) -> Html<String> {
    Html(layout(
        "Access denied",
        user.as_ref(),
        &views::account::access_denied(),
    ))
}

async fn manage(
    State(ctx): State<AppContext>,
    CurrentUser(principal): CurrentUser,
) -> Result<Response, AppError> {
    let repo = ctx.user_repo();
    let uc = GetCurrentUser {
        repo: repo.as_ref(),
    };
    match uc.execute(principal.user_id).await? {
        Some(user) => {
            let body = views::account::manage(&user);
            Ok(Html(layout("Manage your account", Some(&principal), &body)).into_response())
        }
        None => {
            // Cookie outlived its account
            let body = views::not_found(
                None,
                &format!("Unable to load user with ID '{}'.", principal.user_id),
            );
            let mut res = (StatusCode::NOT_FOUND, Html(body)).into_response();
            res.headers_mut()
                .append(header::SET_COOKIE, sign_out_cookie(&ctx)?);
            Ok(res)
        }
    }
}

async fn change_password_page(
    CurrentUser(principal): CurrentUser,
    Query(q): Query<ChangePasswordQuery>,
) -> Html<String> {
    let body = views::account::change_password(&[], q.changed.is_some());
    Html(layout("Change password", Some(&principal), &body))
}

async fn change_password_submit(
    State(ctx): State<AppContext>,
    CurrentUser(principal): CurrentUser,
    Form(form): Form<ChangePasswordForm>,
) -> Result<Response, AppError> {
    let repo = ctx.user_repo();
    let policy = ctx.password_policy();
    let uc = ChangePassword {
        repo: repo.as_ref(),
        policy: &policy,
    };
    let dto = ChangePasswordRequest {
        old_password: form.old_password,
        new_password: form.new_password,
        confirm_password: form.confirm_password,
    };
    match uc.execute(principal.user_id, &dto).await {
        // The session was issued against the old stamp; refresh it in place.
        Ok(user) => sign_in_response(
            &ctx,
            &user,
            false,
            &format!("{MANAGE_CHANGE_PASSWORD_PATH}?changed=1"),
        ),
        Err(IdentityError::Storage(e)) => Err(e.into()),
        Err(e) => {
            let body = views::account::change_password(&e.messages(), false);
            Ok(Html(layout("Change password", Some(&principal), &body)).into_response())
        }
    }
}
