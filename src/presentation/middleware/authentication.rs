use std::convert::Infallible;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::bootstrap::app_context::AppContext;

pub const IDENTITY_COOKIE: &str = "identity.session";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: Uuid,
    pub email: String,
}

/// Recorded on every request that went through [`authenticate`], signed in or not.
#[derive(Debug, Clone, Default)]
pub struct AuthenticationResult(pub Option<Principal>);

pub async fn authenticate(State(ctx): State<AppContext>, mut req: Request, next: Next) -> Response {
    let token = session_token(req.headers());
    let principal = token.as_deref().and_then(|t| {
        let claims = ctx.tokens().validate_session(t)?;
        let user_id = Uuid::parse_str(&claims.sub).ok()?;
        Some(Principal {
            user_id,
            email: claims.email,
        })
    });
    if token.is_some() && principal.is_none() {
        tracing::debug!(path = %req.uri().path(), "identity_cookie_rejected");
    }
    req.extensions_mut().insert(AuthenticationResult(principal));
    next.run(req).await
}

/// The signed-in user, if any.
pub struct MaybeUser(pub Option<Principal>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(
            parts
                .extensions
                .get::<AuthenticationResult>()
                .and_then(|r| r.0.clone()),
        ))
    }
}

/// The signed-in user; rejects anonymous requests.
pub struct CurrentUser(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticationResult>()
            .and_then(|r| r.0.clone())
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

// --- Cookie helpers ---

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|hdr| get_cookie(hdr, IDENTITY_COOKIE))
        .filter(|t| !t.is_empty())
}

fn get_cookie(cookie_header: &str, name: &str) -> Option<String> {
    for part in cookie_header.split(';') {
        let kv = part.trim();
        if let Some((k, v)) = kv.split_once('=') {
            if k.trim() == name {
                return Some(v.trim().to_string());
            }
        }
    }
    None
}

/// `max_age_secs = None` issues a browser-session cookie.
pub fn build_session_cookie(token: &str, max_age_secs: Option<i64>, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    let max_age = max_age_secs
        .map(|s| format!("; Max-Age={}", s.max(0)))
        .unwrap_or_default();
    format!(
        "{}={}; HttpOnly{}; Path=/{}; SameSite=Lax",
        IDENTITY_COOKIE, token, secure_attr, max_age
    )
}

pub fn clear_session_cookie(secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly{}; Path=/; Max-Age=0; SameSite=Lax",
        IDENTITY_COOKIE, secure_attr
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn finds_session_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            header::COOKIE,
            HeaderValue::from_static("a=1; identity.session=abc.def.ghi ; b=2"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn empty_cookie_is_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("identity.session="));
        assert_eq!(session_token(&headers), None);
    }

    #[test]
    fn cookie_attributes() {
        let persistent = build_session_cookie("tok", Some(60), true);
        assert_eq!(
            persistent,
            "identity.session=tok; HttpOnly; Secure; Path=/; Max-Age=60; SameSite=Lax"
        );
        let session = build_session_cookie("tok", None, false);
        assert!(!session.contains("Max-Age"));
        assert!(!session.contains("Secure"));
        assert!(clear_session_cookie(false).contains("Max-Age=0"));
    }
}
