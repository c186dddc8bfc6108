use axum::extract::{OriginalUri, Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::presentation::error::AppError;
use crate::presentation::found;
use crate::presentation::middleware::authentication::AuthenticationResult;
use crate::presentation::pages::login_url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    AllowAnonymous,
    RequireAuthenticatedUser,
}

/// Route layer enforcing `policy`. Authentication must already have run.
pub async fn authorize(State(policy): State<Policy>, req: Request, next: Next) -> Response {
    let Some(result) = req.extensions().get::<AuthenticationResult>() else {
        tracing::error!(path = %req.uri().path(), "authorization_without_authentication");
        return AppError::from(anyhow::anyhow!(
            "authorization reached a request that was not authenticated"
        ))
        .into_response();
    };

    if policy == Policy::RequireAuthenticatedUser && result.0.is_none() {
        // Challenge with the path as the client sent it, before any rewriting
        let requested = req
            .extensions()
            .get::<OriginalUri>()
            .map(|o| &o.0)
            .unwrap_or(req.uri());
        let return_url = requested
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        tracing::debug!(path = %req.uri().path(), "authorization_challenge");
        return found(&login_url(return_url));
    }

    next.run(req).await
}
