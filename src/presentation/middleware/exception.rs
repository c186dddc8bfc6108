use std::any::Any;

use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::middleware::Next;

use crate::bootstrap::app_context::AppContext;
use crate::presentation::found;
use crate::presentation::views::diagnostics::{self, DatabaseDiagnostics, RequestSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Handler,
    Database,
    Panic,
}

/// Attached to a 500 response whose cause has not been handled yet. The
/// exception stage of the pipeline consumes it.
#[derive(Debug, Clone)]
pub struct UnhandledError {
    pub kind: ErrorKind,
    pub message: String,
    pub detail: String,
}

impl IntoResponse for UnhandledError {
    fn into_response(self) -> Response {
        let mut res = StatusCode::INTERNAL_SERVER_ERROR.into_response();
        res.extensions_mut().insert(self);
        res
    }
}

/// `CatchPanicLayer` hook: turns a panic payload into an unhandled error.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    UnhandledError {
        kind: ErrorKind::Panic,
        detail: format!("handler panicked: {message}"),
        message,
    }
    .into_response()
}

/// Development only: renders the full error, and for database failures the
/// migrations that have not been applied yet.
pub async fn developer_exception_page(
    State(ctx): State<AppContext>,
    req: Request,
    next: Next,
) -> Response {
    let summary = RequestSummary {
        method: req.method().to_string(),
        uri: req.uri().to_string(),
    };
    let mut res = next.run(req).await;
    let Some(err) = res.extensions_mut().remove::<UnhandledError>() else {
        return res;
    };
    tracing::error!(kind = ?err.kind, error = %err.message, uri = %summary.uri, "unhandled_request_error");

    let database = if err.kind == ErrorKind::Database {
        Some(match ctx.schema_migrations().pending().await {
            Ok(pending) => DatabaseDiagnostics::Pending(pending),
            Err(e) => DatabaseDiagnostics::Unavailable(e.to_string()),
        })
    } else {
        None
    };

    let html = diagnostics::developer_exception_page(&summary, &err, database.as_ref());
    let mut res = (StatusCode::INTERNAL_SERVER_ERROR, Html(html)).into_response();
    res.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
    res
}

/// Non-development: logs the error and sends the client to `error_path`.
pub async fn exception_handler(
    State(error_path): State<&'static str>,
    req: Request,
    next: Next,
) -> Response {
    let failing_on_error_path = req.uri().path().eq_ignore_ascii_case(error_path);
    let uri = req.uri().to_string();
    let mut res = next.run(req).await;
    let Some(err) = res.extensions_mut().remove::<UnhandledError>() else {
        return res;
    };
    tracing::error!(kind = ?err.kind, error = %err.message, detail = %err.detail, %uri, "unhandled_request_error");

    if failing_on_error_path {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An error occurred while processing your request.",
        )
            .into_response();
    }
    let mut res = found(error_path);
    res.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache, no-store"));
    res
}
