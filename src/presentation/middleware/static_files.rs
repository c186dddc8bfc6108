use axum::extract::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::exception::{ErrorKind, UnhandledError};

/// Tags responses that came from the routed endpoints behind the static file
/// server.
#[derive(Debug, Clone, Copy)]
pub struct RoutedResponse;

pub async fn mark_routed(req: Request, next: Next) -> Response {
    let mut res = next.run(req).await;
    res.extensions_mut().insert(RoutedResponse);
    res
}

/// Wraps the static file server. A server error it produced itself (an I/O
/// failure reading a file) is handed to the exception stage like any other
/// unhandled error; routed responses pass through untouched.
pub async fn static_file_errors(req: Request, next: Next) -> Response {
    let path = req.uri().path().to_string();
    let mut res = next.run(req).await;
    let routed = res.extensions_mut().remove::<RoutedResponse>().is_some();
    if routed || !res.status().is_server_error() {
        return res;
    }
    UnhandledError {
        kind: ErrorKind::Handler,
        message: format!("Failed to serve static file '{path}'."),
        detail: format!("static file server answered {} for {path}", res.status()),
    }
    .into_response()
}
