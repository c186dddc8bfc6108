use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::{Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::{host_without_port, is_https, request_host};

#[derive(Clone)]
pub struct HttpsRedirection {
    https_port: Option<u16>,
    trust_forwarded_headers: bool,
    warned: Arc<AtomicBool>,
}

impl HttpsRedirection {
    pub fn new(https_port: Option<u16>, trust_forwarded_headers: bool) -> Self {
        Self {
            https_port,
            trust_forwarded_headers,
            warned: Arc::new(AtomicBool::new(false)),
        }
    }
}

pub fn https_location(host: &str, port: u16, path_and_query: &str) -> String {
    let name = host_without_port(host);
    if port == 443 {
        format!("https://{name}{path_and_query}")
    } else {
        format!("https://{name}:{port}{path_and_query}")
    }
}

/// Sends plain-HTTP requests to the HTTPS endpoint with a 307.
pub async fn https_redirection(
    State(redirect): State<HttpsRedirection>,
    req: Request,
    next: Next,
) -> Response {
    if is_https(&req, redirect.trust_forwarded_headers) {
        return next.run(req).await;
    }
    let Some(port) = redirect.https_port else {
        if !redirect.warned.swap(true, Ordering::Relaxed) {
            tracing::warn!("Failed to determine the https port for redirect.");
        }
        return next.run(req).await;
    };
    let Some(host) = request_host(&req) else {
        return next.run(req).await;
    };
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let location = https_location(host, port, path_and_query);
    (
        StatusCode::TEMPORARY_REDIRECT,
        [(header::LOCATION, location)],
    )
        .into_response()
}
