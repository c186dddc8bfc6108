use std::sync::Arc;

use axum::extract::{OriginalUri, Request, State};
use axum::http::Uri;
use axum::http::uri::PathAndQuery;

use crate::presentation::mvc::route::RouteCasing;

/// `map_request` hook that rewrites the path to its canonical casing. It has
/// to wrap the router as a service; `Router::layer` runs after matching.
pub async fn canonicalize_path(
    State(casing): State<Arc<RouteCasing>>,
    mut req: Request,
) -> Request {
    let canonical = casing.canonical_path(req.uri().path());
    if canonical == req.uri().path() {
        return req;
    }
    if req.extensions().get::<OriginalUri>().is_none() {
        let original = OriginalUri(req.uri().clone());
        req.extensions_mut().insert(original);
    }
    let path_and_query = match req.uri().query() {
        Some(q) => format!("{canonical}?{q}"),
        None => canonical,
    };
    let Ok(path_and_query) = path_and_query.parse::<PathAndQuery>() else {
        return req;
    };
    let mut parts = req.uri().clone().into_parts();
    parts.path_and_query = Some(path_and_query);
    if let Ok(uri) = Uri::from_parts(parts) {
        *req.uri_mut() = uri;
    }
    req
}
