use std::sync::Arc;

use axum::Router;
use axum::middleware::{from_fn, from_fn_with_state, map_request_with_state};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::normalize_path::NormalizePathLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::bootstrap::app_context::AppContext;
use crate::presentation::middleware::authentication::authenticate;
use crate::presentation::middleware::exception::{
    developer_exception_page, exception_handler, panic_response,
};
use crate::presentation::middleware::hsts::{HstsOptions, hsts};
use crate::presentation::middleware::https_redirection::{HttpsRedirection, https_redirection};
use crate::presentation::middleware::migrations_endpoint::migrations_endpoint;
use crate::presentation::middleware::route_casing::canonicalize_path;
use crate::presentation::middleware::static_files::{mark_routed, static_file_errors};
use crate::presentation::mvc::route::RouteCasing;

/// Where non-development environments send clients after an unhandled error.
pub const ERROR_PATH: &str = "/Home/Error";

/// Wraps the routed endpoints in the request pipeline. Outermost first:
/// request id, tracing, exception handling, panic capture, the migrations
/// endpoint (development) or HSTS (otherwise), HTTPS redirection, static
/// files, then authentication in front of the routed endpoints.
///
/// Static files are matched with the request's own casing. Anything they do
/// not serve has its trailing slash trimmed and its path brought to the
/// casing routes are registered under.
pub fn build(ctx: AppContext, endpoints: Router, casing: RouteCasing) -> Router {
    let cfg = ctx.cfg.clone();
    let development = cfg.is_development();

    // Router::layer also wraps the fallback, so unmatched paths are authenticated too
    let routed = endpoints.layer(from_fn_with_state(ctx.clone(), authenticate));

    // Path rewrites must wrap the router itself; its own layers run after matching
    let routed = ServiceBuilder::new()
        .layer(from_fn(mark_routed))
        .layer(NormalizePathLayer::trim_trailing_slash())
        .layer(map_request_with_state(Arc::new(casing), canonicalize_path))
        .service(routed);

    let static_files = ServeDir::new(&cfg.static_root)
        .append_index_html_on_directories(false)
        .call_fallback_on_method_not_allowed(true)
        .fallback(routed);

    let app = Router::new()
        .fallback_service(static_files)
        .layer(from_fn(static_file_errors))
        .layer(from_fn_with_state(
            HttpsRedirection::new(cfg.https_port, cfg.trust_forwarded_headers),
            https_redirection,
        ));

    let app = if development {
        app.layer(from_fn_with_state(ctx.clone(), migrations_endpoint))
    } else {
        let options = HstsOptions {
            trust_forwarded_headers: cfg.trust_forwarded_headers,
            ..HstsOptions::new(cfg.hsts_max_age_secs)
        };
        app.layer(from_fn_with_state(Arc::new(options), hsts))
    };

    let app = app.layer(CatchPanicLayer::custom(panic_response));

    let app = if development {
        app.layer(from_fn_with_state(ctx, developer_exception_page))
    } else {
        app.layer(from_fn_with_state(ERROR_PATH, exception_handler))
    };

    app.layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let request_id = req
                    .headers()
                    .get("x-request-id")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                tracing::info_span!("http", %method, %uri, %request_id)
            }),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
