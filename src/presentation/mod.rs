use axum::Router;
use axum::http::{StatusCode, header};
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};

use crate::bootstrap::app_context::AppContext;
use crate::presentation::middleware::authorization::{Policy, authorize};
use crate::presentation::mvc::route::{RouteCasing, RouteTemplate};

pub mod error;
pub mod http;
pub mod middleware;
pub mod mvc;
pub mod pages;
pub mod views;

/// Conventional controller routes, identity pages and their authorization
/// requirements. Authentication is layered on by the pipeline.
pub fn endpoints(ctx: AppContext) -> anyhow::Result<Router> {
    let template = RouteTemplate::parse(mvc::DEFAULT_ROUTE)?;

    let anonymous = mvc::controllers::home::routes(&template)
        .merge(pages::account::anonymous_routes())
        .route_layer(from_fn_with_state(Policy::AllowAnonymous, authorize));
    let protected = pages::account::protected_routes().route_layer(from_fn_with_state(
        Policy::RequireAuthenticatedUser,
        authorize,
    ));

    Ok(anonymous
        .merge(protected)
        .fallback(views::not_found_response)
        .with_state(ctx))
}

/// Canonical casing for every path [`endpoints`] registers.
pub fn route_casing() -> anyhow::Result<RouteCasing> {
    let template = RouteTemplate::parse(mvc::DEFAULT_ROUTE)?;
    Ok(RouteCasing::new(template).with_fixed_paths(pages::PAGE_PATHS.iter().copied()))
}

/// 302 redirect.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
