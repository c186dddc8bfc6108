use axum::Router;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;

use crate::bootstrap::app_context::AppContext;
use crate::presentation::middleware::authentication::MaybeUser;
use crate::presentation::mvc::route::{ControllerRoutes, RouteTemplate};
use crate::presentation::views::{self, layout};

pub fn routes(template: &RouteTemplate) -> Router<AppContext> {
    ControllerRoutes::new(template.clone())
        .action("Home", "Index", get(index))
        .action("Home", "Privacy", get(privacy))
        .action("Home", "Error", get(error).post(error))
        .into_router()
}

async fn index(MaybeUser(user): MaybeUser) -> Html<String> {
    let body = views::home::index(user.as_ref().map(|u| u.email.as_str()));
    Html(layout("Home Page", user.as_ref(), &body))
}

async fn privacy(MaybeUser(user): MaybeUser) -> Html<String> {
    Html(layout("Privacy Policy", user.as_ref(), &views::home::privacy()))
}

async fn error(MaybeUser(user): MaybeUser, headers: HeaderMap) -> Response {
    let request_id = headers.get("x-request-id").and_then(|v| v.to_str().ok());
    let body = views::home::error(request_id);
    let mut res = Html(layout("Error", user.as_ref(), &body)).into_response();
    res.headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    res
}
