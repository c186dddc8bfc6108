use axum::extract::{Request, State};
use axum::http::{Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::bootstrap::app_context::AppContext;

pub const MIGRATIONS_ENDPOINT_PATH: &str = "/ApplyDatabaseMigrations";

/// Development only: `POST /ApplyDatabaseMigrations` applies pending migrations.
pub async fn migrations_endpoint(
    State(ctx): State<AppContext>,
    req: Request,
    next: Next,
) -> Response {
    if req.method() != Method::POST || req.uri().path() != MIGRATIONS_ENDPOINT_PATH {
        return next.run(req).await;
    }
    match ctx.schema_migrations().apply().await {
        Ok(()) => {
            tracing::info!("migrations_applied");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => {
            tracing::error!(error = ?e, "migrations_apply_failed");
            (
                StatusCode::BAD_REQUEST,
                format!("An error occurred applying migrations: {e}"),
            )
                .into_response()
        }
    }
}
