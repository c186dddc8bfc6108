use axum::response::{IntoResponse, Response};

use crate::presentation::middleware::exception::{ErrorKind, UnhandledError};

/// Handler error that is left for the pipeline's exception stage to render.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        let from_database = self
            .0
            .chain()
            .any(|cause| cause.downcast_ref::<sqlx::Error>().is_some());
        if from_database {
            ErrorKind::Database
        } else {
            ErrorKind::Handler
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        UnhandledError {
            kind: self.kind(),
            message: self.0.to_string(),
            detail: format!("{:?}", self.0),
        }
        .into_response()
    }
}
