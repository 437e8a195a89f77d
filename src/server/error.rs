//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`streamcat_common::Error`] so that route
//! handlers can return `Result<T, AppError>` and use `?` on catalog calls.

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use streamcat_common::Error;

/// Wrapper so we can implement `IntoResponse` for an external type.
#[derive(Debug)]
pub struct AppError(pub Error);

impl From<Error> for AppError {
    fn from(e: Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // 416 carries the resource length and nothing else.
        if let Error::RangeNotSatisfiable { length } = self.0 {
            return (
                status,
                [(header::CONTENT_RANGE, format!("bytes */{length}"))],
                Body::empty(),
            )
                .into_response();
        }

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.0,
                "Server error in API handler"
            );
        }

        let body = json!({
            "error": self.0.to_string(),
            "code": self.0.code(),
        });

        (status, axum::Json(body)).into_response()
    }
}
