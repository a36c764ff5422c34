use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::{error, warn};

use spelunk_error::{Error, ErrorKind};

/// An [`Error`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::FileNotFound => StatusCode::NOT_FOUND,
            kind if kind.is_caller_fault() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    kind: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if self.0.kind().is_caller_fault() {
            warn!(error = %self.0, status = status.as_u16(), "request rejected");
        } else {
            error!(error = %self.0, status = status.as_u16(), "request failed");
        }

        let body = ErrorResponse {
            error: self.0.to_string(),
            kind: self.0.kind().as_str(),
        };
        (status, Json(body)).into_response()
    }
}
