use crate::records::RecordError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use charachat_derive::api_model;
use tracing::error;

/// Error payload of every failed API call.
#[api_model]
pub struct ErrorBody {
    /// Stable error code, e.g. `MissingKey` or `NotFound`.
    pub error: String,
    pub message: String,
}

impl IntoResponse for RecordError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::MissingKey { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status.is_server_error() {
            error!(error = %self, "Request failed");
            "Internal server error".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorBody { error: self.kind().to_owned(), message })).into_response()
    }
}
