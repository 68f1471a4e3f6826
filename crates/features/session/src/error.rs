use charachat_database::DatabaseError;
use charachat_vault::VaultError;
use std::borrow::Cow;

/// A specialized [`SessionError`] enum of this crate.
#[charachat_derive::charachat_error]
pub enum SessionError {
    /// Malformed login request.
    #[error("Session validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// The password does not match the account's verifier.
    #[error("Invalid credentials{}: {message}", format_context(.context))]
    InvalidCredentials { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    /// Key derivation or expansion failed.
    #[error("Session key error{}: {source}", format_context(.context))]
    Vault { source: VaultError, context: Option<Cow<'static, str>> },
    #[error("Session database error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },
    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal session error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[cfg(feature = "server")]
mod response {
    use super::SessionError;
    use axum::Json;
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use charachat_kernel::server::ErrorBody;
    use tracing::error;

    impl IntoResponse for SessionError {
        fn into_response(self) -> Response {
            let status = match &self {
                Self::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                Self::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };

            let message = if status.is_server_error() {
                error!(error = %self, "Session request failed");
                "Internal server error".to_owned()
            } else {
                self.to_string()
            };

            (status, Json(ErrorBody { error: self.kind().to_owned(), message })).into_response()
        }
    }
}
