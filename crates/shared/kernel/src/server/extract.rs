use crate::records::RecordError;
use crate::security::{KeyProvider, SecurityContext};
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header;
use axum::http::request::Parts;

/// Resolves the caller once per request from the `key` cookie.
///
/// Never rejects a request for lacking a key: the context is anonymous instead, and
/// operations that need a key fail with [`RecordError::MissingKey`] themselves.
impl<S> FromRequestParts<S> for SecurityContext
where
    KeyProvider: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = RecordError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = parts.headers.get_all(header::COOKIE).iter().filter_map(|v| v.to_str().ok());
        KeyProvider::from_ref(state).context(cookies)
    }
}
