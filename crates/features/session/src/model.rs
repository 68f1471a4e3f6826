use charachat_database::SurrealValue;
use charachat_derive::api_model;
use serde::Deserialize;
use std::fmt;

/// One row per email. Only the key verifier is kept; the key itself never is.
#[derive(Debug, Clone, PartialEq, Eq, SurrealValue)]
pub struct Account {
    /// Normalized (trimmed, lowercase) email.
    pub email: String,
    pub owner_id: String,
    pub verifier: String,
    pub created_at: String,
}

/// Login credentials.
#[derive(Clone, Deserialize)]
#[cfg_attr(feature = "server", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct LoginResponse {
    pub owner_id: String,
    /// `true` when this login registered the account.
    pub created: bool,
}

#[api_model]
#[derive(Clone, PartialEq, Eq)]
pub struct SessionStatus {
    pub authenticated: bool,
    pub owner_id: Option<String>,
}
