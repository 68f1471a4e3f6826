//! Session feature slice.
//!
//! Login turns an email and password into the field key with Argon2id and hands it to the
//! browser in the `key` cookie. The server keeps only a verifier per account, so the key
//! exists nowhere but in that cookie. Logout clears the cookie.

mod error;
#[cfg(feature = "server")]
mod handlers;
mod model;
mod service;

pub use error::{SessionError, SessionErrorExt};
pub use model::{Account, LoginRequest, LoginResponse, SessionStatus};
pub use service::{Accounts, Login};

use charachat_database::Database;
use charachat_kernel::domain::config::ApiConfig;
use charachat_kernel::domain::registry::InitializedSlice;

/// Session feature state.
#[charachat_derive::charachat_slice]
pub struct Session {
    pub accounts: Accounts,
}

/// Initialize the session feature.
#[must_use]
pub fn init(config: &ApiConfig, database: &Database) -> InitializedSlice {
    let accounts = Accounts::new(database, &config.security.kdf);
    tracing::info!(memory_kib = config.security.kdf.memory_kib, "Session slice initialized");

    InitializedSlice::new(Session::new(SessionInner { accounts }))
}

#[cfg(feature = "server")]
pub use handlers::router;
