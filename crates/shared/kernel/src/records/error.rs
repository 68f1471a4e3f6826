use crate::security::ResourceGuardError;
use charachat_database::DatabaseError;
use charachat_vault::{FieldFailure, VaultError};
use std::borrow::Cow;

/// Errors of the record read and write paths.
#[charachat_derive::charachat_error]
pub enum RecordError {
    /// No usable session key (cookie absent or undecodable).
    #[error("Missing session key{}: {message}", format_context(.context))]
    MissingKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Ciphertext malformed or sealed under another key.
    #[error("Decryption failed{}: {message}", format_context(.context))]
    Decryption { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Database error{}: {source}", format_context(.context))]
    Database { source: DatabaseError, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Forbidden{}: {message}", format_context(.context))]
    Forbidden { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Key expansion or encryption failed on the write side.
    #[error("Cipher error{}: {source}", format_context(.context))]
    Cipher { source: VaultError, context: Option<Cow<'static, str>> },

    #[error("Internal record error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl RecordError {
    #[must_use]
    pub fn missing_key() -> Self {
        Self::MissingKey { message: "No session key".into(), context: None }
    }

    /// A sealed field of a stored record that did not open.
    #[must_use]
    pub fn decryption(kind: &'static str, uid: &str, failure: &FieldFailure) -> Self {
        Self::Decryption {
            message: format!("{kind}.{}: {}", failure.field, failure.error).into(),
            context: Some(uid.to_owned().into()),
        }
    }

    pub(crate) fn not_found(kind: &'static str, uid: &str) -> Self {
        Self::NotFound { message: format!("{kind} '{uid}'").into(), context: None }
    }

    pub(crate) fn forbidden(kind: &'static str, uid: &str) -> Self {
        Self::Forbidden {
            message: format!("{kind} '{uid}' belongs to another owner").into(),
            context: None,
        }
    }
}

impl From<ResourceGuardError> for RecordError {
    fn from(err: ResourceGuardError) -> Self {
        match err {
            ResourceGuardError::Validation { message, context } => Self::Validation { message, context },
        }
    }
}
