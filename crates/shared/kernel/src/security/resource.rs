use crate::SAFE_ALPHABET;
use charachat_domain::constants::ID_LEN;
use std::borrow::Cow;

#[charachat_derive::charachat_error]
pub enum ResourceGuardError {
    #[error("Resource validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Utilities for safe resource handling and ID validation.
#[derive(Debug)]
pub struct ResourceGuard;

impl ResourceGuard {
    /// Checks that `id` has the shape of a generated record id.
    ///
    /// Ids come from request paths and bodies and end up as query bindings; anything that
    /// is not exactly [`ID_LEN`] characters of [`SAFE_ALPHABET`] is rejected before a query
    /// is built.
    ///
    /// # Errors
    /// Returns [`ResourceGuardError::Validation`] naming `what` when the id is malformed.
    pub fn verify_id<'a>(id: &'a str, what: &'static str) -> Result<&'a str, ResourceGuardError> {
        let well_formed =
            id.chars().count() == ID_LEN && id.chars().all(|c| SAFE_ALPHABET.contains(&c));
        if well_formed {
            Ok(id)
        } else {
            Err(ResourceGuardError::Validation {
                message: format!("'{}' is not a valid id", id.escape_debug()).into(),
                context: Some(what.into()),
            })
        }
    }

    /// Validates every id in `ids`.
    ///
    /// # Errors
    /// See [`ResourceGuard::verify_id`]; the first malformed id wins.
    pub fn verify_ids<'a, I>(ids: I, what: &'static str) -> Result<(), ResourceGuardError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter().try_for_each(|id| Self::verify_id(id, what).map(|_| ()))
    }
}
