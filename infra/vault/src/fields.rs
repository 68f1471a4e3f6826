//! # Record Field Transforms
//!
//! [`SensitiveFields`] describes which string fields of a record kind are encrypted at
//! rest. It is normally derived with `#[derive(SensitiveFields)]`. The transforms on
//! [`FieldCipher`] are written once against that trait and serve every record kind.

use crate::engine::FieldCipher;
use crate::error::VaultError;
use crate::key::FieldKey;
use crate::probe::is_sealed;
use crate::types::{VaultCipher, field_context};

/// A record kind with a fixed set of encrypted-at-rest string fields.
pub trait SensitiveFields {
    /// Record kind, the first half of every field's associated data.
    const KIND: &'static str;

    /// Names of the sensitive fields, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Whether the sensitive fields must be ciphertext at rest.
    fn is_private(&self) -> bool;

    /// Calls `visitor` with each present sensitive value.
    fn visit_sensitive(&self, visitor: &mut dyn FnMut(&'static str, &str));

    /// Calls `visitor` with a mutable handle to each present sensitive value.
    fn visit_sensitive_mut(&mut self, visitor: &mut dyn FnMut(&'static str, &mut String));

    /// `true` if any non-empty sensitive value fails the ciphertext probe.
    fn has_plaintext_fields(&self) -> bool {
        let mut found = false;
        self.visit_sensitive(&mut |_, value| found |= !value.is_empty() && !is_sealed(value));
        found
    }

    /// `true` if any sensitive value passes the ciphertext probe.
    fn has_sealed_fields(&self) -> bool {
        let mut found = false;
        self.visit_sensitive(&mut |_, value| found |= is_sealed(value));
        found
    }
}

/// A single field that could not be opened.
#[derive(Debug)]
pub struct FieldFailure {
    pub field: &'static str,
    pub error: VaultError,
}

/// Outcome of [`FieldCipher::open_fields`].
#[derive(Debug, Default)]
pub struct OpenReport {
    /// Values that were decrypted in place.
    pub opened: usize,
    /// Non-empty values that are still plaintext.
    pub legacy: usize,
    /// Values that looked sealed but did not open; they are left unchanged.
    pub failures: Vec<FieldFailure>,
}

impl OpenReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl<C: VaultCipher> FieldCipher<C> {
    /// Encrypts every sensitive value of `record` in place.
    ///
    /// Empty values pass through. A value that is already sealed **and** authenticates
    /// under this key and its field context is kept as is; anything else, including
    /// plaintext that merely looks sealed, is encrypted. Returns the number of values
    /// encrypted.
    ///
    /// # Errors
    /// Returns the first encryption failure; the record is then partially sealed and
    /// must not be persisted.
    pub fn seal_fields<T: SensitiveFields + ?Sized>(&self, record: &mut T) -> Result<usize, VaultError> {
        self.seal_where(record, |cipher, value, aad| !cipher.opens(value, aad))
    }

    /// Encrypts only the values that fail the ciphertext probe.
    ///
    /// This is the self-heal transform for rows written before encryption existed: it
    /// never re-encrypts a value that is structurally sealed, even if it does not open
    /// under this key.
    ///
    /// # Errors
    /// Returns the first encryption failure.
    pub fn seal_legacy_fields<T: SensitiveFields + ?Sized>(
        &self,
        record: &mut T,
    ) -> Result<usize, VaultError> {
        self.seal_where(record, |_, value, _| !is_sealed(value))
    }

    /// Decrypts every sealed value of `record` in place.
    ///
    /// Never fails as a whole: a value that does not open is reported in
    /// [`OpenReport::failures`] and kept unchanged, and plaintext values are counted as
    /// legacy and left alone.
    pub fn open_fields<T: SensitiveFields + ?Sized>(&self, record: &mut T) -> OpenReport {
        let mut report = OpenReport::default();

        record.visit_sensitive_mut(&mut |field, value| {
            if value.is_empty() {
                return;
            }
            if !is_sealed(value) {
                report.legacy += 1;
                return;
            }
            match self.open(value, &field_context(T::KIND, field)) {
                Ok(plain) => {
                    *value = plain;
                    report.opened += 1;
                },
                Err(error) => report.failures.push(FieldFailure { field, error }),
            }
        });

        report
    }

    fn seal_where<T: SensitiveFields + ?Sized>(
        &self,
        record: &mut T,
        needs_seal: impl Fn(&Self, &str, &str) -> bool,
    ) -> Result<usize, VaultError> {
        let mut sealed = 0;
        let mut failure = None;

        record.visit_sensitive_mut(&mut |field, value| {
            if failure.is_some() || value.is_empty() {
                return;
            }
            let aad = field_context(T::KIND, field);
            if !needs_seal(self, value, &aad) {
                return;
            }
            match self.seal(value, &aad) {
                Ok(cipher_text) => {
                    *value = cipher_text;
                    sealed += 1;
                },
                Err(err) => failure = Some(err),
            }
        });

        failure.map_or(Ok(sealed), Err)
    }
}

/// Returns `record` with its sensitive fields encrypted under `key`.
///
/// # Errors
/// See [`FieldCipher::seal_fields`].
pub fn encrypt_fields<T: SensitiveFields>(mut record: T, key: &FieldKey) -> Result<T, VaultError> {
    FieldCipher::<crate::types::Aes>::new(key)?.seal_fields(&mut record)?;
    Ok(record)
}

/// Returns `record` with its sensitive fields decrypted under `key`, plus the per-field report.
///
/// # Errors
/// Only if a cipher cannot be built from `key`; per-field failures land in the report.
pub fn decrypt_fields<T: SensitiveFields>(
    mut record: T,
    key: &FieldKey,
) -> Result<(T, OpenReport), VaultError> {
    let report = FieldCipher::<crate::types::Aes>::new(key)?.open_fields(&mut record);
    Ok((record, report))
}
