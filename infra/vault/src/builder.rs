use crate::engine::{FieldCipher, FieldCipherInner};
use crate::error::VaultError;
use crate::key::FieldKey;
use crate::types::{Aes, INFO_FIELDS, KEY_LEN, VaultCipher};
use aead::Key;
use private::Sealed;
use std::marker::PhantomData;
use std::sync::Arc;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Debug, Default, ZeroizeOnDrop)]
pub struct NoKey;
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct WithKey {
    fields: [u8; KEY_LEN],
}

impl std::fmt::Debug for WithKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("WithKey(***)")
    }
}

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoKey {}
impl Sealed for WithKey {}

/// A builder for a [`FieldCipher`] bound to one session key.
///
/// Implements `ZeroizeOnDrop` so the expanded field key is cleared from memory as
/// soon as the builder is no longer needed.
#[allow(private_bounds)]
#[derive(Debug, Zeroize, ZeroizeOnDrop)]
pub struct FieldCipherBuilder<C: VaultCipher = Aes, K: Sealed + ZeroizeOnDrop = NoKey> {
    #[zeroize(skip)]
    _cipher: PhantomData<C>,
    compression: bool,
    key: K,
}

impl<C: VaultCipher> Default for FieldCipherBuilder<C> {
    fn default() -> Self {
        Self { _cipher: PhantomData, compression: false, key: NoKey }
    }
}

impl<C: VaultCipher> FieldCipherBuilder<C> {
    /// Creates a new empty builder with compression disabled.
    #[must_use = "Builder must be configured with `key` before use"]
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands the field-encryption key from the session key (HKDF-SHA256,
    /// info `charachat.fields.v1`). The session key itself never keys the AEAD.
    ///
    /// # Errors
    /// Returns [`VaultError::KeyDerivation`] if expansion fails.
    pub fn key(self, key: &FieldKey) -> Result<FieldCipherBuilder<C, WithKey>, VaultError> {
        let mut fields = [0u8; KEY_LEN];
        key.expand(INFO_FIELDS, &mut fields)?;

        Ok(FieldCipherBuilder {
            _cipher: PhantomData,
            compression: self.compression,
            key: WithKey { fields },
        })
    }
}

#[allow(private_bounds)]
impl<C: VaultCipher, K: Sealed + ZeroizeOnDrop> FieldCipherBuilder<C, K> {
    /// Toggles LZ4 compression of field values before encryption.
    ///
    /// # Security / Threat Model
    /// Compression is applied **before encryption** and may leak information via
    /// ciphertext length when an attacker both influences the plaintext and observes
    /// stored sizes. The flag is recorded in every payload header, so values sealed
    /// with either setting open under both.
    #[must_use]
    pub const fn compression(mut self, enabled: bool) -> Self {
        self.compression = enabled;
        self
    }
}

impl<C: VaultCipher> FieldCipherBuilder<C, WithKey> {
    /// Finalizes construction and `zeroes` the builder.
    ///
    /// # Errors
    /// Returns [`VaultError::InvalidConfiguration`] if the cipher rejects the key.
    pub fn build(mut self) -> Result<FieldCipher<C>, VaultError> {
        let inner = FieldCipherInner {
            cipher: Self::init_cipher(&self.key.fields)?,
            compression: self.compression,
        };

        self.zeroize();

        Ok(FieldCipher { inner: Arc::new(inner) })
    }

    fn init_cipher(key: &[u8; KEY_LEN]) -> Result<C, VaultError> {
        let key = Key::<C>::try_from(&key[..]).map_err(|_| VaultError::InvalidConfiguration {
            message: format!("Invalid key length {}, must be {KEY_LEN} bytes", key.len()).into(),
            context: Some("field cipher".into()),
        })?;
        Ok(C::new(&key))
    }
}
