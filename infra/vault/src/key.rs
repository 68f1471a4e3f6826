use crate::error::VaultError;
use crate::types::{
    INFO_OWNER, INFO_VERIFIER, KDF_SALT_DOMAIN, KEY_LEN, KdfParams, OWNER_ID_LEN,
};
use argon2::{Algorithm, Argon2, Params, Version};
use hkdf::Hkdf;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// A user's 32-byte session key.
///
/// Derived once at login from the password and email, carried as hex in the session
/// cookie, and never stored server-side. Every other secret (the field cipher key, the
/// owner id, the account verifier) is expanded from it with HKDF-SHA256.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FieldKey([u8; KEY_LEN]);

impl std::fmt::Debug for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FieldKey(***)")
    }
}

impl FieldKey {
    /// Wraps raw key bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Derives the session key from a password with Argon2id.
    ///
    /// The salt is `SHA-256("charachat.kdf.v1:" || lowercase(trim(email)))`, so the
    /// same credentials always yield the same key.
    ///
    /// This is CPU-bound; async callers should run it on the blocking pool.
    ///
    /// # Errors
    /// * [`VaultError::KeyDerivation`] If the cost parameters are rejected or hashing fails.
    pub fn derive(email: &str, password: &str, params: &KdfParams) -> Result<Self, VaultError> {
        let salt = Self::salt_for(email);
        let params =
            Params::new(params.memory_kib, params.iterations, params.parallelism, Some(KEY_LEN))
                .map_err(|e| VaultError::KeyDerivation {
                    message: e.to_string().into(),
                    context: Some("argon2 parameters".into()),
                })?;

        let mut key = [0u8; KEY_LEN];
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password_into(password.as_bytes(), &salt, &mut key)
            .map_err(|e| VaultError::KeyDerivation {
                message: e.to_string().into(),
                context: Some("argon2 hashing".into()),
            })?;

        Ok(Self(key))
    }

    /// Parses a hex-encoded key as carried by the session cookie.
    ///
    /// # Errors
    /// * [`VaultError::InvalidKey`] If the value is not hex or not 32 bytes long.
    pub fn from_hex(value: &str) -> Result<Self, VaultError> {
        let mut key = [0u8; KEY_LEN];
        hex::decode_to_slice(value.trim(), &mut key).map_err(|e| VaultError::InvalidKey {
            message: e.to_string().into(),
            context: None,
        })?;
        Ok(Self(key))
    }

    /// Hex form for the session cookie.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Stable, non-secret identifier of the key owner (12 bytes, hex).
    ///
    /// # Errors
    /// * [`VaultError::KeyDerivation`] If HKDF expansion fails.
    pub fn owner_id(&self) -> Result<String, VaultError> {
        let mut id = [0u8; OWNER_ID_LEN];
        self.expand(INFO_OWNER, &mut id)?;
        Ok(hex::encode(id))
    }

    /// Value stored with the account to check a password at login without keeping the key.
    ///
    /// # Errors
    /// * [`VaultError::KeyDerivation`] If HKDF expansion fails.
    pub fn verifier(&self) -> Result<String, VaultError> {
        let mut verifier = Zeroizing::new([0u8; KEY_LEN]);
        self.expand(INFO_VERIFIER, verifier.as_mut_slice())?;
        Ok(hex::encode(verifier.as_slice()))
    }

    /// Expands labelled sub-key material from this key.
    pub(crate) fn expand(&self, info: &[u8], out: &mut [u8]) -> Result<(), VaultError> {
        Hkdf::<Sha256>::new(None, &self.0).expand(info, out).map_err(|_| {
            VaultError::KeyDerivation {
                message: format!("HKDF expansion failed for {} bytes", out.len()).into(),
                context: Some(String::from_utf8_lossy(info).into_owned().into()),
            }
        })
    }

    fn salt_for(email: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(KDF_SALT_DOMAIN);
        hasher.update(email.trim().to_lowercase().as_bytes());
        hasher.finalize().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> KdfParams {
        KdfParams { memory_kib: 64, iterations: 1, parallelism: 1 }
    }

    #[test]
    fn derivation_is_deterministic_and_normalizes_email() {
        let a = FieldKey::derive("Aria@Example.com ", "hunter2", &fast()).unwrap();
        let b = FieldKey::derive("aria@example.com", "hunter2", &fast()).unwrap();

        assert_eq!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn different_passwords_yield_different_keys() {
        let a = FieldKey::derive("aria@example.com", "hunter2", &fast()).unwrap();
        let b = FieldKey::derive("aria@example.com", "hunter3", &fast()).unwrap();

        assert_ne!(a.to_hex(), b.to_hex());
    }

    #[test]
    fn hex_roundtrip() {
        let key = FieldKey::from_bytes([7u8; KEY_LEN]);
        let parsed = FieldKey::from_hex(&key.to_hex()).unwrap();

        assert_eq!(parsed.to_hex(), key.to_hex());
        assert_eq!(key.to_hex().len(), KEY_LEN * 2);
    }

    #[test]
    fn from_hex_rejects_bad_input() {
        assert!(matches!(FieldKey::from_hex("zz"), Err(VaultError::InvalidKey { .. })));
        assert!(matches!(FieldKey::from_hex("abcd"), Err(VaultError::InvalidKey { .. })));
        assert!(FieldKey::from_hex("").is_err());
    }

    #[test]
    fn owner_id_and_verifier_are_stable_and_distinct() {
        let key = FieldKey::from_bytes([1u8; KEY_LEN]);
        let owner = key.owner_id().unwrap();

        assert_eq!(owner.len(), OWNER_ID_LEN * 2);
        assert_eq!(owner, key.owner_id().unwrap());
        assert_ne!(owner, FieldKey::from_bytes([2u8; KEY_LEN]).owner_id().unwrap());
        assert_ne!(key.verifier().unwrap(), key.to_hex());
    }

    #[test]
    fn debug_is_redacted() {
        let key = FieldKey::from_bytes([9u8; KEY_LEN]);
        assert_eq!(format!("{key:?}"), "FieldKey(***)");
    }
}
