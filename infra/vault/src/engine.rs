use aead::Nonce;
use aead::inout::InOutBuf;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use getrandom::fill;
use std::sync::Arc;

use crate::builder::FieldCipherBuilder;
use crate::error::VaultError;
use crate::key::FieldKey;
use crate::probe;
use crate::types::{
    Aes, FLAG_COMPRESSED, HEADER_LEN, MIN_PAYLOAD_LEN, NONCE_LEN, PAYLOAD_VERSION_V1,
    SEALED_PREFIX, TAG_LEN, VaultCipher,
};

pub(crate) struct FieldCipherInner<C = Aes>
where
    C: VaultCipher,
{
    pub(crate) cipher: C,
    pub(crate) compression: bool,
}

/// Authenticated cipher for individual string fields.
///
/// A `FieldCipher` is built per request from the caller's [`FieldKey`] and wraps its
/// state in an [`Arc`], so it is cheap to clone into the services that need it.
///
/// Sealed values are text:
///
/// ```text
/// enc:v1:<base64url-nopad([V(1)][FLAGS(1)][NONCE(12)][CIPHERTEXT(N)][TAG(16)])>
/// ```
///
/// Every value is bound to an associated-data string (`"{kind}.{field}"` for record
/// fields), so a ciphertext cannot be moved to another field or record kind.
///
/// ### Example
/// ```rust
/// use charachat_vault::prelude::*;
///
/// # fn main() -> Result<(), VaultError> {
/// let key = FieldKey::from_bytes([7u8; 32]);
/// let cipher = FieldCipher::<Aes>::new(&key)?;
///
/// let sealed = cipher.seal("Aria", "character.name")?;
/// assert!(is_sealed(&sealed));
/// assert_eq!(cipher.open(&sealed, "character.name")?, "Aria");
///
/// assert_eq!(cipher.seal("", "character.name")?, "");
/// # Ok(())
/// # }
/// ```
pub struct FieldCipher<C = Aes>
where
    C: VaultCipher,
{
    pub(crate) inner: Arc<FieldCipherInner<C>>,
}

impl<C: VaultCipher> Clone for FieldCipher<C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<C: VaultCipher> std::fmt::Debug for FieldCipher<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCipher")
            .field("compression", &self.inner.compression)
            .finish_non_exhaustive()
    }
}

impl<C> FieldCipher<C>
where
    C: VaultCipher,
{
    /// Returns a new [`FieldCipherBuilder`].
    #[must_use]
    pub fn builder() -> FieldCipherBuilder<C> {
        FieldCipherBuilder::<C>::new()
    }

    /// Builds an uncompressed cipher for `key`.
    ///
    /// # Errors
    /// See [`FieldCipherBuilder::key`] and [`FieldCipherBuilder::build`].
    pub fn new(key: &FieldKey) -> Result<Self, VaultError> {
        Self::builder().key(key)?.build()
    }

    /// Whether new values are compressed before encryption.
    #[must_use]
    pub fn compression(&self) -> bool {
        self.inner.compression
    }

    #[inline]
    fn next_nonce() -> Result<Nonce<C>, VaultError> {
        let mut nonce = Nonce::<C>::default();
        fill(&mut nonce).map_err(|e| VaultError::Encryption {
            message: format!("System RNG unavailable: {e}").into(),
            context: Some("nonce generation".into()),
        })?;
        Ok(nonce)
    }

    /// Encrypts `plain` bound to `aad`.
    ///
    /// Empty input yields empty output, so absent values stay absent.
    ///
    /// # Errors
    /// * [`VaultError::Encryption`] If the RNG or the AEAD cipher fails.
    pub fn seal(&self, plain: &str, aad: &str) -> Result<String, VaultError> {
        if plain.is_empty() {
            return Ok(String::new());
        }

        let blob = Self::encrypt_internal(
            &self.inner.cipher,
            plain.as_bytes(),
            aad.as_bytes(),
            self.inner.compression,
        )?;

        let mut sealed = String::with_capacity(SEALED_PREFIX.len() + blob.len().div_ceil(3) * 4);
        sealed.push_str(SEALED_PREFIX);
        URL_SAFE_NO_PAD.encode_string(blob, &mut sealed);
        Ok(sealed)
    }

    /// Decrypts a value produced by [`FieldCipher::seal`] under the same `aad`.
    ///
    /// Empty input yields empty output.
    ///
    /// # Errors
    /// * [`VaultError::InvalidPayload`] If the value is not a sealed field.
    /// * [`VaultError::Decryption`] If the key or `aad` differ, or the data was tampered with.
    /// * [`VaultError::Decompression`] If the LZ4 stream is corrupt.
    pub fn open(&self, value: &str, aad: &str) -> Result<String, VaultError> {
        if value.is_empty() {
            return Ok(String::new());
        }

        let blob = probe::decode(value).ok_or_else(|| VaultError::InvalidPayload {
            message: "value is not a sealed field".into(),
            context: Some(aad.to_owned().into()),
        })?;
        let plain = Self::decrypt_internal(&self.inner.cipher, &blob, aad.as_bytes())?;

        String::from_utf8(plain).map_err(|_| VaultError::Decryption {
            message: "plaintext is not valid UTF-8".into(),
            context: Some(aad.to_owned().into()),
        })
    }

    /// `true` when `value` is sealed and authenticates under this key and `aad`.
    #[must_use]
    pub fn opens(&self, value: &str, aad: &str) -> bool {
        probe::decode(value).is_some_and(|blob| {
            Self::decrypt_internal(&self.inner.cipher, &blob, aad.as_bytes()).is_ok()
        })
    }

    fn encrypt_internal(
        cipher: &C,
        data: &[u8],
        aad: &[u8],
        compress: bool,
    ) -> Result<Vec<u8>, VaultError> {
        let owned = if compress { lz4_flex::compress_prepend_size(data) } else { Vec::new() };
        let data = if compress { owned.as_slice() } else { data };
        let flags = if compress { FLAG_COMPRESSED } else { 0 };

        let nonce = Self::next_nonce()?;

        let mut buf = Vec::with_capacity(HEADER_LEN + NONCE_LEN + data.len() + TAG_LEN);
        buf.push(PAYLOAD_VERSION_V1);
        buf.push(flags);
        buf.extend_from_slice(&nonce);
        buf.extend_from_slice(data);

        let (_hdr, rest) = buf.split_at_mut(HEADER_LEN);
        let (_nonce_part, data_part) = rest.split_at_mut(nonce.len());
        let in_out = InOutBuf::from(data_part);

        let tag = cipher.encrypt_inout_detached(&nonce, aad, in_out).map_err(|_| {
            VaultError::Encryption {
                message: "Encryption failed".into(),
                context: Some("AEAD encryption failed".into()),
            }
        })?;

        buf.extend_from_slice(tag.as_slice());
        Ok(buf)
    }

    fn decrypt_internal(cipher: &C, blob: &[u8], aad: &[u8]) -> Result<Vec<u8>, VaultError> {
        if blob.len() < MIN_PAYLOAD_LEN {
            return Err(VaultError::InvalidPayload {
                message: format!(
                    "Payload too short ({} bytes). Expected at least {MIN_PAYLOAD_LEN} bytes",
                    blob.len(),
                )
                .into(),
                context: None,
            });
        }

        let version = blob[0];
        let flags = blob[1];

        if version != PAYLOAD_VERSION_V1 {
            return Err(VaultError::InvalidPayload {
                message: "Unsupported payload version".into(),
                context: Some(format!("version={version}").into()),
            });
        }

        let rest = &blob[HEADER_LEN..];
        let (nonce_slice, rest) = rest.split_at(NONCE_LEN);
        let (ciphertext, tag_slice) = rest.split_at(rest.len() - TAG_LEN);

        let nonce = nonce_slice.try_into().map_err(|_| VaultError::Decryption {
            message: "Invalid nonce length".into(),
            context: None,
        })?;

        let tag = tag_slice.try_into().map_err(|_| VaultError::Decryption {
            message: "Invalid tag length".into(),
            context: None,
        })?;

        let mut buf = ciphertext.to_vec();
        let in_out = InOutBuf::from(&mut buf[..]);

        cipher.decrypt_inout_detached(&nonce, aad, in_out, &tag).map_err(|_| {
            VaultError::Decryption {
                message: "Decryption failed".into(),
                context: Some("AEAD authentication failed".into()),
            }
        })?;

        if (flags & FLAG_COMPRESSED) != 0 {
            buf = lz4_flex::decompress_size_prepended(&buf).map_err(|_| {
                VaultError::Decompression {
                    message: "Decompression failed".into(),
                    context: Some("LZ4 stream invalid".into()),
                }
            })?;
        }

        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    fn cipher(byte: u8, compression: bool) -> FieldCipher<ChaCha> {
        FieldCipher::builder()
            .compression(compression)
            .key(&FieldKey::from_bytes([byte; 32]))
            .unwrap()
            .build()
            .expect("cipher should build from a session key")
    }

    #[test]
    fn test_nonce_sequence() {
        let n1 = FieldCipher::<ChaCha>::next_nonce().unwrap();
        let n2 = FieldCipher::<ChaCha>::next_nonce().unwrap();

        assert_ne!(n1, n2);
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let cipher = cipher(1, false);
        let sealed = cipher.seal("A test", "character.description").unwrap();

        assert!(sealed.starts_with("enc:v1:"));
        assert_eq!(cipher.open(&sealed, "character.description").unwrap(), "A test");
    }

    #[test]
    fn test_seal_open_with_compression() {
        let cipher = cipher(1, true);
        let text = "la ".repeat(200);
        let sealed = cipher.seal(&text, "story.story").unwrap();

        assert_eq!(cipher.open(&sealed, "story.story").unwrap(), text);
        assert!(sealed.len() < text.len());
    }

    #[test]
    fn test_compression_flag_travels_with_payload() {
        let compressed = cipher(1, true);
        let plain = cipher(1, false);
        let sealed = compressed.seal("hello hello hello", "tag.name").unwrap();

        assert_eq!(plain.open(&sealed, "tag.name").unwrap(), "hello hello hello");
    }

    #[test]
    fn test_nonces_make_each_seal_unique() {
        let cipher = cipher(1, false);
        let a = cipher.seal("Aria", "character.name").unwrap();
        let b = cipher.seal("Aria", "character.name").unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_passthrough() {
        let cipher = cipher(1, false);

        assert_eq!(cipher.seal("", "profile.bio").unwrap(), "");
        assert_eq!(cipher.open("", "profile.bio").unwrap(), "");
    }

    #[test]
    fn test_open_fails_with_wrong_context() {
        let cipher = cipher(1, false);
        let sealed = cipher.seal("data", "character.name").unwrap();

        let result = cipher.open(&sealed, "character.bio");
        assert!(matches!(result, Err(VaultError::Decryption { .. })));
        assert!(!cipher.opens(&sealed, "character.bio"));
    }

    #[test]
    fn test_open_fails_with_wrong_key() {
        let sealed = cipher(1, false).seal("data", "character.name").unwrap();

        let result = cipher(2, false).open(&sealed, "character.name");
        assert!(matches!(result, Err(VaultError::Decryption { .. })));
    }

    #[test]
    fn test_open_rejects_plaintext() {
        let result = cipher(1, false).open("Aria", "character.name");
        assert!(matches!(result, Err(VaultError::InvalidPayload { .. })));
    }

    #[test]
    fn test_ciphers_differ_per_algorithm() {
        let key = FieldKey::from_bytes([3u8; 32]);
        let aes = FieldCipher::<Aes>::new(&key).unwrap();
        let chacha = FieldCipher::<ChaCha>::new(&key).unwrap();

        let sealed = aes.seal("Aria", "character.name").unwrap();
        assert!(chacha.open(&sealed, "character.name").is_err());
    }
}
