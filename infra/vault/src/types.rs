use aead::{AeadInOut, KeyInit};
use aes_gcm::Aes256Gcm;
use chacha20poly1305::ChaCha20Poly1305;

// --- Aliases ---

pub type Aes = Aes256Gcm;
pub type ChaCha = ChaCha20Poly1305;

pub trait VaultCipher: AeadInOut + KeyInit + Send + Sync + 'static {}
impl<T: AeadInOut + KeyInit + Send + Sync + 'static> VaultCipher for T {}

// --- Payload format constants ---

/// Textual marker that prefixes every sealed field value.
pub const SEALED_PREFIX: &str = "enc:v1:";

/// Payload header version.
pub(crate) const PAYLOAD_VERSION_V1: u8 = 1;

/// Header layout: `[version: u8][flags: u8]`
pub(crate) const HEADER_LEN: usize = 2;

/// AEAD nonce length (96-bit).
pub(crate) const NONCE_LEN: usize = 12;

/// AEAD tag length (128-bit).
pub(crate) const TAG_LEN: usize = 16;

/// Smallest well-formed binary payload: header, nonce and tag around an empty body.
pub(crate) const MIN_PAYLOAD_LEN: usize = HEADER_LEN + NONCE_LEN + TAG_LEN;

/// Flag bit: payload ciphertext was compressed before encryption.
pub(crate) const FLAG_COMPRESSED: u8 = 1 << 0;

/// All flag bits understood by this version.
pub(crate) const KNOWN_FLAGS: u8 = FLAG_COMPRESSED;

/// Length of a session key in bytes.
pub const KEY_LEN: usize = 32;

// --- HKDF labels ---

pub(crate) const INFO_FIELDS: &[u8] = b"charachat.fields.v1";
pub(crate) const INFO_OWNER: &[u8] = b"charachat.owner.v1";
pub(crate) const INFO_VERIFIER: &[u8] = b"charachat.verifier.v1";

/// Domain separator mixed into the password salt.
pub(crate) const KDF_SALT_DOMAIN: &[u8] = b"charachat.kdf.v1:";

/// Length in bytes of the owner id before hex encoding.
pub(crate) const OWNER_ID_LEN: usize = 12;

/// Argon2id cost parameters used to turn a password into a session key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self { memory_kib: 19_456, iterations: 2, parallelism: 1 }
    }
}

/// The associated data binding a sealed value to its record kind and field.
#[must_use]
pub fn field_context(kind: &str, field: &str) -> String {
    format!("{kind}.{field}")
}
