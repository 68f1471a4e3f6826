//! Field-level encryption for user-owned records.
//!
//! A user's session key ([`FieldKey`]) is derived at login from the password and email
//! with Argon2id. Per request it is expanded with HKDF-SHA256 into a [`FieldCipher`],
//! which seals and opens individual string fields with an AEAD cipher.
//!
//! ## Sealed Value Format
//!
//! Sealed values are plain strings, so they fit in any text column:
//!
//! ```text
//! enc:v1:<base64url-nopad([V(1)][FLAGS(1)][NONCE(12)][CIPHERTEXT(N)][TAG(16)])>
//! ```
//!
//! [`is_sealed`] recognises this shape without a key. It is how the read path tells
//! ciphertext apart from legacy plaintext rows written before encryption existed.
//!
//! ## Nonce Policy
//!
//! Every seal draws a **random 96-bit nonce** from the system RNG. This is the standard
//! approach for `AES-GCM` and `ChaCha20Poly1305` at the volumes a single user produces.
//!
//! ## Compression Threat Model
//!
//! LZ4 compression is applied **before encryption** when enabled and may leak information
//! via ciphertext length. It is off unless configured; the flag travels in each payload
//! header so both settings stay readable.
//!
//! ## Example
//! ```rust
//! use charachat_vault::prelude::*;
//!
//! #[derive(SensitiveFields)]
//! #[sensitive(kind = "character", private = is_private)]
//! struct Character {
//!     #[sensitive]
//!     name: String,
//!     #[sensitive]
//!     image_link: Option<String>,
//!     is_private: bool,
//! }
//!
//! # fn main() -> Result<(), VaultError> {
//! let key = FieldKey::from_bytes([42u8; 32]);
//! let cipher = FieldCipher::<Aes>::new(&key)?;
//!
//! let mut aria = Character { name: "Aria".into(), image_link: None, is_private: true };
//! cipher.seal_fields(&mut aria)?;
//! assert!(is_sealed(&aria.name));
//!
//! let report = cipher.open_fields(&mut aria);
//! assert!(report.is_clean());
//! assert_eq!(aria.name, "Aria");
//! # Ok(())
//! # }
//! ```

mod builder;
mod engine;
mod error;
pub mod fields;
mod key;
mod probe;
mod types;

pub use builder::FieldCipherBuilder;
pub use charachat_derive::SensitiveFields;
pub use engine::FieldCipher;
pub use error::{VaultError, VaultErrorExt};
pub use fields::{FieldFailure, OpenReport, SensitiveFields, decrypt_fields, encrypt_fields};
pub use key::FieldKey;
pub use probe::is_sealed;
pub use types::{KEY_LEN, KdfParams, SEALED_PREFIX, field_context};

pub mod prelude {
    pub use crate::engine::FieldCipher;
    pub use crate::error::{VaultError, VaultErrorExt};
    pub use crate::fields::{OpenReport, SensitiveFields};
    pub use crate::key::FieldKey;
    pub use crate::probe::is_sealed;
    pub use crate::types::{Aes, ChaCha, KdfParams};
    pub use charachat_derive::SensitiveFields;
}

pub mod algorithms {
    pub use crate::types::{Aes, ChaCha, VaultCipher};
}
