//! Structural check that tells sealed field values apart from legacy plaintext.
//!
//! The probe never touches a key. A value passes when it carries the `enc:v1:` prefix,
//! the remainder decodes as unpadded base64url, and the decoded payload has a known
//! version, only known flag bits, and room for a nonce and tag.

use crate::types::{KNOWN_FLAGS, MIN_PAYLOAD_LEN, PAYLOAD_VERSION_V1, SEALED_PREFIX};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// `true` if `value` is structurally a sealed field.
#[must_use]
pub fn is_sealed(value: &str) -> bool {
    decode(value).is_some()
}

/// Decodes the binary payload of a structurally valid sealed value.
pub(crate) fn decode(value: &str) -> Option<Vec<u8>> {
    let body = value.strip_prefix(SEALED_PREFIX)?;
    let blob = URL_SAFE_NO_PAD.decode(body).ok()?;

    let well_formed = blob.len() >= MIN_PAYLOAD_LEN
        && blob[0] == PAYLOAD_VERSION_V1
        && blob[1] & !KNOWN_FLAGS == 0;

    well_formed.then_some(blob)
}
