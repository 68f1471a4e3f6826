use crate::records::RecordError;
use charachat_vault::algorithms::Aes;
use charachat_vault::{FieldCipher, FieldKey};
use std::sync::Arc;

/// The caller of one request, resolved once at the HTTP boundary.
///
/// Every record operation takes the context explicitly; nothing below the boundary reads
/// cookies. An anonymous context can still read public records.
#[derive(Debug, Clone, Default)]
pub struct SecurityContext {
    session: Option<Arc<Session>>,
}

#[derive(Debug)]
struct Session {
    owner_id: String,
    cipher: FieldCipher<Aes>,
}

impl SecurityContext {
    /// A caller without a session key.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A caller holding `key`; the owner id and field cipher are derived from it.
    ///
    /// # Errors
    /// Returns [`RecordError::Cipher`] if the sub-keys cannot be expanded.
    pub fn for_key(key: &FieldKey, compression: bool) -> Result<Self, RecordError> {
        let owner_id = key.owner_id()?;
        let cipher = FieldCipher::<Aes>::builder().key(key)?.compression(compression).build()?;
        Ok(Self { session: Some(Arc::new(Session { owner_id, cipher })) })
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn owner_id(&self) -> Option<&str> {
        self.session.as_deref().map(|s| s.owner_id.as_str())
    }

    /// `true` when the caller is the owner `owner_id`.
    #[must_use]
    pub fn owns(&self, owner_id: &str) -> bool {
        self.owner_id() == Some(owner_id)
    }

    /// The caller's owner id.
    ///
    /// # Errors
    /// Returns [`RecordError::MissingKey`] for anonymous callers.
    pub fn require_owner(&self) -> Result<&str, RecordError> {
        self.owner_id().ok_or_else(RecordError::missing_key)
    }

    /// The caller's field cipher.
    ///
    /// # Errors
    /// Returns [`RecordError::MissingKey`] for anonymous callers.
    pub fn cipher(&self) -> Result<&FieldCipher<Aes>, RecordError> {
        self.session.as_deref().map(|s| &s.cipher).ok_or_else(RecordError::missing_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_owner_or_cipher() {
        let ctx = SecurityContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(!ctx.owns(""));
        assert!(matches!(ctx.require_owner(), Err(RecordError::MissingKey { .. })));
        assert!(matches!(ctx.cipher(), Err(RecordError::MissingKey { .. })));
    }

    #[test]
    fn key_determines_owner() {
        let key = FieldKey::from_bytes([3u8; 32]);
        let first = SecurityContext::for_key(&key, false).unwrap();
        let second = SecurityContext::for_key(&key, true).unwrap();
        let other = SecurityContext::for_key(&FieldKey::from_bytes([4u8; 32]), false).unwrap();

        assert_eq!(first.owner_id(), second.owner_id());
        assert_ne!(first.owner_id(), other.owner_id());
        assert!(first.owns(&key.owner_id().unwrap()));
        assert!(second.cipher().unwrap().compression());
    }
}
