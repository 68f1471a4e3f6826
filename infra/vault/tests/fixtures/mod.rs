use charachat_vault::prelude::*;

#[derive(Debug, Default, Clone, PartialEq, Eq, SensitiveFields)]
#[sensitive(kind = "story", private = is_private)]
pub struct Story {
    pub id: String,
    #[sensitive]
    pub title: String,
    #[sensitive]
    pub image_link: Option<String>,
    #[sensitive]
    pub extra_characters: Vec<String>,
    pub character_ids: Vec<String>,
    pub is_private: bool,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, SensitiveFields)]
#[sensitive(kind = "message", always_private)]
pub struct Message {
    pub chat_id: String,
    #[sensitive]
    pub content: String,
}

/// Fixed session key for tests.
#[must_use]
pub fn test_key() -> FieldKey {
    FieldKey::from_bytes([0x2a; 32])
}

/// Initializes a cipher for [`test_key`].
/// # Panics
/// * If the cipher cannot be built.
#[must_use]
pub fn setup_cipher() -> FieldCipher {
    FieldCipher::new(&test_key()).expect("cipher setup failed")
}

#[must_use]
pub fn story() -> Story {
    Story {
        id: "V1StGXR8Z5jd".to_owned(),
        title: "The Lighthouse".to_owned(),
        image_link: None,
        extra_characters: vec!["Keeper".to_owned(), "Gull".to_owned()],
        character_ids: vec!["Uakgb4J7fX2m".to_owned()],
        is_private: true,
    }
}
