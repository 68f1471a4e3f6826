use charachat_database::SurrealValue;
use charachat_derive::api_model;
use charachat_kernel::records::Record;
use charachat_vault::SensitiveFields;

/// Author of a [`Message`].
pub const USER_ROLE: &str = "user";
pub const CHARACTER_ROLE: &str = "character";

/// A conversation between a persona and a character, optionally inside a story.
///
/// Chats are private to their owner regardless of content.
#[api_model]
#[derive(Clone, Default, PartialEq, Eq, SurrealValue, SensitiveFields, Record)]
#[sensitive(kind = "chat", always_private)]
#[serde(default)]
pub struct Chat {
    #[serde(rename = "id")]
    pub uid: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub character_id: String,
    pub persona_id: Option<String>,
    pub story_id: Option<String>,
    /// Facts the conversation has established so far.
    #[sensitive]
    pub dynamic_book: String,
    /// Preview of the newest message.
    #[sensitive]
    pub last_message: String,
}

/// One turn of a [`Chat`].
#[api_model]
#[derive(Clone, Default, PartialEq, Eq, SurrealValue, SensitiveFields, Record)]
#[sensitive(kind = "message", always_private)]
#[serde(default)]
pub struct Message {
    #[serde(rename = "id")]
    pub uid: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
    pub chat_id: String,
    /// [`USER_ROLE`] or [`CHARACTER_ROLE`].
    pub role: String,
    #[sensitive]
    pub content: String,
}
