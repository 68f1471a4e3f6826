use charachat_database::SurrealValue;
use charachat_derive::api_model;
use charachat_kernel::records::Record;
use charachat_vault::SensitiveFields;

/// A character card: everything the model needs to play someone.
#[api_model]
#[derive(Clone, Default, PartialEq, Eq, SurrealValue, SensitiveFields, Record)]
#[sensitive(kind = "character", private = is_private)]
#[serde(default)]
pub struct Character {
    #[serde(rename = "id")]
    pub uid: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[sensitive]
    pub name: String,
    #[sensitive]
    pub description: String,
    #[sensitive]
    pub intro: String,
    #[sensitive]
    pub bio: String,
    /// Lore the model may draw on.
    #[sensitive]
    pub book: String,
    #[sensitive]
    pub image_link: Option<String>,
    #[sensitive]
    pub personality: String,
    #[sensitive]
    pub system_prompt: String,
    #[sensitive]
    pub image_prompt: String,
    #[sensitive]
    pub first_message: String,
    /// Ids of [`Tag`] records.
    pub tags: Vec<String>,
    pub is_private: bool,
}

/// A label for grouping characters.
#[api_model]
#[derive(Clone, Default, PartialEq, Eq, SurrealValue, SensitiveFields, Record)]
#[sensitive(kind = "tag", private = is_private)]
#[serde(default)]
pub struct Tag {
    #[serde(rename = "id")]
    pub uid: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[sensitive]
    pub name: String,
    #[sensitive]
    pub description: String,
    pub is_private: bool,
}
