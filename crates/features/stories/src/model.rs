use charachat_database::SurrealValue;
use charachat_derive::api_model;
use charachat_kernel::records::Record;
use charachat_vault::SensitiveFields;

/// A scenario that casts one or more characters.
#[api_model]
#[derive(Clone, Default, PartialEq, Eq, SurrealValue, SensitiveFields, Record)]
#[sensitive(kind = "story", private = is_private)]
#[serde(default)]
pub struct Story {
    #[serde(rename = "id")]
    pub uid: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[sensitive]
    pub title: String,
    #[sensitive]
    pub description: String,
    /// The scenario text itself.
    #[sensitive]
    pub story: String,
    #[sensitive]
    pub image_link: Option<String>,
    #[sensitive]
    pub first_message: String,
    /// Free-form names of side characters; each entry is sealed on its own.
    #[sensitive]
    pub extra_characters: Vec<String>,
    /// Ids of cast characters.
    pub character_ids: Vec<String>,
    pub is_private: bool,
}
