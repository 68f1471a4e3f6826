use charachat_database::SurrealValue;
use charachat_derive::api_model;
use charachat_kernel::records::Record;
use charachat_vault::SensitiveFields;

/// Who the user plays in a chat.
#[api_model]
#[derive(Clone, Default, PartialEq, Eq, SurrealValue, SensitiveFields, Record)]
#[sensitive(kind = "persona", private = is_private)]
#[serde(default)]
pub struct Persona {
    #[serde(rename = "id")]
    pub uid: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[sensitive]
    pub full_name: String,
    #[sensitive]
    pub bio: String,
    #[sensitive]
    pub avatar_link: Option<String>,
    pub is_private: bool,
}
