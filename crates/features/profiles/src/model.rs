use charachat_database::SurrealValue;
use charachat_derive::api_model;
use charachat_kernel::records::Record;
use charachat_vault::SensitiveFields;

/// A user's public face: display name and bio.
#[api_model]
#[derive(Clone, Default, PartialEq, Eq, SurrealValue, SensitiveFields, Record)]
#[sensitive(kind = "profile", private = is_private)]
#[serde(default)]
pub struct Profile {
    #[serde(rename = "id")]
    pub uid: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
    #[sensitive]
    pub first_name: String,
    #[sensitive]
    pub last_name: String,
    #[sensitive]
    pub bio: String,
    pub is_private: bool,
}

impl Profile {
    /// `first last`, skipping empty parts.
    #[must_use]
    pub fn display_name(&self) -> String {
        [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
