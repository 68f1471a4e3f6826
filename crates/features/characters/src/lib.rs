//! Characters feature slice: character cards and the tags that group them.

mod model;

pub use model::{Character, Tag};

use charachat_kernel::domain::registry::InitializedSlice;

/// Characters feature state.
#[charachat_derive::charachat_slice]
pub struct Characters {}

/// Initialize the characters feature (tags included).
#[must_use]
pub fn init() -> InitializedSlice {
    tracing::info!("Characters slice initialized");
    InitializedSlice::new(Characters::new(CharactersInner {}))
}

#[cfg(feature = "server")]
mod api {
    use crate::{Character, Tag};
    use charachat_kernel::domain::constants::{CHARACTERS_TAG, TAGS_TAG};
    use charachat_kernel::server::ApiState;
    use utoipa_axum::router::OpenApiRouter;

    charachat_kernel::record_routes! {
        mod character_api;
        model: Character,
        tag: CHARACTERS_TAG,
        collection: "/api/characters",
        item: "/api/characters/{id}",
        migrate: "/api/characters/migrate",
    }

    charachat_kernel::record_routes! {
        mod tag_api;
        model: Tag,
        tag: TAGS_TAG,
        collection: "/api/tags",
        item: "/api/tags/{id}",
        migrate: "/api/tags/migrate",
    }

    /// `/api/characters` and `/api/tags` routes.
    pub fn router() -> OpenApiRouter<ApiState> {
        character_api::router().merge(tag_api::router())
    }
}

#[cfg(feature = "server")]
pub use api::router;
