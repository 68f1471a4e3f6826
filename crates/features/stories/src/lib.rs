//! Stories feature slice.

mod model;

pub use model::Story;

use charachat_kernel::domain::registry::InitializedSlice;

/// Stories feature state.
#[charachat_derive::charachat_slice]
pub struct Stories {}

/// Initialize the stories feature.
#[must_use]
pub fn init() -> InitializedSlice {
    tracing::info!("Stories slice initialized");
    InitializedSlice::new(Stories::new(StoriesInner {}))
}

#[cfg(feature = "server")]
mod api {
    use crate::Story;
    use charachat_kernel::domain::constants::STORIES_TAG;
    use charachat_kernel::server::ApiState;
    use utoipa_axum::router::OpenApiRouter;

    charachat_kernel::record_routes! {
        mod story_api;
        model: Story,
        tag: STORIES_TAG,
        collection: "/api/stories",
        item: "/api/stories/{id}",
        migrate: "/api/stories/migrate",
    }

    /// `/api/stories` routes.
    pub fn router() -> OpenApiRouter<ApiState> {
        story_api::router()
    }
}

#[cfg(feature = "server")]
pub use api::router;
