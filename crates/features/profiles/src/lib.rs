//! Profiles feature slice.

mod model;

pub use model::Profile;

use charachat_kernel::domain::registry::InitializedSlice;

/// Profiles feature state.
#[charachat_derive::charachat_slice]
pub struct Profiles {}

/// Initialize the profiles feature.
#[must_use]
pub fn init() -> InitializedSlice {
    tracing::info!("Profiles slice initialized");
    InitializedSlice::new(Profiles::new(ProfilesInner {}))
}

#[cfg(feature = "server")]
mod api {
    use crate::Profile;
    use charachat_kernel::domain::constants::PROFILES_TAG;
    use charachat_kernel::server::ApiState;
    use utoipa_axum::router::OpenApiRouter;

    charachat_kernel::record_routes! {
        mod profile_api;
        model: Profile,
        tag: PROFILES_TAG,
        collection: "/api/profiles",
        item: "/api/profiles/{id}",
        migrate: "/api/profiles/migrate",
    }

    /// `/api/profiles` routes.
    pub fn router() -> OpenApiRouter<ApiState> {
        profile_api::router()
    }
}

#[cfg(feature = "server")]
pub use api::router;
