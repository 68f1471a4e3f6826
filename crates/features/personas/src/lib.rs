//! Personas feature slice.

mod model;

pub use model::Persona;

use charachat_kernel::domain::registry::InitializedSlice;

/// Personas feature state.
#[charachat_derive::charachat_slice]
pub struct Personas {}

/// Initialize the personas feature.
#[must_use]
pub fn init() -> InitializedSlice {
    tracing::info!("Personas slice initialized");
    InitializedSlice::new(Personas::new(PersonasInner {}))
}

#[cfg(feature = "server")]
mod api {
    use crate::Persona;
    use charachat_kernel::domain::constants::PERSONAS_TAG;
    use charachat_kernel::server::ApiState;
    use utoipa_axum::router::OpenApiRouter;

    charachat_kernel::record_routes! {
        mod persona_api;
        model: Persona,
        tag: PERSONAS_TAG,
        collection: "/api/personas",
        item: "/api/personas/{id}",
        migrate: "/api/personas/migrate",
    }

    /// `/api/personas` routes.
    pub fn router() -> OpenApiRouter<ApiState> {
        persona_api::router()
    }
}

#[cfg(feature = "server")]
pub use api::router;
