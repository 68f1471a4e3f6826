//! Facade crate for Charachat features and shared modules.
//! Re-exports domain/kernel/vault primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `charachat` with the `server` feature for the HTTP surface.
//! - Call [`init`] to build the feature slices, then register them on the API state.

use charachat_database::Database;
use charachat_domain::config::ApiConfig;
use charachat_domain::registry::InitializedSlice;

pub use charachat_database as database;
pub use charachat_domain as domain;
pub use charachat_kernel as kernel;
pub use charachat_vault as vault;

#[cfg(feature = "server")]
pub mod server {
    pub mod router {
        pub use charachat_kernel::server::router::system_router;

        use charachat_kernel::server::ApiState;
        use utoipa_axum::router::OpenApiRouter;

        /// Routes of every feature slice.
        #[must_use]
        pub fn feature_router() -> OpenApiRouter<ApiState> {
            OpenApiRouter::new()
                .merge(crate::features::session::router())
                .merge(crate::features::profiles::router())
                .merge(crate::features::characters::router())
                .merge(crate::features::personas::router())
                .merge(crate::features::stories::router())
                .merge(crate::features::chats::router())
        }
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use charachat_characters as characters;
    pub use charachat_chats as chats;
    pub use charachat_personas as personas;
    pub use charachat_profiles as profiles;
    pub use charachat_session as session;
    pub use charachat_stories as stories;

    /// Record kinds served by the enabled features, by table name.
    pub const RECORD_KINDS: &[&str] =
        &["profile", "character", "tag", "persona", "story", "chat", "message"];

    #[must_use]
    pub fn is_record_kind(name: &str) -> bool {
        RECORD_KINDS.contains(&name)
    }
}

/// Initialize every feature slice.
#[must_use]
pub fn init(config: &ApiConfig, database: &Database) -> Vec<InitializedSlice> {
    vec![
        features::session::init(config, database),
        features::profiles::init(),
        features::characters::init(),
        features::personas::init(),
        features::stories::init(),
        features::chats::init(),
    ]
}
