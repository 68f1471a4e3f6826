//! Who is calling, and with which key.

mod context;
mod keys;
pub mod resource;

pub use context::SecurityContext;
pub use keys::KeyProvider;
pub use resource::{ResourceGuard, ResourceGuardError};
