pub use crate::records::{Record, RecordError, RecordErrorExt, RecordMeta, Records, SweepReport};
pub use crate::safe_nanoid;
pub use crate::security::{KeyProvider, ResourceGuard, SecurityContext};
#[cfg(feature = "server")]
pub use crate::server::ApiState;
pub use charachat_vault::SensitiveFields;
