//! # Records
//!
//! The encrypt-at-rest convention for user-owned records, implemented once and shared by
//! every record kind.
//!
//! * [`RecordWriter`] seals the sensitive fields of private records before they are stored.
//! * [`RecordFormatter`] turns stored rows back into plaintext views. It heals legacy
//!   plaintext rows on the way when `records.heal_on_read` is on.
//! * [`Records`] is the service the HTTP layer talks to: ownership, visibility, ids and
//!   timestamps around the two paths above.
//!
//! A kind opts in by deriving [`SensitiveFields`](charachat_vault::SensitiveFields),
//! [`SurrealValue`] and [`Record`]:
//!
//! ```rust,ignore
//! #[api_model]
//! #[derive(Clone, Default, SurrealValue, SensitiveFields, Record)]
//! #[sensitive(kind = "persona", private = is_private)]
//! #[serde(default)]
//! pub struct Persona {
//!     #[serde(rename = "id")]
//!     pub uid: String,
//!     pub owner_id: String,
//!     pub created_at: String,
//!     pub updated_at: String,
//!     #[sensitive]
//!     pub full_name: String,
//!     pub is_private: bool,
//! }
//! ```

mod error;
mod formatter;
mod service;
mod writer;

pub use charachat_derive::Record;
pub use error::{RecordError, RecordErrorExt};
pub use formatter::RecordFormatter;
pub use service::{Records, SweepReport};
pub use writer::RecordWriter;

use charachat_database::SurrealValue;
use charachat_vault::SensitiveFields;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// A stored, user-owned record kind.
///
/// The table is named after [`SensitiveFields::KIND`]. Implemented with `#[derive(Record)]`.
pub trait Record:
    SensitiveFields + SurrealValue + Serialize + DeserializeOwned + Clone + Debug + Send + Sync + 'static
{
    fn uid(&self) -> &str;

    fn owner_id(&self) -> &str;

    fn meta(&self) -> RecordMeta;

    /// Overwrites the bookkeeping fields; the service owns them, never the client.
    fn assign(&mut self, meta: RecordMeta);
}

/// Bookkeeping fields every record carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMeta {
    pub uid: String,
    pub owner_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Current UTC time as RFC 3339 with microseconds; fixed width, so it sorts as text.
#[must_use]
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
