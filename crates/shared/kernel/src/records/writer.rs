use super::{Record, RecordError, RecordErrorExt};
use crate::security::SecurityContext;
use charachat_database::{Database, Table};
use tracing::instrument;

/// Write path: seals private records with the caller's key, then stores them.
///
/// Public records are stored exactly as given; the cipher is never consulted for them.
/// Every failure propagates, and nothing is retried.
#[derive(Debug, Clone)]
pub struct RecordWriter {
    database: Database,
}

impl RecordWriter {
    #[must_use]
    pub const fn new(database: Database) -> Self {
        Self { database }
    }

    pub(crate) fn table<T: Record>(&self) -> Table<T> {
        self.database.table(T::KIND)
    }

    /// Encrypts the sensitive fields of a private `record` in place.
    ///
    /// Values already sealed under the caller's key stay as they are. Returns the number
    /// of values encrypted.
    ///
    /// # Errors
    /// * [`RecordError::MissingKey`] If the record is private and the caller has no key.
    /// * [`RecordError::Cipher`] If encryption fails.
    pub fn seal<T: Record>(&self, ctx: &SecurityContext, record: &mut T) -> Result<usize, RecordError> {
        if !record.is_private() {
            return Ok(0);
        }
        ctx.cipher()?.seal_fields(record).context(format!("sealing {}", T::KIND))
    }

    /// Seals and inserts a new record.
    ///
    /// # Errors
    /// See [`RecordWriter::seal`]; database failures surface as [`RecordError::Database`].
    #[instrument(level = "debug", skip_all, fields(kind = T::KIND, uid = record.uid()))]
    pub async fn insert<T: Record>(&self, ctx: &SecurityContext, mut record: T) -> Result<(), RecordError> {
        self.seal(ctx, &mut record)?;
        self.table::<T>().insert(record).await.context(format!("inserting {}", T::KIND))
    }

    /// Seals and replaces an existing record. Returns `false` if the row is gone.
    ///
    /// # Errors
    /// See [`RecordWriter::insert`].
    #[instrument(level = "debug", skip_all, fields(kind = T::KIND, uid = record.uid()))]
    pub async fn replace<T: Record>(&self, ctx: &SecurityContext, mut record: T) -> Result<bool, RecordError> {
        self.seal(ctx, &mut record)?;
        let uid = record.uid().to_owned();
        self.table::<T>().replace(&uid, record).await.context(format!("replacing {}", T::KIND))
    }

    /// Encrypts the legacy plaintext values of a stored private row and writes it back.
    ///
    /// The write only lands while the row's `updated_at` still matches `stored`, so a
    /// concurrent user edit is never overwritten. The stamp itself is kept: healing is
    /// not an edit. Returns `false` when the guard rejected the write.
    ///
    /// # Errors
    /// * [`RecordError::MissingKey`] Without a session key.
    /// * [`RecordError::Cipher`] / [`RecordError::Database`] On encryption or write failures.
    #[instrument(level = "debug", skip_all, fields(kind = T::KIND, uid = stored.uid()))]
    pub async fn heal<T: Record>(&self, ctx: &SecurityContext, stored: &T) -> Result<bool, RecordError> {
        let mut healed = stored.clone();
        ctx.cipher()?.seal_legacy_fields(&mut healed).context(format!("healing {}", T::KIND))?;

        let meta = stored.meta();
        self.table::<T>()
            .replace_if_unchanged(&meta.uid, &meta.updated_at, healed)
            .await
            .context(format!("persisting healed {}", T::KIND))
    }
}
