use super::{Record, RecordError, RecordErrorExt, RecordFormatter, RecordMeta, RecordWriter, timestamp};
use crate::safe_nanoid;
use crate::security::{ResourceGuard, SecurityContext};
use charachat_database::{Database, Table};
use charachat_domain::config::RecordsConfig;
use tracing::{debug, info, instrument};

/// Outcome of [`Records::migrate_legacy`].
#[charachat_derive::api_model]
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Record kind that was swept.
    pub kind: String,
    /// Private records owned by the caller.
    pub scanned: usize,
    /// Records whose legacy plaintext was encrypted.
    pub healed: usize,
    /// Legacy records skipped because they changed during the sweep.
    pub conflicts: usize,
}

/// Ownership, visibility and bookkeeping around the record read and write paths.
///
/// Visibility: a public record is readable by anyone, a private one only by its owner
/// (others get `NotFound`, never a hint that it exists). Only the owner may modify.
#[derive(Debug, Clone)]
pub struct Records {
    writer: RecordWriter,
    formatter: RecordFormatter,
}

impl Records {
    #[must_use]
    pub fn new(database: Database, config: &RecordsConfig) -> Self {
        let writer = RecordWriter::new(database);
        let formatter = RecordFormatter::new(writer.clone(), config.heal_on_read);
        Self { writer, formatter }
    }

    #[must_use]
    pub const fn writer(&self) -> &RecordWriter {
        &self.writer
    }

    fn table<T: Record>(&self) -> Table<T> {
        self.writer.table::<T>()
    }

    /// Stores a new record owned by the caller and returns its plaintext view.
    ///
    /// Id, owner and timestamps are assigned here; whatever the client sent for them is
    /// discarded.
    ///
    /// # Errors
    /// * [`RecordError::MissingKey`] Without a session.
    /// * Any write-path failure, see [`RecordWriter::insert`].
    #[instrument(level = "debug", skip_all, fields(kind = T::KIND))]
    pub async fn create<T: Record>(&self, ctx: &SecurityContext, mut record: T) -> Result<T, RecordError> {
        let owner_id = ctx.require_owner()?.to_owned();
        let now = timestamp();
        record.assign(RecordMeta {
            uid: safe_nanoid!(),
            owner_id,
            created_at: now.clone(),
            updated_at: now,
        });

        self.writer.insert(ctx, record.clone()).await?;
        debug!(kind = T::KIND, uid = record.uid(), private = record.is_private(), "Created record");
        Ok(record)
    }

    /// Loads one record the caller may see.
    ///
    /// # Errors
    /// * [`RecordError::Validation`] For a malformed id.
    /// * [`RecordError::NotFound`] If it does not exist or is another owner's private record.
    #[instrument(level = "debug", skip(self, ctx), fields(kind = T::KIND))]
    pub async fn get<T: Record>(&self, ctx: &SecurityContext, uid: &str) -> Result<T, RecordError> {
        ResourceGuard::verify_id(uid, T::KIND)?;
        let record = self
            .table::<T>()
            .fetch(uid)
            .await
            .context(format!("loading {}", T::KIND))?
            .ok_or_else(|| RecordError::not_found(T::KIND, uid))?;

        if record.is_private() && !ctx.owns(record.owner_id()) {
            return Err(RecordError::not_found(T::KIND, uid));
        }
        Ok(self.formatter.format(ctx, record).await)
    }

    /// The caller's records plus everyone's public ones, newest first.
    ///
    /// # Errors
    /// [`RecordError::Database`] on store failures.
    #[instrument(level = "debug", skip_all, fields(kind = T::KIND))]
    pub async fn list<T: Record>(&self, ctx: &SecurityContext) -> Result<Vec<T>, RecordError> {
        let rows = self
            .table::<T>()
            .list_visible(ctx.owner_id())
            .await
            .context(format!("listing {}", T::KIND))?;
        Ok(self.formatter.format_all(ctx, rows).await)
    }

    /// Visible records whose `field` equals `value`, oldest first.
    ///
    /// Used for relations such as the messages of a chat.
    ///
    /// # Errors
    /// [`RecordError::Database`] on store failures or an invalid column name.
    #[instrument(level = "debug", skip(self, ctx), fields(kind = T::KIND))]
    pub async fn list_by<T: Record>(
        &self,
        ctx: &SecurityContext,
        field: &'static str,
        value: &str,
    ) -> Result<Vec<T>, RecordError> {
        let rows = self
            .table::<T>()
            .list_by(field, value)
            .await
            .context(format!("listing {} by {field}", T::KIND))?
            .into_iter()
            .filter(|row| !row.is_private() || ctx.owns(row.owner_id()))
            .collect();
        Ok(self.formatter.format_all(ctx, rows).await)
    }

    /// Replaces one of the caller's records, keeping its id, owner and `created_at`.
    ///
    /// # Errors
    /// * [`RecordError::MissingKey`] Without a session.
    /// * [`RecordError::NotFound`] / [`RecordError::Forbidden`] If the caller does not own it.
    /// * Any write-path failure.
    #[instrument(level = "debug", skip(self, ctx, record), fields(kind = T::KIND))]
    pub async fn update<T: Record>(
        &self,
        ctx: &SecurityContext,
        uid: &str,
        mut record: T,
    ) -> Result<T, RecordError> {
        let existing = self.owned::<T>(ctx, uid).await?;

        let mut meta = existing.meta();
        meta.updated_at = timestamp();
        record.assign(meta);

        if !self.writer.replace(ctx, record.clone()).await? {
            return Err(RecordError::not_found(T::KIND, uid));
        }
        debug!(kind = T::KIND, uid, private = record.is_private(), "Updated record");
        Ok(record)
    }

    /// Hard-deletes one of the caller's records.
    ///
    /// # Errors
    /// See [`Records::update`].
    #[instrument(level = "debug", skip(self, ctx), fields(kind = T::KIND))]
    pub async fn delete<T: Record>(&self, ctx: &SecurityContext, uid: &str) -> Result<(), RecordError> {
        self.owned::<T>(ctx, uid).await?;

        let deleted = self.table::<T>().delete(uid).await.context(format!("deleting {}", T::KIND))?;
        if !deleted {
            return Err(RecordError::not_found(T::KIND, uid));
        }
        debug!(kind = T::KIND, uid, "Deleted record");
        Ok(())
    }

    /// Encrypts every legacy plaintext value among the caller's private records of `T`.
    ///
    /// Idempotent: a second run finds nothing to heal. Unlike healing on read, failures
    /// abort the sweep and propagate.
    ///
    /// # Errors
    /// * [`RecordError::MissingKey`] Without a session.
    /// * [`RecordError::Cipher`] / [`RecordError::Database`] On the first failed heal.
    #[instrument(level = "debug", skip_all, fields(kind = T::KIND))]
    pub async fn migrate_legacy<T: Record>(&self, ctx: &SecurityContext) -> Result<SweepReport, RecordError> {
        let owner_id = ctx.require_owner()?;
        ctx.cipher()?;

        let rows = self
            .table::<T>()
            .list_owned(owner_id)
            .await
            .context(format!("sweeping {}", T::KIND))?;

        let mut report = SweepReport { kind: T::KIND.to_owned(), ..SweepReport::default() };
        for row in rows.iter().filter(|row| row.is_private()) {
            report.scanned += 1;
            if !row.has_plaintext_fields() {
                continue;
            }
            if self.writer.heal(ctx, row).await? {
                report.healed += 1;
            } else {
                report.conflicts += 1;
            }
        }

        info!(
            kind = T::KIND,
            scanned = report.scanned,
            healed = report.healed,
            conflicts = report.conflicts,
            "Legacy sweep finished"
        );
        Ok(report)
    }

    /// Loads `uid` for modification by the caller.
    async fn owned<T: Record>(&self, ctx: &SecurityContext, uid: &str) -> Result<T, RecordError> {
        let owner_id = ctx.require_owner()?;
        ResourceGuard::verify_id(uid, T::KIND)?;

        let existing = self
            .table::<T>()
            .fetch(uid)
            .await
            .context(format!("loading {}", T::KIND))?
            .ok_or_else(|| RecordError::not_found(T::KIND, uid))?;

        if existing.owner_id() != owner_id {
            return Err(if existing.is_private() {
                RecordError::not_found(T::KIND, uid)
            } else {
                RecordError::forbidden(T::KIND, uid)
            });
        }
        Ok(existing)
    }
}
