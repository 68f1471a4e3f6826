use super::{Record, RecordError, RecordWriter};
use crate::security::SecurityContext;
use tracing::{debug, info, warn};

/// Read path: turns a stored row into the plaintext view returned to callers.
///
/// | Stored state | Action |
/// |---|---|
/// | public | returned as is, no key lookup |
/// | private, some values still plaintext | sealed and persisted (when healing is on), then returned |
/// | private, sealed | decrypted in memory, never persisted |
///
/// Formatting never fails: a missing key or a field that does not open is logged and
/// the best-effort record is returned.
#[derive(Debug, Clone)]
pub struct RecordFormatter {
    writer: RecordWriter,
    heal_on_read: bool,
}

impl RecordFormatter {
    #[must_use]
    pub const fn new(writer: RecordWriter, heal_on_read: bool) -> Self {
        Self { writer, heal_on_read }
    }

    pub async fn format<T: Record>(&self, ctx: &SecurityContext, mut record: T) -> T {
        if !record.is_private() {
            return record;
        }

        let Ok(cipher) = ctx.cipher() else {
            warn!(kind = T::KIND, uid = record.uid(), "No session key for private record");
            return record;
        };
        if !ctx.owns(record.owner_id()) {
            warn!(kind = T::KIND, uid = record.uid(), "Private record of another owner left sealed");
            return record;
        }

        if self.heal_on_read && record.has_plaintext_fields() {
            self.heal(ctx, &record).await;
        }

        let report = cipher.open_fields(&mut record);
        for failure in &report.failures {
            let error = RecordError::decryption(T::KIND, record.uid(), failure);
            warn!(
                kind = T::KIND,
                uid = record.uid(),
                field = failure.field,
                error = %error,
                "Field did not decrypt; returning stored value"
            );
        }

        record
    }

    /// Formats every row, in order.
    pub async fn format_all<T: Record>(&self, ctx: &SecurityContext, rows: Vec<T>) -> Vec<T> {
        let mut formatted = Vec::with_capacity(rows.len());
        for row in rows {
            formatted.push(self.format(ctx, row).await);
        }
        formatted
    }

    async fn heal<T: Record>(&self, ctx: &SecurityContext, record: &T) {
        match self.writer.heal(ctx, record).await {
            Ok(true) => info!(kind = T::KIND, uid = record.uid(), "Encrypted legacy plaintext record"),
            Ok(false) => {
                debug!(kind = T::KIND, uid = record.uid(), "Skipped heal; record changed since read");
            },
            Err(e) => warn!(kind = T::KIND, uid = record.uid(), error = %e, "Failed to heal legacy record"),
        }
    }
}
