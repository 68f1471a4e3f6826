//! Typed access to one schemaless table.
//!
//! Rows are addressed by their application id stored in `uid`; the engine's own record
//! id is never exposed and is omitted from every read.

use crate::error::{DatabaseError, DatabaseErrorExt};
use std::marker::PhantomData;
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;
use tracing::instrument;

/// A handle to one table whose rows decode as `T`.
pub struct Table<T> {
    db: Surreal<Any>,
    name: &'static str,
    _row: PhantomData<fn() -> T>,
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self { db: self.db.clone(), name: self.name, _row: PhantomData }
    }
}

impl<T> std::fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table").field("name", &self.name).finish_non_exhaustive()
    }
}

impl<T> Table<T>
where
    T: SurrealValue + Send + Sync + 'static,
{
    pub(crate) const fn new(db: Surreal<Any>, name: &'static str) -> Self {
        Self { db, name, _row: PhantomData }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Inserts a new row.
    ///
    /// # Errors
    /// * [`DatabaseError::Surreal`] On engine failures, including a duplicate `uid`.
    #[instrument(level = "debug", skip_all, fields(table = self.name))]
    pub async fn insert(&self, row: T) -> Result<(), DatabaseError> {
        self.db
            .query(format!("CREATE {} CONTENT $data RETURN NONE", self.name))
            .bind(("data", row))
            .await
            .context(format!("Inserting into {}", self.name))?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    /// Loads the row with the given `uid`.
    ///
    /// # Errors
    /// * [`DatabaseError::Surreal`] On engine or decoding failures.
    #[instrument(level = "debug", skip(self), fields(table = self.name))]
    pub async fn fetch(&self, uid: &str) -> Result<Option<T>, DatabaseError> {
        let mut rows = self
            .db
            .query(format!("SELECT * OMIT id FROM {} WHERE uid = $uid LIMIT 1", self.name))
            .bind(("uid", uid.to_owned()))
            .await
            .context(format!("Fetching from {}", self.name))?
            .take::<Vec<T>>(0)
            .context(format!("Decoding {} row", self.name))?;
        Ok(rows.pop())
    }

    /// Replaces the row with the given `uid`. Returns `false` if it does not exist.
    ///
    /// # Errors
    /// * [`DatabaseError::Surreal`] On engine failures.
    #[instrument(level = "debug", skip(self, row), fields(table = self.name))]
    pub async fn replace(&self, uid: &str, row: T) -> Result<bool, DatabaseError> {
        let updated = self
            .db
            .query(format!("UPDATE {} CONTENT $data WHERE uid = $uid RETURN VALUE uid", self.name))
            .bind(("data", row))
            .bind(("uid", uid.to_owned()))
            .await
            .context(format!("Replacing in {}", self.name))?
            .take::<Vec<String>>(0)
            .context(format!("Decoding {} update", self.name))?;
        Ok(!updated.is_empty())
    }

    /// Replaces the row only while its `updated_at` still equals `stamp`.
    ///
    /// Returns `false` when the row is gone or was changed since it was read.
    ///
    /// # Errors
    /// * [`DatabaseError::Surreal`] On engine failures.
    #[instrument(level = "debug", skip(self, row), fields(table = self.name))]
    pub async fn replace_if_unchanged(
        &self,
        uid: &str,
        stamp: &str,
        row: T,
    ) -> Result<bool, DatabaseError> {
        let updated = self
            .db
            .query(format!(
                "UPDATE {} CONTENT $data WHERE uid = $uid AND updated_at = $stamp RETURN VALUE uid",
                self.name
            ))
            .bind(("data", row))
            .bind(("uid", uid.to_owned()))
            .bind(("stamp", stamp.to_owned()))
            .await
            .context(format!("Guarded replace in {}", self.name))?
            .take::<Vec<String>>(0)
            .context(format!("Decoding {} update", self.name))?;
        Ok(!updated.is_empty())
    }

    /// Hard-deletes the row. Returns `false` if it did not exist.
    ///
    /// # Errors
    /// * [`DatabaseError::Surreal`] On engine failures.
    #[instrument(level = "debug", skip(self), fields(table = self.name))]
    pub async fn delete(&self, uid: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .db
            .query(format!("DELETE {} WHERE uid = $uid RETURN BEFORE", self.name))
            .bind(("uid", uid.to_owned()))
            .await
            .context(format!("Deleting from {}", self.name))?
            .take::<Vec<T>>(0)
            .context(format!("Decoding {} delete", self.name))?;
        Ok(!deleted.is_empty())
    }

    /// Rows owned by `owner`, plus every row with `is_private = false`.
    ///
    /// Without an owner only public rows are returned. Newest first.
    ///
    /// # Errors
    /// * [`DatabaseError::Surreal`] On engine or decoding failures.
    #[instrument(level = "debug", skip(self), fields(table = self.name))]
    pub async fn list_visible(&self, owner: Option<&str>) -> Result<Vec<T>, DatabaseError> {
        self.db
            .query(format!(
                "SELECT * OMIT id FROM {} WHERE owner_id = $owner OR is_private = false ORDER BY created_at DESC",
                self.name
            ))
            .bind(("owner", owner.map(ToOwned::to_owned)))
            .await
            .context(format!("Listing {}", self.name))?
            .take::<Vec<T>>(0)
            .context(format!("Decoding {} rows", self.name))
    }

    /// Rows owned by `owner`, newest first.
    ///
    /// # Errors
    /// * [`DatabaseError::Surreal`] On engine or decoding failures.
    #[instrument(level = "debug", skip(self), fields(table = self.name))]
    pub async fn list_owned(&self, owner: &str) -> Result<Vec<T>, DatabaseError> {
        self.db
            .query(format!(
                "SELECT * OMIT id FROM {} WHERE owner_id = $owner ORDER BY created_at DESC",
                self.name
            ))
            .bind(("owner", owner.to_owned()))
            .await
            .context(format!("Listing owned {}", self.name))?
            .take::<Vec<T>>(0)
            .context(format!("Decoding {} rows", self.name))
    }

    /// Rows whose `field` equals `value`, oldest first.
    ///
    /// `field` must be a static column name.
    ///
    /// # Errors
    /// * [`DatabaseError::Validation`] If `field` is not a plain identifier.
    /// * [`DatabaseError::Surreal`] On engine or decoding failures.
    #[instrument(level = "debug", skip(self), fields(table = self.name))]
    pub async fn list_by(&self, field: &'static str, value: &str) -> Result<Vec<T>, DatabaseError> {
        ensure_identifier(field)?;
        self.db
            .query(format!(
                "SELECT * OMIT id FROM {} WHERE {field} = $value ORDER BY created_at ASC",
                self.name
            ))
            .bind(("value", value.to_owned()))
            .await
            .context(format!("Listing {} by {field}", self.name))?
            .take::<Vec<T>>(0)
            .context(format!("Decoding {} rows", self.name))
    }

    /// The first row whose `field` equals `value`.
    ///
    /// # Errors
    /// See [`Table::list_by`].
    #[instrument(level = "debug", skip(self, value), fields(table = self.name))]
    pub async fn find_by(&self, field: &'static str, value: &str) -> Result<Option<T>, DatabaseError> {
        ensure_identifier(field)?;
        let mut rows = self
            .db
            .query(format!("SELECT * OMIT id FROM {} WHERE {field} = $value LIMIT 1", self.name))
            .bind(("value", value.to_owned()))
            .await
            .context(format!("Finding {} by {field}", self.name))?
            .take::<Vec<T>>(0)
            .context(format!("Decoding {} row", self.name))?;
        Ok(rows.pop())
    }
}

fn ensure_identifier(field: &str) -> Result<(), DatabaseError> {
    let valid = !field.is_empty()
        && field.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(DatabaseError::Validation {
            message: format!("`{field}` is not a column name").into(),
            context: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ensure_identifier;

    #[test]
    fn identifiers() {
        assert!(ensure_identifier("chat_id").is_ok());
        assert!(ensure_identifier("owner_id").is_ok());
        assert!(ensure_identifier("").is_err());
        assert!(ensure_identifier("uid; DELETE chat").is_err());
    }
}
