use crate::error::{DatabaseError, DatabaseErrorExt};
use fxhash::FxHashMap;
use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;
use surrealdb::types::SurrealValue;

const BOOTSTRAP: &str = "DEFINE TABLE IF NOT EXISTS migration SCHEMALESS;
DEFINE INDEX IF NOT EXISTS migration_version ON migration FIELDS version UNIQUE;";

/// Scripts applied in order; a version is never edited once released.
static MIGRATIONS: &[Migration] = &[
    Migration::new("0001", "records", include_str!("../migrations/0001-records.surql")),
    Migration::new("0002", "chats", include_str!("../migrations/0002-chats.surql")),
];

#[derive(Debug)]
pub(crate) struct Migration {
    pub version: &'static str,
    pub name: &'static str,
    pub script: &'static str,
}

impl Migration {
    #[must_use]
    pub(crate) const fn new(version: &'static str, name: &'static str, script: &'static str) -> Self {
        Self { version, name, script }
    }

    pub(crate) fn checksum(&self) -> String {
        hex::encode(Sha256::digest(self.script.as_bytes()))
    }

    fn to_applied(&self) -> AppliedMigration {
        AppliedMigration {
            version: self.version.to_owned(),
            name: self.name.to_owned(),
            checksum: self.checksum(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MigrationReport {
    pub applied: Vec<AppliedMigration>,
    pub skipped: Vec<AppliedMigration>,
}

#[derive(Debug, Clone, SurrealValue)]
pub struct AppliedMigration {
    pub version: String,
    pub name: String,
    pub checksum: String,
}

#[derive(Debug)]
pub(crate) struct MigrationRunner {
    db: Surreal<Any>,
}

impl MigrationRunner {
    #[must_use]
    pub(crate) const fn new(db: Surreal<Any>) -> Self {
        Self { db }
    }

    pub(crate) async fn run(&self) -> Result<MigrationReport, DatabaseError> {
        self.bootstrap().await?;

        let mut report = MigrationReport::default();
        let applied_migrations = self.get_migrations_map().await?;

        for migration in MIGRATIONS {
            if let Some(applied) = applied_migrations.get(migration.version) {
                ensure_checksum_match(migration, &applied.checksum)?;
                report.skipped.push(migration.to_applied());
                continue;
            }

            self.apply_migration(migration).await?;
            report.applied.push(migration.to_applied());
        }

        Ok(report)
    }

    async fn bootstrap(&self) -> Result<(), DatabaseError> {
        self.db
            .query(BOOTSTRAP)
            .await
            .context("Bootstrapping migration table")?
            .check()
            .map_err(surrealdb::Error::from)?;
        Ok(())
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<(), DatabaseError> {
        let query = format!(
            "BEGIN TRANSACTION;
            {}
            CREATE migration CONTENT {{
                version: $version,
                name: $name,
                checksum: $checksum,
                applied_at: time::now()
            }} RETURN NONE;
            COMMIT TRANSACTION;",
            migration.script,
        );

        self.db
            .query(&query)
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .bind(("checksum", migration.checksum()))
            .await
            .context(format!("SQL execution failed at {}-{}", migration.version, migration.name))?
            .check()
            .map_err(surrealdb::Error::from)?;

        Ok(())
    }

    async fn get_migrations_map(
        &self,
    ) -> Result<FxHashMap<String, AppliedMigration>, DatabaseError> {
        let entries = self
            .db
            .query("SELECT version, name, checksum FROM migration")
            .await
            .context("Loading applied migrations")?
            .take::<Vec<AppliedMigration>>(0)
            .context("Parsing migrations map")?;

        Ok(entries.into_iter().map(|entry| (entry.version.clone(), entry)).collect())
    }
}

fn ensure_checksum_match(migration: &Migration, existing: &str) -> Result<(), DatabaseError> {
    let checksum = migration.checksum();
    if existing != checksum {
        return Err(DatabaseError::Migration {
            message: format!(
                "Checksum mismatch for {}-{} (expected {existing}, got {checksum})",
                migration.version, migration.name
            )
            .into(),
            context: Some("Migration already applied with different checksum".into()),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn versions_are_unique_and_ordered() {
        let versions: Vec<_> = MIGRATIONS.iter().map(|m| m.version).collect();
        let mut sorted = versions.clone();
        sorted.sort_unstable();
        sorted.dedup();

        assert_eq!(versions, sorted);
    }

    #[test]
    fn checksum_is_stable_hex() {
        let migration = Migration::new("9999", "test", "DEFINE TABLE demo;");

        assert_eq!(migration.checksum(), migration.checksum());
        assert_eq!(migration.checksum().len(), 64);
    }

    #[test]
    fn checksum_mismatch_is_rejected() {
        let migration = Migration::new("9999", "test", "DEFINE TABLE demo;");

        assert!(ensure_checksum_match(&migration, &migration.checksum()).is_ok());
        assert!(matches!(
            ensure_checksum_match(&migration, "deadbeef"),
            Err(DatabaseError::Migration { .. })
        ));
    }
}
