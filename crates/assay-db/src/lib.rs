//! # assay-db
//!
//! libSQL storage for assay.
//!
//! Holds assignments, assessments, sections, and section membership. Every
//! run works inside one transaction exposed as a [`SqlGateway`]: commit it
//! after a successful run, roll it back otherwise.
//!
//! Uses the `libsql` crate (v0.9.29) for both local files and remote
//! databases.

pub mod error;
mod gateway;
pub mod helpers;
mod migrations;

use assay_config::DatabaseConfig;
use error::DatabaseError;
use libsql::Builder;

pub use gateway::SqlGateway;

/// Database handle.
pub struct AssayDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl AssayDb {
    /// Open the database described by `config`: remote when both URL and
    /// token are set, the local file otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        if config.is_remote() {
            Self::open_remote(&config.url, &config.auth_token).await
        } else {
            Self::open_local(&config.path).await
        }
    }

    /// Open a local database at the given path (`:memory:` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        tracing::debug!(path, "opened local database");
        Self::from_database(db).await
    }

    /// Open a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection or migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        tracing::debug!(url, "opened remote database");
        Self::from_database(db).await
    }

    async fn from_database(db: libsql::Database) -> Result<Self, DatabaseError> {
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let assay_db = Self { db, conn };
        assay_db.run_migrations().await?;
        Ok(assay_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Start the unit of work for one run.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the transaction cannot be opened.
    pub async fn begin(&self) -> Result<SqlGateway, DatabaseError> {
        let tx = self.conn.transaction().await?;
        Ok(SqlGateway::new(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> AssayDb {
        AssayDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        for table in ["assignments", "assessments", "sections", "section_assignments"] {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_are_enabled() {
        let db = test_db().await;
        let mut rows = db.conn().query("PRAGMA foreign_keys", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }

    #[tokio::test]
    async fn open_with_default_config_uses_local_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: dir.path().join("assay.db").to_string_lossy().into_owned(),
            ..DatabaseConfig::default()
        };
        AssayDb::open(&config).await.unwrap();
        assert!(dir.path().join("assay.db").is_file());
    }
}
