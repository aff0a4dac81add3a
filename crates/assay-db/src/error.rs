//! Database error types for assay-db.

use assay_reconcile::StorageError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),
}

impl DatabaseError {
    /// Whether the error comes from a violated schema constraint.
    #[must_use]
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            Self::LibSql(error) => error.to_string().contains("constraint failed"),
            _ => false,
        }
    }
}

impl From<DatabaseError> for StorageError {
    fn from(error: DatabaseError) -> Self {
        if error.is_constraint_violation() {
            Self::Constraint(error.to_string())
        } else {
            Self::Backend(anyhow::Error::new(error))
        }
    }
}
