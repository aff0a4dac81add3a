//! Cross-cutting error types for assay.
//!
//! Domain-specific errors (`ParseError`, `ReconcileError`, `DatabaseError`) are
//! defined in their respective crates. The binary converges them through
//! `anyhow`.

use thiserror::Error;

/// Errors that can be raised by any assay crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A question type string matched no known assignment type.
    #[error("Unknown question type '{0}' (expected one of: multiple-choice, open, coding)")]
    UnknownAssignmentType(String),

    /// A pending section referenced a staged assignment that was never inserted.
    #[error("Staged assignment #{0} has no persisted id")]
    UnresolvedStagedAssignment(usize),
}
