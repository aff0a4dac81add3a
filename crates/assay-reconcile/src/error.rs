//! Reconciliation error types.
//!
//! Parse failures are attributable to one file. Everything else aborts the
//! whole run, and the caller rolls back the unit of work.

use std::path::PathBuf;

use assay_core::errors::CoreError;
use assay_parser::ParseError;
use thiserror::Error;

use crate::gateway::StorageError;

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{}: added question already carries id {id}", path.display())]
    UnexpectedExistingId { path: PathBuf, id: i64 },

    #[error("{}: question was added twice in one run", path.display())]
    DuplicateStagedFile { path: PathBuf },

    #[error("{}: question {id} was modified twice in one run", path.display())]
    DuplicateModifiedId { path: PathBuf, id: i64 },

    #[error("{}: modified question has no id in its file name", path.display())]
    MissingQuestionId { path: PathBuf },

    #[error("{}: assignment {id} does not exist in storage", path.display())]
    AssignmentNotPersisted { path: PathBuf, id: i64 },

    /// Storage reported the assignment inside the tag's latest assessment but
    /// the working copy does not hold it.
    #[error("assignment {id} not found in any section of the assessment for tag '{tag}'")]
    AssignmentNotFound { id: i64, tag: String },

    #[error("assessment for tag '{tag}' has {count} sections titled '{title}'")]
    DuplicateSectionTitle {
        tag: String,
        title: String,
        count: usize,
    },

    #[error("no latest assessment exists for tag '{tag}'")]
    AssessmentNotFoundForTag { tag: String },

    #[error("tag '{tag}' was removed from the tag configuration in this run")]
    RetiredTag { tag: String },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
