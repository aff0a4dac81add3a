//! The storage contract the reconciler runs against.
//!
//! Every call made during one run belongs to a single unit of work owned by
//! the implementation: the caller commits it after a successful run and rolls
//! it back on any error.

use assay_core::entities::{Assessment, Assignment, NewAssignment};
use assay_core::pending::AssessmentDraft;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A write would break a storage-level invariant, such as a second latest
    /// assessment for one tag.
    #[error("storage constraint violated: {0}")]
    Constraint(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[allow(async_fn_in_trait)]
pub trait StorageGateway {
    /// The latest assessment for `tag`, with its sections.
    async fn latest_assessment(&mut self, tag: &str) -> Result<Option<Assessment>, StorageError>;

    /// Every latest assessment, ordered by tag.
    async fn latest_assessments(&mut self) -> Result<Vec<Assessment>, StorageError>;

    /// Latest assessments referencing any of `assignment_ids`.
    async fn latest_assessments_containing(
        &mut self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Assessment>, StorageError>;

    async fn assignments_by_ids(&mut self, ids: &[i64]) -> Result<Vec<Assignment>, StorageError>;

    /// Tags of the latest assessments referencing `assignment_id`.
    async fn latest_tags_containing(&mut self, assignment_id: i64)
    -> Result<Vec<String>, StorageError>;

    /// Insert new assignments. Returned ids follow input order.
    async fn persist_assignments(
        &mut self,
        assignments: &[NewAssignment],
    ) -> Result<Vec<i64>, StorageError>;

    /// Write back the mutable state of existing assessments (the latest flag).
    async fn merge_assessments(&mut self, assessments: &[Assessment]) -> Result<(), StorageError>;

    /// Insert drafts as new latest assessments. Returned ids follow input order.
    async fn persist_assessments(
        &mut self,
        drafts: &[AssessmentDraft],
    ) -> Result<Vec<i64>, StorageError>;

    /// Make every preceding write visible to the following statements.
    async fn flush(&mut self) -> Result<(), StorageError>;

    /// Delete all assessments, sections, and assignments.
    async fn clear_all(&mut self) -> Result<(), StorageError>;

    /// Relabel latest assessments carrying `old_hash` with `new_hash`.
    /// Returns the number of relabelled assessments.
    async fn retag_commit(&mut self, old_hash: &str, new_hash: &str) -> Result<u64, StorageError>;
}
