//! # assay-reconcile
//!
//! Keeps the latest assessment of every tag in step with the question
//! repository.
//!
//! An incremental run takes the files added, deleted, and modified since the
//! last uploaded commit, plus an optional tag configuration change, and
//! computes which assessments to deactivate and which to create in their
//! place. Superseded assessments are never edited apart from clearing their
//! latest flag.
//!
//! Storage is reached only through [`StorageGateway`]; `assay-db` provides the
//! SQL implementation.

mod error;
mod gateway;
mod reconciler;
mod run;
mod test_support;

pub use error::ReconcileError;
pub use gateway::{StorageError, StorageGateway};
pub use reconciler::{AssessmentReconciler, CommitReport, CreatedAssessment, PersistedQuestion};
pub use run::{UploadOutcome, UploadRequest, embed_new_ids, relabel_commit, reset, run_upload};
