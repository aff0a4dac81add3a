//! Whole-run entry points: incremental upload, full reset, commit relabel.
//!
//! Each function performs every storage call of its run through one gateway.
//! The caller owns the unit of work: commit it when the function returns
//! `Ok`, roll it back otherwise, and only then rename files on disk with
//! [`embed_new_ids`].

use std::path::PathBuf;

use assay_core::pending::PendingAssessment;
use assay_parser::{
    AssessmentBuilder, Frontmatter, ParseError, QuestionParser, QuestionRepository, is_markdown,
};
use serde::Serialize;

use crate::error::ReconcileError;
use crate::gateway::StorageGateway;
use crate::reconciler::{AssessmentReconciler, CommitReport, CreatedAssessment, PersistedQuestion};

/// Files changed since the last uploaded commit, relative to the repository root.
#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub added: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub modified: Vec<PathBuf>,
    /// Also align assessments with the tag configuration.
    pub reconcile_config: bool,
    pub commit_hash: String,
}

impl UploadRequest {
    /// Drop every path that is not a markdown file.
    #[must_use]
    pub fn markdown_only(mut self) -> Self {
        for paths in [&mut self.added, &mut self.deleted, &mut self.modified] {
            paths.retain(|path| {
                let keep = is_markdown(path);
                if !keep {
                    tracing::debug!(path = %path.display(), "ignoring non-markdown path");
                }
                keep
            });
        }
        self
    }

    #[must_use]
    pub fn is_noop(&self) -> bool {
        !self.reconcile_config
            && self.added.is_empty()
            && self.deleted.is_empty()
            && self.modified.is_empty()
    }
}

/// Outcome of an upload run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UploadOutcome {
    /// `true` when the request carried nothing to do and storage was not touched.
    pub skipped: bool,
    pub report: CommitReport,
}

/// Reconcile one set of repository changes.
///
/// Order: config change, modified files, added files, deleted files, commit.
///
/// # Errors
///
/// Returns the first parse, invariant, or storage error. Nothing is renamed
/// on disk by this function.
pub async fn run_upload<G: StorageGateway>(
    gateway: &mut G,
    parser: &QuestionParser,
    repository: &QuestionRepository,
    request: UploadRequest,
) -> Result<UploadOutcome, ReconcileError> {
    let request = request.markdown_only();
    if request.is_noop() {
        tracing::info!("no question files changed; nothing to upload");
        return Ok(UploadOutcome {
            skipped: true,
            report: CommitReport::default(),
        });
    }

    let modified = parse_all(parser, repository, &request.modified)?;
    let added = parse_all(parser, repository, &request.added)?;
    let deleted: Vec<PathBuf> = request
        .deleted
        .iter()
        .map(|path| repository.relative(path))
        .collect();

    let mut reconciler = AssessmentReconciler::new(gateway);
    if request.reconcile_config {
        reconciler.reconcile_config_change(parser.tags()).await?;
    }
    reconciler.reconcile_modified_files(&modified).await?;
    reconciler.reconcile_added_files(&added).await?;
    reconciler.reconcile_deleted_files(&deleted).await?;
    let report = reconciler.commit(&request.commit_hash).await?;

    Ok(UploadOutcome {
        skipped: false,
        report,
    })
}

/// Replace all stored state with a fresh build of the whole repository.
///
/// Every configured tag ends up with a latest assessment, empty if no
/// question carries it.
///
/// # Errors
///
/// Parse errors abort before storage is cleared; storage errors propagate.
pub async fn reset<G: StorageGateway>(
    gateway: &mut G,
    parser: &QuestionParser,
    repository: &QuestionRepository,
    commit_hash: &str,
) -> Result<CommitReport, ReconcileError> {
    let mut plan = AssessmentBuilder::new(parser, repository).build_all(commit_hash)?;
    for tag in parser.tags().tags() {
        if !plan.assessments.iter().any(|assessment| assessment.tag == tag) {
            plan.assessments.push(PendingAssessment::empty(tag));
        }
    }
    plan.assessments.sort_by(|a, b| a.tag.cmp(&b.tag));

    gateway.clear_all().await?;
    gateway.flush().await?;
    tracing::warn!("cleared all assessments, sections, and assignments");

    let staged_ids = if plan.staging.is_empty() {
        Vec::new()
    } else {
        gateway.persist_assignments(&plan.staging.assignments()).await?
    };
    let drafts = plan
        .assessments
        .iter()
        .map(|pending| pending.resolve(Some(&plan.git_commit_hash), &staged_ids))
        .collect::<Result<Vec<_>, _>>()?;
    let created_ids = if drafts.is_empty() {
        Vec::new()
    } else {
        gateway.persist_assessments(&drafts).await?
    };

    tracing::info!(
        questions = staged_ids.len(),
        assessments = created_ids.len(),
        "rebuilt assessments from repository"
    );

    Ok(CommitReport {
        deactivated: Vec::new(),
        created: drafts
            .into_iter()
            .zip(created_ids)
            .map(|(draft, id)| CreatedAssessment { tag: draft.tag, id })
            .collect(),
        new_assignments: plan
            .staging
            .iter()
            .zip(staged_ids)
            .map(|(staged, id)| PersistedQuestion {
                source_path: staged.source_path.clone(),
                id,
            })
            .collect(),
    })
}

/// Relabel latest assessments of an amended commit.
///
/// # Errors
///
/// Propagates storage errors.
pub async fn relabel_commit<G: StorageGateway>(
    gateway: &mut G,
    old_hash: &str,
    new_hash: &str,
) -> Result<u64, ReconcileError> {
    let count = gateway.retag_commit(old_hash, new_hash).await?;
    tracing::info!(old_hash, new_hash, count, "relabelled assessments");
    Ok(count)
}

/// Rename every newly persisted question file so its name carries its id.
/// Call only after the unit of work committed.
///
/// # Errors
///
/// Returns the first rename failure. Files renamed before it keep their new
/// names.
pub fn embed_new_ids(
    repository: &QuestionRepository,
    report: &CommitReport,
) -> Result<Vec<PathBuf>, ParseError> {
    report
        .new_assignments
        .iter()
        .map(|persisted| repository.embed_id(&persisted.source_path, persisted.id))
        .collect()
}

/// Parse the current content of each file.
fn parse_all(
    parser: &QuestionParser,
    repository: &QuestionRepository,
    paths: &[PathBuf],
) -> Result<Vec<Frontmatter>, ParseError> {
    paths
        .iter()
        .map(|path| {
            let relative = repository.relative(path);
            let content = repository.read(&relative)?;
            parser.parse(&content, &relative)
        })
        .collect()
}

#[cfg(test)]
mod tests;
