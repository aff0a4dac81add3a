//! The incremental reconciler.
//!
//! One [`AssessmentReconciler`] serves one run. It keeps a working set keyed
//! by tag: the pending assessment each touched tag will have as its latest
//! once the run commits. A tag is forked from storage the first time any
//! operation touches it and the persisted original is queued for
//! deactivation; later operations in the same run reuse the fork.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::PathBuf;

use assay_config::TagConfig;
use assay_core::entities::Assessment;
use assay_core::pending::{AssignmentRef, PendingAssessment, StagedId, StagingArea};
use assay_parser::{Frontmatter, qid};
use serde::Serialize;

use crate::error::ReconcileError;
use crate::gateway::StorageGateway;

/// What a committed run wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommitReport {
    /// Ids of assessments whose latest flag was cleared.
    pub deactivated: Vec<i64>,
    /// New latest assessments.
    pub created: Vec<CreatedAssessment>,
    /// Newly inserted assignments and the files they were parsed from.
    pub new_assignments: Vec<PersistedQuestion>,
}

impl CommitReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deactivated.is_empty() && self.created.is_empty() && self.new_assignments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedAssessment {
    pub tag: String,
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersistedQuestion {
    pub source_path: PathBuf,
    pub id: i64,
}

pub struct AssessmentReconciler<'g, G: StorageGateway> {
    gateway: &'g mut G,
    working: BTreeMap<String, PendingAssessment>,
    deactivated: BTreeMap<i64, Assessment>,
    retired_tags: BTreeSet<String>,
    staging: StagingArea,
    /// Persisted assignment id -> the staged assignment replacing it.
    replacements: HashMap<i64, StagedId>,
    /// Assignment ids already handled as modified in this run.
    modified_ids: BTreeSet<i64>,
}

impl<'g, G: StorageGateway> AssessmentReconciler<'g, G> {
    pub fn new(gateway: &'g mut G) -> Self {
        Self {
            gateway,
            working: BTreeMap::new(),
            deactivated: BTreeMap::new(),
            retired_tags: BTreeSet::new(),
            staging: StagingArea::new(),
            replacements: HashMap::new(),
            modified_ids: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn pending(&self, tag: &str) -> Option<&PendingAssessment> {
        self.working.get(tag)
    }

    pub fn pending_assessments(&self) -> impl Iterator<Item = &PendingAssessment> {
        self.working.values()
    }

    #[must_use]
    pub const fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Ids of the persisted assessments queued for deactivation.
    pub fn deactivated_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.deactivated.keys().copied()
    }

    #[must_use]
    pub fn is_retired(&self, tag: &str) -> bool {
        self.retired_tags.contains(tag)
    }

    /// Stage each added question and append it to the section named after its
    /// topic in every tag it carries.
    ///
    /// # Errors
    ///
    /// Fails with `UnexpectedExistingId` if a file already carries an id,
    /// `DuplicateStagedFile` if it was already added in this run,
    /// `DuplicateSectionTitle` on corrupt target assessments, and with
    /// `AssessmentNotFoundForTag` or `RetiredTag` for unusable tags.
    pub async fn reconcile_added_files(
        &mut self,
        frontmatters: &[Frontmatter],
    ) -> Result<(), ReconcileError> {
        for frontmatter in frontmatters {
            if let Some(id) = frontmatter.id {
                return Err(ReconcileError::UnexpectedExistingId {
                    path: frontmatter.file_path.clone(),
                    id,
                });
            }
            if self.staging.contains_path(&frontmatter.file_path) {
                return Err(ReconcileError::DuplicateStagedFile {
                    path: frontmatter.file_path.clone(),
                });
            }

            let staged = self
                .staging
                .stage(frontmatter.file_path.clone(), frontmatter.to_new_assignment());
            tracing::debug!(
                path = %frontmatter.file_path.display(),
                tags = ?frontmatter.tags,
                "staged added question"
            );
            for tag in &frontmatter.tags {
                self.add_to_tag(tag, &frontmatter.topic, AssignmentRef::Staged(staged))
                    .await?;
            }
        }
        Ok(())
    }

    /// Remove deleted questions from every latest assessment holding them.
    /// Files without an embedded id were never uploaded and are skipped.
    ///
    /// # Errors
    ///
    /// Fails with `AssignmentNotFound` when storage and the working copy
    /// disagree about an assessment's contents.
    pub async fn reconcile_deleted_files(&mut self, paths: &[PathBuf]) -> Result<(), ReconcileError> {
        let mut ids = BTreeSet::new();
        for path in paths {
            match qid::extract_id(path) {
                Some(id) => {
                    ids.insert(id);
                }
                None => tracing::debug!(path = %path.display(), "deleted file has no id; skipping"),
            }
        }
        if ids.is_empty() {
            return Ok(());
        }

        let ids: Vec<i64> = ids.into_iter().collect();
        let containing = self.gateway.latest_assessments_containing(&ids).await?;
        for assessment in containing {
            if self.retired_tags.contains(&assessment.tag) {
                continue;
            }
            for id in ids.iter().copied().filter(|id| assessment.contains_assignment(*id)) {
                self.remove_from_tag(&assessment.tag, id).await?;
            }
        }
        Ok(())
    }

    /// Apply edits to already uploaded questions.
    ///
    /// When type or scoring changed, a replacement assignment is staged and
    /// swapped in everywhere the old one is referenced. Then the file's tags
    /// are diffed against the tags of the latest assessments holding it.
    ///
    /// # Errors
    ///
    /// Fails with `MissingQuestionId` for files without an id,
    /// `DuplicateModifiedId` when an id was already modified in this run, and
    /// `AssignmentNotPersisted` when the id is unknown to storage.
    pub async fn reconcile_modified_files(
        &mut self,
        frontmatters: &[Frontmatter],
    ) -> Result<(), ReconcileError> {
        for frontmatter in frontmatters {
            let id = frontmatter.id.ok_or_else(|| ReconcileError::MissingQuestionId {
                path: frontmatter.file_path.clone(),
            })?;
            if !self.modified_ids.insert(id) {
                return Err(ReconcileError::DuplicateModifiedId {
                    path: frontmatter.file_path.clone(),
                    id,
                });
            }
            let stored = self
                .gateway
                .assignments_by_ids(&[id])
                .await?
                .into_iter()
                .find(|assignment| assignment.id == id)
                .ok_or_else(|| ReconcileError::AssignmentNotPersisted {
                    path: frontmatter.file_path.clone(),
                    id,
                })?;
            let existing_tags: BTreeSet<String> = self
                .gateway
                .latest_tags_containing(id)
                .await?
                .into_iter()
                .filter(|tag| !self.retired_tags.contains(tag))
                .collect();

            let candidate = frontmatter.to_new_assignment();
            let mut current = AssignmentRef::Persisted(id);
            if !frontmatter.tags.is_empty() && stored.persisted_attributes_differ(&candidate) {
                let staged = self.staging.stage(frontmatter.file_path.clone(), candidate);
                self.replacements.insert(id, staged);
                current = AssignmentRef::Staged(staged);
                tracing::debug!(
                    path = %frontmatter.file_path.display(),
                    assignment_id = id,
                    "staged replacement for changed assignment"
                );
                for tag in &existing_tags {
                    self.get_or_create_working_assessment(tag)
                        .await?
                        .replace(AssignmentRef::Persisted(id), current);
                }
            }

            for tag in &frontmatter.tags {
                if !existing_tags.contains(tag) {
                    self.add_to_tag(tag, &frontmatter.topic, current).await?;
                }
            }
            for tag in &existing_tags {
                if !frontmatter.has_tag(tag) {
                    self.remove_from_tag(tag, id).await?;
                }
            }
        }
        Ok(())
    }

    /// Align latest assessments with the configured tags: new tags get an
    /// empty assessment, dropped tags lose theirs without replacement.
    ///
    /// # Errors
    ///
    /// Fails with `AssessmentNotFoundForTag` if a dropped tag has no latest
    /// assessment by the time it is deactivated.
    pub async fn reconcile_config_change(&mut self, configured: &TagConfig) -> Result<(), ReconcileError> {
        let latest = self.gateway.latest_assessments().await?;
        let latest_tags: BTreeSet<&str> = latest.iter().map(|a| a.tag.as_str()).collect();

        for tag in configured.tags() {
            if !latest_tags.contains(tag) && !self.working.contains_key(tag) {
                tracing::info!(tag, "queued empty assessment for new tag");
                self.working
                    .insert(tag.to_string(), PendingAssessment::empty(tag));
            }
        }

        let dropped: Vec<String> = latest_tags
            .into_iter()
            .filter(|tag| !configured.contains(tag))
            .map(String::from)
            .collect();
        for tag in dropped {
            self.retire_tag(&tag).await?;
        }
        Ok(())
    }

    /// Persist the run: deactivations first, then a flush, then new
    /// assignments, then the new latest assessments.
    ///
    /// # Errors
    ///
    /// Propagates storage failures unchanged; the caller rolls back.
    pub async fn commit(self, git_commit_hash: &str) -> Result<CommitReport, ReconcileError> {
        let Self {
            gateway,
            working,
            deactivated,
            staging,
            ..
        } = self;

        let deactivated: Vec<Assessment> = deactivated
            .into_values()
            .map(|mut assessment| {
                assessment.latest = false;
                assessment
            })
            .collect();
        if !deactivated.is_empty() {
            gateway.merge_assessments(&deactivated).await?;
        }
        gateway.flush().await?;

        let staged_ids = if staging.is_empty() {
            Vec::new()
        } else {
            gateway.persist_assignments(&staging.assignments()).await?
        };

        let drafts = working
            .values()
            .map(|pending| pending.resolve(Some(git_commit_hash), &staged_ids))
            .collect::<Result<Vec<_>, _>>()?;
        let created_ids = if drafts.is_empty() {
            Vec::new()
        } else {
            gateway.persist_assessments(&drafts).await?
        };

        let report = CommitReport {
            deactivated: deactivated.iter().map(|assessment| assessment.id).collect(),
            created: drafts
                .into_iter()
                .zip(created_ids)
                .map(|(draft, id)| CreatedAssessment { tag: draft.tag, id })
                .collect(),
            new_assignments: staging
                .iter()
                .zip(staged_ids)
                .map(|(staged, id)| PersistedQuestion {
                    source_path: staged.source_path.clone(),
                    id,
                })
                .collect(),
        };
        tracing::info!(
            deactivated = report.deactivated.len(),
            created = report.created.len(),
            new_assignments = report.new_assignments.len(),
            "committed reconciliation run"
        );
        Ok(report)
    }

    async fn get_or_create_working_assessment(
        &mut self,
        tag: &str,
    ) -> Result<&mut PendingAssessment, ReconcileError> {
        if self.retired_tags.contains(tag) {
            return Err(ReconcileError::RetiredTag {
                tag: tag.to_string(),
            });
        }
        match self.working.entry(tag.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let current = self
                    .gateway
                    .latest_assessment(tag)
                    .await?
                    .ok_or_else(|| ReconcileError::AssessmentNotFoundForTag {
                        tag: tag.to_string(),
                    })?;
                tracing::debug!(tag, assessment_id = current.id, "forked latest assessment");
                let pending = PendingAssessment::fork(&current);
                self.deactivated.insert(current.id, current);
                Ok(entry.insert(pending))
            }
        }
    }

    async fn add_to_tag(
        &mut self,
        tag: &str,
        title: &str,
        assignment: AssignmentRef,
    ) -> Result<(), ReconcileError> {
        let pending = self.get_or_create_working_assessment(tag).await?;
        let count = pending.count_sections_titled(title);
        if count > 1 {
            return Err(ReconcileError::DuplicateSectionTitle {
                tag: tag.to_string(),
                title: title.to_string(),
                count,
            });
        }
        pending.add_to_section(title, assignment);
        Ok(())
    }

    async fn remove_from_tag(&mut self, tag: &str, id: i64) -> Result<(), ReconcileError> {
        let replacement = self.replacements.get(&id).copied().map(AssignmentRef::Staged);
        let pending = self.get_or_create_working_assessment(tag).await?;
        let removed = pending.remove_where(|assignment| {
            assignment == AssignmentRef::Persisted(id) || Some(assignment) == replacement
        });
        if removed == 0 {
            return Err(ReconcileError::AssignmentNotFound {
                id,
                tag: tag.to_string(),
            });
        }
        Ok(())
    }

    async fn retire_tag(&mut self, tag: &str) -> Result<(), ReconcileError> {
        if let Some(pending) = self.working.remove(tag) {
            if pending.forked_from.is_some() {
                self.retired_tags.insert(tag.to_string());
                return Ok(());
            }
        }
        let current = self
            .gateway
            .latest_assessment(tag)
            .await?
            .ok_or_else(|| ReconcileError::AssessmentNotFoundForTag {
                tag: tag.to_string(),
            })?;
        tracing::info!(tag, assessment_id = current.id, "deactivating assessment of removed tag");
        self.deactivated.insert(current.id, current);
        self.retired_tags.insert(tag.to_string());
        Ok(())
    }
}
