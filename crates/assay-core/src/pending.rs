//! Aggregates that exist only while a run is being computed.
//!
//! A run stages brand-new assignments in a [`StagingArea`] and builds
//! [`PendingAssessment`]s whose sections hold [`AssignmentRef`]s: either the id
//! of a persisted assignment or a handle to a staged one. Two sections holding
//! the same ref point at the same assignment; nothing here clones assignments.
//!
//! On commit, staged assignments are inserted first, then every pending
//! assessment is resolved into an [`AssessmentDraft`] that only holds ids.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::entities::{Assessment, NewAssignment};
use crate::errors::CoreError;

/// Handle to an assignment staged in a [`StagingArea`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StagedId(usize);

impl StagedId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Reference to an assignment from inside a pending section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentRef {
    Persisted(i64),
    Staged(StagedId),
}

/// A new assignment together with the file it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedAssignment {
    pub source_path: PathBuf,
    pub assignment: NewAssignment,
}

/// Ordered collection of assignments waiting for their first insert.
#[derive(Debug, Default)]
pub struct StagingArea {
    entries: Vec<StagedAssignment>,
}

impl StagingArea {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn stage(&mut self, source_path: PathBuf, assignment: NewAssignment) -> StagedId {
        self.entries.push(StagedAssignment {
            source_path,
            assignment,
        });
        StagedId(self.entries.len() - 1)
    }

    #[must_use]
    pub fn get(&self, id: StagedId) -> Option<&StagedAssignment> {
        self.entries.get(id.0)
    }

    /// Whether an assignment parsed from `path` is already staged.
    #[must_use]
    pub fn contains_path(&self, path: &Path) -> bool {
        self.entries.iter().any(|entry| entry.source_path == path)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedAssignment> {
        self.entries.iter()
    }

    /// The staged assignments in staging order, ready for insertion.
    #[must_use]
    pub fn assignments(&self) -> Vec<NewAssignment> {
        self.entries
            .iter()
            .map(|entry| entry.assignment.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// PendingAssessment
// ---------------------------------------------------------------------------

/// A section inside a pending assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSection {
    pub title: String,
    pub assignments: Vec<AssignmentRef>,
}

/// The assessment a tag will have as its latest once the run commits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingAssessment {
    pub tag: String,
    /// Id of the persisted assessment this one was forked from, if any.
    pub forked_from: Option<i64>,
    sections: Vec<PendingSection>,
}

impl PendingAssessment {
    /// An assessment with no sections.
    #[must_use]
    pub fn empty(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            forked_from: None,
            sections: Vec::new(),
        }
    }

    /// Shallow copy of a persisted assessment: new sections, same assignment ids.
    #[must_use]
    pub fn fork(source: &Assessment) -> Self {
        Self {
            tag: source.tag.clone(),
            forked_from: Some(source.id),
            sections: source
                .sections
                .iter()
                .map(|section| PendingSection {
                    title: section.title.clone(),
                    assignments: section
                        .assignment_ids
                        .iter()
                        .copied()
                        .map(AssignmentRef::Persisted)
                        .collect(),
                })
                .collect(),
        }
    }

    #[must_use]
    pub fn sections(&self) -> &[PendingSection] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, title: &str) -> Option<&PendingSection> {
        self.sections.iter().find(|section| section.title == title)
    }

    /// Number of sections carrying `title`. Anything above one is corrupt state.
    #[must_use]
    pub fn count_sections_titled(&self, title: &str) -> usize {
        self.sections
            .iter()
            .filter(|section| section.title == title)
            .count()
    }

    /// Append `assignment` to the first section titled `title`, creating the
    /// section at the end if none exists. Returns `false` if the section
    /// already held the assignment.
    pub fn add_to_section(&mut self, title: &str, assignment: AssignmentRef) -> bool {
        if let Some(section) = self.sections.iter_mut().find(|s| s.title == title) {
            if section.assignments.contains(&assignment) {
                return false;
            }
            section.assignments.push(assignment);
            return true;
        }
        self.sections.push(PendingSection {
            title: title.to_string(),
            assignments: vec![assignment],
        });
        true
    }

    /// Remove every ref matching `predicate` from every section. Returns the
    /// number of refs removed.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(AssignmentRef) -> bool) -> usize {
        let mut removed = 0;
        for section in &mut self.sections {
            let before = section.assignments.len();
            section.assignments.retain(|assignment| !predicate(*assignment));
            removed += before - section.assignments.len();
        }
        removed
    }

    /// Swap `from` for `to` in every section. Returns the number of swaps.
    pub fn replace(&mut self, from: AssignmentRef, to: AssignmentRef) -> usize {
        let mut replaced = 0;
        for assignment in self.sections.iter_mut().flat_map(|s| s.assignments.iter_mut()) {
            if *assignment == from {
                *assignment = to;
                replaced += 1;
            }
        }
        replaced
    }

    #[must_use]
    pub fn contains(&self, assignment: AssignmentRef) -> bool {
        self.sections
            .iter()
            .any(|section| section.assignments.contains(&assignment))
    }

    /// Turn staged refs into ids using `staged_ids[staged.index()]`.
    ///
    /// Sections left without assignments are dropped.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnresolvedStagedAssignment` if a staged ref has no
    /// entry in `staged_ids`.
    pub fn resolve(
        &self,
        git_commit_hash: Option<&str>,
        staged_ids: &[i64],
    ) -> Result<AssessmentDraft, CoreError> {
        let mut sections = Vec::with_capacity(self.sections.len());
        for section in &self.sections {
            if section.assignments.is_empty() {
                continue;
            }
            let assignment_ids = section
                .assignments
                .iter()
                .map(|assignment| match assignment {
                    AssignmentRef::Persisted(id) => Ok(*id),
                    AssignmentRef::Staged(staged) => staged_ids
                        .get(staged.index())
                        .copied()
                        .ok_or(CoreError::UnresolvedStagedAssignment(staged.index())),
                })
                .collect::<Result<Vec<_>, _>>()?;
            sections.push(SectionDraft {
                title: section.title.clone(),
                assignment_ids,
            });
        }
        Ok(AssessmentDraft {
            tag: self.tag.clone(),
            git_commit_hash: git_commit_hash.map(String::from),
            sections,
        })
    }
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// A fully resolved assessment ready to be inserted as the latest for its tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssessmentDraft {
    pub tag: String,
    pub git_commit_hash: Option<String>,
    pub sections: Vec<SectionDraft>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionDraft {
    pub title: String,
    pub assignment_ids: Vec<i64>,
}
