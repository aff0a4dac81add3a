//! Batch construction of every assessment from a full repository scan.

use std::collections::BTreeMap;

use assay_core::pending::{AssignmentRef, PendingAssessment, StagingArea};

use crate::error::ParseError;
use crate::parser::QuestionParser;
use crate::repository::QuestionRepository;

/// Result of a full scan: every question staged once, one pending assessment
/// per tag that has at least one question.
#[derive(Debug)]
pub struct BuildPlan {
    pub git_commit_hash: String,
    pub staging: StagingArea,
    /// Sorted by tag.
    pub assessments: Vec<PendingAssessment>,
}

impl BuildPlan {
    /// Number of distinct questions found.
    #[must_use]
    pub const fn question_count(&self) -> usize {
        self.staging.len()
    }
}

pub struct AssessmentBuilder<'a> {
    parser: &'a QuestionParser,
    repository: &'a QuestionRepository,
}

impl<'a> AssessmentBuilder<'a> {
    #[must_use]
    pub const fn new(parser: &'a QuestionParser, repository: &'a QuestionRepository) -> Self {
        Self { parser, repository }
    }

    /// Parse every question in the repository and group them by tag, one
    /// section per topic directory. Storage is never consulted.
    ///
    /// # Errors
    ///
    /// Returns the first `ParseError` met; topics and files are visited in
    /// name order so the failure is deterministic.
    pub fn build_all(&self, git_commit_hash: &str) -> Result<BuildPlan, ParseError> {
        let mut staging = StagingArea::new();
        let mut by_tag: BTreeMap<String, PendingAssessment> = BTreeMap::new();

        for topic in self.repository.topic_dirs()? {
            for path in self.repository.question_paths(&topic)? {
                let content = self.repository.read(&path)?;
                let frontmatter = self.parser.parse(&content, &path)?;
                tracing::debug!(
                    path = %path.display(),
                    question_type = %frontmatter.question_type,
                    "parsed question"
                );

                let staged = staging.stage(path, frontmatter.to_new_assignment());
                for tag in &frontmatter.tags {
                    by_tag
                        .entry(tag.clone())
                        .or_insert_with(|| PendingAssessment::empty(tag))
                        .add_to_section(&topic, AssignmentRef::Staged(staged));
                }
            }
        }

        tracing::info!(
            questions = staging.len(),
            assessments = by_tag.len(),
            "built assessments from repository"
        );

        Ok(BuildPlan {
            git_commit_hash: git_commit_hash.to_string(),
            staging,
            assessments: by_tag.into_values().collect(),
        })
    }
}
