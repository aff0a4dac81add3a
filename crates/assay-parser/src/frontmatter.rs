//! Frontmatter extraction and the typed `Frontmatter` record.

use std::path::{Component, Path, PathBuf};

use assay_core::entities::NewAssignment;
use assay_core::enums::AssignmentType;
use serde::Deserialize;

use crate::error::ParseError;
use crate::qid;

const DELIMITER: &str = "---";

/// Metadata of one question file. Built per parse, never persisted directly:
/// it is the staging form of an assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub question_type: AssignmentType,
    /// Distinct tags in the order the author wrote them.
    pub tags: Vec<String>,
    /// Present only for questions that were persisted before.
    pub id: Option<i64>,
    /// Repository-relative path of the file as parsed.
    pub file_path: PathBuf,
    /// Top-level directory the file lives in; becomes the section title.
    pub topic: String,
    pub available_points: Option<i64>,
    pub available_seconds: Option<i64>,
}

impl Frontmatter {
    /// `file_path` without its id marker.
    #[must_use]
    pub fn base_file_path(&self) -> PathBuf {
        qid::strip_id_marker(&self.file_path)
    }

    /// Map the persisted-relevant attributes onto a fresh assignment.
    #[must_use]
    pub fn to_new_assignment(&self) -> NewAssignment {
        NewAssignment {
            base_file_path: self.base_file_path().to_string_lossy().into_owned(),
            assignment_type: self.question_type,
            available_points: self.available_points,
            available_seconds: self.available_seconds,
        }
    }

    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|own| own == tag)
    }
}

/// Frontmatter as written in the file, before type and tag validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawFrontmatter {
    #[serde(rename = "type")]
    pub question_type: String,
    pub tags: Vec<String>,
    #[serde(default)]
    pub available_points: Option<i64>,
    #[serde(default)]
    pub available_seconds: Option<i64>,
}

impl RawFrontmatter {
    pub(crate) fn from_yaml(yaml: &str, path: &Path) -> Result<Self, ParseError> {
        serde_yaml::from_str(yaml).map_err(|source| ParseError::InvalidFrontmatter {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Tags with duplicates removed, keeping first occurrences.
    pub(crate) fn distinct_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::with_capacity(self.tags.len());
        for tag in &self.tags {
            if !tags.contains(tag) {
                tags.push(tag.clone());
            }
        }
        tags
    }
}

/// Split question content into its frontmatter block and body.
///
/// The content is cut on `---` into at most three pieces and blank pieces are
/// dropped; exactly two must remain. Later `---` lines stay in the body.
pub(crate) fn split(content: &str, path: &Path) -> Result<(String, String), ParseError> {
    let parts: Vec<&str> = content
        .splitn(3, DELIMITER)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    match parts.as_slice() {
        [frontmatter, body] => Ok(((*frontmatter).to_string(), (*body).to_string())),
        _ => Err(ParseError::MalformedQuestionFormat {
            path: path.to_path_buf(),
        }),
    }
}

/// First directory of a repository-relative path.
pub(crate) fn topic_of(path: &Path) -> Result<String, ParseError> {
    let mut normal = path.components().filter_map(|component| match component {
        Component::Normal(part) => Some(part),
        _ => None,
    });
    match (normal.next(), normal.next()) {
        (Some(topic), Some(_)) => Ok(topic.to_string_lossy().into_owned()),
        _ => Err(ParseError::MissingTopic {
            path: path.to_path_buf(),
        }),
    }
}
