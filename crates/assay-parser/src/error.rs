//! Parse error types for assay-parser.
//!
//! Every variant is attributable to one file or directory and names it.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    /// The file could not be read.
    #[error("{}: cannot read file: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The content did not split into a frontmatter block and a body.
    #[error(
        "{}: invalid question format, expected a frontmatter block and a body separated by '---'",
        path.display()
    )]
    MalformedQuestionFormat { path: PathBuf },

    /// The frontmatter block is not valid YAML or misses required keys.
    #[error("{}: invalid frontmatter: {source}", path.display())]
    InvalidFrontmatter {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The `type` key holds a value that is not a known question type.
    #[error(
        "{}: unknown question type '{value}' (expected one of: multiple-choice, open, coding)",
        path.display()
    )]
    UnknownQuestionType { path: PathBuf, value: String },

    /// A tag is not listed in the repository's tag configuration.
    #[error("{}: tag '{tag}' is not present in the tag configuration", path.display())]
    UnknownTag { path: PathBuf, tag: String },

    /// The file sits at the repository root instead of inside a topic directory.
    #[error("{}: question files must live inside a topic directory", path.display())]
    MissingTopic { path: PathBuf },

    /// A directory could not be listed.
    #[error("{}: cannot scan directory: {source}", dir.display())]
    Walk { dir: PathBuf, source: ignore::Error },

    /// A coding question directory has no markdown descriptor.
    #[error("{}: coding question directory contains no markdown descriptor", dir.display())]
    MissingDescriptorFile { dir: PathBuf },

    /// A coding question directory has more than one markdown file.
    #[error(
        "{}: coding question directory contains {count} markdown files, expected exactly one",
        dir.display()
    )]
    AmbiguousDescriptorFile { dir: PathBuf, count: usize },
}

impl ParseError {
    /// The file or directory the error is attributed to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::MalformedQuestionFormat { path }
            | Self::InvalidFrontmatter { path, .. }
            | Self::UnknownQuestionType { path, .. }
            | Self::UnknownTag { path, .. }
            | Self::MissingTopic { path } => path,
            Self::Walk { dir, .. }
            | Self::MissingDescriptorFile { dir }
            | Self::AmbiguousDescriptorFile { dir, .. } => dir,
        }
    }
}
