//! Filesystem access to the question repository.
//!
//! Layout:
//!
//! ```text
//! <root>/
//!   config.yaml                 tag configuration
//!   Databases/                  topic
//!     joins_qid42.md            question file
//!   Python/
//!     palindrome/               coding question
//!       palindrome.md           its single descriptor
//!       solution.py
//! ```
//!
//! All paths handed out are relative to the repository root.

use std::fs;
use std::path::{Path, PathBuf};

use ignore::{DirEntry, WalkBuilder};

use crate::error::ParseError;
use crate::qid;

/// Whether `path` names a markdown file.
#[must_use]
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("md"))
}

#[derive(Debug, Clone)]
pub struct QuestionRepository {
    root: PathBuf,
    ignored_dirs: Vec<String>,
}

impl QuestionRepository {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, ignored_dirs: Vec<String>) -> Self {
        Self {
            root: root.into(),
            ignored_dirs,
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `path` relative to the repository root. Paths outside the root are
    /// returned unchanged.
    #[must_use]
    pub fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }

    #[must_use]
    pub fn absolute(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    /// Read a question file.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` naming the relative path.
    pub fn read(&self, relative: &Path) -> Result<String, ParseError> {
        fs::read_to_string(self.absolute(relative)).map_err(|source| ParseError::Io {
            path: relative.to_path_buf(),
            source,
        })
    }

    /// Topic directory names, sorted. Hidden and ignored directories are skipped.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Walk` if the root cannot be listed.
    pub fn topic_dirs(&self) -> Result<Vec<String>, ParseError> {
        Ok(children(&self.root)?
            .into_iter()
            .filter(is_dir)
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .filter(|name| !self.ignored_dirs.iter().any(|ignored| ignored == name))
            .collect())
    }

    /// Every question in `topic`: its markdown files plus the descriptor of
    /// each coding question directory, in file name order.
    ///
    /// # Errors
    ///
    /// Returns `MissingDescriptorFile` or `AmbiguousDescriptorFile` for a
    /// coding directory without exactly one markdown file, and `Walk` when a
    /// directory cannot be listed.
    pub fn question_paths(&self, topic: &str) -> Result<Vec<PathBuf>, ParseError> {
        let mut paths = Vec::new();
        for entry in children(&self.root.join(topic))? {
            if is_dir(&entry) {
                paths.push(self.descriptor(entry.path())?);
            } else if is_markdown(entry.path()) {
                paths.push(self.relative(entry.path()));
            }
        }
        Ok(paths)
    }

    fn descriptor(&self, dir: &Path) -> Result<PathBuf, ParseError> {
        let markdown: Vec<DirEntry> = children(dir)?
            .into_iter()
            .filter(|entry| !is_dir(entry) && is_markdown(entry.path()))
            .collect();
        match markdown.as_slice() {
            [single] => Ok(self.relative(single.path())),
            [] => Err(ParseError::MissingDescriptorFile {
                dir: self.relative(dir),
            }),
            many => Err(ParseError::AmbiguousDescriptorFile {
                dir: self.relative(dir),
                count: many.len(),
            }),
        }
    }

    /// Rename the file at `relative` so its name carries `id`. Returns the new
    /// relative path; a file that already carries `id` is left alone.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the rename fails.
    pub fn embed_id(&self, relative: &Path, id: i64) -> Result<PathBuf, ParseError> {
        let renamed = qid::inject_id(relative, id);
        if renamed == relative {
            return Ok(renamed);
        }
        fs::rename(self.absolute(relative), self.absolute(&renamed)).map_err(|source| {
            ParseError::Io {
                path: relative.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!(from = %relative.display(), to = %renamed.display(), "embedded question id");
        Ok(renamed)
    }
}

fn is_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|file_type| file_type.is_dir())
}

/// Direct, non-hidden children of `dir` sorted by file name.
fn children(dir: &Path) -> Result<Vec<DirEntry>, ParseError> {
    let mut builder = WalkBuilder::new(dir);
    builder
        .standard_filters(false)
        .hidden(true)
        .max_depth(Some(1))
        .sort_by_file_name(|a, b| a.cmp(b));

    let mut entries = Vec::new();
    for entry in builder.build() {
        let entry = entry.map_err(|source| ParseError::Walk {
            dir: dir.to_path_buf(),
            source,
        })?;
        if entry.depth() > 0 {
            entries.push(entry);
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_extension_is_case_insensitive() {
        assert!(is_markdown(Path::new("Db/a.md")));
        assert!(is_markdown(Path::new("Db/a.MD")));
        assert!(!is_markdown(Path::new("Db/a.py")));
        assert!(!is_markdown(Path::new("Db/md")));
    }

    #[test]
    fn relative_strips_root() {
        let repository = QuestionRepository::new("/repo", Vec::new());
        assert_eq!(
            repository.relative(Path::new("/repo/Db/a.md")),
            PathBuf::from("Db/a.md")
        );
        assert_eq!(
            repository.relative(Path::new("Db/a.md")),
            PathBuf::from("Db/a.md")
        );
    }
}
