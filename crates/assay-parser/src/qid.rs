//! Question ids embedded in file names.
//!
//! A question that has been persisted carries its database id in its file
//! name: `joins_qid42.md`. Fresh questions have no marker until their first
//! upload, after which the file is renamed so later scans recover the id
//! without consulting the database.

use std::path::{Path, PathBuf};

const MARKER: &str = "_qid";

/// Split a file name into (stem without marker, id, extension with dot).
fn split_file_name(file_name: &str) -> (&str, Option<i64>, &str) {
    let (stem, extension) = match file_name.rfind('.') {
        Some(dot) if dot > 0 => file_name.split_at(dot),
        _ => (file_name, ""),
    };
    if let Some(marker) = stem.rfind(MARKER) {
        let digits = &stem[marker + MARKER.len()..];
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(id) = digits.parse::<i64>() {
                return (&stem[..marker], Some(id), extension);
            }
        }
    }
    (stem, None, extension)
}

/// The id embedded in the final component of `path`, if any.
#[must_use]
pub fn extract_id(path: &Path) -> Option<i64> {
    let file_name = path.file_name()?.to_str()?;
    split_file_name(file_name).1
}

/// `path` with any id marker removed from its final component.
#[must_use]
pub fn strip_id_marker(path: &Path) -> PathBuf {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return path.to_path_buf();
    };
    let (stem, id, extension) = split_file_name(file_name);
    if id.is_none() {
        return path.to_path_buf();
    }
    path.with_file_name(format!("{stem}{extension}"))
}

/// `path` with `id` embedded before the extension, replacing any existing marker.
#[must_use]
pub fn inject_id(path: &Path, id: i64) -> PathBuf {
    let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
        return path.to_path_buf();
    };
    let (stem, _, extension) = split_file_name(file_name);
    path.with_file_name(format!("{stem}{MARKER}{id}{extension}"))
}
