//! Row parsing helpers.
//!
//! Rows are column-indexed `libsql::Row`s. `created_at` columns hold either
//! RFC 3339 strings written by assay or `SQLite`'s `datetime('now')` format.

use assay_core::enums::AssignmentType;
use chrono::{DateTime, Utc};

use crate::error::DatabaseError;

/// Parse a required TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `DatabaseError::Query` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::Query(format!("Failed to parse datetime '{s}': {e}")))
}

/// Parse the `assignment_type` column.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for values outside the known types.
pub fn parse_assignment_type(s: &str) -> Result<AssignmentType, DatabaseError> {
    AssignmentType::parse(s).map_err(|e| DatabaseError::InvalidState(e.to_string()))
}

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// # Errors
///
/// Returns `DatabaseError` if the column read fails.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get::<Option<String>>(idx)? {
        Some(s) if s.is_empty() => Ok(None),
        other => Ok(other),
    }
}

/// `?1, ?2, ... ?n` for an `IN (...)` list.
#[must_use]
pub fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|idx| format!("?{idx}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_datetime_rfc3339() {
        let dt = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-02-09T14:30:00+00:00");
    }

    #[test]
    fn parse_datetime_sqlite_format() {
        let dt = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-02-09T14:30:00+00:00");
    }

    #[test]
    fn parse_datetime_invalid() {
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn unknown_assignment_type_is_invalid_state() {
        assert!(matches!(
            parse_assignment_type("essay"),
            Err(DatabaseError::InvalidState(_))
        ));
        assert_eq!(parse_assignment_type("coding").unwrap(), AssignmentType::Coding);
    }

    #[test]
    fn placeholders_are_numbered() {
        assert_eq!(placeholders(3), "?1, ?2, ?3");
        assert_eq!(placeholders(0), "");
    }
}
