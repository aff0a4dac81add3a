//! Enums shared by the parser, the reconciler, and storage.
//!
//! All enums use kebab-case serialization, matching the values question
//! authors write in frontmatter (`type: multiple-choice`).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// AssignmentType
// ---------------------------------------------------------------------------

/// Kind of question an assignment holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignmentType {
    MultipleChoice,
    Open,
    Coding,
}

impl AssignmentType {
    pub const ALL: [Self; 3] = [Self::MultipleChoice, Self::Open, Self::Coding];

    /// Return the string representation used in frontmatter and SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MultipleChoice => "multiple-choice",
            Self::Open => "open",
            Self::Coding => "coding",
        }
    }

    /// Parse the frontmatter/storage representation.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownAssignmentType` carrying the rejected string.
    /// There is no fallback variant.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::ALL
            .into_iter()
            .find(|candidate| candidate.as_str() == value)
            .ok_or_else(|| CoreError::UnknownAssignmentType(value.to_string()))
    }
}

impl fmt::Display for AssignmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("multiple-choice", AssignmentType::MultipleChoice)]
    #[case("open", AssignmentType::Open)]
    #[case("coding", AssignmentType::Coding)]
    fn parses_known_types(#[case] raw: &str, #[case] expected: AssignmentType) {
        assert_eq!(AssignmentType::parse(raw).unwrap(), expected);
        assert_eq!(expected.as_str(), raw);
    }

    #[rstest]
    #[case("unknown-type")]
    #[case("MULTIPLE_CHOICE")]
    #[case("")]
    fn rejects_unknown_types(#[case] raw: &str) {
        let err = AssignmentType::parse(raw).unwrap_err();
        assert!(
            err.to_string().contains(&format!("'{raw}'")),
            "error should name the rejected value: {err}"
        );
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&AssignmentType::MultipleChoice).unwrap();
        assert_eq!(json, "\"multiple-choice\"");
    }
}
