use serde::{Deserialize, Serialize};

use crate::enums::AssignmentType;

/// A persisted question.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub id: i64,
    pub base_file_path: String,
    pub assignment_type: AssignmentType,
    pub available_points: Option<i64>,
    pub available_seconds: Option<i64>,
}

impl Assignment {
    /// Whether any attribute stored in the database differs from `candidate`.
    ///
    /// Only type and scoring parameters count; the file path is not compared.
    #[must_use]
    pub fn persisted_attributes_differ(&self, candidate: &NewAssignment) -> bool {
        self.assignment_type != candidate.assignment_type
            || self.available_points != candidate.available_points
            || self.available_seconds != candidate.available_seconds
    }
}

/// An assignment that has not been saved yet and therefore has no id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewAssignment {
    pub base_file_path: String,
    pub assignment_type: AssignmentType,
    pub available_points: Option<i64>,
    pub available_seconds: Option<i64>,
}

impl NewAssignment {
    /// Attach the id storage assigned on insert.
    #[must_use]
    pub fn into_persisted(self, id: i64) -> Assignment {
        Assignment {
            id,
            base_file_path: self.base_file_path,
            assignment_type: self.assignment_type,
            available_points: self.available_points,
            available_seconds: self.available_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> Assignment {
        Assignment {
            id: 7,
            base_file_path: "Databases/joins.md".into(),
            assignment_type: AssignmentType::Open,
            available_points: Some(2),
            available_seconds: None,
        }
    }

    #[test]
    fn identical_attributes_do_not_differ() {
        let candidate = NewAssignment {
            base_file_path: "Databases/renamed.md".into(),
            assignment_type: AssignmentType::Open,
            available_points: Some(2),
            available_seconds: None,
        };
        assert!(!stored().persisted_attributes_differ(&candidate));
    }

    #[test]
    fn changed_scoring_differs() {
        let candidate = NewAssignment {
            base_file_path: "Databases/joins.md".into(),
            assignment_type: AssignmentType::Open,
            available_points: Some(2),
            available_seconds: Some(600),
        };
        assert!(stored().persisted_attributes_differ(&candidate));
    }

    #[test]
    fn changed_type_differs() {
        let candidate = NewAssignment {
            base_file_path: "Databases/joins.md".into(),
            assignment_type: AssignmentType::MultipleChoice,
            available_points: Some(2),
            available_seconds: None,
        };
        assert!(stored().persisted_attributes_differ(&candidate));
    }
}
