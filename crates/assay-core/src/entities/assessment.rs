use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted assessment: the question set for one tag at one point in time.
///
/// At most one assessment per tag has `latest = true`. Superseded assessments
/// are never edited apart from clearing that flag.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assessment {
    pub id: i64,
    pub tag: String,
    pub git_commit_hash: Option<String>,
    pub latest: bool,
    pub created_at: DateTime<Utc>,
    pub sections: Vec<Section>,
}

impl Assessment {
    /// Every assignment id referenced by any section, in section order.
    pub fn assignment_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.sections
            .iter()
            .flat_map(|section| section.assignment_ids.iter().copied())
    }

    #[must_use]
    pub fn contains_assignment(&self, id: i64) -> bool {
        self.assignment_ids().any(|candidate| candidate == id)
    }
}

/// A titled group of assignments inside one assessment. The title is the
/// topic directory the questions came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Section {
    pub id: i64,
    pub title: String,
    pub assignment_ids: Vec<i64>,
}
