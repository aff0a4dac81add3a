use anyhow::Context;
use assay_core::entities::Assessment;
use assay_reconcile::StorageGateway;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Debug, PartialEq, Eq, Serialize)]
struct StatusRow {
    tag: String,
    id: i64,
    commit: Option<String>,
    sections: usize,
    assignments: usize,
    created_at: String,
}

impl From<&Assessment> for StatusRow {
    fn from(assessment: &Assessment) -> Self {
        Self {
            tag: assessment.tag.clone(),
            id: assessment.id,
            commit: assessment.git_commit_hash.clone(),
            sections: assessment.sections.len(),
            assignments: assessment.assignment_ids().count(),
            created_at: assessment.created_at.to_rfc3339(),
        }
    }
}

/// Handle `assay status`.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let db = ctx.open_db().await?;
    let mut gateway = db.begin().await.context("failed to start transaction")?;
    let latest = gateway.latest_assessments().await;
    gateway
        .rollback()
        .await
        .context("failed to close read transaction")?;

    let mut rows = latest
        .context("failed to load latest assessments")?
        .iter()
        .map(StatusRow::from)
        .collect::<Vec<_>>();
    rows.sort_by(|a, b| a.tag.cmp(&b.tag));

    for tag in ctx.parser.tags().tags() {
        if !rows.iter().any(|row| row.tag == tag) {
            tracing::warn!(tag, "configured tag has no latest assessment; run upload --config");
        }
    }

    output(&rows, flags.format)
}

#[cfg(test)]
mod tests {
    use assay_core::entities::Section;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn row_counts_sections_and_assignments() {
        let assessment = Assessment {
            id: 9,
            tag: "backend".to_string(),
            git_commit_hash: Some("abc123".to_string()),
            latest: true,
            created_at: Utc::now(),
            sections: vec![
                Section {
                    id: 1,
                    title: "Databases".to_string(),
                    assignment_ids: vec![42, 43],
                },
                Section {
                    id: 2,
                    title: "Networking".to_string(),
                    assignment_ids: vec![44],
                },
            ],
        };

        let row = StatusRow::from(&assessment);
        assert_eq!(row.tag, "backend");
        assert_eq!(row.commit.as_deref(), Some("abc123"));
        assert_eq!(row.sections, 2);
        assert_eq!(row.assignments, 3);
    }
}
