//! `StorageGateway` over one libSQL transaction.

use assay_core::entities::{Assessment, Assignment, NewAssignment, Section};
use assay_core::pending::AssessmentDraft;
use assay_reconcile::{StorageError, StorageGateway};
use chrono::Utc;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_assignment_type, parse_datetime, placeholders};

const ASSESSMENT_COLUMNS: &str = "id, tag, git_commit_hash, latest, created_at";

fn row_to_assessment(row: &libsql::Row) -> Result<Assessment, DatabaseError> {
    Ok(Assessment {
        id: row.get::<i64>(0)?,
        tag: row.get::<String>(1)?,
        git_commit_hash: get_opt_string(row, 2)?,
        latest: row.get::<i64>(3)? != 0,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
        sections: Vec::new(),
    })
}

fn row_to_assignment(row: &libsql::Row) -> Result<Assignment, DatabaseError> {
    Ok(Assignment {
        id: row.get::<i64>(0)?,
        base_file_path: row.get::<String>(1)?,
        assignment_type: parse_assignment_type(&row.get::<String>(2)?)?,
        available_points: row.get::<Option<i64>>(3)?,
        available_seconds: row.get::<Option<i64>>(4)?,
    })
}

/// The unit of work of one run. Dropping it without [`SqlGateway::commit`]
/// rolls every write back.
pub struct SqlGateway {
    tx: libsql::Transaction,
}

impl SqlGateway {
    pub(crate) const fn new(tx: libsql::Transaction) -> Self {
        Self { tx }
    }

    /// Make every write of this run durable.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the commit fails.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        tracing::debug!("committed transaction");
        Ok(())
    }

    /// Discard every write of this run.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the rollback fails.
    pub async fn rollback(self) -> Result<(), DatabaseError> {
        self.tx.rollback().await?;
        tracing::debug!("rolled back transaction");
        Ok(())
    }

    async fn insert_returning_id(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<i64, DatabaseError> {
        let mut rows = self.tx.query(sql, params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<i64>(0)?)
    }

    async fn load_assessments(
        &self,
        filter: &str,
        params: Vec<libsql::Value>,
    ) -> Result<Vec<Assessment>, DatabaseError> {
        let sql =
            format!("SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE {filter} ORDER BY tag, id");
        let mut rows = self
            .tx
            .query(&sql, libsql::params_from_iter(params))
            .await?;
        let mut assessments = Vec::new();
        while let Some(row) = rows.next().await? {
            assessments.push(row_to_assessment(&row)?);
        }
        for assessment in &mut assessments {
            assessment.sections = self.load_sections(assessment.id).await?;
        }
        Ok(assessments)
    }

    async fn load_sections(&self, assessment_id: i64) -> Result<Vec<Section>, DatabaseError> {
        let mut rows = self
            .tx
            .query(
                "SELECT s.id, s.title, sa.assignment_id
                 FROM sections s
                 LEFT JOIN section_assignments sa ON sa.section_id = s.id
                 WHERE s.assessment_id = ?1
                 ORDER BY s.position, sa.position",
                [assessment_id],
            )
            .await?;

        let mut sections: Vec<Section> = Vec::new();
        while let Some(row) = rows.next().await? {
            let section_id = row.get::<i64>(0)?;
            let assignment_id = row.get::<Option<i64>>(2)?;
            if sections.last().is_none_or(|last| last.id != section_id) {
                sections.push(Section {
                    id: section_id,
                    title: row.get::<String>(1)?,
                    assignment_ids: Vec::new(),
                });
            }
            if let (Some(section), Some(assignment_id)) = (sections.last_mut(), assignment_id) {
                section.assignment_ids.push(assignment_id);
            }
        }
        Ok(sections)
    }

    async fn insert_draft(&self, draft: &AssessmentDraft) -> Result<i64, DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let assessment_id = self
            .insert_returning_id(
                "INSERT INTO assessments (tag, git_commit_hash, latest, created_at)
                 VALUES (?1, ?2, 1, ?3) RETURNING id",
                libsql::params![draft.tag.as_str(), draft.git_commit_hash.as_deref(), now],
            )
            .await?;

        for (section_position, section) in draft.sections.iter().enumerate() {
            let section_id = self
                .insert_returning_id(
                    "INSERT INTO sections (assessment_id, title, position)
                     VALUES (?1, ?2, ?3) RETURNING id",
                    libsql::params![assessment_id, section.title.as_str(), position(section_position)?],
                )
                .await?;
            for (assignment_position, assignment_id) in section.assignment_ids.iter().enumerate() {
                self.tx
                    .execute(
                        "INSERT INTO section_assignments (section_id, assignment_id, position)
                         VALUES (?1, ?2, ?3)",
                        libsql::params![section_id, *assignment_id, position(assignment_position)?],
                    )
                    .await?;
            }
        }
        tracing::debug!(tag = %draft.tag, assessment_id, "inserted assessment");
        Ok(assessment_id)
    }
}

fn position(index: usize) -> Result<i64, DatabaseError> {
    i64::try_from(index).map_err(|e| DatabaseError::InvalidState(format!("position {index}: {e}")))
}

impl StorageGateway for SqlGateway {
    async fn latest_assessment(&mut self, tag: &str) -> Result<Option<Assessment>, StorageError> {
        let mut found = self
            .load_assessments("latest = 1 AND tag = ?1", vec![tag.into()])
            .await?;
        Ok(found.pop())
    }

    async fn latest_assessments(&mut self) -> Result<Vec<Assessment>, StorageError> {
        Ok(self.load_assessments("latest = 1", Vec::new()).await?)
    }

    async fn latest_assessments_containing(
        &mut self,
        assignment_ids: &[i64],
    ) -> Result<Vec<Assessment>, StorageError> {
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = format!(
            "latest = 1 AND id IN (
                SELECT s.assessment_id FROM sections s
                JOIN section_assignments sa ON sa.section_id = s.id
                WHERE sa.assignment_id IN ({}))",
            placeholders(assignment_ids.len())
        );
        let params = assignment_ids.iter().map(|id| libsql::Value::Integer(*id)).collect();
        Ok(self.load_assessments(&filter, params).await?)
    }

    async fn assignments_by_ids(&mut self, ids: &[i64]) -> Result<Vec<Assignment>, StorageError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "SELECT id, base_file_path, assignment_type, available_points, available_seconds
             FROM assignments WHERE id IN ({}) ORDER BY id",
            placeholders(ids.len())
        );
        let params: Vec<libsql::Value> = ids.iter().map(|id| libsql::Value::Integer(*id)).collect();
        let mut rows = self
            .tx
            .query(&sql, libsql::params_from_iter(params))
            .await
            .map_err(DatabaseError::from)?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next().await.map_err(DatabaseError::from)? {
            assignments.push(row_to_assignment(&row)?);
        }
        Ok(assignments)
    }

    async fn latest_tags_containing(
        &mut self,
        assignment_id: i64,
    ) -> Result<Vec<String>, StorageError> {
        let mut rows = self
            .tx
            .query(
                "SELECT DISTINCT a.tag
                 FROM assessments a
                 JOIN sections s ON s.assessment_id = a.id
                 JOIN section_assignments sa ON sa.section_id = s.id
                 WHERE a.latest = 1 AND sa.assignment_id = ?1
                 ORDER BY a.tag",
                [assignment_id],
            )
            .await
            .map_err(DatabaseError::from)?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next().await.map_err(DatabaseError::from)? {
            tags.push(row.get::<String>(0).map_err(DatabaseError::from)?);
        }
        Ok(tags)
    }

    async fn persist_assignments(
        &mut self,
        assignments: &[NewAssignment],
    ) -> Result<Vec<i64>, StorageError> {
        let now = Utc::now().to_rfc3339();
        let mut ids = Vec::with_capacity(assignments.len());
        for assignment in assignments {
            let id = self
                .insert_returning_id(
                    "INSERT INTO assignments
                        (base_file_path, assignment_type, available_points, available_seconds, created_at)
                     VALUES (?1, ?2, ?3, ?4, ?5) RETURNING id",
                    libsql::params![
                        assignment.base_file_path.as_str(),
                        assignment.assignment_type.as_str(),
                        assignment.available_points,
                        assignment.available_seconds,
                        now.as_str()
                    ],
                )
                .await?;
            ids.push(id);
        }
        tracing::debug!(count = ids.len(), "inserted assignments");
        Ok(ids)
    }

    async fn merge_assessments(&mut self, assessments: &[Assessment]) -> Result<(), StorageError> {
        for assessment in assessments {
            let updated = self
                .tx
                .execute(
                    "UPDATE assessments SET latest = ?1 WHERE id = ?2",
                    libsql::params![i64::from(assessment.latest), assessment.id],
                )
                .await
                .map_err(DatabaseError::from)?;
            if updated == 0 {
                return Err(DatabaseError::InvalidState(format!(
                    "assessment {} does not exist",
                    assessment.id
                ))
                .into());
            }
        }
        Ok(())
    }

    async fn persist_assessments(
        &mut self,
        drafts: &[AssessmentDraft],
    ) -> Result<Vec<i64>, StorageError> {
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            ids.push(self.insert_draft(draft).await?);
        }
        Ok(ids)
    }

    /// Statements run eagerly inside the transaction; nothing is buffered.
    async fn flush(&mut self) -> Result<(), StorageError> {
        Ok(())
    }

    async fn clear_all(&mut self) -> Result<(), StorageError> {
        self.tx
            .execute_batch(
                "DELETE FROM section_assignments;
                 DELETE FROM sections;
                 DELETE FROM assessments;
                 DELETE FROM assignments;",
            )
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    async fn retag_commit(&mut self, old_hash: &str, new_hash: &str) -> Result<u64, StorageError> {
        let updated = self
            .tx
            .execute(
                "UPDATE assessments SET git_commit_hash = ?2
                 WHERE latest = 1 AND git_commit_hash = ?1",
                libsql::params![old_hash, new_hash],
            )
            .await
            .map_err(DatabaseError::from)?;
        Ok(updated)
    }
}
