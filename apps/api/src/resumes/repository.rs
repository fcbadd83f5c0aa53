use std::sync::Mutex;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::models::resume::GeneratedResumeRow;
use crate::profile::model::Profile;

// ────────────────────────────────────────────────────────────────────────────
// Record types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    #[default]
    Job,
    Internship,
}

/// The position a resume was generated for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobDetails {
    pub title: String,
    pub company: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: JobType,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: Uuid,
    pub profile: Profile,
    pub job_details: Option<JobDetails>,
    pub match_score: Option<u8>,
    pub recommendations: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewResume {
    pub profile: Profile,
    pub job_details: Option<JobDetails>,
    pub match_score: Option<u8>,
    pub recommendations: Vec<String>,
}

/// Partial update. `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeUpdate {
    pub profile: Option<Profile>,
    pub job_details: Option<JobDetails>,
    pub match_score: Option<u8>,
    pub recommendations: Option<Vec<String>>,
}

impl ResumeUpdate {
    pub fn is_empty(&self) -> bool {
        self.profile.is_none()
            && self.job_details.is_none()
            && self.match_score.is_none()
            && self.recommendations.is_none()
    }

    fn apply_to(self, record: &mut ResumeRecord) {
        if let Some(profile) = self.profile {
            record.profile = profile;
        }
        if let Some(job) = self.job_details {
            record.job_details = Some(job);
        }
        if let Some(score) = self.match_score {
            record.match_score = Some(score.min(100));
        }
        if let Some(recommendations) = self.recommendations {
            record.recommendations = recommendations;
        }
    }
}

impl TryFrom<GeneratedResumeRow> for ResumeRecord {
    type Error = anyhow::Error;

    fn try_from(row: GeneratedResumeRow) -> Result<Self> {
        Ok(ResumeRecord {
            id: row.id,
            profile: serde_json::from_value(row.profile)
                .with_context(|| format!("Malformed profile in resume {}", row.id))?,
            job_details: row
                .job_details
                .map(serde_json::from_value)
                .transpose()
                .with_context(|| format!("Malformed job details in resume {}", row.id))?,
            match_score: row.match_score.map(|s| s.clamp(0, 100) as u8),
            recommendations: serde_json::from_value(row.recommendations).unwrap_or_default(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Generated resumes, keyed by user then resume id. Soft-deleted records are
/// invisible to every read.
#[async_trait]
pub trait ResumeRepository: Send + Sync {
    async fn create(&self, user_id: &str, resume: NewResume) -> Result<ResumeRecord>;

    async fn get(&self, user_id: &str, id: Uuid) -> Result<Option<ResumeRecord>>;

    /// Most recently created record.
    async fn latest(&self, user_id: &str) -> Result<Option<ResumeRecord>>;

    /// Newest first. `None` lists everything.
    async fn list(&self, user_id: &str, limit: Option<u32>) -> Result<Vec<ResumeRecord>>;

    async fn update(
        &self,
        user_id: &str,
        id: Uuid,
        update: ResumeUpdate,
    ) -> Result<Option<ResumeRecord>>;

    /// Returns false when no visible record matched.
    async fn soft_delete(&self, user_id: &str, id: Uuid) -> Result<bool>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgResumeRepository {
    pool: PgPool,
}

impl PgResumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(anyhow::Error::from)
}

#[async_trait]
impl ResumeRepository for PgResumeRepository {
    async fn create(&self, user_id: &str, resume: NewResume) -> Result<ResumeRecord> {
        let row: GeneratedResumeRow = sqlx::query_as(
            r#"
            INSERT INTO generated_resumes
                (id, user_id, profile, job_details, match_score, recommendations,
                 deleted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(to_json(&resume.profile)?)
        .bind(resume.job_details.as_ref().map(to_json).transpose()?)
        .bind(resume.match_score.map(i32::from))
        .bind(to_json(&resume.recommendations)?)
        .fetch_one(&self.pool)
        .await?;

        debug!("Created resume {} for user {user_id}", row.id);
        row.try_into()
    }

    async fn get(&self, user_id: &str, id: Uuid) -> Result<Option<ResumeRecord>> {
        let row: Option<GeneratedResumeRow> = sqlx::query_as(
            "SELECT * FROM generated_resumes WHERE id = $1 AND user_id = $2 AND NOT deleted",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ResumeRecord::try_from).transpose()
    }

    async fn latest(&self, user_id: &str) -> Result<Option<ResumeRecord>> {
        Ok(self.list(user_id, Some(1)).await?.into_iter().next())
    }

    async fn list(&self, user_id: &str, limit: Option<u32>) -> Result<Vec<ResumeRecord>> {
        // LIMIT NULL means no limit in PostgreSQL.
        let rows: Vec<GeneratedResumeRow> = sqlx::query_as(
            r#"
            SELECT * FROM generated_resumes
            WHERE user_id = $1 AND NOT deleted
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit.map(i64::from))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(ResumeRecord::try_from).collect()
    }

    async fn update(
        &self,
        user_id: &str,
        id: Uuid,
        update: ResumeUpdate,
    ) -> Result<Option<ResumeRecord>> {
        let row: Option<GeneratedResumeRow> = sqlx::query_as(
            r#"
            UPDATE generated_resumes SET
                profile = COALESCE($3, profile),
                job_details = COALESCE($4, job_details),
                match_score = COALESCE($5, match_score),
                recommendations = COALESCE($6, recommendations),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND NOT deleted
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(update.profile.as_ref().map(to_json).transpose()?)
        .bind(update.job_details.as_ref().map(to_json).transpose()?)
        .bind(update.match_score.map(|s| i32::from(s.min(100))))
        .bind(update.recommendations.as_ref().map(to_json).transpose()?)
        .fetch_optional(&self.pool)
        .await?;

        row.map(ResumeRecord::try_from).transpose()
    }

    async fn soft_delete(&self, user_id: &str, id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE generated_resumes
            SET deleted = TRUE, deleted_at = NOW(), updated_at = NOW()
            WHERE id = $1 AND user_id = $2 AND NOT deleted
            "#,
        )
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

struct StoredResume {
    user_id: String,
    record: ResumeRecord,
    deleted_at: Option<DateTime<Utc>>,
}

/// Process-local store, insertion ordered.
#[derive(Default)]
pub struct InMemoryResumeRepository {
    rows: Mutex<Vec<StoredResume>>,
}

impl InMemoryResumeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn rows(&self) -> Result<std::sync::MutexGuard<'_, Vec<StoredResume>>> {
        self.rows
            .lock()
            .map_err(|_| anyhow::anyhow!("resume store lock poisoned"))
    }

    /// Includes soft-deleted records.
    pub fn stored_count(&self) -> usize {
        self.rows.lock().map(|r| r.len()).unwrap_or_default()
    }
}

fn visible<'a>(
    rows: &'a mut [StoredResume],
    user_id: &'a str,
) -> impl DoubleEndedIterator<Item = &'a mut StoredResume> {
    rows.iter_mut()
        .filter(move |r| r.user_id == user_id && r.deleted_at.is_none())
}

#[async_trait]
impl ResumeRepository for InMemoryResumeRepository {
    async fn create(&self, user_id: &str, resume: NewResume) -> Result<ResumeRecord> {
        let now = Utc::now();
        let record = ResumeRecord {
            id: Uuid::new_v4(),
            profile: resume.profile,
            job_details: resume.job_details,
            match_score: resume.match_score.map(|s| s.min(100)),
            recommendations: resume.recommendations,
            created_at: now,
            updated_at: now,
        };
        self.rows()?.push(StoredResume {
            user_id: user_id.to_string(),
            record: record.clone(),
            deleted_at: None,
        });
        Ok(record)
    }

    async fn get(&self, user_id: &str, id: Uuid) -> Result<Option<ResumeRecord>> {
        let mut rows = self.rows()?;
        let found = visible(&mut rows, user_id)
            .find(|r| r.record.id == id)
            .map(|r| r.record.clone());
        Ok(found)
    }

    async fn latest(&self, user_id: &str) -> Result<Option<ResumeRecord>> {
        Ok(self.list(user_id, Some(1)).await?.into_iter().next())
    }

    async fn list(&self, user_id: &str, limit: Option<u32>) -> Result<Vec<ResumeRecord>> {
        let mut rows = self.rows()?;
        let newest_first = visible(&mut rows, user_id)
            .rev()
            .map(|r| r.record.clone());
        Ok(match limit {
            Some(n) => newest_first.take(n as usize).collect(),
            None => newest_first.collect(),
        })
    }

    async fn update(
        &self,
        user_id: &str,
        id: Uuid,
        update: ResumeUpdate,
    ) -> Result<Option<ResumeRecord>> {
        let mut rows = self.rows()?;
        let Some(stored) = visible(&mut rows, user_id).find(|r| r.record.id == id) else {
            return Ok(None);
        };
        update.apply_to(&mut stored.record);
        stored.record.updated_at = Utc::now();
        Ok(Some(stored.record.clone()))
    }

    async fn soft_delete(&self, user_id: &str, id: Uuid) -> Result<bool> {
        let mut rows = self.rows()?;
        let deleted = match visible(&mut rows, user_id).find(|r| r.record.id == id) {
            Some(stored) => {
                stored.deleted_at = Some(Utc::now());
                true
            }
            None => false,
        };
        Ok(deleted)
    }
}
