use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct GeneratedResumeRow {
    pub id: Uuid,
    pub user_id: String,
    /// Profile snapshot taken at generation time.
    pub profile: Value,
    pub job_details: Option<Value>,
    pub match_score: Option<i32>,
    /// JSON array of strings.
    pub recommendations: Value,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
