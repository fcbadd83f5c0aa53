use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::FromRow;

/// One live profile document per signed-in user.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: String,
    pub document: Value,
    pub updated_at: DateTime<Utc>,
}
