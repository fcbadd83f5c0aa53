use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::models::profile::ProfileRow;
use crate::profile::model::Profile;

/// Document store for the live profile of each signed-in user.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Returns `None` when the user has never saved a profile.
    async fn load(&self, user_id: &str) -> Result<Option<Profile>>;

    /// Replaces the stored profile document.
    async fn save(&self, user_id: &str, profile: &Profile) -> Result<()>;
}

// ────────────────────────────────────────────────────────────────────────────
// PostgreSQL
// ────────────────────────────────────────────────────────────────────────────

pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn load(&self, user_id: &str) -> Result<Option<Profile>> {
        let row: Option<ProfileRow> =
            sqlx::query_as("SELECT * FROM profiles WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| serde_json::from_value(r.document).map_err(anyhow::Error::from))
            .transpose()
    }

    async fn save(&self, user_id: &str, profile: &Profile) -> Result<()> {
        let document = serde_json::to_value(profile)?;
        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, document, updated_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id)
            DO UPDATE SET document = EXCLUDED.document, updated_at = NOW()
            "#,
        )
        .bind(user_id)
        .bind(&document)
        .execute(&self.pool)
        .await?;

        debug!("Stored profile document for user {user_id}");
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In-memory
// ────────────────────────────────────────────────────────────────────────────

/// Process-local store. Keeps every write so callers can inspect save history.
#[derive(Default)]
pub struct InMemoryProfileRepository {
    documents: Mutex<HashMap<String, Profile>>,
    writes: Mutex<Vec<(String, Profile)>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(user_id: &str, profile: Profile) -> Self {
        let repo = Self::default();
        if let Ok(mut docs) = repo.documents.lock() {
            docs.insert(user_id.to_string(), profile);
        }
        repo
    }

    /// All writes so far, oldest first.
    pub fn writes(&self) -> Vec<(String, Profile)> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn load(&self, user_id: &str) -> Result<Option<Profile>> {
        let docs = self
            .documents
            .lock()
            .map_err(|_| anyhow::anyhow!("profile store lock poisoned"))?;
        Ok(docs.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, profile: &Profile) -> Result<()> {
        self.documents
            .lock()
            .map_err(|_| anyhow::anyhow!("profile store lock poisoned"))?
            .insert(user_id.to_string(), profile.clone());
        self.writes
            .lock()
            .map_err(|_| anyhow::anyhow!("profile store lock poisoned"))?
            .push((user_id.to_string(), profile.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_load_missing_is_none() {
        let repo = InMemoryProfileRepository::new();
        assert!(repo.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_save_then_load() {
        let repo = InMemoryProfileRepository::new();
        let mut profile = Profile::default();
        profile.summary = "Builder of things".to_string();

        repo.save("u1", &profile).await.unwrap();

        assert_eq!(repo.load("u1").await.unwrap(), Some(profile));
        assert_eq!(repo.writes().len(), 1);
    }
}
