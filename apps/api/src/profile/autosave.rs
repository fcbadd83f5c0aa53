//! Debounced persistence of a session's Profile Store.
//!
//! One task per signed-in session watches the store. The first change opens a
//! quiet window; every further change restarts it. When the window elapses the
//! latest snapshot is written once. Saves run inside the task loop, so two saves
//! can never overlap; edits made during a save are picked up by the next round.
//! When the store is dropped or the handle is shut down (session closed) a
//! pending change is flushed and the task exits.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::profile::repository::ProfileRepository;
use crate::profile::store::ProfileSnapshot;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SaveStatus {
    Idle,
    Saving { revision: u64 },
    Saved { revision: u64, at: DateTime<Utc> },
    Failed { revision: u64, message: String },
}

pub struct AutosaveHandle {
    status: watch::Receiver<SaveStatus>,
    stop: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl AutosaveHandle {
    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    pub fn is_saving(&self) -> bool {
        matches!(*self.status.borrow(), SaveStatus::Saving { .. })
    }

    /// Stops the task after it writes any pending change, and waits for that
    /// final write. Edits made afterwards are not saved.
    pub async fn shutdown(&self) {
        self.stop.send_replace(true);
        self.join_task().await;
    }

    /// Waits for the task to finish its final flush. Only returns once the
    /// owning store has been dropped or `shutdown` was called.
    pub async fn join(self) {
        self.join_task().await;
    }

    async fn join_task(&self) {
        let task = self.task.lock().ok().and_then(|mut t| t.take());
        if let Some(task) = task {
            let _ = task.await;
        }
    }
}

pub fn spawn_autosave(
    user_id: String,
    mut changes: watch::Receiver<ProfileSnapshot>,
    repo: Arc<dyn ProfileRepository>,
    quiet: Duration,
) -> AutosaveHandle {
    let (status_tx, status_rx) = watch::channel(SaveStatus::Idle);
    let (stop_tx, mut stop) = watch::channel(false);

    // Only the snapshot current at spawn time counts as persisted. Marking it
    // inside the task would swallow edits made before the task first runs.
    changes.borrow_and_update();

    let task = tokio::spawn(async move {
        loop {
            // Pending changes take priority over a stop request.
            tokio::select! {
                biased;
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
                _ = stop.changed() => break,
            }

            let closed = loop {
                tokio::select! {
                    biased;
                    changed = changes.changed() => match changed {
                        Ok(()) => continue,
                        Err(_) => break true,
                    },
                    _ = stop.changed() => break true,
                    _ = tokio::time::sleep(quiet) => break false,
                }
            };

            let snapshot = changes.borrow_and_update().clone();
            save_snapshot(&user_id, &snapshot, repo.as_ref(), &status_tx).await;

            if closed {
                break;
            }
        }
    });

    AutosaveHandle {
        status: status_rx,
        stop: stop_tx,
        task: Mutex::new(Some(task)),
    }
}

async fn save_snapshot(
    user_id: &str,
    snapshot: &ProfileSnapshot,
    repo: &dyn ProfileRepository,
    status: &watch::Sender<SaveStatus>,
) {
    let revision = snapshot.revision;
    status.send_replace(SaveStatus::Saving { revision });

    match repo.save(user_id, &snapshot.profile).await {
        Ok(()) => {
            info!("Saved profile revision {revision} for user {user_id}");
            status.send_replace(SaveStatus::Saved {
                revision,
                at: Utc::now(),
            });
        }
        Err(e) => {
            error!("Saving profile revision {revision} for user {user_id} failed: {e:?}");
            status.send_replace(SaveStatus::Failed {
                revision,
                message: "Could not save your changes. Please try again.".to_string(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::model::Profile;
    use crate::profile::repository::InMemoryProfileRepository;
    use crate::profile::store::{ProfileEdit, ProfileStore};
    use async_trait::async_trait;

    const QUIET: Duration = Duration::from_millis(1500);

    fn set_summary(store: &ProfileStore, text: &str) {
        store
            .apply(ProfileEdit::SetSummary {
                summary: text.to_string(),
            })
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_edits_produces_one_write_of_last_state() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let store = ProfileStore::new(Profile::default());
        let handle = spawn_autosave("u1".to_string(), store.subscribe(), repo.clone(), QUIET);

        for i in 1..=5 {
            set_summary(&store, &format!("draft {i}"));
            tokio::time::sleep(Duration::from_millis(400)).await;
        }
        assert!(repo.writes().is_empty(), "no save inside the quiet window");

        tokio::time::sleep(QUIET * 2).await;

        let writes = repo.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "u1");
        assert_eq!(writes[0].1.summary, "draft 5");
        assert!(matches!(handle.status(), SaveStatus::Saved { revision: 5, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_produce_separate_writes() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let store = ProfileStore::new(Profile::default());
        let _handle = spawn_autosave("u1".to_string(), store.subscribe(), repo.clone(), QUIET);

        set_summary(&store, "first");
        tokio::time::sleep(QUIET * 2).await;
        set_summary(&store, "second");
        tokio::time::sleep(QUIET * 2).await;

        let summaries: Vec<_> = repo.writes().into_iter().map(|(_, p)| p.summary).collect();
        assert_eq!(summaries, vec!["first".to_string(), "second".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_edits_means_no_writes() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let store = ProfileStore::new(Profile::default());
        let handle = spawn_autosave("u1".to_string(), store.subscribe(), repo.clone(), QUIET);

        tokio::time::sleep(QUIET * 3).await;

        assert!(repo.writes().is_empty());
        assert_eq!(handle.status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_store_flushes_pending_change() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let store = ProfileStore::new(Profile::default());
        let handle = spawn_autosave("u1".to_string(), store.subscribe(), repo.clone(), QUIET);

        set_summary(&store, "unsaved");
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(store);
        handle.join().await;

        let writes = repo.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1.summary, "unsaved");
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_before_task_runs_is_saved() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let store = ProfileStore::new(Profile::default());
        let handle = spawn_autosave("u1".to_string(), store.subscribe(), repo.clone(), QUIET);
        set_summary(&store, "first keystroke");

        tokio::time::sleep(QUIET * 3).await;

        let writes = repo.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1.summary, "first keystroke");
        assert!(matches!(handle.status(), SaveStatus::Saved { revision: 1, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_flushes_while_store_is_alive() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let store = ProfileStore::new(Profile::default());
        let handle = spawn_autosave("u1".to_string(), store.subscribe(), repo.clone(), QUIET);

        set_summary(&store, "leaving now");
        handle.shutdown().await;

        let writes = repo.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].1.summary, "leaving now");

        set_summary(&store, "after close");
        tokio::time::sleep(QUIET * 2).await;
        assert_eq!(repo.writes().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_without_changes_writes_nothing() {
        let repo = Arc::new(InMemoryProfileRepository::new());
        let store = ProfileStore::new(Profile::default());
        let handle = spawn_autosave("u1".to_string(), store.subscribe(), repo.clone(), QUIET);

        handle.shutdown().await;

        assert!(repo.writes().is_empty());
        assert_eq!(store.snapshot().revision, 0);
    }

    struct FailingRepository;

    #[async_trait]
    impl ProfileRepository for FailingRepository {
        async fn load(&self, _user_id: &str) -> anyhow::Result<Option<Profile>> {
            Ok(None)
        }

        async fn save(&self, _user_id: &str, _profile: &Profile) -> anyhow::Result<()> {
            anyhow::bail!("database unreachable")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_reports_status_and_keeps_store() {
        let store = ProfileStore::new(Profile::default());
        let handle = spawn_autosave(
            "u1".to_string(),
            store.subscribe(),
            Arc::new(FailingRepository),
            QUIET,
        );

        set_summary(&store, "kept locally");
        tokio::time::sleep(QUIET * 2).await;

        assert!(matches!(handle.status(), SaveStatus::Failed { revision: 1, .. }));
        assert_eq!(store.snapshot().profile.summary, "kept locally");
    }
}
