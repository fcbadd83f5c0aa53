use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::info;

use crate::export::ExportGate;
use crate::profile::autosave::{spawn_autosave, AutosaveHandle, SaveStatus};
use crate::profile::model::Profile;
use crate::profile::repository::ProfileRepository;
use crate::profile::store::ProfileStore;
use crate::render::RenderSurface;
use crate::session::identity::{Identity, SessionKey};
use crate::templates::TemplateId;

pub struct Session {
    pub key: SessionKey,
    pub store: ProfileStore,
    pub surface: RenderSurface,
    pub export_gate: ExportGate,
    autosave: Option<AutosaveHandle>,
    pub opened_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub guest: bool,
    pub revision: u64,
    pub template: TemplateId,
    /// `None` for guest sessions, which are never saved.
    pub save: Option<SaveStatus>,
    pub exporting: bool,
    pub opened_at: DateTime<Utc>,
}

impl Session {
    fn new(key: SessionKey, profile: Profile) -> Self {
        Session {
            key,
            store: ProfileStore::new(profile),
            surface: RenderSurface::default(),
            export_gate: ExportGate::default(),
            autosave: None,
            opened_at: Utc::now(),
        }
    }

    pub fn is_guest(&self) -> bool {
        matches!(self.key, SessionKey::Guest(_))
    }

    pub fn save_status(&self) -> Option<SaveStatus> {
        self.autosave.as_ref().map(AutosaveHandle::status)
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            guest: self.is_guest(),
            revision: self.store.snapshot().revision,
            template: self.surface.template(),
            save: self.save_status(),
            exporting: self.export_gate.is_busy(),
            opened_at: self.opened_at,
        }
    }
}

/// All open sessions, keyed by identity.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<SessionKey, Arc<Session>>>>,
    /// Sessions whose final save is still running. Held locked until it ends.
    closing: Arc<Mutex<HashMap<SessionKey, Arc<Mutex<()>>>>>,
    profiles: Arc<dyn ProfileRepository>,
    autosave_quiet: Duration,
}

impl SessionRegistry {
    pub fn new(profiles: Arc<dyn ProfileRepository>, autosave_quiet: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            closing: Arc::new(Mutex::new(HashMap::new())),
            profiles,
            autosave_quiet,
        }
    }

    pub async fn get(&self, key: &SessionKey) -> Option<Arc<Session>> {
        self.sessions.read().await.get(key).cloned()
    }

    /// Returns the open session for `identity`, opening it on first use.
    ///
    /// A signed-in session is hydrated from the repository, with the
    /// identity's email and display name taking precedence over stored values.
    /// A guest session starts from an empty profile. Reopening a session that
    /// is still closing waits for its final save before hydrating.
    pub async fn get_or_open(&self, identity: &Identity) -> Result<Arc<Session>> {
        if let Some(session) = self.get(&identity.key).await {
            return Ok(session);
        }
        self.wait_for_close(&identity.key).await;

        let session = match identity.user_id() {
            Some(user_id) => {
                let mut profile = self.profiles.load(user_id).await?.unwrap_or_default();
                apply_identity(&mut profile, identity);

                let mut session = Session::new(identity.key.clone(), profile);
                session.autosave = Some(spawn_autosave(
                    user_id.to_string(),
                    session.store.subscribe(),
                    Arc::clone(&self.profiles),
                    self.autosave_quiet,
                ));
                session
            }
            None => Session::new(identity.key.clone(), Profile::default()),
        };

        let mut sessions = self.sessions.write().await;
        // A concurrent request may have opened the same session meanwhile;
        // keep the first one. The loser is dropped before any edit reaches it.
        let session = sessions
            .entry(identity.key.clone())
            .or_insert_with(|| {
                info!("Opened session {}", identity.key);
                Arc::new(session)
            })
            .clone();
        Ok(session)
    }

    /// Closes a session and waits for its pending save to be written. Edits
    /// that land on the session after this are discarded. Returns false when
    /// no session was open.
    pub async fn close(&self, key: &SessionKey) -> bool {
        let gate = Arc::new(Mutex::new(()));
        let held = Arc::clone(&gate).lock_owned().await;

        let session = {
            let mut sessions = self.sessions.write().await;
            let Some(session) = sessions.remove(key) else {
                return false;
            };
            self.closing.lock().await.insert(key.clone(), Arc::clone(&gate));
            session
        };

        if let Some(autosave) = &session.autosave {
            autosave.shutdown().await;
        }

        let mut closing = self.closing.lock().await;
        if closing.get(key).is_some_and(|g| Arc::ptr_eq(g, &gate)) {
            closing.remove(key);
        }
        drop(closing);
        drop(held);

        info!("Closed session {key}");
        true
    }

    async fn wait_for_close(&self, key: &SessionKey) {
        let gate = self.closing.lock().await.get(key).cloned();
        if let Some(gate) = gate {
            drop(gate.lock().await);
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn apply_identity(profile: &mut Profile, identity: &Identity) {
    if let Some(email) = &identity.email {
        profile.basic_info.email = email.clone();
    }
    if let Some(name) = &identity.display_name {
        profile.basic_info.name = name.clone();
    }
}
