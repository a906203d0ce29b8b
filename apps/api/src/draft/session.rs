//! Editing sessions: one per open editor, each owning its draft, its
//! reconciliation latch and its submission latch. Sessions end on a
//! successful submit, an explicit cancel, or after sitting idle past the
//! configured TTL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::draft::lifecycle::{LifecycleController, SubmitTarget};
use crate::draft::reconcile::{DraftSource, DraftSources, DraftState};
use crate::models::resume::ResumeDraft;

pub struct EditingSession {
    pub id: Uuid,
    pub target: SubmitTarget,
    pub opened_at: DateTime<Utc>,
    pub state: Mutex<DraftState>,
    pub lifecycle: LifecycleController,
}

impl EditingSession {
    /// Opens a session and runs reconciliation once.
    pub fn open(space_id: String, sources: &DraftSources) -> (Self, DraftSource) {
        let mut state = DraftState::default();
        let source = state
            .reconcile(sources)
            .unwrap_or(DraftSource::Blank);

        let session = Self {
            id: Uuid::new_v4(),
            target: SubmitTarget {
                space_id,
                document_id: sources.document_id.clone(),
            },
            opened_at: Utc::now(),
            state: Mutex::new(state),
            lifecycle: LifecycleController::default(),
        };
        (session, source)
    }

    pub fn is_edit_mode(&self) -> bool {
        self.target.document_id.is_some()
    }

    pub async fn snapshot(&self) -> ResumeDraft {
        self.state.lock().await.draft.clone()
    }
}

struct RegistryEntry {
    session: Arc<EditingSession>,
    last_seen: Instant,
}

/// In-memory registry of live sessions.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, RegistryEntry>>>,
}

impl SessionRegistry {
    pub async fn insert(&self, session: EditingSession) -> Arc<EditingSession> {
        let session = Arc::new(session);
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            session.id,
            RegistryEntry {
                session: session.clone(),
                last_seen: Instant::now(),
            },
        );
        info!(
            "Opened editing session {} for space {} ({} live)",
            session.id,
            session.target.space_id,
            sessions.len()
        );
        session
    }

    /// Looks up a live session and marks it as active.
    pub async fn get(&self, id: Uuid) -> Option<Arc<EditingSession>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(entry.session.clone())
    }

    /// Ends a session. Returns the removed session, if it was live.
    pub async fn close(&self, id: Uuid) -> Option<Arc<EditingSession>> {
        let removed = self.sessions.write().await.remove(&id).map(|e| e.session);
        if removed.is_some() {
            info!("Closed editing session {id}");
        }
        removed
    }

    /// Drops every session idle for at least `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) < ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!("Evicted {evicted} idle editing sessions ({} live)", sessions.len());
        }
        evicted
    }

    /// Runs `evict_idle` every `every` until the runtime shuts down.
    pub fn spawn_sweeper(&self, ttl: Duration, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(ttl).await;
                debug!("Session sweep done, {evicted} evicted");
            }
        })
    }
}
