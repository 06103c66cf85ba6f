//! In-memory session state.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::captcha::StoredPuzzle;

/// Per-browser login state
#[derive(Debug, Clone, Default, Serialize)]
pub struct Session {
    /// Random id carried in the session cookie
    #[serde(skip_serializing)]
    pub id: String,

    /// Passed the user login (or the admin login)
    pub logged_in: bool,

    /// Passed the admin login
    pub is_admin: bool,

    /// Inline editing enabled on the dashboard
    pub admin_mode: bool,

    /// Challenge awaiting its one and only check
    #[serde(skip_serializing)]
    pub pending_puzzle: Option<StoredPuzzle>,

    pub created_at: i64,
    pub last_seen: i64,
}

impl Session {
    fn new(id: String, now: i64) -> Self {
        Self {
            id,
            created_at: now,
            last_seen: now,
            ..Default::default()
        }
    }
}

/// Session tracking service
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    /// Idle lifetime in seconds
    ttl_secs: u64,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl_secs,
        }
    }

    fn is_expired(&self, session: &Session, now: i64) -> bool {
        now - session.last_seen > self.ttl_secs as i64
    }

    /// Start a fresh, anonymous session
    pub async fn create(&self) -> Session {
        let now = chrono::Utc::now().timestamp();
        let session = Session::new(generate_session_id(), now);
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session.clone());

        tracing::debug!("New session started");
        session
    }

    /// Look up a live session and refresh its last-seen time
    pub async fn get(&self, id: &str) -> Option<Session> {
        let now = chrono::Utc::now().timestamp();
        let mut sessions = self.sessions.write().await;

        let expired = self.is_expired(sessions.get(id)?, now);
        if expired {
            sessions.remove(id);
            tracing::debug!("Expired session dropped on access");
            return None;
        }

        let session = sessions.get_mut(id)?;
        session.last_seen = now;
        Some(session.clone())
    }

    /// Existing live session for `id`, or a new one
    pub async fn get_or_create(&self, id: Option<&str>) -> Session {
        if let Some(id) = id {
            if let Some(session) = self.get(id).await {
                return session;
            }
        }
        self.create().await
    }

    /// Mutate a session in place. Returns `None` if it does not exist.
    pub async fn update<T>(&self, id: &str, f: impl FnOnce(&mut Session) -> T) -> Option<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(id)?;
        session.last_seen = chrono::Utc::now().timestamp();
        Some(f(session))
    }

    /// Remove the pending challenge so it can only be checked once
    pub async fn take_puzzle(&self, id: &str) -> Option<StoredPuzzle> {
        self.update(id, |s| s.pending_puzzle.take()).await.flatten()
    }

    pub async fn destroy(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::debug!("Session destroyed");
        }
        removed
    }

    /// Drop every expired session; returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        self.purge_expired_at(chrono::Utc::now().timestamp()).await
    }

    pub async fn purge_expired_at(&self, now: i64) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !self.is_expired(s, now));
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    #[cfg(test)]
    pub(crate) async fn backdate(&self, id: &str, secs: i64) {
        if let Some(session) = self.sessions.write().await.get_mut(id) {
            session.last_seen -= secs;
        }
    }
}

/// Generate a cryptographically random session id
fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::Rng::fill(&mut rand::rng(), &mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Background worker purging expired sessions until shutdown
pub async fn session_sweeper(
    store: Arc<SessionStore>,
    interval_secs: u64,
    mut shutdown: tokio::sync::broadcast::Receiver<()>,
) {
    tracing::info!(interval_secs, "Session sweeper started");

    loop {
        tokio::select! {
            _ = tokio::time::sleep(Duration::from_secs(interval_secs)) => {
                let purged = store.purge_expired().await;
                if purged > 0 {
                    let remaining = store.len().await;
                    tracing::info!(purged, remaining, "Expired sessions purged");
                }
            }
            _ = shutdown.recv() => {
                tracing::info!("Session sweeper shutting down");
                break;
            }
        }
    }
}
