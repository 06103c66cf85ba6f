//! Application state and shared resources.

use std::sync::Arc;
use std::time::Instant;

use axum::http::HeaderMap;
use tokio::sync::RwLock;

use crate::captcha::{PuzzleGenerator, PuzzleVerifier};
use crate::config::AppConfig;
use crate::ledger::LedgerStore;
use crate::session::{Session, SessionStore, session_id_from_headers};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// The ledger. One lock for all four collections, so a compound
    /// rebalance-then-merge never interleaves with another writer.
    pub ledger: Arc<RwLock<LedgerStore>>,

    /// Browser sessions
    pub sessions: Arc<SessionStore>,

    /// CAPTCHA generator
    pub puzzle_generator: Arc<PuzzleGenerator>,

    /// CAPTCHA verifier
    pub puzzle_verifier: Arc<PuzzleVerifier>,

    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: AppConfig, ledger: LedgerStore) -> Self {
        let sessions = Arc::new(SessionStore::new(config.session.ttl_secs));
        let puzzle_generator = Arc::new(PuzzleGenerator::new(config.session.challenge_ttl_secs));

        Self {
            config,
            ledger: Arc::new(RwLock::new(ledger)),
            sessions,
            puzzle_generator,
            puzzle_verifier: Arc::new(PuzzleVerifier::new()),
            started_at: Instant::now(),
        }
    }

    /// Session id from the request's cookie, if any
    pub fn session_id(&self, headers: &HeaderMap) -> Option<String> {
        session_id_from_headers(headers, &self.config.session.cookie_name)
    }

    /// The caller's live session, if any
    pub async fn current_session(&self, headers: &HeaderMap) -> Option<Session> {
        let id = self.session_id(headers)?;
        self.sessions.get(&id).await
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
