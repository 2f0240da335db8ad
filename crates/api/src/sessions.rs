//! In-memory store of wizard sessions.
//!
//! Sessions live only as long as the process. Each one wraps a
//! [`FormController`] plus bookkeeping timestamps. Idle sessions are
//! evicted after a configurable TTL and the total number held is capped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::Serialize;
use tokio::sync::RwLock;

use invitewiz_core::error::CoreError;
use invitewiz_core::types::{SessionId, Timestamp};
use invitewiz_core::wizard::{FormController, SubmissionState};

/// Default idle time before a session is evicted (2 hours).
pub const DEFAULT_SESSION_IDLE_TTL_SECS: u64 = 2 * 60 * 60;

/// Default maximum number of sessions held at once.
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;

/// How often the background sweeper looks for idle sessions.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// One customer's pass through the order wizard.
#[derive(Debug, Clone, Serialize)]
pub struct OrderSession {
    pub id: SessionId,
    pub controller: FormController,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl OrderSession {
    /// Idle past `ttl` at `now`. A session mid-submission never counts as idle.
    fn is_expired(&self, now: Timestamp, ttl: chrono::Duration) -> bool {
        self.controller.submission != SubmissionState::Submitting && now - self.updated_at >= ttl
    }
}

/// Manages all active wizard sessions.
///
/// Thread-safe via interior `RwLock`; wrap in `Arc` to share.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, OrderSession>>,
    idle_ttl: chrono::Duration,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(idle_ttl: Duration, max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            idle_ttl: chrono::Duration::from_std(idle_ttl)
                .unwrap_or_else(|_| chrono::Duration::weeks(52 * 100)),
            max_sessions,
        }
    }

    /// Start a new session with an empty form.
    ///
    /// Idle sessions are evicted first. Returns `None` when the store is
    /// still full afterwards.
    pub async fn create(&self) -> Option<OrderSession> {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        if sessions.len() >= self.max_sessions {
            let ttl = self.idle_ttl;
            sessions.retain(|_, s| !s.is_expired(now, ttl));
            if sessions.len() >= self.max_sessions {
                tracing::warn!(max_sessions = self.max_sessions, "Order session limit reached");
                return None;
            }
        }

        let session = OrderSession {
            id: SessionId::new_v4(),
            controller: FormController::new(),
            created_at: now,
            updated_at: now,
        };
        sessions.insert(session.id, session.clone());
        Some(session)
    }

    /// Snapshot of a session.
    pub async fn get(&self, id: SessionId) -> Result<OrderSession, CoreError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    /// Apply `f` to a session's controller under the write lock.
    ///
    /// The session is only touched (and `updated_at` bumped) when `f`
    /// succeeds; on error the controller is restored as it was.
    pub async fn update<T>(
        &self,
        id: SessionId,
        f: impl FnOnce(&mut FormController) -> Result<T, CoreError>,
    ) -> Result<(T, OrderSession), CoreError> {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;

        let mut controller = session.controller.clone();
        let value = f(&mut controller)?;
        session.controller = controller;
        session.updated_at = Utc::now();
        Ok((value, session.clone()))
    }

    /// Drop every session idle for longer than the TTL as of `now`.
    ///
    /// Returns the number of sessions removed.
    pub async fn evict_idle(&self, now: Timestamp) -> usize {
        let ttl = self.idle_ttl;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(now, ttl));
        before - sessions.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(
            Duration::from_secs(DEFAULT_SESSION_IDLE_TTL_SECS),
            DEFAULT_MAX_SESSIONS,
        )
    }
}

fn not_found(id: SessionId) -> CoreError {
    CoreError::NotFound {
        entity: "OrderSession",
        id: id.to_string(),
    }
}

/// Spawn a background task that evicts idle sessions every `every`.
///
/// Runs until aborted through the returned handle.
pub fn start_session_sweeper(
    store: Arc<SessionStore>,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let evicted = store.evict_idle(Utc::now()).await;
            if evicted > 0 {
                let remaining = store.session_count().await;
                tracing::info!(evicted, remaining, "Evicted idle order sessions");
            }
        }
    })
}
