use crate::domain::model::{SessionContext, SessionData};
use crate::domain::ports::SessionStore;
use async_trait::async_trait;
use axum::http::header::COOKIE;
use axum::http::HeaderMap;
use chrono::{Local, TimeDelta};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "contact_session";

/// Process-local session storage keyed by session id.
#[derive(Clone)]
pub struct InMemorySessionStore {
    sessions: Arc<Mutex<HashMap<String, SessionData>>>,
    ttl: TimeDelta,
}

impl InMemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl: TimeDelta::seconds(ttl_secs as i64),
        }
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: &str) -> Option<SessionData> {
        self.sessions.lock().await.get(id).cloned()
    }

    async fn save(&self, id: &str, data: SessionData) {
        let mut sessions = self.sessions.lock().await;
        let cutoff = Local::now() - self.ttl;
        // 順便清掉閒置過久的 session
        sessions.retain(|_, session| match session.last_submission {
            Some(at) => at >= cutoff,
            None => false,
        });
        sessions.insert(id.to_string(), data);
    }
}

/// Per-session request locks. Holding one across load, handle and save keeps
/// concurrent requests of one session from both passing the rate limit.
#[derive(Clone, Default)]
pub struct SessionLocks {
    locks: Arc<std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

/// Held for the lifetime of one request on a session.
pub struct SessionLease {
    id: String,
    guard: Option<OwnedMutexGuard<()>>,
    owner: SessionLocks,
}

impl SessionLocks {
    pub async fn acquire(&self, id: &str) -> SessionLease {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(id.to_string()).or_default().clone()
        };
        SessionLease {
            id: id.to_string(),
            guard: Some(lock.lock_owned().await),
            owner: self.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for SessionLease {
    fn drop(&mut self) {
        let mut locks = self.owner.locks.lock().unwrap_or_else(PoisonError::into_inner);
        self.guard.take();
        // 沒有其他請求在等就移除，避免表無限成長
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}

/// Extracts the session id from the request's `Cookie` headers.
pub fn session_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| Uuid::parse_str(value).is_ok())
}

/// Resumes a known session or starts a fresh one.
pub async fn open_session(store: &dyn SessionStore, presented: Option<String>) -> SessionContext {
    if let Some(id) = presented {
        if let Some(data) = store.load(&id).await {
            return SessionContext::resumed(id, data);
        }
    }
    SessionContext::new(Uuid::new_v4().to_string())
}

/// Persists the session if the handler changed it.
pub async fn commit_session(store: &dyn SessionStore, session: &SessionContext) {
    if session.dirty {
        store.save(&session.id, session.data.clone()).await;
    }
}

pub fn session_cookie(session: &SessionContext) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, session.id
    )
}
