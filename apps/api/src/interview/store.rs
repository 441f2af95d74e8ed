//! In-memory session registry.
//!
//! Each session sits behind its own `tokio::sync::Mutex`, which is what serializes
//! turns for that session. The outer map lock is held only for lookup/insert, so
//! independent sessions never wait on each other's provider calls.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::interview::session::SessionState;

#[derive(Debug, Clone, Serialize)]
pub struct InterviewSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub state: SessionState,
}

pub type SessionHandle = Arc<Mutex<InterviewSession>>;

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, state: SessionState) -> InterviewSession {
        let session = InterviewSession {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            state,
        };
        self.sessions
            .write()
            .await
            .insert(session.id, Arc::new(Mutex::new(session.clone())));
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Drops a session. Handles already cloned out (an in-flight turn) stay valid
    /// until they are released.
    pub async fn remove(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.write().await.remove(&id)
    }
}
