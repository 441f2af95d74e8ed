use crate::config::Config;
use crate::interview::engine::InterviewEngine;
use crate::interview::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub engine: InterviewEngine,
    /// Live interview sessions, each behind its own lock so turns are serialized per session.
    pub sessions: SessionStore,
    pub config: Config,
}
