use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::info;

use crate::interview::error::EngineError;
use crate::interview::report::{synthesize_report, Report};
use crate::interview::session::SessionState;
use crate::interview::turn::{fallback_turn, run_turn, TurnResult};
use crate::llm_client::GenerationProvider;

/// The interview conversation engine. Stateless apart from its provider handle, so a
/// single instance serves every session concurrently.
#[derive(Clone)]
pub struct InterviewEngine {
    provider: Arc<dyn GenerationProvider>,
}

impl InterviewEngine {
    /// Fails only when the provider is not usable. This is the one error that ever
    /// crosses the engine boundary.
    pub fn new(provider: Arc<dyn GenerationProvider>) -> Result<Self, EngineError> {
        if !provider.is_available() {
            return Err(EngineError::Configuration(
                "generation provider is not initialized".to_string(),
            ));
        }
        info!("Interview engine ready (model: {})", provider.model());
        Ok(Self { provider })
    }

    pub fn start_session(
        &self,
        resume_data: Map<String, Value>,
        job_description: Option<String>,
        company_info: Option<Map<String, Value>>,
    ) -> SessionState {
        SessionState::start(resume_data, job_description, company_info)
    }

    /// Advances `session` by one turn. `candidate_input` must be non-empty.
    pub async fn advance_turn(&self, session: &mut SessionState, candidate_input: &str) -> TurnResult {
        run_turn(self.provider.as_ref(), session, candidate_input).await
    }

    /// Same-shaped result for a turn the caller abandoned (e.g. on timeout).
    pub fn fallback_turn(&self, session: &SessionState) -> TurnResult {
        fallback_turn(session)
    }

    pub async fn finalize_report(&self, session: &SessionState) -> Report {
        synthesize_report(self.provider.as_ref(), session).await
    }

    pub fn is_provider_available(&self) -> bool {
        self.provider.is_available()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }
}
