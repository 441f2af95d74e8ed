use thiserror::Error;

use crate::llm_client::LlmError;

/// Failure taxonomy for the interview engine.
///
/// Only `Configuration` ever reaches a caller (from `InterviewEngine::new`). Every
/// per-turn and per-report failure is absorbed into a fallback turn or degraded report.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Generation error: {0}")]
    Generation(#[from] LlmError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<EngineError>,
    },
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::MalformedResponse(e.to_string())
    }
}
