//! Test doubles for the generation provider.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;

use crate::interview::session::SessionState;
use crate::llm_client::{GenerationParams, GenerationProvider, LlmError};

/// Replays queued replies in order and records every prompt it was sent.
/// An empty queue answers with `LlmError::EmptyContent`.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    calls: Mutex<Vec<(String, GenerationParams)>>,
    available: bool,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
            available: true,
        }
    }
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push_reply(text);
        self
    }

    pub fn with_error(self, error: LlmError) -> Self {
        self.push_error(error);
        self
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn push_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, GenerationParams)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for ScriptedProvider {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push((prompt.to_string(), *params));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }

    fn is_available(&self) -> bool {
        self.available
    }

    fn model(&self) -> &str {
        "scripted"
    }
}

/// A well-formed turn reply as the provider would send it.
pub fn reply_json<S: Serialize>(response: &str, phase: &str, scores: (S, S, S)) -> String {
    json!({
        "evaluation": "Solid, specific answer",
        "response": response,
        "scores": {
            "communication": scores.0,
            "technical": scores.1,
            "behavioral": scores.2
        },
        "phase": phase,
        "feedback": format!("Feedback before: {response}")
    })
    .to_string()
}

pub fn test_session() -> SessionState {
    let resume = json!({
        "target_position": "Software Engineer",
        "experience": "5 years in Python development"
    });
    let company = json!({"name": "Tech Corp"});
    SessionState::start(
        resume.as_object().cloned().unwrap_or_default(),
        Some("Looking for a senior Python developer with ML experience".to_string()),
        company.as_object().cloned(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_provider_is_available_and_empty() {
        let provider = ScriptedProvider::default();
        assert!(provider.is_available());
        let reply = provider.generate("prompt", &GenerationParams::TURN).await;
        assert!(matches!(reply, Err(LlmError::EmptyContent)));
        assert_eq!(provider.call_count(), 1);
    }
}
