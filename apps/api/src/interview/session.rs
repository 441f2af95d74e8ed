//! Session state: everything one interview accumulates across turns.
//!
//! Owned by the caller. The engine mutates it only on a successful turn; a fallback
//! turn leaves it exactly as it was. No internal locking: callers serialize turns
//! per session (the HTTP layer does this with a per-session mutex).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::interview::phase::Phase;
use crate::interview::scoring::Scores;

pub const DEFAULT_COMPANY_NAME: &str = "our company";
pub const DEFAULT_POSITION: &str = "the position";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Parsed resume attributes. Opaque apart from key lookups like `target_position`.
    pub resume_data: Map<String, Value>,
    pub job_description: Option<String>,
    pub company_info: Map<String, Value>,
    /// Alternating candidate / interviewer utterances. Append-only, two entries per turn.
    pub history: Vec<String>,
    pub current_phase: Phase,
    pub scores: Scores,
    pub feedback: Vec<String>,
    pub questions_asked: Vec<String>,
}

impl SessionState {
    /// Starts a session at the introduction phase with zeroed scores. No I/O.
    pub fn start(
        resume_data: Map<String, Value>,
        job_description: Option<String>,
        company_info: Option<Map<String, Value>>,
    ) -> Self {
        Self {
            resume_data,
            job_description: job_description.filter(|jd| !jd.trim().is_empty()),
            company_info: company_info.unwrap_or_default(),
            history: Vec::new(),
            current_phase: Phase::Introduction,
            scores: Scores::default(),
            feedback: Vec::new(),
            questions_asked: Vec::new(),
        }
    }

    pub fn company_name(&self) -> &str {
        string_field(&self.company_info, "name").unwrap_or(DEFAULT_COMPANY_NAME)
    }

    pub fn target_position(&self) -> Option<&str> {
        string_field(&self.resume_data, "target_position")
    }

    /// Completed exchanges so far.
    pub fn turn_count(&self) -> usize {
        self.history.len() / 2
    }

    pub fn is_closing(&self) -> bool {
        self.current_phase.is_terminal()
    }
}

fn string_field<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    map.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
