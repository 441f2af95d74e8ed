//! Report Synthesizer: one-shot end-of-interview report.
//!
//! Single attempt, no retry loop. Any failure degrades to a report carrying only the
//! error marker, the final scores and a timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::interview::error::EngineError;
use crate::interview::prompt_builder::build_report_prompt;
use crate::interview::scoring::Scores;
use crate::interview::session::SessionState;
use crate::llm_client::{strip_json_fences, GenerationParams, GenerationProvider};

pub const REPORT_ERROR: &str = "Failed to generate report";

/// The five synthesized sections. Provider output, parsed leniently: only
/// `executive_summary` is required, list sections accept a bare string, and
/// `detailed_feedback` keeps whatever JSON the provider chose.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSections {
    pub executive_summary: String,
    #[serde(default, deserialize_with = "string_or_list")]
    pub strengths: Vec<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub areas_for_improvement: Vec<String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub detailed_feedback: Value,
    #[serde(default, deserialize_with = "string_or_list")]
    pub recommendations: Vec<String>,
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        single => vec![single],
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s),
            Value::Null => None,
            other => Some(other.to_string()),
        })
        .collect())
}

/// Final report. A degraded report carries only `error`, `scores` and `timestamp`;
/// `sections`, `position` and `interactions` are set on success only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(flatten)]
    pub sections: Option<ReportSections>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interactions: Option<usize>,
    pub scores: Scores,
    pub timestamp: DateTime<Utc>,
}

impl Report {
    fn degraded(session: &SessionState) -> Self {
        Self {
            sections: None,
            error: Some(REPORT_ERROR.to_string()),
            position: None,
            interactions: None,
            scores: session.scores,
            timestamp: Utc::now(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Produces the final report. Never fails and never mutates the session.
pub async fn synthesize_report(provider: &dyn GenerationProvider, session: &SessionState) -> Report {
    match request_sections(provider, session).await {
        Ok(sections) => {
            info!("Final report generated after {} interactions", session.turn_count());
            Report {
                sections: Some(sections),
                error: None,
                position: session.target_position().map(String::from),
                interactions: Some(session.turn_count()),
                scores: session.scores,
                timestamp: Utc::now(),
            }
        }
        Err(e) => {
            error!("Error generating final report: {e}");
            Report::degraded(session)
        }
    }
}

async fn request_sections(
    provider: &dyn GenerationProvider,
    session: &SessionState,
) -> Result<ReportSections, EngineError> {
    let prompt = build_report_prompt(session)?;
    let text = provider.generate(&prompt, &GenerationParams::REPORT).await?;
    let sections: ReportSections = serde_json::from_str(strip_json_fences(&text))?;
    Ok(sections)
}
