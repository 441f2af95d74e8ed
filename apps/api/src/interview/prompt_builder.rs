//! Prompt Builder: pure functions from session state to prompt text.

use crate::interview::error::EngineError;
use crate::interview::phase::Phase;
use crate::interview::prompts::{REPORT_PROMPT_TEMPLATE, TURN_INSTRUCTIONS, TURN_PROMPT_TEMPLATE};
use crate::interview::session::{SessionState, DEFAULT_POSITION};

/// Number of trailing history entries rendered into a turn prompt.
pub const CONVERSATION_WINDOW: usize = 4;

/// Builds the prompt for one turn. `candidate_input` must be non-empty.
pub fn build_turn_prompt(session: &SessionState, candidate_input: &str) -> String {
    let phase = session.current_phase;
    let spec = phase.spec();

    let instructions = TURN_INSTRUCTIONS
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {line}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    let job_description = session
        .job_description
        .as_deref()
        .map(|jd| format!("\nJob Description: {jd}\n"))
        .unwrap_or_default();

    let phases = Phase::ALL
        .iter()
        .map(|p| format!("\"{p}\""))
        .collect::<Vec<_>>()
        .join(", ");

    let position = session.target_position().unwrap_or(DEFAULT_POSITION);
    let guidance_minutes = spec.guidance_minutes.to_string();
    let conversation = render_conversation(&session.history);

    fill_template(
        TURN_PROMPT_TEMPLATE,
        &[
            ("company_name", session.company_name()),
            ("position", position),
            ("phase", phase.as_str()),
            ("instructions", instructions.as_str()),
            ("phase_directive", spec.directive),
            ("guidance_minutes", guidance_minutes.as_str()),
            ("job_description", job_description.as_str()),
            ("conversation", conversation.as_str()),
            ("phases", phases.as_str()),
            ("candidate_input", candidate_input),
        ],
    )
}

/// Substitutes `{name}` slots in one pass over `template`.
///
/// Inserted values are never rescanned, so braces inside resume fields, history or
/// candidate text reach the prompt verbatim. Braces that do not name a known slot
/// (the JSON shape examples) are kept as-is.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let slot = after
            .find('}')
            .map(|close| &after[..close])
            .and_then(|name| values.iter().find(|(key, _)| *key == name));

        match slot {
            Some((name, value)) => {
                out.push_str(value);
                rest = &after[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Renders the trailing window of history as labelled lines.
///
/// History is stored as (candidate, interviewer) pairs, so labels follow the absolute
/// index: even entries are the candidate, odd entries the interviewer.
pub fn render_conversation(history: &[String]) -> String {
    let start = history.len().saturating_sub(CONVERSATION_WINDOW);
    history[start..]
        .iter()
        .enumerate()
        .map(|(offset, msg)| {
            let speaker = if (start + offset) % 2 == 0 {
                "Candidate"
            } else {
                "Interviewer"
            };
            format!("{speaker}: {msg}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Builds the end-of-interview report prompt from the full session.
pub fn build_report_prompt(session: &SessionState) -> Result<String, EngineError> {
    let scores_json = serde_json::to_string_pretty(&session.scores)
        .map_err(|e| EngineError::MalformedResponse(format!("Failed to serialize scores: {e}")))?;
    let feedback_json = serde_json::to_string_pretty(&session.feedback)
        .map_err(|e| EngineError::MalformedResponse(format!("Failed to serialize feedback: {e}")))?;

    let interactions = session.turn_count().to_string();

    Ok(fill_template(
        REPORT_PROMPT_TEMPLATE,
        &[
            ("position", session.target_position().unwrap_or(DEFAULT_POSITION)),
            ("interactions", interactions.as_str()),
            ("scores_json", scores_json.as_str()),
            ("feedback_json", feedback_json.as_str()),
        ],
    ))
}
