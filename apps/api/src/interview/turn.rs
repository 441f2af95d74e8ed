//! Turn Protocol: drives one candidate utterance to an interviewer reply.
//!
//! Flow: build prompt → provider.generate → parse + validate → commit to session.
//! Any failure (provider error or unparseable reply) is retried up to
//! `MAX_TURN_ATTEMPTS` times with a fixed non-blocking delay. If every attempt fails
//! the caller gets the fallback turn and the session is left untouched.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::interview::error::EngineError;
use crate::interview::phase::Phase;
use crate::interview::prompt_builder::build_turn_prompt;
use crate::interview::questions::extract_questions;
use crate::interview::scoring::{RawScores, ReportedScores, Scores};
use crate::interview::session::SessionState;
use crate::llm_client::{strip_json_fences, GenerationParams, GenerationProvider};

pub const MAX_TURN_ATTEMPTS: u32 = 3;
pub const RETRY_DELAY: Duration = Duration::from_secs(2);

pub const FALLBACK_EVALUATION: &str = "Error in processing response";
pub const FALLBACK_RESPONSE: &str =
    "I apologize, but I'm having trouble processing that. Could you please repeat your answer?";
pub const FALLBACK_FEEDBACK: &str = "Technical difficulty in processing response";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// What a caller gets back from every turn, successful or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    /// Internal assessment of the candidate's answer. Not for the candidate.
    pub evaluation: String,
    /// The interviewer's next utterance, shown to the candidate.
    pub response: String,
    pub scores: Scores,
    pub phase: Phase,
    pub feedback: String,
}

/// Reply shape requested from the provider. Everything in here is untrusted.
#[derive(Debug, Deserialize)]
struct RawTurnReply {
    #[serde(default)]
    evaluation: String,
    response: String,
    scores: RawScores,
    phase: String,
    feedback: String,
}

/// A provider reply that passed validation and is safe to commit.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTurn {
    pub evaluation: String,
    pub response: String,
    pub scores: ReportedScores,
    /// `None` when the provider named a phase outside the fixed set.
    pub phase: Option<Phase>,
    pub raw_phase: String,
    pub feedback: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Parsing
// ────────────────────────────────────────────────────────────────────────────

/// Parses and validates one provider reply.
///
/// An unknown phase does not fail the parse; it comes back as `phase: None` and the
/// session holds its current phase.
pub fn parse_turn_reply(text: &str) -> Result<ParsedTurn, EngineError> {
    let raw: RawTurnReply = serde_json::from_str(strip_json_fences(text))?;

    if raw.response.trim().is_empty() {
        return Err(EngineError::MalformedResponse(
            "reply has an empty 'response'".to_string(),
        ));
    }

    let scores = ReportedScores::try_from(raw.scores)?;

    Ok(ParsedTurn {
        evaluation: raw.evaluation,
        response: raw.response,
        scores,
        phase: raw.phase.parse::<Phase>().ok(),
        raw_phase: raw.phase,
        feedback: raw.feedback,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Turn execution
// ────────────────────────────────────────────────────────────────────────────

/// Runs one turn against `session`. Never fails: exhausted retries yield the fallback.
pub async fn run_turn(
    provider: &dyn GenerationProvider,
    session: &mut SessionState,
    candidate_input: &str,
) -> TurnResult {
    match generate_with_retry(provider, session, candidate_input).await {
        Ok(parsed) => commit_turn(session, candidate_input, parsed),
        Err(e) => {
            error!("Turn failed, returning fallback response: {e}");
            fallback_turn(session)
        }
    }
}

/// Calls the provider until a reply validates or the attempt budget runs out.
///
/// The delay is `tokio::time::sleep`, so dropping the returned future cancels the
/// wait along with any in-flight provider call.
async fn generate_with_retry(
    provider: &dyn GenerationProvider,
    session: &SessionState,
    candidate_input: &str,
) -> Result<ParsedTurn, EngineError> {
    let prompt = build_turn_prompt(session, candidate_input);

    let mut attempt = 1;
    loop {
        let outcome = match provider.generate(&prompt, &GenerationParams::TURN).await {
            Ok(text) => parse_turn_reply(&text),
            Err(e) => Err(EngineError::Generation(e)),
        };

        match outcome {
            Ok(parsed) => return Ok(parsed),
            Err(e) if attempt >= MAX_TURN_ATTEMPTS => {
                return Err(EngineError::RetriesExhausted {
                    attempts: attempt,
                    last: Box::new(e),
                });
            }
            Err(e) => {
                warn!(
                    "Turn attempt {}/{} failed, retrying after {}ms: {e}",
                    attempt,
                    MAX_TURN_ATTEMPTS,
                    RETRY_DELAY.as_millis()
                );
                tokio::time::sleep(RETRY_DELAY).await;
                attempt += 1;
            }
        }
    }
}

/// Applies a validated reply to the session and builds the caller-facing result.
fn commit_turn(session: &mut SessionState, candidate_input: &str, parsed: ParsedTurn) -> TurnResult {
    let phase = match parsed.phase {
        Some(phase) => phase,
        None => {
            warn!(
                "Provider reported unknown phase {:?}; holding {}",
                parsed.raw_phase, session.current_phase
            );
            session.current_phase
        }
    };

    if phase != session.current_phase {
        info!("Interview phase {} -> {}", session.current_phase, phase);
    }

    session
        .history
        .extend([candidate_input.to_string(), parsed.response.clone()]);
    session.current_phase = phase;
    session.feedback.push(parsed.feedback.clone());
    session.scores.fold(&parsed.scores);
    session
        .questions_asked
        .extend(extract_questions(&parsed.response));

    TurnResult {
        evaluation: parsed.evaluation,
        response: parsed.response,
        scores: parsed.scores.as_scores(),
        phase,
        feedback: parsed.feedback,
    }
}

/// The canned, state-preserving result for a turn that could not be completed.
pub fn fallback_turn(session: &SessionState) -> TurnResult {
    TurnResult {
        evaluation: FALLBACK_EVALUATION.to_string(),
        response: FALLBACK_RESPONSE.to_string(),
        scores: session.scores,
        phase: session.current_phase,
        feedback: FALLBACK_FEEDBACK.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interview::testing::{reply_json, test_session, ScriptedProvider};
    use crate::llm_client::LlmError;

    #[test]
    fn test_parse_accepts_string_scores_and_fences() {
        let text = format!("```json\n{}\n```", reply_json("Tell me more?", "background", ("70", "60", "50")));
        let parsed = parse_turn_reply(&text).unwrap();
        assert_eq!(parsed.phase, Some(Phase::Background));
        assert_eq!(parsed.scores.communication, 70.0);
    }

    #[test]
    fn test_parse_rejects_prose() {
        let err = parse_turn_reply("Sure! Here's my next question: ...").unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        let err = parse_turn_reply(r#"{"response": "Hi", "phase": "introduction"}"#).unwrap_err();
        assert!(matches!(err, EngineError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_rejects_placeholder_scores() {
        let text = reply_json("Next?", "technical", ("score 0-100", "50", "50"));
        assert!(parse_turn_reply(&text).is_err());
    }

    #[test]
    fn test_parse_rejects_empty_response() {
        let text = reply_json("  ", "technical", ("50", "50", "50"));
        assert!(parse_turn_reply(&text).is_err());
    }

    #[test]
    fn test_parse_keeps_unknown_phase_as_none() {
        let text = reply_json("Next?", "negotiation", ("50", "50", "50"));
        let parsed = parse_turn_reply(&text).unwrap();
        assert_eq!(parsed.phase, None);
        assert_eq!(parsed.raw_phase, "negotiation");
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_turn_updates_session() {
        let provider = ScriptedProvider::new().with_reply(reply_json(
            "Could you walk me through your most recent role?",
            "background",
            ("70", "60", "50"),
        ));
        let mut session = test_session();

        let result = run_turn(&provider, &mut session, "I'm doing well, thanks.").await;

        assert_eq!(result.phase, Phase::Background);
        assert_eq!(session.current_phase, Phase::Background);
        assert_eq!(
            session.history,
            vec![
                "I'm doing well, thanks.".to_string(),
                "Could you walk me through your most recent role?".to_string(),
            ]
        );
        assert_eq!(session.feedback.len(), 1);
        assert_eq!(
            session.questions_asked,
            vec!["Could you walk me through your most recent role?".to_string()]
        );
        assert_eq!(session.scores, Scores::from_categories(70.0, 60.0, 50.0));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_turn_watermark_scenario() {
        let provider = ScriptedProvider::new()
            .with_reply(reply_json("Tell me about Rust?", "technical", ("70", "60", "50")))
            .with_reply(reply_json("And async Rust?", "technical", ("65", "80", "50")));
        let mut session = test_session();

        run_turn(&provider, &mut session, "first answer").await;
        let second = run_turn(&provider, &mut session, "second answer").await;

        assert_eq!(session.scores.communication, 70.0);
        assert_eq!(session.scores.technical, 80.0);
        assert_eq!(session.scores.behavioral, 50.0);
        assert!((session.scores.overall - 200.0 / 3.0).abs() < 1e-9);
        // The turn result reports what the provider said, not the watermark.
        assert_eq!(second.scores.communication, 65.0);
        assert_eq!(session.history.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_after_malformed_reply() {
        let provider = ScriptedProvider::new()
            .with_reply("not json at all")
            .with_error(LlmError::EmptyContent)
            .with_reply(reply_json("What drew you to us?", "introduction", (80, 70, 60)));
        let mut session = test_session();

        let result = run_turn(&provider, &mut session, "Hello!").await;

        assert_eq!(result.response, "What drew you to us?");
        assert_eq!(provider.call_count(), 3);
        assert_eq!(session.history.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_wait_between_attempts() {
        let provider = ScriptedProvider::new()
            .with_reply("garbage")
            .with_reply("garbage")
            .with_reply("garbage");
        let mut session = test_session();

        let started = tokio::time::Instant::now();
        run_turn(&provider, &mut session, "Hello!").await;

        assert!(started.elapsed() >= RETRY_DELAY * (MAX_TURN_ATTEMPTS - 1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_retries_return_fallback_without_mutation() {
        let provider = ScriptedProvider::new()
            .with_reply(reply_json("Tell me about Rust?", "technical", ("70", "60", "50")))
            .with_reply("{broken")
            .with_reply("{broken")
            .with_reply("{broken");
        let mut session = test_session();
        run_turn(&provider, &mut session, "first answer").await;
        let before = session.clone();

        let result = run_turn(&provider, &mut session, "second answer").await;

        assert_eq!(result.response, FALLBACK_RESPONSE);
        assert_eq!(result.feedback, FALLBACK_FEEDBACK);
        assert_eq!(result.phase, before.current_phase);
        assert_eq!(result.scores, before.scores);
        assert_eq!(session.history, before.history);
        assert_eq!(session.feedback, before.feedback);
        assert_eq!(session.scores, before.scores);
        assert_eq!(provider.call_count(), 1 + MAX_TURN_ATTEMPTS as usize);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_errors_return_fallback() {
        let provider = ScriptedProvider::new();
        for _ in 0..MAX_TURN_ATTEMPTS {
            provider.push_error(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            });
        }
        let mut session = test_session();

        let result = run_turn(&provider, &mut session, "Hello!").await;

        assert_eq!(result, fallback_turn(&test_session()));
        assert!(session.history.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_phase_holds_previous_phase() {
        let provider = ScriptedProvider::new()
            .with_reply(reply_json("Where are you based?", "small_talk", ("40", "0", "0")));
        let mut session = test_session();
        session.current_phase = Phase::Background;

        let result = run_turn(&provider, &mut session, "Hi").await;

        assert_eq!(result.phase, Phase::Background);
        assert_eq!(session.current_phase, Phase::Background);
        assert_eq!(session.history.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_may_move_phase_backwards() {
        let provider = ScriptedProvider::new()
            .with_reply(reply_json("Back to basics?", "introduction", ("40", "0", "0")));
        let mut session = test_session();
        session.current_phase = Phase::Behavioral;

        run_turn(&provider, &mut session, "Hi").await;

        assert_eq!(session.current_phase, Phase::Introduction);
    }

    #[tokio::test(start_paused = true)]
    async fn test_prompt_sent_with_turn_params() {
        let provider = ScriptedProvider::new()
            .with_reply(reply_json("Next question?", "background", ("1", "1", "1")));
        let mut session = test_session();

        run_turn(&provider, &mut session, "My answer").await;

        let calls = provider.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, GenerationParams::TURN);
        assert!(calls[0].0.contains("Candidate: My answer"));
    }
}
