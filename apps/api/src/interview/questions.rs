use std::sync::OnceLock;

use regex::Regex;

/// Shorter fragments ("Ok?", "Right?") are not tracked as questions.
const MIN_QUESTION_CHARS: usize = 10;

fn question_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^.!?]*\?").expect("question pattern is valid"))
}

/// Pulls the questions out of an interviewer utterance, in order.
pub fn extract_questions(text: &str) -> Vec<String> {
    question_pattern()
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|q| q.chars().count() > MIN_QUESTION_CHARS)
        .map(String::from)
        .collect()
}
