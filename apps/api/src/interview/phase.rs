//! Phase catalog: the fixed set of interview stages and their prompt directives.
//!
//! Transitions are provider-driven: whatever phase the provider reports becomes the
//! next phase, as long as it names a member of this set. Durations are advisory text
//! inside prompts, never a timer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A named stage of the interview. Starts at `Introduction`; `Closing` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Introduction,
    Background,
    Technical,
    Behavioral,
    Closing,
}

/// Static catalog entry for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSpec {
    pub directive: &'static str,
    pub guidance_minutes: u32,
}

const INTRODUCTION: PhaseSpec = PhaseSpec {
    directive: "You are an experienced job interviewer. Start the interview with a \
        professional introduction. Be friendly but maintain professionalism. Introduce \
        yourself and the company. Ask the candidate how they are doing today.",
    guidance_minutes: 2,
};

const BACKGROUND: PhaseSpec = PhaseSpec {
    directive: "Review the candidate's background based on their resume. Ask relevant \
        questions about their experience and skills. Focus on their most recent and \
        relevant experience.",
    guidance_minutes: 5,
};

const TECHNICAL: PhaseSpec = PhaseSpec {
    directive: "Ask technical questions relevant to the position. Evaluate the candidate's \
        technical knowledge and problem-solving abilities. Adapt the difficulty based on \
        their responses.",
    guidance_minutes: 15,
};

const BEHAVIORAL: PhaseSpec = PhaseSpec {
    directive: "Ask behavioral questions to assess the candidate's soft skills, teamwork, \
        and past experiences. Use the STAR method to evaluate responses.",
    guidance_minutes: 10,
};

const CLOSING: PhaseSpec = PhaseSpec {
    directive: "Wrap up the interview professionally. Ask if the candidate has any \
        questions. Thank them for their time and explain the next steps.",
    guidance_minutes: 3,
};

impl Phase {
    pub const ALL: [Phase; 5] = [
        Phase::Introduction,
        Phase::Background,
        Phase::Technical,
        Phase::Behavioral,
        Phase::Closing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Introduction => "introduction",
            Phase::Background => "background",
            Phase::Technical => "technical",
            Phase::Behavioral => "behavioral",
            Phase::Closing => "closing",
        }
    }

    pub fn spec(&self) -> &'static PhaseSpec {
        match self {
            Phase::Introduction => &INTRODUCTION,
            Phase::Background => &BACKGROUND,
            Phase::Technical => &TECHNICAL,
            Phase::Behavioral => &BEHAVIORAL,
            Phase::Closing => &CLOSING,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Closing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized interview phase: {0:?}")]
pub struct UnknownPhase(pub String);

impl FromStr for Phase {
    type Err = UnknownPhase;

    /// Case-insensitive, whitespace-tolerant. Anything outside the fixed set is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Phase::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| UnknownPhase(s.to_string()))
    }
}
