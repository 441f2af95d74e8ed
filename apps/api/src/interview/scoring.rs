//! Score aggregation: folds a turn's reported category scores into the session.
//!
//! Each category is a watermark: `stored = max(stored, reported)`. `overall` is never
//! set directly; it is recomputed as the mean of the three categories after every fold.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::interview::error::EngineError;

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 100.0;

/// Per-category scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    pub communication: f64,
    pub technical: f64,
    pub behavioral: f64,
    pub overall: f64,
}

impl Scores {
    /// Builds a score set from the three categories, deriving `overall`.
    pub fn from_categories(communication: f64, technical: f64, behavioral: f64) -> Self {
        let mut scores = Scores {
            communication,
            technical,
            behavioral,
            overall: 0.0,
        };
        scores.recompute_overall();
        scores
    }

    fn recompute_overall(&mut self) {
        self.overall = (self.communication + self.technical + self.behavioral) / 3.0;
    }

    /// Applies the watermark fold in place.
    pub fn fold(&mut self, reported: &ReportedScores) {
        self.communication = self.communication.max(reported.communication);
        self.technical = self.technical.max(reported.technical);
        self.behavioral = self.behavioral.max(reported.behavioral);
        self.recompute_overall();
    }
}

/// A validated score triple as reported by the provider for one turn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportedScores {
    pub communication: f64,
    pub technical: f64,
    pub behavioral: f64,
}

impl ReportedScores {
    pub fn as_scores(&self) -> Scores {
        Scores::from_categories(self.communication, self.technical, self.behavioral)
    }
}

/// Raw `scores` object from the provider. Values may be numbers or numeric strings.
/// Extra keys (a stray `overall`, say) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawScores {
    pub communication: Value,
    pub technical: Value,
    pub behavioral: Value,
}

impl TryFrom<RawScores> for ReportedScores {
    type Error = EngineError;

    fn try_from(raw: RawScores) -> Result<Self, Self::Error> {
        Ok(ReportedScores {
            communication: coerce_score("communication", &raw.communication)?,
            technical: coerce_score("technical", &raw.technical)?,
            behavioral: coerce_score("behavioral", &raw.behavioral)?,
        })
    }
}

/// Coerces one externally-typed score to a number in `[0, 100]`.
///
/// Accepts JSON numbers and strings that parse as a number. Non-finite values and
/// anything else are a malformed response.
pub fn coerce_score(category: &str, value: &Value) -> Result<f64, EngineError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(v) if v.is_finite() => Ok(v.clamp(MIN_SCORE, MAX_SCORE)),
        _ => Err(EngineError::MalformedResponse(format!(
            "score for '{category}' is not numeric: {value}"
        ))),
    }
}
