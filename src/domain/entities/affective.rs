//! Affective questionnaire and the engine's analysis result.

use serde::{Deserialize, Serialize};

use super::check_in::MAX_ANSWER;
use super::insights::RiskBand;

/// Statements rated from "Never" to "Always", in the order they are asked.
pub const AFFECTIVE_QUESTIONS: [&str; 10] = [
    "I felt calm and peaceful.",
    "I felt nervous or anxious.",
    "I felt energetic and active.",
    "I felt down or depressed.",
    "I was easily annoyed or irritable.",
    "I felt happy and satisfied.",
    "I had trouble concentrating.",
    "I felt hopeful about the future.",
    "I felt lonely or isolated.",
    "I was able to enjoy things I usually enjoy.",
];

/// Label for an answer on the 0-3 affective scale.
#[must_use]
pub const fn affective_label(score: u8) -> &'static str {
    match score {
        0 => "Never",
        1 => "Sometimes",
        2 => "Often",
        _ => "Always",
    }
}

/// Request body of `POST /affective/analyze/questions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffectiveAnswers {
    answers: [u8; AFFECTIVE_QUESTIONS.len()],
}

impl AffectiveAnswers {
    /// Returns `None` unless exactly ten scores in `0..=3` are given.
    #[must_use]
    pub fn from_scores(scores: &[u8]) -> Option<Self> {
        let answers: [u8; AFFECTIVE_QUESTIONS.len()] = scores.try_into().ok()?;
        answers
            .iter()
            .all(|score| *score <= MAX_ANSWER)
            .then_some(Self { answers })
    }

    #[must_use]
    pub const fn scores(&self) -> &[u8] {
        &self.answers
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.answers.iter().all(|score| *score <= MAX_ANSWER)
    }
}

/// One second of the projected emotion timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionSample {
    pub time: u32,
    pub positive: f64,
    pub negative: f64,
}

/// Pattern class and risk index inferred from the answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectiveResult {
    /// `Stable`, `Volatile`, `Depressive` or `Anxious`.
    pub pattern: String,
    /// Risk index in `0.0..=1.0`.
    pub risk_score: f64,
    #[serde(default)]
    pub emotion_timeline: Vec<EmotionSample>,
}

impl AffectiveResult {
    /// Risk index as a whole percentage.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn risk_percent(&self) -> u8 {
        (self.risk_score.clamp(0.0, 1.0) * 100.0).round() as u8
    }

    #[must_use]
    pub fn band(&self) -> RiskBand {
        if self.risk_score > 0.6 {
            RiskBand::High
        } else if self.risk_score > 0.3 {
            RiskBand::Moderate
        } else {
            RiskBand::Low
        }
    }

    /// Mean positive and negative weight over the timeline.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_balance(&self) -> Option<(f64, f64)> {
        if self.emotion_timeline.is_empty() {
            return None;
        }
        let n = self.emotion_timeline.len() as f64;
        let (positive, negative) = self
            .emotion_timeline
            .iter()
            .fold((0.0, 0.0), |(p, q), s| (p + s.positive, q + s.negative));
        Some((positive / n, negative / n))
    }
}
