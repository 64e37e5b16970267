//! Daily check-in questionnaire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::serde_utils;

/// Highest answer on the frequency scale.
pub const MAX_ANSWER: u8 = 3;

/// Questionnaire item, in the order the stepper asks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInQuestion {
    SleepIssue,
    Energy,
    Interest,
    Focus,
    Anxiety,
    Social,
    Routine,
    Phone,
    Motivation,
    Overwhelm,
}

impl CheckInQuestion {
    pub const ALL: [Self; 10] = [
        Self::SleepIssue,
        Self::Energy,
        Self::Interest,
        Self::Focus,
        Self::Anxiety,
        Self::Social,
        Self::Routine,
        Self::Phone,
        Self::Motivation,
        Self::Overwhelm,
    ];

    /// Statement the user rates.
    #[must_use]
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::SleepIssue => "I had trouble falling or staying asleep",
            Self::Energy => "I felt low energy or tired without reason",
            Self::Interest => "I lost interest in things I usually enjoy",
            Self::Focus => "I found it hard to concentrate on tasks",
            Self::Anxiety => "I felt nervous, anxious, or on edge",
            Self::Social => "I avoided social interaction",
            Self::Routine => "My daily routine felt disturbed",
            Self::Phone => "I overused my phone to distract myself",
            Self::Motivation => "I felt unmotivated to start simple tasks",
            Self::Overwhelm => "I felt overwhelmed by small problems",
        }
    }
}

/// Label for an answer on the 0-3 frequency scale.
#[must_use]
pub const fn answer_label(score: u8) -> &'static str {
    match score {
        0 => "Never",
        1 => "Several days",
        2 => "More than half",
        _ => "Nearly every day",
    }
}

/// Ten answers, each `0..=3`, keyed the way the backend expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckInAnswers {
    pub q_sleep_issue: u8,
    pub q_energy: u8,
    pub q_interest: u8,
    pub q_focus: u8,
    pub q_anxiety: u8,
    pub q_social: u8,
    pub q_routine: u8,
    pub q_phone: u8,
    pub q_motivation: u8,
    pub q_overwhelm: u8,
}

impl CheckInAnswers {
    /// Builds answers from scores given in question order.
    ///
    /// Returns `None` unless exactly ten scores in `0..=3` are given.
    #[must_use]
    pub fn from_scores(scores: &[u8]) -> Option<Self> {
        let &[a, b, c, d, e, f, g, h, i, j] = scores else {
            return None;
        };
        let answers = Self {
            q_sleep_issue: a,
            q_energy: b,
            q_interest: c,
            q_focus: d,
            q_anxiety: e,
            q_social: f,
            q_routine: g,
            q_phone: h,
            q_motivation: i,
            q_overwhelm: j,
        };
        answers.is_valid().then_some(answers)
    }

    #[must_use]
    pub const fn get(&self, question: CheckInQuestion) -> u8 {
        match question {
            CheckInQuestion::SleepIssue => self.q_sleep_issue,
            CheckInQuestion::Energy => self.q_energy,
            CheckInQuestion::Interest => self.q_interest,
            CheckInQuestion::Focus => self.q_focus,
            CheckInQuestion::Anxiety => self.q_anxiety,
            CheckInQuestion::Social => self.q_social,
            CheckInQuestion::Routine => self.q_routine,
            CheckInQuestion::Phone => self.q_phone,
            CheckInQuestion::Motivation => self.q_motivation,
            CheckInQuestion::Overwhelm => self.q_overwhelm,
        }
    }

    /// Every answer within `0..=3`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        CheckInQuestion::ALL
            .iter()
            .all(|q| self.get(*q) <= MAX_ANSWER)
    }

    /// Sum of all answers, `0..=30`.
    #[must_use]
    pub fn total(&self) -> u32 {
        CheckInQuestion::ALL
            .iter()
            .map(|q| u32::from(self.get(*q)))
            .sum()
    }
}

/// Stored check-in as echoed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub id: u64,
    pub user_id: u64,
    #[serde(flatten)]
    pub answers: CheckInAnswers,
    #[serde(with = "serde_utils::naive_utc")]
    pub timestamp: DateTime<Utc>,
}
