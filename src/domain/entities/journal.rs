//! Journal entry entities.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::serde_utils;

/// Self-reported mood attached to a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mood {
    Joyful,
    Calm,
    #[default]
    Neutral,
    Low,
    Anxious,
}

impl Mood {
    pub const ALL: [Self; 5] = [
        Self::Joyful,
        Self::Calm,
        Self::Neutral,
        Self::Low,
        Self::Anxious,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Joyful => "Joyful",
            Self::Calm => "Calm",
            Self::Neutral => "Neutral",
            Self::Low => "Low",
            Self::Anxious => "Anxious",
        }
    }

    /// Short glyph for list rows.
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::Joyful => "☀",
            Self::Calm => "☁",
            Self::Neutral => "○",
            Self::Low => "☂",
            Self::Anxious => "⚡",
        }
    }

    /// Next mood in selector order, wrapping around.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Joyful => Self::Calm,
            Self::Calm => Self::Neutral,
            Self::Neutral => Self::Low,
            Self::Low => Self::Anxious,
            Self::Anxious => Self::Joyful,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Mood {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mood| mood.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown mood: {s}"))
    }
}

/// Journal entry as stored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "serde_utils::lenient_mood")]
    pub mood: Option<Mood>,
    pub content: String,
    #[serde(with = "serde_utils::naive_utc")]
    pub timestamp: DateTime<Utc>,
}

impl JournalEntry {
    const PREVIEW_CHARS: usize = 80;

    /// Title, or `Untitled` when the backend stored none.
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("Untitled")
    }

    /// First line of the content, cut to a fixed width.
    #[must_use]
    pub fn preview(&self) -> String {
        let first_line = self.content.lines().next().unwrap_or_default();
        if first_line.chars().count() <= Self::PREVIEW_CHARS {
            first_line.to_string()
        } else {
            let cut: String = first_line.chars().take(Self::PREVIEW_CHARS - 1).collect();
            format!("{cut}…")
        }
    }
}

/// Payload for creating a journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewJournalEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
    pub content: String,
}

impl NewJournalEntry {
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            title: None,
            mood: None,
            content: content.into(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.title = (!title.trim().is_empty()).then(|| title.trim().to_string());
        self
    }

    #[must_use]
    pub const fn with_mood(mut self, mood: Mood) -> Self {
        self.mood = Some(mood);
        self
    }

    /// Splits composer text into a title (first line) and body (the rest).
    #[must_use]
    pub fn from_draft(draft: &str, mood: Option<Mood>) -> Self {
        let (title, body) = draft.split_once('\n').unwrap_or(("", draft));
        let mut entry = Self::new(body.trim()).with_title(title);
        entry.mood = mood;
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mood_parses_any_case() {
        assert_eq!("neutral".parse::<Mood>(), Ok(Mood::Neutral));
        assert_eq!("ANXIOUS".parse::<Mood>(), Ok(Mood::Anxious));
        assert!("elated".parse::<Mood>().is_err());
    }

    #[test]
    fn test_mood_cycle_wraps() {
        let mut mood = Mood::Joyful;
        for _ in 0..Mood::ALL.len() {
            mood = mood.cycle();
        }
        assert_eq!(mood, Mood::Joyful);
    }

    #[test]
    fn test_entry_deserializes_backend_shape() {
        let json = r#"{
            "id": 7,
            "user_id": 1,
            "title": "Morning",
            "mood": "calm",
            "content": "Slept well.\nWalked.",
            "timestamp": "2024-03-01T08:30:00.123456"
        }"#;

        let entry: JournalEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.mood, Some(Mood::Calm));
        assert_eq!(entry.preview(), "Slept well.");
        assert_eq!(entry.timestamp.format("%Y-%m-%d %H:%M").to_string(), "2024-03-01 08:30");
    }

    #[test]
    fn test_unknown_mood_and_missing_title_tolerated() {
        let json = r#"{"id":1,"user_id":1,"title":null,"mood":"elated","content":"x","timestamp":"2024-03-01T08:30:00Z"}"#;

        let entry: JournalEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.mood, None);
        assert_eq!(entry.display_title(), "Untitled");
    }

    #[test]
    fn test_preview_truncates_long_lines() {
        let json = format!(
            r#"{{"id":1,"user_id":1,"content":"{}","timestamp":"2024-03-01T08:30:00"}}"#,
            "a".repeat(200)
        );
        let entry: JournalEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry.preview().chars().count(), 80);
        assert!(entry.preview().ends_with('…'));
    }

    #[test]
    fn test_new_entry_from_draft() {
        let entry = NewJournalEntry::from_draft("Evening\nLong day, but calm.", Some(Mood::Calm));
        assert_eq!(entry.title.as_deref(), Some("Evening"));
        assert_eq!(entry.content, "Long day, but calm.");

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["mood"], "CALM");
    }

    #[test]
    fn test_single_line_draft_has_no_title() {
        let entry = NewJournalEntry::from_draft("Just a thought", None);
        assert!(entry.title.is_none());
        assert_eq!(entry.content, "Just a thought");

        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("title").is_none());
        assert!(json.get("mood").is_none());
    }
}
