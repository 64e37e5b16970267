//! Breathing technique configuration and the technique catalog.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::cycle::Phase;
use super::timeline::Timeline;
use crate::domain::errors::TechniqueError;

/// Longest accepted phase, one hour.
pub const MAX_PHASE_SECS: u32 = 3600;

/// A named respiration pattern with per-phase durations in seconds.
///
/// `inhale` and `exhale` must be positive. `hold` and `hold_out` may be zero,
/// in which case the matching phase is skipped entirely while cycling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingTechnique {
    /// Stable identifier, unique within a catalog.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description shown next to the name.
    #[serde(default)]
    pub description: String,
    /// Inhale duration in seconds.
    pub inhale: u32,
    /// Hold-after-inhale duration in seconds.
    #[serde(default)]
    pub hold: u32,
    /// Exhale duration in seconds.
    pub exhale: u32,
    /// Hold-after-exhale duration in seconds.
    #[serde(default)]
    pub hold_out: u32,
    /// Accent color (name or hex code). Display only.
    #[serde(default = "default_color")]
    pub color: String,
}

fn default_color() -> String {
    "#13ecda".to_string()
}

impl BreathingTechnique {
    /// Creates technique with inhale and exhale only.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, inhale: u32, exhale: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            inhale,
            hold: 0,
            exhale,
            hold_out: 0,
            color: default_color(),
        }
    }

    /// Sets hold-after-inhale duration.
    #[must_use]
    pub const fn with_hold(mut self, seconds: u32) -> Self {
        self.hold = seconds;
        self
    }

    /// Sets hold-after-exhale duration.
    #[must_use]
    pub const fn with_hold_out(mut self, seconds: u32) -> Self {
        self.hold_out = seconds;
        self
    }

    /// Sets description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets accent color.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Equal four-second inhale, hold, exhale and hold.
    #[must_use]
    pub fn box_breathing() -> Self {
        Self::new("box", "Box Breathing", 4, 4)
            .with_hold(4)
            .with_hold_out(4)
            .with_description("Equal inhale, hold, exhale, and hold phases (4s each).")
            .with_color("#13ecda")
    }

    /// Inhale 4s, hold 7s, exhale 8s.
    #[must_use]
    pub fn four_seven_eight() -> Self {
        Self::new("478", "4-7-8 Relaxation", 4, 8)
            .with_hold(7)
            .with_description("Inhale for 4s, hold for 7s, exhale for 8s.")
            .with_color("#8b5cf6")
    }

    /// Even five-second inhale and exhale.
    #[must_use]
    pub fn calm() -> Self {
        Self::new("calm", "Calm Breathing", 5, 5)
            .with_description("A natural rhythm for focus and mental clarity.")
            .with_color("#10b981")
    }

    /// Checks the positive inhale/exhale invariant and the per-phase bound.
    ///
    /// # Errors
    /// Returns `TechniqueError` when the id is blank, a required phase is zero
    /// or any phase is longer than [`MAX_PHASE_SECS`].
    pub fn validate(&self) -> Result<(), TechniqueError> {
        if self.id.trim().is_empty() {
            return Err(TechniqueError::EmptyId);
        }
        if self.inhale == 0 {
            return Err(TechniqueError::zero_duration(&self.id, Phase::Inhale));
        }
        if self.exhale == 0 {
            return Err(TechniqueError::zero_duration(&self.id, Phase::Exhale));
        }
        for phase in Phase::ALL {
            if self.duration_of(phase) > MAX_PHASE_SECS {
                return Err(TechniqueError::phase_too_long(&self.id, phase, MAX_PHASE_SECS));
            }
        }
        Ok(())
    }

    /// Configured duration of a phase in seconds.
    #[must_use]
    pub const fn duration_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => self.inhale,
            Phase::Hold => self.hold,
            Phase::Exhale => self.exhale,
            Phase::HoldEmpty => self.hold_out,
        }
    }

    /// Seconds from cycle start to the start of `phase`.
    #[must_use]
    pub const fn offset_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Inhale => 0,
            Phase::Hold => self.inhale,
            Phase::Exhale => self.inhale.saturating_add(self.hold),
            Phase::HoldEmpty => self.inhale.saturating_add(self.hold).saturating_add(self.exhale),
        }
    }

    /// Length of one full cycle in seconds.
    #[must_use]
    pub const fn cycle_secs(&self) -> u32 {
        self.inhale
            .saturating_add(self.hold)
            .saturating_add(self.exhale)
            .saturating_add(self.hold_out)
    }

    /// Animation timeline, `None` when the cycle length is zero.
    #[must_use]
    pub fn timeline(&self) -> Option<Timeline> {
        Timeline::for_technique(self)
    }

    /// Compact pattern such as `4-7-8` or `4-4-4-4`.
    #[must_use]
    pub fn pattern(&self) -> String {
        let mut parts = vec![self.inhale.to_string()];
        if self.hold > 0 {
            parts.push(self.hold.to_string());
        }
        parts.push(self.exhale.to_string());
        if self.hold_out > 0 {
            parts.push(self.hold_out.to_string());
        }
        parts.join("-")
    }
}

impl Default for BreathingTechnique {
    fn default() -> Self {
        Self::box_breathing()
    }
}

/// Ordered set of valid techniques with unique ids.
#[derive(Debug, Clone)]
pub struct TechniqueCatalog {
    techniques: Vec<BreathingTechnique>,
}

impl TechniqueCatalog {
    /// Catalog containing only the built-in techniques.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            techniques: vec![
                BreathingTechnique::box_breathing(),
                BreathingTechnique::four_seven_eight(),
                BreathingTechnique::calm(),
            ],
        }
    }

    /// Built-ins followed by user techniques.
    ///
    /// Invalid techniques and duplicate ids are skipped with a warning.
    #[must_use]
    pub fn with_custom(custom: Vec<BreathingTechnique>) -> Self {
        let mut catalog = Self::builtin();
        for technique in custom {
            if let Err(e) = catalog.push(technique) {
                warn!(error = %e, "Skipping configured breathing technique");
            }
        }
        catalog
    }

    /// Appends a technique.
    ///
    /// # Errors
    /// Returns `TechniqueError` if the technique is invalid or its id is taken.
    pub fn push(&mut self, technique: BreathingTechnique) -> Result<(), TechniqueError> {
        technique.validate()?;
        if self.get(&technique.id).is_some() {
            return Err(TechniqueError::DuplicateId(technique.id));
        }
        self.techniques.push(technique);
        Ok(())
    }

    /// All techniques in display order.
    #[must_use]
    pub fn techniques(&self) -> &[BreathingTechnique] {
        &self.techniques
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.techniques.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.techniques.is_empty()
    }

    /// First technique, the default selection.
    #[must_use]
    pub fn first(&self) -> Option<&BreathingTechnique> {
        self.techniques.first()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&BreathingTechnique> {
        self.techniques.iter().find(|t| t.id == id)
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.techniques.iter().position(|t| t.id == id)
    }

    /// Technique listed after `id`, `None` at the end of the list.
    #[must_use]
    pub fn next_after(&self, id: &str) -> Option<&BreathingTechnique> {
        self.position(id).and_then(|i| self.techniques.get(i + 1))
    }

    /// Technique listed before `id`, `None` at the start of the list.
    #[must_use]
    pub fn previous_before(&self, id: &str) -> Option<&BreathingTechnique> {
        self.position(id)
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| self.techniques.get(i))
    }
}

impl Default for TechniqueCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
