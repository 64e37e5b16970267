//! Breathing technique configuration errors.

use thiserror::Error;

use crate::domain::entities::Phase;

/// Technique configuration error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum TechniqueError {
    #[error("technique id must not be empty")]
    EmptyId,

    #[error("technique `{id}` has a zero-length {phase} phase")]
    ZeroDuration { id: String, phase: Phase },

    #[error("technique `{id}` has a {phase} phase longer than {max} seconds")]
    PhaseTooLong { id: String, phase: Phase, max: u32 },

    #[error("duplicate technique id `{0}`")]
    DuplicateId(String),

    #[error("unknown technique `{0}`")]
    Unknown(String),
}

impl TechniqueError {
    /// Creates zero-duration error.
    #[must_use]
    pub fn zero_duration(id: impl Into<String>, phase: Phase) -> Self {
        Self::ZeroDuration {
            id: id.into(),
            phase,
        }
    }

    /// Creates phase-too-long error.
    #[must_use]
    pub fn phase_too_long(id: impl Into<String>, phase: Phase, max: u32) -> Self {
        Self::PhaseTooLong {
            id: id.into(),
            phase,
            max,
        }
    }
}
