//! Domain layer with core wellness entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;
/// Serde utilities.
pub mod serde_utils;

pub use entities::{AuthToken, BreathingTechnique, CycleState, Phase, TechniqueCatalog, Timeline};
pub use errors::{ApiError, TechniqueError};
pub use ports::{TokenStoragePort, WellnessApiPort};
