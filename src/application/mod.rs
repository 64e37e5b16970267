//! Application layer with services, use cases and DTOs.

/// Data transfer objects.
pub mod dto;
/// Services owned by the UI loop.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{ResolvedToken, TokenSource};
pub use services::{BreathingController, SessionProgress, StatusFeed, StatusLevel};
pub use use_cases::{
    AffectiveUseCase, ChatUseCase, CheckInUseCase, InsightsSummary, InsightsUseCase,
    JournalUseCase, ProfileUseCase, ResolveTokenUseCase, TokenSessionUseCase,
};
