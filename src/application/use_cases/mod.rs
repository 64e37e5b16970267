//! Use case implementations.

mod affective_use_case;
mod chat_use_case;
mod check_in_use_case;
mod insights_use_case;
mod journal_use_case;
mod profile_use_case;
mod resolve_token_use_case;
mod token_session_use_case;

pub use affective_use_case::AffectiveUseCase;
pub use chat_use_case::ChatUseCase;
pub use check_in_use_case::CheckInUseCase;
pub use insights_use_case::{InsightsSummary, InsightsUseCase};
pub use journal_use_case::JournalUseCase;
pub use profile_use_case::ProfileUseCase;
pub use resolve_token_use_case::ResolveTokenUseCase;
pub use token_session_use_case::TokenSessionUseCase;
