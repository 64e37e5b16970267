//! Domain entities.

mod affective;
mod chat;
mod check_in;
mod cycle;
mod insights;
mod journal;
mod profile;
mod technique;
mod timeline;
mod token;

pub use affective::{
    AFFECTIVE_QUESTIONS, AffectiveAnswers, AffectiveResult, EmotionSample, affective_label,
};
pub use chat::{ChatMessage, ChatReply, Sender};
pub use check_in::{CheckIn, CheckInAnswers, CheckInQuestion, MAX_ANSWER, answer_label};
pub use cycle::{CycleSnapshot, CycleState, Phase, TickOutcome};
pub use insights::{DashboardData, FactorKind, FutureRisk, RiskBand, RiskData, RiskFactor};
pub use journal::{JournalEntry, Mood, NewJournalEntry};
pub use profile::{ProfileUpdate, UserProfile};
pub use technique::{BreathingTechnique, MAX_PHASE_SECS, TechniqueCatalog};
pub use timeline::{CIRCLE_SCALE, RING_OPACITY, RING_SCALE, Timeline};
pub use token::AuthToken;
