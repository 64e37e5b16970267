//! UI screens.

mod app;
mod breathe_screen;
mod chat_screen;
mod insights_screen;
mod journal_screen;
mod profile_screen;
mod utils;

pub use app::App;
pub use breathe_screen::{BreatheScreen, phase_caption};
pub use chat_screen::{ChatKeyResult, ChatScreenState};
pub use insights_screen::{
    AffectiveStepper, CheckInStepper, InsightsKeyResult, InsightsScreenState, band_color,
};
pub use journal_screen::{JournalKeyResult, JournalScreenState, next_mood};
pub use profile_screen::{ProfileField, ProfileKeyResult, ProfileScreenState};
