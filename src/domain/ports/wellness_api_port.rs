//! Wellness backend port definition.

use async_trait::async_trait;

use crate::domain::entities::{
    AffectiveAnswers, AffectiveResult, AuthToken, ChatReply, CheckIn, CheckInAnswers,
    DashboardData, JournalEntry, NewJournalEntry, ProfileUpdate, RiskData, UserProfile,
};
use crate::domain::errors::ApiError;

/// Port for the wellness backend's REST endpoints.
#[async_trait]
pub trait WellnessApiPort: Send + Sync {
    /// Fetches the user's journal entries.
    async fn list_journal_entries(&self, token: &AuthToken)
    -> Result<Vec<JournalEntry>, ApiError>;

    /// Creates a journal entry and returns the stored copy.
    async fn create_journal_entry(
        &self,
        token: &AuthToken,
        entry: &NewJournalEntry,
    ) -> Result<JournalEntry, ApiError>;

    /// Sends a chat message and returns the reply.
    async fn send_chat_message(&self, token: &AuthToken, message: &str)
    -> Result<ChatReply, ApiError>;

    /// Fetches the current risk assessment.
    async fn fetch_risk(&self, token: &AuthToken) -> Result<RiskData, ApiError>;

    /// Fetches dashboard data, including the forward risk summary.
    async fn fetch_dashboard(&self, token: &AuthToken) -> Result<DashboardData, ApiError>;

    /// Submits today's check-in answers.
    async fn submit_check_in(
        &self,
        token: &AuthToken,
        answers: &CheckInAnswers,
    ) -> Result<CheckIn, ApiError>;

    /// Fetches today's check-in, `None` if none was submitted yet.
    async fn fetch_today_check_in(&self, token: &AuthToken) -> Result<Option<CheckIn>, ApiError>;

    /// Fetches the signed-in user's profile.
    async fn fetch_profile(&self, token: &AuthToken) -> Result<UserProfile, ApiError>;

    /// Updates profile fields and returns the stored profile.
    async fn update_profile(
        &self,
        token: &AuthToken,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, ApiError>;

    /// Runs the affective engine over questionnaire answers.
    async fn analyze_affective(
        &self,
        token: &AuthToken,
        answers: &AffectiveAnswers,
    ) -> Result<AffectiveResult, ApiError>;
}
