//! Daily check-in use case.

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{AuthToken, CheckIn, CheckInAnswers};
use crate::domain::errors::ApiError;
use crate::domain::ports::WellnessApiPort;

/// Submits the questionnaire and reports today's status.
pub struct CheckInUseCase {
    api: Arc<dyn WellnessApiPort>,
}

impl CheckInUseCase {
    #[must_use]
    pub const fn new(api: Arc<dyn WellnessApiPort>) -> Self {
        Self { api }
    }

    /// # Errors
    /// Returns `ApiError::InvalidRequest` if an answer is out of range, or a backend error.
    pub async fn submit(
        &self,
        token: &AuthToken,
        answers: CheckInAnswers,
    ) -> Result<CheckIn, ApiError> {
        if !answers.is_valid() {
            return Err(ApiError::invalid_request("check-in answers must be 0-3"));
        }

        let stored = self.api.submit_check_in(token, &answers).await?;
        info!(id = stored.id, total = answers.total(), "Check-in submitted");
        Ok(stored)
    }

    /// Today's check-in, if one was submitted.
    ///
    /// # Errors
    /// Propagates backend errors.
    pub async fn today(&self, token: &AuthToken) -> Result<Option<CheckIn>, ApiError> {
        self.api.fetch_today_check_in(token).await
    }
}
