//! Affective questionnaire analysis use case.

use std::sync::Arc;

use tracing::info;

use crate::domain::entities::{AffectiveAnswers, AffectiveResult, AuthToken};
use crate::domain::errors::ApiError;
use crate::domain::ports::WellnessApiPort;

pub struct AffectiveUseCase {
    api: Arc<dyn WellnessApiPort>,
}

impl AffectiveUseCase {
    #[must_use]
    pub const fn new(api: Arc<dyn WellnessApiPort>) -> Self {
        Self { api }
    }

    /// # Errors
    /// Propagates backend errors.
    pub async fn analyze(
        &self,
        token: &AuthToken,
        answers: AffectiveAnswers,
    ) -> Result<AffectiveResult, ApiError> {
        let result = self.api.analyze_affective(token, &answers).await?;
        info!(
            pattern = %result.pattern,
            risk = result.risk_percent(),
            "Affective analysis finished"
        );
        Ok(result)
    }
}
