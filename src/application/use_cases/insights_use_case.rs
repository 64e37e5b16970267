//! Risk insights use case.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::entities::{AuthToken, FutureRisk, RiskData};
use crate::domain::errors::ApiError;
use crate::domain::ports::WellnessApiPort;

/// Everything the insights screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsightsSummary {
    pub risk: RiskData,
    pub future: Option<FutureRisk>,
}

/// Loads the risk score and the dashboard's forward risk summary.
pub struct InsightsUseCase {
    api: Arc<dyn WellnessApiPort>,
}

impl InsightsUseCase {
    #[must_use]
    pub const fn new(api: Arc<dyn WellnessApiPort>) -> Self {
        Self { api }
    }

    /// Fetches risk and dashboard concurrently.
    ///
    /// A failing dashboard only drops the forward summary; auth errors still fail.
    ///
    /// # Errors
    /// Returns the risk endpoint's error, or an auth error from either call.
    pub async fn load(&self, token: &AuthToken) -> Result<InsightsSummary, ApiError> {
        let (risk, dashboard) =
            tokio::join!(self.api.fetch_risk(token), self.api.fetch_dashboard(token));
        let risk = risk?;

        let future = match dashboard {
            Ok(dashboard) => dashboard.future_risk,
            Err(e) if e.is_auth_error() => return Err(e),
            Err(e) => {
                warn!(error = %e, "Dashboard unavailable, showing risk only");
                None
            }
        };

        debug!(score = risk.score, label = %risk.label, "Insights loaded");
        Ok(InsightsSummary { risk, future })
    }
}
