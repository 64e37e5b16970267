//! Profile viewing and editing use case.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{AuthToken, ProfileUpdate, UserProfile};
use crate::domain::errors::ApiError;
use crate::domain::ports::WellnessApiPort;

/// Loads and updates the signed-in user's profile.
pub struct ProfileUseCase {
    api: Arc<dyn WellnessApiPort>,
}

impl ProfileUseCase {
    #[must_use]
    pub const fn new(api: Arc<dyn WellnessApiPort>) -> Self {
        Self { api }
    }

    /// # Errors
    /// Propagates backend errors.
    pub async fn fetch(&self, token: &AuthToken) -> Result<UserProfile, ApiError> {
        self.api.fetch_profile(token).await
    }

    /// Sends the changed fields.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` for an empty update or an email
    /// without `@`, or a backend error such as an address already in use.
    pub async fn update(
        &self,
        token: &AuthToken,
        update: ProfileUpdate,
    ) -> Result<UserProfile, ApiError> {
        if update.is_empty() {
            return Err(ApiError::invalid_request("nothing changed"));
        }
        if let Some(email) = &update.email
            && !is_plausible_email(email)
        {
            return Err(ApiError::invalid_request(format!("`{email}` is not an email address")));
        }

        debug!(?update, "Updating profile");
        let stored = self.api.update_profile(token, &update).await?;
        info!(user_id = stored.id, "Profile updated");
        Ok(stored)
    }
}

fn is_plausible_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}
