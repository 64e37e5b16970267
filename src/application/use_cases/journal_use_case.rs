//! Journal use case.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::entities::{AuthToken, JournalEntry, NewJournalEntry};
use crate::domain::errors::ApiError;
use crate::domain::ports::WellnessApiPort;

/// Lists and writes journal entries.
pub struct JournalUseCase {
    api: Arc<dyn WellnessApiPort>,
}

impl JournalUseCase {
    #[must_use]
    pub const fn new(api: Arc<dyn WellnessApiPort>) -> Self {
        Self { api }
    }

    /// Entries sorted newest first.
    ///
    /// # Errors
    /// Propagates backend errors.
    pub async fn list(&self, token: &AuthToken) -> Result<Vec<JournalEntry>, ApiError> {
        let mut entries = self.api.list_journal_entries(token).await?;
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        debug!(count = entries.len(), "Journal entries loaded");
        Ok(entries)
    }

    /// Creates an entry.
    ///
    /// # Errors
    /// Returns `ApiError::InvalidRequest` for blank content, or a backend error.
    pub async fn create(
        &self,
        token: &AuthToken,
        entry: NewJournalEntry,
    ) -> Result<JournalEntry, ApiError> {
        if entry.content.trim().is_empty() {
            return Err(ApiError::invalid_request("journal entry is empty"));
        }

        let stored = self.api.create_journal_entry(token, &entry).await?;
        info!(id = stored.id, mood = ?stored.mood, "Journal entry saved");
        Ok(stored)
    }
}
