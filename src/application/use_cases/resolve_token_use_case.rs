//! Token resolution use case.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::application::dto::{ResolvedToken, TokenSource};
use crate::domain::entities::AuthToken;
use crate::domain::ports::TokenStoragePort;

/// Resolves the backend token from the keyring or the command line.
pub struct ResolveTokenUseCase {
    storage_port: Arc<dyn TokenStoragePort>,
}

impl ResolveTokenUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(storage_port: Arc<dyn TokenStoragePort>) -> Self {
        Self { storage_port }
    }

    /// Resolves token from keyring, then `--token` / `BHAVYA_TOKEN`.
    ///
    /// A failing keyring is logged and skipped, so this never errors.
    pub async fn execute(&self, cli_token: Option<String>) -> Option<ResolvedToken> {
        debug!("Checking keyring for stored token");
        match self.storage_port.get_token().await {
            Ok(Some(token)) => {
                info!(token = %token, "Using token from system keyring");
                return Some(ResolvedToken::new(token, TokenSource::Keyring));
            }
            Ok(None) => debug!("No token found in keyring"),
            Err(e) => warn!(error = %e, "Failed to read keyring"),
        }

        if let Some(raw) = cli_token.filter(|s| !s.trim().is_empty()) {
            if let Some(token) = AuthToken::new(raw) {
                info!(token = %token, "Using token from command line / environment");
                return Some(ResolvedToken::new(token, TokenSource::CommandLine));
            }
            warn!("Command-line token has invalid format");
        }

        debug!("No token found in any source");
        None
    }
}
