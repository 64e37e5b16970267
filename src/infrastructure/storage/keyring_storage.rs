//! Keyring-based token storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::AuthToken;
use crate::domain::errors::ApiError;
use crate::domain::ports::TokenStoragePort;

const KEYRING_SERVICE: &str = "bhavya";
const KEYRING_USER: &str = "access_token";

/// System keyring token storage adapter.
pub struct KeyringTokenStorage {
    service: String,
    user: String,
}

impl KeyringTokenStorage {
    /// Creates new storage with default names.
    #[must_use]
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_USER)
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, ApiError> {
        Entry::new(&self.service, &self.user)
            .map_err(|e| ApiError::token_storage(format!("failed to access keyring: {e}")))
    }
}

impl Default for KeyringTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStoragePort for KeyringTokenStorage {
    async fn get_token(&self) -> Result<Option<AuthToken>, ApiError> {
        debug!(service = %self.service, "Retrieving token from keyring");

        match self.entry()?.get_password() {
            Ok(password) => {
                let token = AuthToken::new(password);
                if token.is_none() {
                    warn!("Keyring entry is not a usable token");
                }
                Ok(token)
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ApiError::token_storage(e.to_string())),
        }
    }

    async fn store_token(&self, token: &AuthToken) -> Result<(), ApiError> {
        debug!(service = %self.service, token = %token, "Storing token in keyring");

        self.entry()?
            .set_password(token.as_str())
            .map_err(|e| ApiError::token_storage(e.to_string()))
    }

    async fn delete_token(&self) -> Result<(), ApiError> {
        debug!(service = %self.service, "Deleting token from keyring");

        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ApiError::token_storage(e.to_string())),
        }
    }
}
