//! Token storage port definition.

use async_trait::async_trait;

use crate::domain::entities::AuthToken;
use crate::domain::errors::ApiError;

/// Port for bearer token persistence.
#[async_trait]
pub trait TokenStoragePort: Send + Sync {
    /// Retrieves stored token.
    async fn get_token(&self) -> Result<Option<AuthToken>, ApiError>;

    /// Stores token securely.
    async fn store_token(&self, token: &AuthToken) -> Result<(), ApiError>;

    /// Deletes stored token.
    async fn delete_token(&self) -> Result<(), ApiError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tokio::sync::RwLock;

    /// In-memory token storage that can be told to fail.
    pub struct MockTokenStorage {
        token: Arc<RwLock<Option<AuthToken>>>,
        unavailable: AtomicBool,
    }

    impl MockTokenStorage {
        /// Creates empty mock storage.
        pub fn new() -> Self {
            Self {
                token: Arc::new(RwLock::new(None)),
                unavailable: AtomicBool::new(false),
            }
        }

        /// Creates mock storage with token.
        pub fn with_token(token: AuthToken) -> Self {
            Self {
                token: Arc::new(RwLock::new(Some(token))),
                unavailable: AtomicBool::new(false),
            }
        }

        /// Storage whose every call fails, like a locked keyring.
        pub fn unavailable() -> Self {
            let storage = Self::new();
            storage.unavailable.store(true, Ordering::SeqCst);
            storage
        }

        /// Checks if token exists.
        pub async fn has_token(&self) -> Result<bool, ApiError> {
            Ok(self.token.read().await.is_some())
        }

        fn check(&self) -> Result<(), ApiError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(ApiError::token_storage("keyring locked"));
            }
            Ok(())
        }
    }

    impl Default for MockTokenStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl TokenStoragePort for MockTokenStorage {
        async fn get_token(&self) -> Result<Option<AuthToken>, ApiError> {
            self.check()?;
            Ok(self.token.read().await.clone())
        }

        async fn store_token(&self, token: &AuthToken) -> Result<(), ApiError> {
            self.check()?;
            *self.token.write().await = Some(token.clone());
            Ok(())
        }

        async fn delete_token(&self) -> Result<(), ApiError> {
            self.check()?;
            *self.token.write().await = None;
            Ok(())
        }
    }
}
