mod token_storage_port;
mod wellness_api_port;

pub use token_storage_port::TokenStoragePort;
pub use wellness_api_port::WellnessApiPort;

#[cfg(test)]
pub mod mocks {
    pub use super::token_storage_port::mock::MockTokenStorage;
    pub use super::wellness_api_port::mock::MockWellnessApi;
}
