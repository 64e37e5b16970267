//! Data transfer objects for the application layer.

mod token_dto;

pub use token_dto::{ResolvedToken, TokenSource};
