//! Domain error types.

mod api_error;
mod technique_error;

pub use api_error::ApiError;
pub use technique_error::TechniqueError;
