//! REST adapter for the wellness backend.

mod client;
mod dto;

pub use client::WellnessApiClient;
