//! Stateful application services owned by the event loop.

mod breathing_controller;
mod status_feed;

pub use breathing_controller::{
    BreathingController, DEFAULT_SESSION, SessionProgress, TICK_PERIOD,
};
pub use status_feed::{StatusFeed, StatusLevel, StatusMessage};
