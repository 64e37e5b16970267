//! Presentation layer with UI components and event handling.

/// Event handling.
pub mod events;
/// Accent-derived colors.
pub mod theme;
/// UI screens.
pub mod ui;
/// Reusable widgets.
pub mod widgets;

pub use theme::Theme;
pub use ui::App;
