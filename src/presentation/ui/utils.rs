use chrono::{DateTime, Local, Utc};
use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Rect of `percent_x` by `percent_y` of `area`, centered.
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    cell
}

/// Formats a backend timestamp in local time.
#[must_use]
pub fn format_local(timestamp: &DateTime<Utc>, format: &str) -> String {
    timestamp.with_timezone(&Local).format(format).to_string()
}
