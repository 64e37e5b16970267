//! Status bar widget.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::application::services::StatusLevel;
use crate::presentation::theme::Theme;

/// One-line bar: message on the left, context in the center, key hints on the right.
#[derive(Debug, Clone, Default)]
pub struct StatusBar {
    left: String,
    center: String,
    right: String,
    level: StatusLevel,
}

impl StatusBar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn left(mut self, content: impl Into<String>) -> Self {
        self.left = content.into();
        self
    }

    #[must_use]
    pub fn center(mut self, content: impl Into<String>) -> Self {
        self.center = content.into();
        self
    }

    #[must_use]
    pub fn right(mut self, content: impl Into<String>) -> Self {
        self.right = content.into();
        self
    }

    #[must_use]
    pub const fn level(mut self, level: StatusLevel) -> Self {
        self.level = level;
        self
    }
}

impl Widget for &StatusBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let message_style = Style::default()
            .fg(Theme::status_color(self.level))
            .add_modifier(Modifier::BOLD);
        let hint_style = Style::default().add_modifier(Modifier::DIM);

        let [left_area, center_area, right_area] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(width_of(&self.center)),
            Constraint::Fill(1),
        ])
        .areas(area);

        Line::styled(self.left.as_str(), message_style).render(left_area, buf);
        Line::styled(self.center.as_str(), hint_style)
            .centered()
            .render(center_area, buf);
        Line::styled(self.right.as_str(), hint_style)
            .right_aligned()
            .render(right_area, buf);
    }
}

fn width_of(text: &str) -> u16 {
    u16::try_from(text.width()).unwrap_or(u16::MAX)
}
