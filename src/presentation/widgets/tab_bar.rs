use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Tabs, Widget},
};

use crate::presentation::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Breathe,
    Journal,
    Insights,
    Chat,
    Profile,
}

impl Tab {
    pub const ALL: [Self; 5] = [
        Self::Breathe,
        Self::Journal,
        Self::Insights,
        Self::Chat,
        Self::Profile,
    ];

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Breathe => "Breathe",
            Self::Journal => "Journal",
            Self::Insights => "Insights",
            Self::Chat => "Chat",
            Self::Profile => "Profile",
        }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Tab for a `1`-`5` shortcut.
    #[must_use]
    pub fn from_digit(c: char) -> Option<Self> {
        let index = c.to_digit(10)?.checked_sub(1)?;
        Self::ALL.get(usize::try_from(index).ok()?).copied()
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    #[must_use]
    pub const fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

pub struct TabBar<'a> {
    selected: Tab,
    theme: &'a Theme,
}

impl<'a> TabBar<'a> {
    #[must_use]
    pub const fn new(selected: Tab, theme: &'a Theme) -> Self {
        Self { selected, theme }
    }
}

impl Widget for TabBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let titles = Tab::ALL.iter().enumerate().map(|(i, tab)| {
            Line::from(vec![
                Span::styled(format!("{} ", i + 1), self.theme.dimmed_style),
                Span::raw(tab.title()),
            ])
        });

        Tabs::new(titles)
            .select(self.selected.index())
            .style(self.theme.base_style)
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider(Span::styled("│", self.theme.dimmed_style))
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycling_wraps() {
        assert_eq!(Tab::Chat.next(), Tab::Profile);
        assert_eq!(Tab::Profile.next(), Tab::Breathe);
        assert_eq!(Tab::Breathe.previous(), Tab::Profile);
        assert_eq!(Tab::Journal.next(), Tab::Insights);
    }

    #[test]
    fn test_digit_shortcuts() {
        assert_eq!(Tab::from_digit('1'), Some(Tab::Breathe));
        assert_eq!(Tab::from_digit('4'), Some(Tab::Chat));
        assert_eq!(Tab::from_digit('5'), Some(Tab::Profile));
        assert_eq!(Tab::from_digit('0'), None);
        assert_eq!(Tab::from_digit('6'), None);
        assert_eq!(Tab::from_digit('x'), None);
    }
}
