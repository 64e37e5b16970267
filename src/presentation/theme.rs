//! Colors derived from the configured accent.

use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;
use tracing::warn;

use crate::application::services::StatusLevel;

const FALLBACK_ACCENT: Color = Color::Rgb(0x13, 0xec, 0xda);

#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub accent: Color,
    pub selection_style: Style,
    pub dimmed_style: Style,
    pub title_style: Style,
    pub base_style: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_color(FALLBACK_ACCENT)
    }
}

impl Theme {
    #[must_use]
    pub fn new(accent_color: &str) -> Self {
        Self::from_color(parse_color(accent_color))
    }

    #[must_use]
    pub fn from_color(accent: Color) -> Self {
        Self {
            accent,
            selection_style: Style::default()
                .bg(fade(accent, 0.3))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            dimmed_style: Style::default().fg(Color::DarkGray),
            title_style: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            base_style: Style::default().fg(Color::Reset),
        }
    }

    #[must_use]
    pub const fn status_color(level: StatusLevel) -> Color {
        match level {
            StatusLevel::Info => Color::Cyan,
            StatusLevel::Success => Color::Green,
            StatusLevel::Warn => Color::Yellow,
            StatusLevel::Error => Color::Red,
        }
    }
}

/// Parses a color name or `#rrggbb`, falling back to the default accent.
#[must_use]
pub fn parse_color(s: &str) -> Color {
    Color::from_str(s.trim()).unwrap_or_else(|_| {
        warn!(color = s, "Unrecognized color, using default accent");
        FALLBACK_ACCENT
    })
}

/// Scales an RGB color toward black. `opacity` is clamped to `0..=1`.
#[must_use]
pub fn fade(color: Color, opacity: f64) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(scale(r, opacity), scale(g, opacity), scale(b, opacity)),
        other if opacity < 0.5 => match other {
            Color::LightCyan => Color::Cyan,
            Color::LightGreen => Color::Green,
            Color::LightBlue => Color::Blue,
            Color::LightMagenta => Color::Magenta,
            Color::LightYellow => Color::Yellow,
            Color::LightRed => Color::Red,
            Color::White => Color::Gray,
            _ => Color::DarkGray,
        },
        other => other,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn scale(channel: u8, factor: f64) -> u8 {
    (f64::from(channel) * factor).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_and_names() {
        assert_eq!(parse_color("#13ecda"), Color::Rgb(0x13, 0xec, 0xda));
        assert_eq!(parse_color("magenta"), Color::Magenta);
        assert_eq!(parse_color("not-a-color"), FALLBACK_ACCENT);
    }

    #[test]
    fn test_fade_scales_rgb() {
        assert_eq!(fade(Color::Rgb(200, 100, 0), 0.5), Color::Rgb(100, 50, 0));
        assert_eq!(fade(Color::Rgb(200, 100, 0), 2.0), Color::Rgb(200, 100, 0));
        assert_eq!(fade(Color::LightCyan, 0.3), Color::Cyan);
        assert_eq!(fade(Color::LightCyan, 0.6), Color::LightCyan);
    }
}
