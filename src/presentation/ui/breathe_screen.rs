//! Guided breathing screen.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, StatefulWidget, Widget},
};
use tokio::time::Instant;

use crate::application::services::BreathingController;
use crate::domain::entities::CycleSnapshot;
use crate::presentation::theme::{Theme, parse_color};
use crate::presentation::widgets::{BreathPacer, PacerFrame};

/// Text shown under the pacer.
#[must_use]
pub fn phase_caption(snapshot: &CycleSnapshot) -> String {
    if snapshot.running {
        snapshot.phase.label().to_string()
    } else {
        "Ready".to_string()
    }
}

pub struct BreatheScreen<'a> {
    controller: &'a BreathingController,
    theme: &'a Theme,
    now: Instant,
}

impl<'a> BreatheScreen<'a> {
    #[must_use]
    pub const fn new(controller: &'a BreathingController, theme: &'a Theme, now: Instant) -> Self {
        Self {
            controller,
            theme,
            now,
        }
    }

    fn render_techniques(&self, area: Rect, buf: &mut Buffer) {
        let current = &self.controller.technique().id;
        let items: Vec<ListItem<'_>> = self
            .controller
            .catalog()
            .techniques()
            .iter()
            .map(|technique| {
                let lines = vec![
                    Line::from(vec![
                        Span::styled(
                            technique.name.as_str(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(format!("  {}", technique.pattern()), self.theme.dimmed_style),
                    ]),
                    Line::styled(technique.description.as_str(), self.theme.dimmed_style),
                ];
                ListItem::new(lines)
            })
            .collect();

        let mut state = ListState::default().with_selected(self.controller.catalog().position(current));
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.dimmed_style)
                    .title(" Techniques "),
            )
            .highlight_style(self.theme.selection_style)
            .highlight_symbol("▸ ");
        StatefulWidget::render(list, area, buf, &mut state);
    }

    fn render_session(&self, area: Rect, buf: &mut Buffer) {
        let technique = self.controller.technique();
        let accent = parse_color(&technique.color);
        let snapshot = self.controller.snapshot();

        let [pacer_area, caption_area, gauge_area] = Layout::vertical([
            Constraint::Min(6),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let timeline = self.controller.timeline();
        let frame = if snapshot.running {
            PacerFrame::sample(timeline.as_ref(), self.controller.cycle_position(self.now))
        } else {
            PacerFrame::REST
        };
        (&BreathPacer::new(frame, accent)).render(pacer_area, buf);

        let caption = vec![
            Line::styled(
                phase_caption(&snapshot),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                format!("{}s", snapshot.seconds_remaining),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                if snapshot.running {
                    "Space to stop"
                } else {
                    "Space to begin"
                },
                self.theme.dimmed_style,
            ),
        ];
        Paragraph::new(caption)
            .alignment(Alignment::Center)
            .render(caption_area, buf);

        let progress = self.controller.progress();
        let label = if progress.target_secs() == 0 {
            format!("{} cycles", progress.completed_cycles())
        } else {
            format!(
                "{}  ·  {} cycles",
                progress.label(),
                progress.completed_cycles()
            )
        };
        Gauge::default()
            .gauge_style(Style::default().fg(accent))
            .ratio(progress.fraction())
            .label(label)
            .use_unicode(true)
            .render(gauge_area, buf);
    }
}

impl Widget for BreatheScreen<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [list_area, session_area] =
            Layout::horizontal([Constraint::Length(32), Constraint::Min(20)]).areas(area);

        self.render_techniques(list_area, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.dimmed_style)
            .title(format!(" {} ", self.controller.technique().name));
        let inner = block.inner(session_area);
        block.render(session_area, buf);
        self.render_session(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::DEFAULT_SESSION;
    use crate::domain::entities::{Phase, TechniqueCatalog};

    #[test]
    fn test_caption_ready_when_idle() {
        let idle = CycleSnapshot {
            phase: Phase::Inhale,
            seconds_remaining: 4,
            running: false,
        };
        let holding = CycleSnapshot {
            phase: Phase::HoldEmpty,
            seconds_remaining: 2,
            running: true,
        };

        assert_eq!(phase_caption(&idle), "Ready");
        assert_eq!(phase_caption(&holding), "Hold (Empty)");
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_shows_techniques_and_countdown() {
        let controller = BreathingController::new(TechniqueCatalog::builtin(), None, DEFAULT_SESSION);
        let theme = Theme::default();
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);

        BreatheScreen::new(&controller, &theme, Instant::now()).render(area, &mut buf);

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Box Breathing"));
        assert!(text.contains("4-7-8"));
        assert!(text.contains("Ready"));
        assert!(text.contains("4s"));
    }
}
