//! Breathing pacer: an expanding circle with a halo, driven by the cycle timeline.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Circle},
    },
};

use crate::domain::entities::Timeline;
use crate::presentation::theme::fade;

/// Circle radius at rest, in canvas units. The halo grows to 1.5x of this.
const BASE_RADIUS: f64 = 0.45;

/// Scale and opacity at a point in the cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacerFrame {
    pub circle_scale: f64,
    pub ring_scale: f64,
    pub ring_opacity: f64,
}

impl PacerFrame {
    /// Frame shown while idle.
    pub const REST: Self = Self {
        circle_scale: 1.0,
        ring_scale: 1.0,
        ring_opacity: 0.3,
    };

    /// Samples the timeline; `None` yields the rest frame.
    #[must_use]
    pub fn sample(timeline: Option<&Timeline>, position: f64) -> Self {
        timeline.map_or(Self::REST, |t| Self {
            circle_scale: t.circle_scale_at(position),
            ring_scale: t.ring_scale_at(position),
            ring_opacity: t.ring_opacity_at(position),
        })
    }
}

pub struct BreathPacer {
    frame: PacerFrame,
    color: Color,
}

impl BreathPacer {
    #[must_use]
    pub const fn new(frame: PacerFrame, color: Color) -> Self {
        Self { frame, color }
    }
}

impl Widget for &BreathPacer {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Cells are about twice as tall as wide.
        let aspect = f64::from(area.width) / (f64::from(area.height) * 2.0);
        let (x_half, y_half) = if aspect >= 1.0 {
            (aspect, 1.0)
        } else {
            (1.0, 1.0 / aspect)
        };

        let circle_radius = BASE_RADIUS * self.frame.circle_scale;
        let ring_radius = BASE_RADIUS * self.frame.ring_scale;
        let ring_color = fade(self.color, self.frame.ring_opacity);
        let core_color = self.color;

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-x_half, x_half])
            .y_bounds([-y_half, y_half])
            .paint(|ctx| {
                ctx.draw(&Circle {
                    x: 0.0,
                    y: 0.0,
                    radius: ring_radius,
                    color: ring_color,
                });
                ctx.layer();
                for step in 1..=6 {
                    ctx.draw(&Circle {
                        x: 0.0,
                        y: 0.0,
                        radius: circle_radius * f64::from(step) / 6.0,
                        color: core_color,
                    });
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::BreathingTechnique;

    #[test]
    fn test_rest_frame_without_timeline() {
        assert_eq!(PacerFrame::sample(None, 0.4), PacerFrame::REST);
    }

    #[test]
    fn test_frame_peaks_after_inhale() {
        let timeline = BreathingTechnique::box_breathing().timeline().unwrap();

        let start = PacerFrame::sample(Some(&timeline), 0.0);
        let held = PacerFrame::sample(Some(&timeline), 0.375);

        assert!((start.circle_scale - 1.0).abs() < 1e-9);
        assert!((held.circle_scale - 1.4).abs() < 1e-9);
        assert!((held.ring_scale - 1.5).abs() < 1e-9);
        assert!((held.ring_opacity - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_render_draws_inside_area() {
        let area = Rect::new(0, 0, 20, 10);
        let mut buf = Buffer::empty(area);

        (&BreathPacer::new(PacerFrame::REST, Color::Cyan)).render(area, &mut buf);

        let painted = buf.content().iter().filter(|c| c.symbol() != " ").count();
        assert!(painted > 0);
    }
}
