//! Normalized animation timeline derived from a technique.

use std::time::Duration;

use super::technique::BreathingTechnique;

/// Scale of the breathing circle at each boundary.
pub const CIRCLE_SCALE: [f64; 5] = [1.0, 1.4, 1.4, 1.0, 1.0];
/// Scale of the outer guide ring at each boundary.
pub const RING_SCALE: [f64; 5] = [1.0, 1.5, 1.5, 1.0, 1.0];
/// Opacity of the outer guide ring at each boundary.
pub const RING_OPACITY: [f64; 5] = [0.3, 0.6, 0.6, 0.3, 0.3];

/// Phase boundaries as fractions of one cycle.
///
/// `t0 = 0`, `t1` ends the inhale, `t2` ends the hold, `t3` ends the exhale
/// and `t4 = 1` ends the empty hold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timeline {
    boundaries: [f64; 5],
    period_secs: u32,
}

impl Timeline {
    /// Builds the timeline, `None` when the technique's cycle is zero seconds long.
    #[must_use]
    pub fn for_technique(technique: &BreathingTechnique) -> Option<Self> {
        let total = technique.cycle_secs();
        if total == 0 {
            return None;
        }

        let total_f = f64::from(total);
        let t1 = f64::from(technique.inhale);
        let t2 = t1 + f64::from(technique.hold);
        let t3 = t2 + f64::from(technique.exhale);

        Some(Self {
            boundaries: [0.0, t1 / total_f, t2 / total_f, t3 / total_f, 1.0],
            period_secs: total,
        })
    }

    #[must_use]
    pub const fn boundaries(&self) -> [f64; 5] {
        self.boundaries
    }

    /// Duration of one full keyframe sequence.
    #[must_use]
    pub fn period(&self) -> Duration {
        Duration::from_secs(u64::from(self.period_secs))
    }

    /// Interpolates `keyframes` at cycle `position` in `[0, 1]` with ease-in-out.
    ///
    /// Zero-width segments (skipped holds) are never selected.
    #[must_use]
    pub fn sample(&self, keyframes: &[f64; 5], position: f64) -> f64 {
        let position = position.clamp(0.0, 1.0);
        let b = &self.boundaries;

        for i in 0..4 {
            let (start, end) = (b[i], b[i + 1]);
            if end <= start || position > end {
                continue;
            }
            let local = ((position - start) / (end - start)).clamp(0.0, 1.0);
            let eased = ease_in_out(local);
            return keyframes[i] + (keyframes[i + 1] - keyframes[i]) * eased;
        }

        keyframes[4]
    }

    /// Breathing circle scale at `position`.
    #[must_use]
    pub fn circle_scale_at(&self, position: f64) -> f64 {
        self.sample(&CIRCLE_SCALE, position)
    }

    /// Guide ring scale at `position`.
    #[must_use]
    pub fn ring_scale_at(&self, position: f64) -> f64 {
        self.sample(&RING_SCALE, position)
    }

    /// Guide ring opacity at `position`.
    #[must_use]
    pub fn ring_opacity_at(&self, position: f64) -> f64 {
        self.sample(&RING_OPACITY, position)
    }
}

fn ease_in_out(x: f64) -> f64 {
    if x < 0.5 {
        2.0 * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(2) / 2.0
    }
}
