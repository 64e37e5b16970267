//! Respiration phases and the countdown state of a breathing cycle.

use std::fmt;

use super::technique::BreathingTechnique;

/// One of the four respiration phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    #[default]
    Inhale,
    /// Hold with full lungs.
    Hold,
    Exhale,
    /// Hold with empty lungs.
    HoldEmpty,
}

impl Phase {
    /// All phases in cycle order.
    pub const ALL: [Self; 4] = [Self::Inhale, Self::Hold, Self::Exhale, Self::HoldEmpty];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Inhale => "Inhale",
            Self::Hold => "Hold",
            Self::Exhale => "Exhale",
            Self::HoldEmpty => "Hold (Empty)",
        }
    }

    /// Phase entered when `self` runs out under `technique`.
    ///
    /// Holds with a zero duration are skipped, never entered.
    #[must_use]
    pub const fn transition(self, technique: &BreathingTechnique) -> Self {
        match self {
            Self::Inhale if technique.hold > 0 => Self::Hold,
            Self::Inhale | Self::Hold => Self::Exhale,
            Self::Exhale if technique.hold_out > 0 => Self::HoldEmpty,
            Self::Exhale | Self::HoldEmpty => Self::Inhale,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Read-only view of the cycle handed to the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleSnapshot {
    pub phase: Phase,
    pub seconds_remaining: u32,
    pub running: bool,
}

/// Result of applying one second to the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Cycle is not running; nothing changed.
    Idle,
    /// Countdown decremented within the current phase.
    Counted,
    /// Countdown ran out and the cycle moved to a new phase.
    Transitioned { from: Phase, to: Phase },
}

impl TickOutcome {
    /// Whether this tick closed a full cycle.
    #[must_use]
    pub const fn completed_cycle(self) -> bool {
        matches!(
            self,
            Self::Transitioned {
                to: Phase::Inhale,
                ..
            }
        )
    }
}

/// Countdown state for the active technique.
///
/// When idle the state always reads `Inhale` with the inhale duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleState {
    technique: BreathingTechnique,
    phase: Phase,
    seconds_remaining: u32,
    running: bool,
}

impl CycleState {
    /// Creates idle state for `technique`.
    #[must_use]
    pub fn new(technique: BreathingTechnique) -> Self {
        let seconds_remaining = technique.inhale;
        Self {
            technique,
            phase: Phase::Inhale,
            seconds_remaining,
            running: false,
        }
    }

    #[must_use]
    pub const fn technique(&self) -> &BreathingTechnique {
        &self.technique
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    #[must_use]
    pub const fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub const fn snapshot(&self) -> CycleSnapshot {
        CycleSnapshot {
            phase: self.phase,
            seconds_remaining: self.seconds_remaining,
            running: self.running,
        }
    }

    /// Resets to the inhale phase and marks the cycle running.
    pub fn start(&mut self) {
        self.reset();
        self.running = true;
    }

    /// Marks the cycle idle and resets to the inhale phase.
    pub fn stop(&mut self) {
        self.running = false;
        self.reset();
    }

    /// Discards the countdown and replaces the technique. Always leaves the cycle idle.
    pub fn replace_technique(&mut self, technique: BreathingTechnique) {
        *self = Self::new(technique);
    }

    /// Applies one elapsed second.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        if self.seconds_remaining > 1 {
            self.seconds_remaining -= 1;
            return TickOutcome::Counted;
        }

        let from = self.phase;
        let to = from.transition(&self.technique);
        self.phase = to;
        self.seconds_remaining = self.technique.duration_of(to);
        TickOutcome::Transitioned { from, to }
    }

    /// Whole seconds elapsed since the current cycle began.
    #[must_use]
    pub const fn elapsed_in_cycle(&self) -> u32 {
        let duration = self.technique.duration_of(self.phase);
        self.technique.offset_of(self.phase) + duration.saturating_sub(self.seconds_remaining)
    }

    fn reset(&mut self) {
        self.phase = Phase::Inhale;
        self.seconds_remaining = self.technique.inhale;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn run(state: &mut CycleState, ticks: usize) -> Vec<Phase> {
        let mut visited = vec![state.phase()];
        for _ in 0..ticks {
            if let TickOutcome::Transitioned { to, .. } = state.tick() {
                visited.push(to);
            }
        }
        visited
    }

    #[test]
    fn test_new_state_is_idle_inhale() {
        let state = CycleState::new(BreathingTechnique::four_seven_eight());
        assert_eq!(
            state.snapshot(),
            CycleSnapshot {
                phase: Phase::Inhale,
                seconds_remaining: 4,
                running: false,
            }
        );
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut state = CycleState::new(BreathingTechnique::box_breathing());
        assert_eq!(state.tick(), TickOutcome::Idle);
        assert_eq!(state.seconds_remaining(), 4);
    }

    #[test]
    fn test_box_breathing_full_cycle_returns_to_inhale() {
        let mut state = CycleState::new(BreathingTechnique::box_breathing());
        state.start();

        let visited = run(&mut state, 16);

        assert_eq!(
            visited,
            vec![
                Phase::Inhale,
                Phase::Hold,
                Phase::Exhale,
                Phase::HoldEmpty,
                Phase::Inhale
            ]
        );
        assert_eq!(state.phase(), Phase::Inhale);
        assert_eq!(state.seconds_remaining(), 4);
        assert!(state.is_running());
    }

    #[test]
    fn test_four_seven_eight_sequence() {
        let mut state = CycleState::new(BreathingTechnique::four_seven_eight());
        state.start();

        let mut durations = Vec::new();
        for _ in 0..19 {
            if let TickOutcome::Transitioned { to, .. } = state.tick() {
                durations.push((to, state.seconds_remaining()));
            }
        }

        assert_eq!(
            durations,
            vec![(Phase::Hold, 7), (Phase::Exhale, 8), (Phase::Inhale, 4)]
        );
    }

    #[test]
    fn test_zero_holds_alternate_inhale_exhale() {
        let mut state = CycleState::new(BreathingTechnique::calm());
        state.start();

        let visited = run(&mut state, 100);

        assert!(visited.iter().all(|p| matches!(p, Phase::Inhale | Phase::Exhale)));
        for pair in visited.windows(2) {
            assert_ne!(pair[0], pair[1]);
        }
    }

    #[test_case(BreathingTechnique::box_breathing() ; "box")]
    #[test_case(BreathingTechnique::four_seven_eight() ; "four seven eight")]
    #[test_case(BreathingTechnique::calm() ; "calm")]
    #[test_case(BreathingTechnique::new("lopsided", "Lopsided", 2, 9).with_hold_out(3) ; "hold out only")]
    fn test_cycle_is_periodic(technique: BreathingTechnique) {
        let period = technique.cycle_secs() as usize;
        let mut state = CycleState::new(technique);
        state.start();
        let start = state.snapshot();

        for second in 1..=period * 3 {
            state.tick();
            if second % period == 0 {
                assert_eq!(state.snapshot(), start);
            }
            assert!(state.seconds_remaining() >= 1);
            assert_ne!(state.technique().duration_of(state.phase()), 0);
        }
    }

    #[test]
    fn test_stop_mid_exhale_resets_to_inhale() {
        let mut state = CycleState::new(BreathingTechnique::four_seven_eight());
        state.start();
        run(&mut state, 13);
        assert_eq!(state.phase(), Phase::Exhale);

        state.stop();

        assert_eq!(
            state.snapshot(),
            CycleSnapshot {
                phase: Phase::Inhale,
                seconds_remaining: 4,
                running: false,
            }
        );
    }

    #[test]
    fn test_replace_technique_discards_countdown() {
        let mut state = CycleState::new(BreathingTechnique::box_breathing());
        state.start();
        run(&mut state, 6);

        state.replace_technique(BreathingTechnique::calm());

        assert!(!state.is_running());
        assert_eq!(state.phase(), Phase::Inhale);
        assert_eq!(state.seconds_remaining(), 5);
        assert_eq!(state.technique().id, "calm");
    }

    #[test]
    fn test_elapsed_in_cycle_tracks_offsets() {
        let mut state = CycleState::new(BreathingTechnique::four_seven_eight());
        state.start();
        assert_eq!(state.elapsed_in_cycle(), 0);

        run(&mut state, 5);
        assert_eq!(state.phase(), Phase::Hold);
        assert_eq!(state.elapsed_in_cycle(), 5);

        run(&mut state, 14);
        assert_eq!(state.elapsed_in_cycle(), 0);
    }

    #[test]
    fn test_completed_cycle_only_on_return_to_inhale() {
        let to_inhale = TickOutcome::Transitioned {
            from: Phase::HoldEmpty,
            to: Phase::Inhale,
        };
        let to_hold = TickOutcome::Transitioned {
            from: Phase::Inhale,
            to: Phase::Hold,
        };
        assert!(to_inhale.completed_cycle());
        assert!(!to_hold.completed_cycle());
        assert!(!TickOutcome::Counted.completed_cycle());
    }
}
