//! Guided breathing controller.
//!
//! Owns the cycle state, the single one-second tick source and the session
//! progress. Everything runs on the UI event loop; the ticker is a plain
//! `tokio::time::Interval` that is dropped to cancel it, so a stopped or
//! switched controller can never observe a stale tick.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};
use tracing::{debug, info};

use crate::domain::entities::{
    BreathingTechnique, CycleSnapshot, CycleState, TechniqueCatalog, TickOutcome, Timeline,
};
use crate::domain::errors::TechniqueError;

/// Resolution of the breathing countdown.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Session length used when none is configured.
pub const DEFAULT_SESSION: Duration = Duration::from_secs(5 * 60);

/// At most one armed interval at a time.
#[derive(Debug, Default)]
struct Ticker {
    interval: Option<Interval>,
}

impl Ticker {
    fn arm(&mut self) {
        let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    fn cancel(&mut self) {
        self.interval = None;
    }

    const fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    async fn tick(&mut self) {
        match &mut self.interval {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

/// Running time and completed cycles for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    elapsed_secs: u32,
    completed_cycles: u32,
    target_secs: u32,
}

impl SessionProgress {
    #[must_use]
    pub fn new(target: Duration) -> Self {
        Self {
            elapsed_secs: 0,
            completed_cycles: 0,
            target_secs: u32::try_from(target.as_secs()).unwrap_or(u32::MAX),
        }
    }

    /// Counts one running second. Returns `true` on the second that reaches the target.
    pub fn record(&mut self, outcome: TickOutcome) -> bool {
        if outcome == TickOutcome::Idle {
            return false;
        }
        self.elapsed_secs = self.elapsed_secs.saturating_add(1);
        if outcome.completed_cycle() {
            self.completed_cycles += 1;
        }
        self.target_secs > 0 && self.elapsed_secs == self.target_secs
    }

    pub fn reset(&mut self) {
        self.elapsed_secs = 0;
        self.completed_cycles = 0;
    }

    #[must_use]
    pub const fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    #[must_use]
    pub const fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    #[must_use]
    pub const fn target_secs(&self) -> u32 {
        self.target_secs
    }

    /// Share of the target reached, capped at 1.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.target_secs == 0 {
            return 0.0;
        }
        (f64::from(self.elapsed_secs) / f64::from(self.target_secs)).min(1.0)
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.target_secs > 0 && self.elapsed_secs >= self.target_secs
    }

    /// `mm:ss / mm:ss` label.
    #[must_use]
    pub fn label(&self) -> String {
        format!(
            "{} / {}",
            format_clock(self.elapsed_secs),
            format_clock(self.target_secs)
        )
    }
}

fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Drives the breathing cycle for the active technique.
#[derive(Debug)]
pub struct BreathingController {
    catalog: TechniqueCatalog,
    cycle: CycleState,
    ticker: Ticker,
    progress: SessionProgress,
    last_tick_at: Option<Instant>,
}

impl BreathingController {
    /// Creates an idle controller on `initial_id`, or the first catalog entry.
    #[must_use]
    pub fn new(catalog: TechniqueCatalog, initial_id: Option<&str>, session: Duration) -> Self {
        let technique = initial_id
            .and_then(|id| catalog.get(id))
            .or_else(|| catalog.first())
            .cloned()
            .unwrap_or_default();

        Self {
            catalog,
            cycle: CycleState::new(technique),
            ticker: Ticker::default(),
            progress: SessionProgress::new(session),
            last_tick_at: None,
        }
    }

    #[must_use]
    pub const fn catalog(&self) -> &TechniqueCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn technique(&self) -> &BreathingTechnique {
        self.cycle.technique()
    }

    #[must_use]
    pub const fn snapshot(&self) -> CycleSnapshot {
        self.cycle.snapshot()
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.cycle.is_running()
    }

    #[must_use]
    pub const fn progress(&self) -> SessionProgress {
        self.progress
    }

    #[must_use]
    pub fn timeline(&self) -> Option<Timeline> {
        self.technique().timeline()
    }

    /// Replaces the active technique, stopping the cycle if it was running.
    pub fn select_technique(&mut self, technique: BreathingTechnique) {
        let was_running = self.is_running();
        self.ticker.cancel();
        self.last_tick_at = None;
        self.progress.reset();
        info!(
            technique = %technique.id,
            pattern = %technique.pattern(),
            was_running,
            "Breathing technique selected"
        );
        self.cycle.replace_technique(technique);
    }

    /// Selects a catalog technique by id.
    ///
    /// # Errors
    /// Returns `TechniqueError::Unknown` if no technique has that id.
    pub fn select_by_id(&mut self, id: &str) -> Result<(), TechniqueError> {
        let technique = self
            .catalog
            .get(id)
            .cloned()
            .ok_or_else(|| TechniqueError::Unknown(id.to_string()))?;
        self.select_technique(technique);
        Ok(())
    }

    /// Selects the next catalog technique. Returns `false` at the end of the list.
    pub fn select_next(&mut self) -> bool {
        match self.catalog.next_after(&self.technique().id).cloned() {
            Some(next) => {
                self.select_technique(next);
                true
            }
            None => false,
        }
    }

    /// Selects the previous catalog technique. Returns `false` at the start of the list.
    pub fn select_previous(&mut self) -> bool {
        match self.catalog.previous_before(&self.technique().id).cloned() {
            Some(previous) => {
                self.select_technique(previous);
                true
            }
            None => false,
        }
    }

    /// Starts the cycle from the inhale phase with a fresh ticker.
    pub fn start(&mut self) {
        self.ticker.cancel();
        self.cycle.start();
        self.progress.reset();
        self.ticker.arm();
        self.last_tick_at = Some(Instant::now());
        info!(technique = %self.technique().id, "Breathing cycle started");
    }

    /// Stops the cycle and resets the display to the inhale duration.
    pub fn stop(&mut self) {
        self.ticker.cancel();
        self.cycle.stop();
        self.last_tick_at = None;
        info!(
            technique = %self.technique().id,
            elapsed_secs = self.progress.elapsed_secs(),
            cycles = self.progress.completed_cycles(),
            "Breathing cycle stopped"
        );
        self.progress.reset();
    }

    /// Starts when idle, stops when running.
    pub fn toggle(&mut self) {
        if self.is_running() {
            self.stop();
        } else {
            self.start();
        }
    }

    /// Applies one elapsed second.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.cycle.tick();
        if outcome == TickOutcome::Idle {
            return outcome;
        }

        self.last_tick_at = Some(Instant::now());
        if let TickOutcome::Transitioned { from, to } = outcome {
            debug!(%from, %to, seconds = self.cycle.seconds_remaining(), "Breathing phase changed");
        }
        if self.progress.record(outcome) {
            info!(
                cycles = self.progress.completed_cycles(),
                "Breathing session target reached"
            );
        }
        outcome
    }

    /// Resolves when the next tick is due. Never resolves while idle.
    pub async fn next_tick(&mut self) {
        self.ticker.tick().await;
    }

    /// Whether a tick source is currently armed.
    #[must_use]
    pub const fn has_ticker(&self) -> bool {
        self.ticker.is_armed()
    }

    /// Position within the current cycle in `[0, 1)`, smoothed between ticks.
    #[must_use]
    pub fn cycle_position(&self, now: Instant) -> f64 {
        let total = self.technique().cycle_secs();
        if !self.is_running() || total == 0 {
            return 0.0;
        }

        let since_tick = self
            .last_tick_at
            .map_or(Duration::ZERO, |at| now.saturating_duration_since(at))
            .min(TICK_PERIOD);
        let elapsed = f64::from(self.cycle.elapsed_in_cycle()) + since_tick.as_secs_f64();
        (elapsed / f64::from(total)).rem_euclid(1.0)
    }
}
