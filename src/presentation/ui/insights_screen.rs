//! Risk insights, today's check-in status, the affective result and the
//! two questionnaire steppers.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};

use super::utils::{centered_rect, format_local};
use crate::application::use_cases::InsightsSummary;
use crate::domain::entities::{
    AFFECTIVE_QUESTIONS, AffectiveAnswers, AffectiveResult, CheckIn, CheckInAnswers,
    CheckInQuestion, FactorKind, MAX_ANSWER, RiskBand, affective_label, answer_label,
};
use crate::presentation::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsightsKeyResult {
    Handled,
    Ignored,
    Refresh,
    Submit(CheckInAnswers),
    Analyze(AffectiveAnswers),
}

/// Keys shared by both steppers.
enum StepperKey {
    Cancel,
    Back,
    Answer(u8),
    Other,
}

impl StepperKey {
    fn from_key(key: KeyEvent) -> Self {
        match key.code {
            KeyCode::Esc => Self::Cancel,
            KeyCode::Backspace => Self::Back,
            KeyCode::Char(c @ '0'..='3') => Self::Answer(c as u8 - b'0'),
            _ => Self::Other,
        }
    }
}

#[must_use]
pub const fn band_color(band: RiskBand) -> Color {
    match band {
        RiskBand::Low => Color::Green,
        RiskBand::Moderate => Color::Yellow,
        RiskBand::High => Color::Red,
    }
}

/// Walks through the questionnaire one answer at a time.
#[derive(Debug, Default)]
pub struct CheckInStepper {
    scores: Vec<u8>,
    submitting: bool,
}

impl CheckInStepper {
    #[must_use]
    pub fn current_question(&self) -> Option<CheckInQuestion> {
        CheckInQuestion::ALL.get(self.scores.len()).copied()
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.scores.len()
    }

    /// Records an answer; returns the full set once the last question is answered.
    pub fn answer(&mut self, score: u8) -> Option<CheckInAnswers> {
        if score > MAX_ANSWER || self.submitting || self.current_question().is_none() {
            return None;
        }
        self.scores.push(score);
        let answers = CheckInAnswers::from_scores(&self.scores)?;
        self.submitting = true;
        Some(answers)
    }

    pub fn back(&mut self) {
        if !self.submitting {
            self.scores.pop();
        }
    }
}

/// Collects the ten affective answers before they are sent for analysis.
#[derive(Debug, Default)]
pub struct AffectiveStepper {
    scores: Vec<u8>,
    analyzing: bool,
}

impl AffectiveStepper {
    #[must_use]
    pub fn current_prompt(&self) -> Option<&'static str> {
        AFFECTIVE_QUESTIONS.get(self.scores.len()).copied()
    }

    #[must_use]
    pub fn answered(&self) -> usize {
        self.scores.len()
    }

    /// Records an answer; returns the full set once the last question is answered.
    pub fn answer(&mut self, score: u8) -> Option<AffectiveAnswers> {
        if score > MAX_ANSWER || self.analyzing || self.current_prompt().is_none() {
            return None;
        }
        self.scores.push(score);
        let answers = AffectiveAnswers::from_scores(&self.scores)?;
        self.analyzing = true;
        Some(answers)
    }

    pub fn back(&mut self) {
        if !self.analyzing {
            self.scores.pop();
        }
    }
}

#[derive(Debug, Default)]
pub struct InsightsScreenState {
    summary: Option<InsightsSummary>,
    today: Option<CheckIn>,
    affective: Option<AffectiveResult>,
    loading: bool,
    stepper: Option<CheckInStepper>,
    affective_stepper: Option<AffectiveStepper>,
}

impl InsightsScreenState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_summary(&mut self, summary: InsightsSummary) {
        self.loading = false;
        self.summary = Some(summary);
    }

    pub fn set_today(&mut self, today: Option<CheckIn>) {
        self.today = today;
    }

    pub fn check_in_submitted(&mut self, check_in: CheckIn) {
        self.today = Some(check_in);
        self.stepper = None;
    }

    /// Drops the stepper after a rejected submission; the user starts over.
    pub fn check_in_failed(&mut self) {
        self.stepper = None;
    }

    pub fn affective_analyzed(&mut self, result: AffectiveResult) {
        self.affective = Some(result);
        self.affective_stepper = None;
    }

    pub fn affective_failed(&mut self) {
        self.affective_stepper = None;
    }

    #[must_use]
    pub const fn affective(&self) -> Option<&AffectiveResult> {
        self.affective.as_ref()
    }

    #[must_use]
    pub const fn summary(&self) -> Option<&InsightsSummary> {
        self.summary.as_ref()
    }

    #[must_use]
    pub const fn today(&self) -> Option<&CheckIn> {
        self.today.as_ref()
    }

    #[must_use]
    pub const fn is_checking_in(&self) -> bool {
        self.stepper.is_some()
    }

    /// Either questionnaire is open.
    #[must_use]
    pub const fn has_popup(&self) -> bool {
        self.stepper.is_some() || self.affective_stepper.is_some()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> InsightsKeyResult {
        if let Some(stepper) = &mut self.stepper {
            return match StepperKey::from_key(key) {
                StepperKey::Cancel => {
                    self.stepper = None;
                    InsightsKeyResult::Handled
                }
                StepperKey::Back => {
                    stepper.back();
                    InsightsKeyResult::Handled
                }
                StepperKey::Answer(score) => stepper
                    .answer(score)
                    .map_or(InsightsKeyResult::Handled, InsightsKeyResult::Submit),
                StepperKey::Other => InsightsKeyResult::Ignored,
            };
        }

        if let Some(stepper) = &mut self.affective_stepper {
            return match StepperKey::from_key(key) {
                StepperKey::Cancel => {
                    self.affective_stepper = None;
                    InsightsKeyResult::Handled
                }
                StepperKey::Back => {
                    stepper.back();
                    InsightsKeyResult::Handled
                }
                StepperKey::Answer(score) => stepper
                    .answer(score)
                    .map_or(InsightsKeyResult::Handled, InsightsKeyResult::Analyze),
                StepperKey::Other => InsightsKeyResult::Ignored,
            };
        }

        match key.code {
            KeyCode::Char('r') => InsightsKeyResult::Refresh,
            KeyCode::Char('c') => {
                self.stepper = Some(CheckInStepper::default());
                InsightsKeyResult::Handled
            }
            KeyCode::Char('a') => {
                self.affective_stepper = Some(AffectiveStepper::default());
                InsightsKeyResult::Handled
            }
            _ => InsightsKeyResult::Ignored,
        }
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let [risk_area, factors_area, bottom_area] = Layout::vertical([
            Constraint::Length(7),
            Constraint::Min(4),
            Constraint::Length(5),
        ])
        .areas(area);
        let [check_in_area, affective_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(bottom_area);

        self.render_risk(risk_area, buf, theme);
        self.render_factors(factors_area, buf, theme);
        self.render_check_in(check_in_area, buf, theme);
        self.render_affective(affective_area, buf, theme);

        let popup = centered_rect(60, 50, area);
        if let Some(stepper) = &self.stepper {
            let prompt = stepper.current_question().map(CheckInQuestion::prompt);
            Questionnaire {
                title: "Check-in",
                heading: "Over the last two weeks:",
                answered: stepper.answered(),
                total: CheckInQuestion::ALL.len(),
                prompt,
                label: answer_label,
                pending: "Submitting…",
            }
            .render(popup, buf, theme);
        } else if let Some(stepper) = &self.affective_stepper {
            Questionnaire {
                title: "Affective analysis",
                heading: "Lately,",
                answered: stepper.answered(),
                total: AFFECTIVE_QUESTIONS.len(),
                prompt: stepper.current_prompt(),
                label: affective_label,
                pending: "Analyzing…",
            }
            .render(popup, buf, theme);
        }
    }

    fn render_risk(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.dimmed_style)
            .title(" Risk ")
            .title_bottom(Line::styled(
                " r refresh · c check in · a affective ",
                theme.dimmed_style,
            ));
        let inner = block.inner(area);
        block.render(area, buf);

        let Some(summary) = &self.summary else {
            let message = if self.loading {
                "Loading insights…"
            } else {
                "No insights yet."
            };
            Paragraph::new(Line::styled(message, theme.dimmed_style)).render(inner, buf);
            return;
        };

        let risk = &summary.risk;
        let color = band_color(risk.band());
        let [score_area, gauge_area, future_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(inner);

        Line::from(vec![
            Span::styled(
                format!("{}", risk.score),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" / 100  "),
            Span::styled(risk.label.as_str(), Style::default().fg(color)),
        ])
        .render(score_area, buf);

        Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(risk.ratio())
            .label("")
            .use_unicode(true)
            .render(gauge_area, buf);

        let future = summary.future.as_ref().map_or_else(
            || Line::styled("No forecast available.", theme.dimmed_style),
            |future| {
                Line::from(vec![
                    Span::styled("Outlook: ", theme.dimmed_style),
                    Span::raw(format!("{} ({}) ", future.label, future.score)),
                    Span::styled(future.prediction.as_str(), theme.dimmed_style),
                ])
            },
        );
        Paragraph::new(future)
            .wrap(Wrap { trim: true })
            .render(future_area, buf);
    }

    fn render_factors(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.dimmed_style)
            .title(" Factors ");

        let lines: Vec<Line<'_>> = self
            .summary
            .iter()
            .flat_map(|s| s.risk.factors.iter())
            .map(|factor| {
                let (sign, color) = match factor.kind {
                    FactorKind::Positive => ("+", Color::Green),
                    FactorKind::Negative => ("-", Color::Red),
                };
                Line::from(vec![
                    Span::styled(format!("{sign} "), Style::default().fg(color)),
                    Span::raw(format!("{:<24}", factor.name)),
                    Span::styled(format!("{:>4}%", factor.percentage), theme.dimmed_style),
                ])
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }

    fn render_check_in(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.dimmed_style)
            .title(" Today ");

        let line = self.today.as_ref().map_or_else(
            || Line::styled("No check-in yet today. Press c to start.", theme.dimmed_style),
            |check_in| {
                Line::from(vec![
                    Span::styled("✓ ", Style::default().fg(Color::Green)),
                    Span::raw(format!(
                        "Checked in at {} · total {}",
                        format_local(&check_in.timestamp, "%H:%M"),
                        check_in.answers.total()
                    )),
                ])
            },
        );
        Paragraph::new(line).block(block).render(area, buf);
    }

    fn render_affective(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.dimmed_style)
            .title(" Affective ");

        let lines = self.affective.as_ref().map_or_else(
            || vec![Line::styled("No analysis yet. Press a to start.", theme.dimmed_style)],
            |result| {
                let color = band_color(result.band());
                let mut lines = vec![Line::from(vec![
                    Span::styled(
                        result.pattern.as_str(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::styled("  risk ", theme.dimmed_style),
                    Span::styled(
                        format!("{}%", result.risk_percent()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                ])];
                if let Some((positive, negative)) = result.mean_balance() {
                    lines.push(Line::from(vec![
                        Span::styled("positive ", theme.dimmed_style),
                        Span::styled(format!("{positive:.2}"), Style::default().fg(Color::Green)),
                        Span::styled(" · negative ", theme.dimmed_style),
                        Span::styled(format!("{negative:.2}"), Style::default().fg(Color::Red)),
                    ]));
                }
                lines
            },
        );
        Paragraph::new(lines).block(block).render(area, buf);
    }
}

/// Popup for one step of a 0-3 questionnaire.
struct Questionnaire {
    title: &'static str,
    heading: &'static str,
    answered: usize,
    total: usize,
    prompt: Option<&'static str>,
    label: fn(u8) -> &'static str,
    pending: &'static str,
}

impl Questionnaire {
    fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .title(format!(
                " {} {}/{} ",
                self.title,
                (self.answered + 1).min(self.total),
                self.total
            ))
            .title_bottom(Line::styled(
                " 0-3 answer · Backspace back · Esc cancel ",
                theme.dimmed_style,
            ));

        let mut lines = Vec::new();
        if let Some(prompt) = self.prompt {
            lines.push(Line::styled(self.heading, theme.dimmed_style));
            lines.push(Line::styled(prompt, theme.title_style));
            lines.push(Line::default());
            for score in 0..=MAX_ANSWER {
                lines.push(Line::from(vec![
                    Span::styled(format!(" {score} "), Style::default().fg(theme.accent)),
                    Span::raw((self.label)(score)),
                ]));
            }
        } else {
            lines.push(Line::styled(self.pending, theme.dimmed_style));
        }

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{RiskData, RiskFactor};
    use crossterm::event::{KeyEventKind, KeyModifiers};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn summary(score: i32) -> InsightsSummary {
        InsightsSummary {
            risk: RiskData {
                score,
                label: "Moderate".to_string(),
                factors: vec![RiskFactor {
                    name: "Sleep".to_string(),
                    value: 2,
                    percentage: 40,
                    kind: FactorKind::Negative,
                }],
            },
            future: None,
        }
    }

    #[test]
    fn test_stepper_submits_after_ten_answers() {
        let mut state = InsightsScreenState::new();
        state.handle_key(key(KeyCode::Char('c')));
        assert!(state.is_checking_in());

        for _ in 0..9 {
            assert_eq!(state.handle_key(key(KeyCode::Char('1'))), InsightsKeyResult::Handled);
        }
        let InsightsKeyResult::Submit(answers) = state.handle_key(key(KeyCode::Char('2'))) else {
            panic!("expected submit");
        };
        assert_eq!(answers.q_sleep_issue, 1);
        assert_eq!(answers.q_overwhelm, 2);
        assert_eq!(answers.total(), 11);

        // Further digits are ignored until the result arrives.
        assert_eq!(state.handle_key(key(KeyCode::Char('3'))), InsightsKeyResult::Handled);
    }

    #[test]
    fn test_stepper_back_and_out_of_range() {
        let mut stepper = CheckInStepper::default();
        assert!(stepper.answer(4).is_none());
        assert_eq!(stepper.answered(), 0);

        stepper.answer(2);
        stepper.answer(3);
        stepper.back();
        assert_eq!(stepper.answered(), 1);
        assert_eq!(stepper.current_question(), Some(CheckInQuestion::Energy));
    }

    #[test]
    fn test_escape_closes_stepper() {
        let mut state = InsightsScreenState::new();
        state.handle_key(key(KeyCode::Char('c')));
        state.handle_key(key(KeyCode::Char('0')));
        state.handle_key(key(KeyCode::Esc));

        assert!(!state.is_checking_in());
        assert_eq!(state.handle_key(key(KeyCode::Char('r'))), InsightsKeyResult::Refresh);
    }

    #[test]
    fn test_affective_stepper_analyzes_after_ten_answers() {
        let mut state = InsightsScreenState::new();
        state.handle_key(key(KeyCode::Char('a')));
        assert!(state.has_popup());
        assert!(!state.is_checking_in());

        for c in "012301230".chars() {
            assert_eq!(state.handle_key(key(KeyCode::Char(c))), InsightsKeyResult::Handled);
        }
        let InsightsKeyResult::Analyze(answers) = state.handle_key(key(KeyCode::Char('1'))) else {
            panic!("expected analysis request");
        };
        assert_eq!(answers.scores(), &[0, 1, 2, 3, 0, 1, 2, 3, 0, 1]);
        assert_eq!(state.handle_key(key(KeyCode::Backspace)), InsightsKeyResult::Handled);

        state.affective_analyzed(AffectiveResult {
            pattern: "Volatile".to_string(),
            risk_score: 0.45,
            emotion_timeline: Vec::new(),
        });
        assert!(!state.has_popup());
        assert_eq!(state.affective().map(|r| r.pattern.as_str()), Some("Volatile"));
    }

    #[test]
    fn test_affective_failure_closes_stepper() {
        let mut state = InsightsScreenState::new();
        state.handle_key(key(KeyCode::Char('a')));
        for _ in 0..10 {
            state.handle_key(key(KeyCode::Char('2')));
        }

        state.affective_failed();

        assert!(!state.has_popup());
        assert!(state.affective().is_none());
        assert_eq!(state.handle_key(key(KeyCode::Char('r'))), InsightsKeyResult::Refresh);
    }

    #[test]
    fn test_render_affective_result_and_popup() {
        let mut state = InsightsScreenState::new();
        state.affective_analyzed(AffectiveResult {
            pattern: "Anxious".to_string(),
            risk_score: 0.7,
            emotion_timeline: Vec::new(),
        });
        state.handle_key(key(KeyCode::Char('a')));
        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);

        state.render(area, &mut buf, &Theme::default());

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("Anxious"));
        assert!(text.contains("70%"));
        assert!(text.contains("Affective analysis 1/10"));
        assert!(text.contains("calm and peaceful"));
    }

    #[test]
    fn test_band_colors() {
        assert_eq!(band_color(summary(10).risk.band()), Color::Green);
        assert_eq!(band_color(summary(55).risk.band()), Color::Yellow);
        assert_eq!(band_color(summary(85).risk.band()), Color::Red);
    }

    #[test]
    fn test_render_shows_score_and_factor() {
        let mut state = InsightsScreenState::new();
        state.set_summary(summary(55));
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);

        state.render(area, &mut buf, &Theme::default());

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("55"));
        assert!(text.contains("Moderate"));
        assert!(text.contains("Sleep"));
        assert!(text.contains("No check-in yet"));
    }
}
