//! Main application orchestrator.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent};
use futures_util::StreamExt;
use ratatui::layout::{Constraint, Layout};
use ratatui::{DefaultTerminal, Frame};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval};
use tracing::{debug, error, info, warn};

use super::breathe_screen::BreatheScreen;
use super::chat_screen::{ChatKeyResult, ChatScreenState};
use super::insights_screen::{InsightsKeyResult, InsightsScreenState};
use super::journal_screen::{JournalKeyResult, JournalScreenState};
use super::profile_screen::{ProfileKeyResult, ProfileScreenState};
use crate::application::dto::TokenSource;
use crate::application::services::{BreathingController, StatusFeed, StatusLevel};
use crate::application::use_cases::{
    AffectiveUseCase, ChatUseCase, CheckInUseCase, InsightsSummary, InsightsUseCase,
    JournalUseCase, ProfileUseCase, ResolveTokenUseCase, TokenSessionUseCase,
};
use crate::domain::entities::{
    AffectiveResult, AuthToken, ChatMessage, CheckIn, JournalEntry, NewJournalEntry,
    ProfileUpdate, UserProfile,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::{TokenStoragePort, WellnessApiPort};
use crate::infrastructure::config::UiConfig;
use crate::presentation::events::{EventHandler, EventResult};
use crate::presentation::theme::Theme;
use crate::presentation::widgets::{StatusBar, Tab, TabBar};

const FRAME_RATE: Duration = Duration::from_millis(50);

/// Results of spawned backend calls, delivered back to the event loop.
#[derive(Debug)]
enum Action {
    JournalLoaded(Result<Vec<JournalEntry>, ApiError>),
    JournalSaved(Result<JournalEntry, ApiError>),
    InsightsLoaded(Result<InsightsSummary, ApiError>),
    CheckInLoaded(Result<Option<CheckIn>, ApiError>),
    CheckInSubmitted(Result<CheckIn, ApiError>),
    ChatReplied(Result<ChatMessage, ApiError>),
    ProfileLoaded(Result<UserProfile, ApiError>),
    ProfileSaved(Result<UserProfile, ApiError>),
    AffectiveAnalyzed(Result<AffectiveResult, ApiError>),
    TokenRemembered(bool),
}

pub struct App {
    running: bool,
    tab: Tab,
    breathing: BreathingController,
    status: StatusFeed,
    journal: JournalScreenState<'static>,
    insights: InsightsScreenState,
    chat: ChatScreenState<'static>,
    profile: ProfileScreenState<'static>,
    token: Option<AuthToken>,
    /// Command-line token waiting for the backend to accept it.
    unsaved_token: Option<AuthToken>,
    remember_token: bool,
    resolve_token_use_case: ResolveTokenUseCase,
    session_use_case: Arc<TokenSessionUseCase>,
    journal_use_case: Arc<JournalUseCase>,
    insights_use_case: Arc<InsightsUseCase>,
    check_in_use_case: Arc<CheckInUseCase>,
    chat_use_case: Arc<ChatUseCase>,
    profile_use_case: Arc<ProfileUseCase>,
    affective_use_case: Arc<AffectiveUseCase>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    theme: Theme,
}

impl App {
    #[must_use]
    pub fn new(
        api: Arc<dyn WellnessApiPort>,
        storage_port: Arc<dyn TokenStoragePort>,
        breathing: BreathingController,
        ui: &UiConfig,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let mut chat = ChatScreenState::new();
        chat.set_timestamp_format(ui.timestamp_format.clone());

        Self {
            running: true,
            tab: Tab::default(),
            breathing,
            status: StatusFeed::new(Duration::from_secs(ui.status_duration)),
            journal: JournalScreenState::new(),
            insights: InsightsScreenState::new(),
            chat,
            profile: ProfileScreenState::new(),
            token: None,
            unsaved_token: None,
            remember_token: true,
            resolve_token_use_case: ResolveTokenUseCase::new(Arc::clone(&storage_port)),
            session_use_case: Arc::new(TokenSessionUseCase::new(storage_port)),
            journal_use_case: Arc::new(JournalUseCase::new(Arc::clone(&api))),
            insights_use_case: Arc::new(InsightsUseCase::new(Arc::clone(&api))),
            check_in_use_case: Arc::new(CheckInUseCase::new(Arc::clone(&api))),
            chat_use_case: Arc::new(ChatUseCase::new(Arc::clone(&api))),
            profile_use_case: Arc::new(ProfileUseCase::new(Arc::clone(&api))),
            affective_use_case: Arc::new(AffectiveUseCase::new(api)),
            action_tx,
            action_rx,
            theme: Theme::new(&ui.accent_color),
        }
    }

    /// Whether an accepted command-line token is saved to the keyring.
    #[must_use]
    pub fn with_token_persistence(mut self, remember: bool) -> Self {
        self.remember_token = remember;
        self
    }

    /// # Errors
    /// Returns error if drawing to or reading from the terminal fails.
    pub async fn run(
        mut self,
        terminal: &mut DefaultTerminal,
        cli_token: Option<String>,
    ) -> color_eyre::Result<()> {
        self.resolve_token(cli_token).await;
        self.run_event_loop(terminal).await?;

        self.breathing.stop();
        info!("Application exiting normally");
        Ok(())
    }

    async fn resolve_token(&mut self, cli_token: Option<String>) {
        match self.resolve_token_use_case.execute(cli_token).await {
            Some(resolved) => {
                info!(source = %resolved.source, "Found backend token");
                if resolved.source == TokenSource::CommandLine && self.remember_token {
                    self.unsaved_token = Some(resolved.token.clone());
                }
                self.token = Some(resolved.token);
                self.load_journal();
                self.load_insights();
                self.load_profile();
            }
            None => {
                warn!("No backend token; only breathing is available");
                self.status.warn(ApiError::NoToken.to_string());
            }
        }
    }

    async fn run_event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        let mut terminal_events = EventStream::new();
        let mut frame_interval = interval(FRAME_RATE);
        frame_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        terminal.draw(|frame| self.render(frame))?;

        while self.running {
            tokio::select! {
                Some(action) = self.action_rx.recv() => {
                    self.handle_action(action);
                }

                () = self.breathing.next_tick() => {
                    self.on_breathing_tick();
                }

                _ = frame_interval.tick() => {
                    let status_changed = self.status.tick(std::time::Instant::now());
                    if !status_changed && !self.breathing.is_running() {
                        continue;
                    }
                }

                Some(event) = terminal_events.next() => {
                    if let EventResult::Exit = self.handle_terminal_event(event?) {
                        self.running = false;
                    }
                }
            }

            terminal.draw(|frame| self.render(frame))?;
        }

        Ok(())
    }

    fn handle_terminal_event(&mut self, event: Event) -> EventResult {
        match event {
            Event::Key(key) if EventHandler::is_press(&key) => self.handle_key(key),
            _ => EventResult::Continue,
        }
    }

    fn on_breathing_tick(&mut self) {
        let was_complete = self.breathing.progress().is_complete();
        self.breathing.tick();
        if !was_complete && self.breathing.progress().is_complete() {
            self.status.success(format!(
                "Session complete · {} cycles",
                self.breathing.progress().completed_cycles()
            ));
        }
    }

    /// A popup owns the keyboard until it is closed.
    fn has_modal(&self) -> bool {
        self.journal.is_composing() || self.insights.has_popup() || self.profile.is_editing()
    }

    fn captures_text(&self) -> bool {
        self.has_modal() || self.tab == Tab::Chat
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult {
        if EventHandler::is_force_quit(&key) {
            return EventResult::Exit;
        }

        if !self.has_modal() {
            if EventHandler::is_next_tab(&key) {
                self.switch_tab(self.tab.next());
                return EventResult::Continue;
            }
            if EventHandler::is_previous_tab(&key) {
                self.switch_tab(self.tab.previous());
                return EventResult::Continue;
            }
        }

        if !self.captures_text() {
            if EventHandler::is_quit_event(&key) {
                return EventResult::Exit;
            }
            if let KeyCode::Char(c) = key.code
                && let Some(tab) = Tab::from_digit(c)
            {
                self.switch_tab(tab);
                return EventResult::Continue;
            }
        }

        match self.tab {
            Tab::Breathe => self.handle_breathe_key(key),
            Tab::Journal => self.handle_journal_key(key),
            Tab::Insights => self.handle_insights_key(key),
            Tab::Chat => self.handle_chat_key(key),
            Tab::Profile => self.handle_profile_key(key),
        }
        EventResult::Continue
    }

    fn switch_tab(&mut self, tab: Tab) {
        if tab != self.tab {
            debug!(from = self.tab.title(), to = tab.title(), "Switching tab");
            self.tab = tab;
        }
    }

    fn handle_breathe_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.breathing.select_previous();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.breathing.select_next();
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.breathing.toggle(),
            _ => {}
        }
    }

    fn handle_journal_key(&mut self, key: KeyEvent) {
        match self.journal.handle_key(key) {
            JournalKeyResult::Refresh => self.load_journal(),
            JournalKeyResult::Save(entry) => self.save_journal_entry(entry),
            JournalKeyResult::Rejected(reason) => self.status.warn(reason),
            JournalKeyResult::Handled | JournalKeyResult::Ignored => {}
        }
    }

    fn handle_insights_key(&mut self, key: KeyEvent) {
        match self.insights.handle_key(key) {
            InsightsKeyResult::Refresh => self.load_insights(),
            InsightsKeyResult::Submit(answers) => {
                let Some(token) = self.require_token() else {
                    self.insights.check_in_failed();
                    return;
                };
                let use_case = Arc::clone(&self.check_in_use_case);
                self.spawn(async move {
                    Action::CheckInSubmitted(use_case.submit(&token, answers).await)
                });
            }
            InsightsKeyResult::Analyze(answers) => {
                let Some(token) = self.require_token() else {
                    self.insights.affective_failed();
                    return;
                };
                let use_case = Arc::clone(&self.affective_use_case);
                self.spawn(async move {
                    Action::AffectiveAnalyzed(use_case.analyze(&token, answers).await)
                });
            }
            InsightsKeyResult::Handled | InsightsKeyResult::Ignored => {}
        }
    }

    fn handle_chat_key(&mut self, key: KeyEvent) {
        if let ChatKeyResult::Send(text) = self.chat.handle_key(key) {
            let Some(token) = self.require_token() else {
                self.chat.reply_failed();
                return;
            };
            let use_case = Arc::clone(&self.chat_use_case);
            self.spawn(async move { Action::ChatReplied(use_case.send(&token, &text).await) });
        }
    }

    fn handle_profile_key(&mut self, key: KeyEvent) {
        match self.profile.handle_key(key) {
            ProfileKeyResult::Refresh => self.load_profile(),
            ProfileKeyResult::Save(update) => self.save_profile(update),
            ProfileKeyResult::Rejected(reason) => self.status.warn(reason),
            ProfileKeyResult::Handled | ProfileKeyResult::Ignored => {}
        }
    }

    fn require_token(&mut self) -> Option<AuthToken> {
        if self.token.is_none() {
            self.report_error("Backend", &ApiError::NoToken);
        }
        self.token.clone()
    }

    fn spawn<F>(&self, request: F)
    where
        F: Future<Output = Action> + Send + 'static,
    {
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if tx.send(request.await).is_err() {
                debug!("Event loop gone, dropping backend result");
            }
        });
    }

    fn load_journal(&mut self) {
        let Some(token) = self.require_token() else {
            return;
        };
        self.journal.set_loading(true);
        let use_case = Arc::clone(&self.journal_use_case);
        self.spawn(async move { Action::JournalLoaded(use_case.list(&token).await) });
    }

    fn save_journal_entry(&mut self, entry: NewJournalEntry) {
        let Some(token) = self.require_token() else {
            self.journal.save_failed();
            return;
        };
        let use_case = Arc::clone(&self.journal_use_case);
        self.spawn(async move { Action::JournalSaved(use_case.create(&token, entry).await) });
    }

    fn load_insights(&mut self) {
        let Some(token) = self.require_token() else {
            return;
        };
        self.insights.set_loading(true);

        let insights = Arc::clone(&self.insights_use_case);
        let risk_token = token.clone();
        self.spawn(async move { Action::InsightsLoaded(insights.load(&risk_token).await) });

        let check_in = Arc::clone(&self.check_in_use_case);
        self.spawn(async move { Action::CheckInLoaded(check_in.today(&token).await) });
    }

    fn load_profile(&mut self) {
        let Some(token) = self.require_token() else {
            return;
        };
        self.profile.set_loading(true);
        let use_case = Arc::clone(&self.profile_use_case);
        self.spawn(async move { Action::ProfileLoaded(use_case.fetch(&token).await) });
    }

    fn save_profile(&mut self, update: ProfileUpdate) {
        let Some(token) = self.require_token() else {
            self.profile.save_failed();
            return;
        };
        let use_case = Arc::clone(&self.profile_use_case);
        self.spawn(async move { Action::ProfileSaved(use_case.update(&token, update).await) });
    }

    /// Persists a command-line token once a request made with it succeeds.
    fn remember_accepted_token(&mut self) {
        let Some(token) = self.unsaved_token.take() else {
            return;
        };
        let session = Arc::clone(&self.session_use_case);
        self.spawn(async move { Action::TokenRemembered(session.remember(&token).await) });
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::JournalLoaded(Ok(entries)) => {
                self.journal.set_entries(entries);
                self.remember_accepted_token();
            }
            Action::JournalLoaded(Err(e)) => {
                self.journal.set_loading(false);
                self.report_error("Loading journal", &e);
            }
            Action::JournalSaved(Ok(entry)) => {
                self.journal.entry_saved(entry);
                self.status.success("Entry saved");
            }
            Action::JournalSaved(Err(e)) => {
                self.journal.save_failed();
                self.report_error("Saving entry", &e);
            }
            Action::InsightsLoaded(Ok(summary)) => self.insights.set_summary(summary),
            Action::InsightsLoaded(Err(e)) => {
                self.insights.set_loading(false);
                self.report_error("Loading insights", &e);
            }
            Action::CheckInLoaded(Ok(today)) => self.insights.set_today(today),
            Action::CheckInLoaded(Err(e)) => self.report_error("Loading check-in", &e),
            Action::CheckInSubmitted(Ok(check_in)) => {
                self.insights.check_in_submitted(check_in);
                self.status.success("Check-in recorded");
                self.load_insights();
            }
            Action::CheckInSubmitted(Err(e)) => {
                self.insights.check_in_failed();
                self.report_error("Check-in", &e);
            }
            Action::ChatReplied(Ok(reply)) => self.chat.reply_received(reply),
            Action::ChatReplied(Err(e)) => {
                self.chat.reply_failed();
                self.report_error("Chat", &e);
            }
            Action::ProfileLoaded(Ok(profile)) => {
                self.profile.set_profile(profile);
                self.remember_accepted_token();
            }
            Action::ProfileLoaded(Err(e)) => {
                self.profile.set_loading(false);
                self.report_error("Loading profile", &e);
            }
            Action::ProfileSaved(Ok(profile)) => {
                self.profile.profile_saved(profile);
                self.status.success("Profile updated");
            }
            Action::ProfileSaved(Err(e)) => {
                self.profile.save_failed();
                self.report_error("Saving profile", &e);
            }
            Action::AffectiveAnalyzed(Ok(result)) => self.insights.affective_analyzed(result),
            Action::AffectiveAnalyzed(Err(e)) => {
                self.insights.affective_failed();
                self.report_error("Affective analysis", &e);
            }
            Action::TokenRemembered(true) => self.status.info("Token saved to the system keyring"),
            Action::TokenRemembered(false) => {
                self.status.warn("Could not save the token to the system keyring");
            }
        }
    }

    fn report_error(&mut self, context: &str, error: &ApiError) {
        if error.is_auth_error() && self.unsaved_token.take().is_some() {
            warn!("Backend rejected the command-line token; it will not be saved");
        }

        let level = if error.is_auth_error() {
            StatusLevel::Error
        } else if error.is_recoverable() {
            StatusLevel::Warn
        } else {
            StatusLevel::Error
        };

        if level == StatusLevel::Error {
            error!(context, error = %error, "Backend request failed");
        } else {
            warn!(context, error = %error, "Backend request failed");
        }
        self.status.push(level, format!("{context}: {error}"));
    }

    fn key_hints(&self) -> &'static str {
        if self.has_modal() {
            "Esc close"
        } else {
            match self.tab {
                Tab::Breathe => "↑↓ technique · Space start/stop · q quit",
                Tab::Journal => "n new · r refresh · q quit",
                Tab::Insights => "c check in · a affective · r refresh · q quit",
                Tab::Chat => "Enter send · Tab switch · Ctrl+C quit",
                Tab::Profile => "e edit · r refresh · q quit",
            }
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let [tabs_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        frame.render_widget(TabBar::new(self.tab, &self.theme), tabs_area);

        let buf = frame.buffer_mut();
        match self.tab {
            Tab::Breathe => {
                let screen = BreatheScreen::new(&self.breathing, &self.theme, Instant::now());
                ratatui::widgets::Widget::render(screen, body_area, buf);
            }
            Tab::Journal => self.journal.render(body_area, buf, &self.theme),
            Tab::Insights => self.insights.render(body_area, buf, &self.theme),
            Tab::Chat => self.chat.render(body_area, buf, &self.theme),
            Tab::Profile => self.profile.render(body_area, buf, &self.theme),
        }

        let mut status_bar = StatusBar::new().right(self.key_hints());
        if let Some(message) = self.status.current() {
            status_bar = status_bar.left(message.text.as_str()).level(message.level);
        }
        if self.breathing.is_running() {
            status_bar = status_bar.center(self.breathing.technique().name.as_str());
        } else if let Some(profile) = self.profile.profile() {
            status_bar = status_bar.center(profile.display_name());
        }
        frame.render_widget(&status_bar, status_area);
    }
}
