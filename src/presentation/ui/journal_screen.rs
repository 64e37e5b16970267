//! Journal list, entry detail and the composer popup.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, StatefulWidget, Widget, Wrap},
};

use super::utils::{centered_rect, format_local};
use crate::domain::entities::{JournalEntry, Mood, NewJournalEntry};
use crate::presentation::theme::Theme;
use crate::presentation::widgets::{EditorOutcome, TextEditorState};

const MAX_ENTRY_CHARS: usize = 5000;
const DATE_FORMAT: &str = "%b %d, %H:%M";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalKeyResult {
    Handled,
    Ignored,
    Refresh,
    Save(NewJournalEntry),
    Rejected(&'static str),
}

/// Mood selector order: unset, then each mood, then back to unset.
#[must_use]
pub fn next_mood(mood: Option<Mood>) -> Option<Mood> {
    match mood {
        None => Some(Mood::ALL[0]),
        Some(Mood::Anxious) => None,
        Some(m) => Some(m.cycle()),
    }
}

pub struct Composer<'a> {
    editor: TextEditorState<'a>,
    mood: Option<Mood>,
    saving: bool,
}

impl Composer<'_> {
    fn new() -> Self {
        Self {
            editor: TextEditorState::new(true, MAX_ENTRY_CHARS)
                .with_placeholder("Title on the first line, then write freely…"),
            mood: None,
            saving: false,
        }
    }

    fn title(&self) -> String {
        let mood = self.mood.map_or("none", Mood::label);
        if self.saving {
            format!("New entry · mood: {mood} · saving…")
        } else {
            format!("New entry · mood: {mood} · F2 mood · Ctrl+S save · Esc cancel")
        }
    }
}

pub struct JournalScreenState<'a> {
    entries: Vec<JournalEntry>,
    list_state: ListState,
    loading: bool,
    composer: Option<Composer<'a>>,
}

impl Default for JournalScreenState<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl JournalScreenState<'_> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            list_state: ListState::default(),
            loading: false,
            composer: None,
        }
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Replaces the list with entries already sorted newest first.
    pub fn set_entries(&mut self, entries: Vec<JournalEntry>) {
        self.loading = false;
        let selected = (!entries.is_empty()).then_some(0);
        self.entries = entries;
        self.list_state.select(selected);
    }

    /// Adds a freshly stored entry on top and closes the composer.
    pub fn entry_saved(&mut self, entry: JournalEntry) {
        self.entries.insert(0, entry);
        self.list_state.select(Some(0));
        self.composer = None;
    }

    /// Re-enables the composer after a failed save; the draft is kept.
    pub fn save_failed(&mut self) {
        if let Some(composer) = &mut self.composer {
            composer.saving = false;
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    #[must_use]
    pub const fn is_composing(&self) -> bool {
        self.composer.is_some()
    }

    #[must_use]
    pub fn selected_entry(&self) -> Option<&JournalEntry> {
        self.list_state.selected().and_then(|i| self.entries.get(i))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> JournalKeyResult {
        if self.composer.is_some() {
            return self.handle_composer_key(key);
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_state.select_previous();
                JournalKeyResult::Handled
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.list_state.select_next();
                JournalKeyResult::Handled
            }
            KeyCode::Char('n') => {
                self.composer = Some(Composer::new());
                JournalKeyResult::Handled
            }
            KeyCode::Char('r') => JournalKeyResult::Refresh,
            _ => JournalKeyResult::Ignored,
        }
    }

    fn handle_composer_key(&mut self, key: KeyEvent) -> JournalKeyResult {
        if key.code == KeyCode::Esc {
            self.composer = None;
            return JournalKeyResult::Handled;
        }
        let Some(composer) = self.composer.as_mut() else {
            return JournalKeyResult::Ignored;
        };
        if composer.saving {
            return JournalKeyResult::Handled;
        }

        match key.code {
            KeyCode::F(2) => {
                composer.mood = next_mood(composer.mood);
                JournalKeyResult::Handled
            }
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let entry = NewJournalEntry::from_draft(&composer.editor.value(), composer.mood);
                if entry.content.trim().is_empty() {
                    return JournalKeyResult::Rejected("Write something before saving");
                }
                composer.saving = true;
                JournalKeyResult::Save(entry)
            }
            _ => match composer.editor.handle_key(key) {
                EditorOutcome::Ignored => JournalKeyResult::Ignored,
                EditorOutcome::Edited | EditorOutcome::Moved => JournalKeyResult::Handled,
            },
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let [list_area, detail_area] =
            Layout::horizontal([Constraint::Percentage(40), Constraint::Percentage(60)]).areas(area);

        self.render_list(list_area, buf, theme);
        self.render_detail(detail_area, buf, theme);

        if let Some(composer) = &mut self.composer {
            let popup = centered_rect(70, 60, area);
            Clear.render(popup, buf);
            let title = composer.title();
            composer.editor.set_title(title);
            composer.editor.render_with_theme(popup, buf, theme);
        }
    }

    fn render_list(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.dimmed_style)
            .title(" Journal ")
            .title_bottom(Line::styled(" n new · r refresh ", theme.dimmed_style));

        if self.entries.is_empty() {
            let message = if self.loading {
                "Loading entries…"
            } else {
                "No entries yet. Press n to write one."
            };
            Paragraph::new(Line::styled(message, theme.dimmed_style))
                .block(block)
                .wrap(Wrap { trim: true })
                .render(area, buf);
            return;
        }

        let items: Vec<ListItem<'_>> = self
            .entries
            .iter()
            .map(|entry| {
                let glyph = entry.mood.map_or(" ", Mood::glyph);
                ListItem::new(vec![
                    Line::from(vec![
                        Span::raw(format!("{glyph} ")),
                        Span::styled(
                            entry.display_title().to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::styled(
                        format!("  {}", format_local(&entry.timestamp, DATE_FORMAT)),
                        theme.dimmed_style,
                    ),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(theme.selection_style)
            .highlight_symbol("▸ ");
        StatefulWidget::render(list, area, buf, &mut self.list_state);
    }

    fn render_detail(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.dimmed_style);

        let Some(entry) = self.selected_entry() else {
            block.render(area, buf);
            return;
        };

        let mut lines = vec![
            Line::styled(entry.display_title().to_string(), theme.title_style),
            Line::styled(
                format!(
                    "{} · {}",
                    format_local(&entry.timestamp, DATE_FORMAT),
                    entry.mood.map_or("no mood", Mood::label)
                ),
                theme.dimmed_style,
            ),
            Line::default(),
        ];
        lines.extend(entry.content.lines().map(|l| Line::raw(l.to_string())));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}
