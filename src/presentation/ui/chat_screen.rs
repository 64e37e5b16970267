//! Companion chat: local transcript plus a single-line composer.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::domain::entities::{ChatMessage, Sender};
use crate::presentation::theme::Theme;
use crate::presentation::widgets::{EditorOutcome, TextEditorState};

const MAX_MESSAGE_CHARS: usize = 2000;
const GREETING: &str = "Hi, I'm here to listen. How are you feeling today?";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatKeyResult {
    Handled,
    Ignored,
    Send(String),
}

pub struct ChatScreenState<'a> {
    messages: Vec<ChatMessage>,
    editor: TextEditorState<'a>,
    waiting: bool,
    timestamp_format: String,
    /// Lines scrolled up from the bottom of the transcript.
    scroll_back: u16,
}

impl Default for ChatScreenState<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatScreenState<'_> {
    #[must_use]
    pub fn new() -> Self {
        let mut editor = TextEditorState::new(false, MAX_MESSAGE_CHARS)
            .with_placeholder("Type a message and press Enter");
        editor.set_title("Message");
        Self {
            messages: vec![ChatMessage::ai(GREETING)],
            editor,
            waiting: false,
            timestamp_format: "%H:%M".to_string(),
            scroll_back: 0,
        }
    }

    pub fn set_timestamp_format(&mut self, format: String) {
        self.timestamp_format = format;
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        self.waiting
    }

    pub fn reply_received(&mut self, reply: ChatMessage) {
        self.waiting = false;
        self.scroll_back = 0;
        self.messages.push(reply);
    }

    /// Re-enables sending; the user's message stays in the transcript.
    pub fn reply_failed(&mut self) {
        self.waiting = false;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ChatKeyResult {
        match key.code {
            KeyCode::Enter => {
                if self.waiting {
                    return ChatKeyResult::Handled;
                }
                let text = self.editor.value().trim().to_string();
                if text.is_empty() {
                    return ChatKeyResult::Handled;
                }
                self.editor.clear();
                self.messages.push(ChatMessage::user(text.clone()));
                self.waiting = true;
                self.scroll_back = 0;
                ChatKeyResult::Send(text)
            }
            KeyCode::PageUp => {
                self.scroll_back = self.scroll_back.saturating_add(5);
                ChatKeyResult::Handled
            }
            KeyCode::PageDown => {
                self.scroll_back = self.scroll_back.saturating_sub(5);
                ChatKeyResult::Handled
            }
            _ => match self.editor.handle_key(key) {
                EditorOutcome::Ignored => ChatKeyResult::Ignored,
                EditorOutcome::Edited | EditorOutcome::Moved => ChatKeyResult::Handled,
            },
        }
    }

    fn transcript_lines(&self, theme: &Theme) -> Vec<Line<'_>> {
        let mut lines = Vec::new();
        for message in &self.messages {
            let name_style = match message.sender {
                Sender::User => theme.title_style,
                Sender::Ai => Style::default().add_modifier(Modifier::BOLD),
            };
            lines.push(Line::from(vec![
                Span::styled(message.sender.label(), name_style),
                Span::styled(
                    format!("  {}", message.sent_at.format(&self.timestamp_format)),
                    theme.dimmed_style,
                ),
            ]));
            lines.extend(message.text.lines().map(Line::raw));
            lines.push(Line::default());
        }
        if self.waiting {
            lines.push(Line::styled("typing…", theme.dimmed_style));
        }
        lines
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let [transcript_area, input_area] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(3)]).areas(area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.dimmed_style)
            .title(" Companion ");
        let inner = block.inner(transcript_area);

        let lines = self.transcript_lines(theme);
        let total = wrapped_height(&lines, inner.width);
        let bottom = total.saturating_sub(usize::from(inner.height));
        let max_back = u16::try_from(bottom).unwrap_or(u16::MAX);
        let offset = bottom.saturating_sub(self.scroll_back.min(max_back).into());

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((u16::try_from(offset).unwrap_or(u16::MAX), 0))
            .render(transcript_area, buf);

        self.editor.set_focused(!self.waiting);
        self.editor.render_with_theme(input_area, buf, theme);
    }
}

/// Rows the lines take once wrapped to `width`.
fn wrapped_height(lines: &[Line<'_>], width: u16) -> usize {
    let width = usize::from(width.max(1));
    lines
        .iter()
        .map(|line| {
            let w: usize = line.spans.iter().map(|s| s.content.width()).sum();
            w.div_ceil(width).max(1)
        })
        .sum()
}
