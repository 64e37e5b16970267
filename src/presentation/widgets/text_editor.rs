use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};
use tui_textarea::{CursorMove, TextArea};
use unicode_width::UnicodeWidthChar;

use crate::presentation::theme::Theme;

/// What a key did to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    Edited,
    Moved,
    Ignored,
}

/// Soft-wrapping text buffer backed by `tui-textarea`.
///
/// Rendering is done by hand; the textarea is only used for editing.
pub struct TextEditorState<'a> {
    textarea: TextArea<'a>,
    multiline: bool,
    max_chars: usize,
    placeholder: String,
    title: String,
    focused: bool,
    scroll_offset: usize,
}

impl TextEditorState<'_> {
    #[must_use]
    pub fn new(multiline: bool, max_chars: usize) -> Self {
        Self {
            textarea: TextArea::default(),
            multiline,
            max_chars,
            placeholder: String::new(),
            title: String::new(),
            focused: true,
            scroll_offset: 0,
        }
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.textarea.lines().join("\n")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.textarea.is_empty()
    }

    #[must_use]
    pub fn cursor(&self) -> (usize, usize) {
        self.textarea.cursor()
    }

    pub fn clear(&mut self) {
        self.textarea.select_all();
        self.textarea.cut();
        self.scroll_offset = 0;
    }

    pub fn set_content(&mut self, content: &str) {
        self.clear();
        self.textarea.insert_str(content);
    }

    fn char_count(&self) -> usize {
        self.textarea
            .lines()
            .iter()
            .map(|line| line.chars().count() + 1)
            .sum::<usize>()
            .saturating_sub(1)
    }

    /// Applies an editing key. `Enter` is only consumed in multiline mode.
    pub fn handle_key(&mut self, key: KeyEvent) -> EditorOutcome {
        let ctrl_or_alt = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
        match key.code {
            KeyCode::Char(c) if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT => {
                if self.char_count() >= self.max_chars {
                    return EditorOutcome::Ignored;
                }
                self.textarea.insert_char(c);
                EditorOutcome::Edited
            }
            KeyCode::Char('w' | 'h') if key.modifiers == KeyModifiers::CONTROL => {
                self.textarea.delete_word();
                EditorOutcome::Edited
            }
            KeyCode::Enter if self.multiline => {
                if self.char_count() >= self.max_chars {
                    return EditorOutcome::Ignored;
                }
                self.textarea.insert_newline();
                EditorOutcome::Edited
            }
            KeyCode::Backspace if ctrl_or_alt => {
                self.textarea.delete_word();
                EditorOutcome::Edited
            }
            KeyCode::Backspace => {
                self.textarea.delete_char();
                EditorOutcome::Edited
            }
            KeyCode::Delete => {
                self.textarea.delete_next_char();
                EditorOutcome::Edited
            }
            KeyCode::Left if ctrl_or_alt => self.move_cursor(CursorMove::WordBack),
            KeyCode::Left => self.move_cursor(CursorMove::Back),
            KeyCode::Right if ctrl_or_alt => self.move_cursor(CursorMove::WordForward),
            KeyCode::Right => self.move_cursor(CursorMove::Forward),
            KeyCode::Up if self.multiline => self.move_cursor(CursorMove::Up),
            KeyCode::Down if self.multiline => self.move_cursor(CursorMove::Down),
            KeyCode::Home => self.move_cursor(CursorMove::Head),
            KeyCode::End => self.move_cursor(CursorMove::End),
            _ => EditorOutcome::Ignored,
        }
    }

    fn move_cursor(&mut self, movement: CursorMove) -> EditorOutcome {
        self.textarea.move_cursor(movement);
        EditorOutcome::Moved
    }

    /// Wrapped lines plus the cursor's visual row and column.
    fn visual_layout(&self, width: usize) -> (Vec<String>, usize, usize) {
        let (cursor_row, cursor_col) = self.textarea.cursor();
        let mut visual_lines = Vec::new();
        let mut v_row = 0;
        let mut v_col = 0;

        for (i, line) in self.textarea.lines().iter().enumerate() {
            let is_cursor_line = i == cursor_row;
            let mut current = String::new();
            let mut current_width = 0;

            for (j, ch) in line.chars().enumerate() {
                let ch_width = ch.width().unwrap_or(0);
                if current_width + ch_width > width {
                    visual_lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                if is_cursor_line && j == cursor_col {
                    v_row = visual_lines.len();
                    v_col = current_width;
                }
                current.push(ch);
                current_width += ch_width;
            }

            if is_cursor_line && cursor_col >= line.chars().count() {
                if current_width >= width && width > 0 {
                    visual_lines.push(std::mem::take(&mut current));
                    current_width = 0;
                }
                v_row = visual_lines.len();
                v_col = current_width;
            }
            visual_lines.push(current);
        }

        (visual_lines, v_row, v_col)
    }

    pub fn render_with_theme(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let border_style = if self.focused {
            Style::default().fg(theme.accent)
        } else {
            theme.dimmed_style
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);
        if !self.title.is_empty() {
            block = block.title(format!(" {} ", self.title));
        }
        let inner = block.inner(area);
        block.render(area, buf);

        let width = inner.width as usize;
        let height = inner.height as usize;
        if width == 0 || height == 0 {
            return;
        }

        let (visual_lines, cursor_row, cursor_col) = self.visual_layout(width);
        if cursor_row >= self.scroll_offset + height {
            self.scroll_offset = cursor_row + 1 - height;
        } else if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        }

        if self.is_empty() {
            buf.set_stringn(inner.x, inner.y, &self.placeholder, width, theme.dimmed_style);
        } else {
            for (i, line) in visual_lines
                .iter()
                .enumerate()
                .skip(self.scroll_offset)
                .take(height)
            {
                let y = inner.y + u16::try_from(i - self.scroll_offset).unwrap_or(0);
                buf.set_stringn(inner.x, y, line, width, Style::default().fg(Color::White));
            }
        }

        if self.focused {
            let x = inner.x + u16::try_from(cursor_col).unwrap_or(u16::MAX);
            let y = inner.y + u16::try_from(cursor_row - self.scroll_offset).unwrap_or(u16::MAX);
            if x < inner.right()
                && y < inner.bottom()
                && let Some(cell) = buf.cell_mut((x, y))
            {
                cell.set_style(Style::default().bg(Color::White).fg(Color::Black));
                if cell.symbol().trim().is_empty() {
                    cell.set_symbol(" ");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn type_str(editor: &mut TextEditorState<'_>, text: &str) {
        for c in text.chars() {
            editor.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_single_line_ignores_enter() {
        let mut editor = TextEditorState::new(false, 100);
        type_str(&mut editor, "hi");

        assert_eq!(editor.handle_key(key(KeyCode::Enter)), EditorOutcome::Ignored);
        assert_eq!(editor.value(), "hi");
    }

    #[test]
    fn test_multiline_enter_and_backspace() {
        let mut editor = TextEditorState::new(true, 100);
        type_str(&mut editor, "Title");
        editor.handle_key(key(KeyCode::Enter));
        type_str(&mut editor, "Body!");
        editor.handle_key(key(KeyCode::Backspace));

        assert_eq!(editor.value(), "Title\nBody");
        assert_eq!(editor.cursor(), (1, 4));
    }

    #[test]
    fn test_max_chars_enforced() {
        let mut editor = TextEditorState::new(false, 3);
        type_str(&mut editor, "abcdef");
        assert_eq!(editor.value(), "abc");
    }

    #[test]
    fn test_visual_layout_wraps_long_lines() {
        let mut editor = TextEditorState::new(true, 100);
        type_str(&mut editor, "abcdefgh");

        let (lines, row, col) = editor.visual_layout(3);

        assert_eq!(lines, vec!["abc", "def", "gh"]);
        assert_eq!((row, col), (2, 2));
    }

    #[test]
    fn test_clear_and_set_content() {
        let mut editor = TextEditorState::new(true, 100);
        editor.set_content("one\ntwo");
        assert_eq!(editor.value(), "one\ntwo");
        editor.clear();
        assert!(editor.is_empty());
    }
}
