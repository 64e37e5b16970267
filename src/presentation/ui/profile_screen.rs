//! Profile details and the edit form.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use super::utils::{centered_rect, format_local};
use crate::domain::entities::{ProfileUpdate, UserProfile};
use crate::presentation::theme::Theme;
use crate::presentation::widgets::{EditorOutcome, TextEditorState};

const MAX_FIELD_CHARS: usize = 120;
const MAX_BIO_CHARS: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileKeyResult {
    Handled,
    Ignored,
    Refresh,
    Save(ProfileUpdate),
    Rejected(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    Name,
    Email,
    Location,
    Bio,
}

impl ProfileField {
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Location, Self::Bio];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Full name",
            Self::Email => "Email",
            Self::Location => "Location",
            Self::Bio => "Bio",
        }
    }

    const fn index(self) -> usize {
        self as usize
    }
}

struct ProfileForm<'a> {
    editors: [TextEditorState<'a>; 4],
    focus: ProfileField,
    saving: bool,
}

impl ProfileForm<'_> {
    fn for_profile(profile: &UserProfile) -> Self {
        let editor_for = |field: ProfileField, value: Option<&str>| {
            let multiline = field == ProfileField::Bio;
            let limit = if multiline { MAX_BIO_CHARS } else { MAX_FIELD_CHARS };
            let mut editor = TextEditorState::new(multiline, limit);
            editor.set_title(field.label());
            editor.set_content(value.unwrap_or_default());
            editor
        };
        let name = profile.full_name.as_deref().map(str::trim);

        Self {
            editors: [
                editor_for(ProfileField::Name, name),
                editor_for(ProfileField::Email, profile.email()),
                editor_for(ProfileField::Location, profile.location()),
                editor_for(ProfileField::Bio, profile.bio()),
            ],
            focus: ProfileField::Name,
            saving: false,
        }
    }

    fn value(&self, field: ProfileField) -> String {
        self.editors[field.index()].value()
    }

    fn focus_next(&mut self) {
        let next = (self.focus.index() + 1) % ProfileField::ALL.len();
        self.focus = ProfileField::ALL[next];
    }

    fn focus_previous(&mut self) {
        let len = ProfileField::ALL.len();
        self.focus = ProfileField::ALL[(self.focus.index() + len - 1) % len];
    }

    fn update_for(&self, profile: &UserProfile) -> ProfileUpdate {
        ProfileUpdate::changes_from(
            profile,
            &self.value(ProfileField::Name),
            &self.value(ProfileField::Email),
            &self.value(ProfileField::Bio),
            &self.value(ProfileField::Location),
        )
    }
}

#[derive(Default)]
pub struct ProfileScreenState<'a> {
    profile: Option<UserProfile>,
    loading: bool,
    form: Option<ProfileForm<'a>>,
}

impl ProfileScreenState<'_> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        self.loading = false;
        self.profile = Some(profile);
    }

    /// Stores the updated profile and closes the form.
    pub fn profile_saved(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
        self.form = None;
    }

    /// Re-enables the form after a failed save; edits are kept.
    pub fn save_failed(&mut self) {
        if let Some(form) = &mut self.form {
            form.saving = false;
        }
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.form.is_some()
    }

    #[must_use]
    pub fn focused_field(&self) -> Option<ProfileField> {
        self.form.as_ref().map(|form| form.focus)
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ProfileKeyResult {
        if self.form.is_some() {
            return self.handle_form_key(key);
        }

        match key.code {
            KeyCode::Char('r') => ProfileKeyResult::Refresh,
            KeyCode::Char('e') => match &self.profile {
                Some(profile) => {
                    self.form = Some(ProfileForm::for_profile(profile));
                    ProfileKeyResult::Handled
                }
                None => ProfileKeyResult::Rejected("Profile not loaded yet"),
            },
            _ => ProfileKeyResult::Ignored,
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> ProfileKeyResult {
        if key.code == KeyCode::Esc {
            self.form = None;
            return ProfileKeyResult::Handled;
        }
        let (Some(form), Some(profile)) = (self.form.as_mut(), self.profile.as_ref()) else {
            return ProfileKeyResult::Ignored;
        };
        if form.saving {
            return ProfileKeyResult::Handled;
        }

        match key.code {
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                let update = form.update_for(profile);
                if update.is_empty() {
                    return ProfileKeyResult::Rejected("Nothing changed");
                }
                form.saving = true;
                ProfileKeyResult::Save(update)
            }
            KeyCode::Tab => {
                form.focus_next();
                ProfileKeyResult::Handled
            }
            KeyCode::BackTab => {
                form.focus_previous();
                ProfileKeyResult::Handled
            }
            _ => {
                let focus = form.focus;
                match form.editors[focus.index()].handle_key(key) {
                    EditorOutcome::Edited | EditorOutcome::Moved => ProfileKeyResult::Handled,
                    EditorOutcome::Ignored => match key.code {
                        KeyCode::Down | KeyCode::Enter => {
                            form.focus_next();
                            ProfileKeyResult::Handled
                        }
                        KeyCode::Up => {
                            form.focus_previous();
                            ProfileKeyResult::Handled
                        }
                        _ => ProfileKeyResult::Ignored,
                    },
                }
            }
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        self.render_details(area, buf, theme);

        if let Some(form) = &mut self.form {
            render_form(form, centered_rect(70, 80, area), buf, theme);
        }
    }

    fn render_details(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme.dimmed_style)
            .title(" Profile ")
            .title_bottom(Line::styled(" e edit · r refresh ", theme.dimmed_style));

        let Some(profile) = &self.profile else {
            let message = if self.loading {
                "Loading profile…"
            } else {
                "Profile unavailable."
            };
            Paragraph::new(Line::styled(message, theme.dimmed_style))
                .block(block)
                .render(area, buf);
            return;
        };

        let missing = Span::styled("not set", theme.dimmed_style);
        let row = |label: &'static str, value: Option<&str>| {
            Line::from(vec![
                Span::styled(format!("{label:<11}"), theme.dimmed_style),
                value.map_or_else(|| missing.clone(), |v| Span::raw(v.to_string())),
            ])
        };

        let mut lines = vec![
            Line::styled(
                profile.display_name().to_string(),
                theme.title_style.add_modifier(Modifier::BOLD),
            ),
            Line::styled(format!("@{}", profile.username), theme.dimmed_style),
            Line::default(),
            row("Email", profile.email()),
            row("Location", profile.location()),
            row(
                "Joined",
                Some(format_local(&profile.created_at, "%B %Y").as_str()),
            ),
            Line::default(),
            Line::styled("About", theme.dimmed_style),
        ];
        lines.push(profile.bio().map_or_else(
            || Line::from(missing.clone()),
            |bio| Line::raw(bio.to_string()),
        ));

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

fn render_form(form: &mut ProfileForm<'_>, area: Rect, buf: &mut Buffer, theme: &Theme) {
    Clear.render(area, buf);
    let title = if form.saving {
        " Edit profile · saving… "
    } else {
        " Edit profile "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .title(title)
        .title_bottom(Line::styled(
            " Tab next field · Ctrl+S save · Esc cancel ",
            theme.dimmed_style,
        ));
    let inner = block.inner(area);
    block.render(area, buf);

    let areas: [Rect; 4] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(inner);

    let focus = form.focus;
    for (field, field_area) in ProfileField::ALL.into_iter().zip(areas) {
        let editor = &mut form.editors[field.index()];
        editor.set_focused(field == focus && !form.saving);
        editor.render_with_theme(field_area, buf, theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::serde_utils::parse_timestamp;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    fn ctrl_s() -> KeyEvent {
        KeyEvent::new_with_kind(KeyCode::Char('s'), KeyModifiers::CONTROL, KeyEventKind::Press)
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: 1,
            username: "meera".to_string(),
            email: Some("meera@example.org".to_string()),
            full_name: None,
            bio: None,
            location: Some("Pune".to_string()),
            is_active: true,
            created_at: parse_timestamp("2024-01-15T09:30:00").unwrap(),
        }
    }

    fn type_str(state: &mut ProfileScreenState<'_>, text: &str) {
        for c in text.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_edit_requires_loaded_profile() {
        let mut state = ProfileScreenState::new();
        assert_eq!(
            state.handle_key(key(KeyCode::Char('e'))),
            ProfileKeyResult::Rejected("Profile not loaded yet")
        );
        assert_eq!(state.handle_key(key(KeyCode::Char('r'))), ProfileKeyResult::Refresh);
    }

    #[test]
    fn test_save_sends_only_edited_fields() {
        let mut state = ProfileScreenState::new();
        state.set_profile(profile());
        state.handle_key(key(KeyCode::Char('e')));
        assert!(state.is_editing());

        type_str(&mut state, "Meera Rao");
        state.handle_key(key(KeyCode::Tab));
        state.handle_key(key(KeyCode::Tab));
        state.handle_key(key(KeyCode::Tab));
        assert_eq!(state.focused_field(), Some(ProfileField::Bio));
        type_str(&mut state, "Runner");

        let ProfileKeyResult::Save(update) = state.handle_key(ctrl_s()) else {
            panic!("expected save");
        };
        assert_eq!(update.full_name.as_deref(), Some("Meera Rao"));
        assert_eq!(update.bio.as_deref(), Some("Runner"));
        assert!(update.email.is_none());
        assert!(update.location.is_none());

        // Keys are swallowed while the save is in flight.
        assert_eq!(state.handle_key(key(KeyCode::Char('x'))), ProfileKeyResult::Handled);
    }

    #[test]
    fn test_unchanged_form_is_rejected() {
        let mut state = ProfileScreenState::new();
        state.set_profile(profile());
        state.handle_key(key(KeyCode::Char('e')));

        assert_eq!(
            state.handle_key(ctrl_s()),
            ProfileKeyResult::Rejected("Nothing changed")
        );
    }

    #[test]
    fn test_enter_and_arrows_move_between_single_line_fields() {
        let mut state = ProfileScreenState::new();
        state.set_profile(profile());
        state.handle_key(key(KeyCode::Char('e')));

        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.focused_field(), Some(ProfileField::Email));
        state.handle_key(key(KeyCode::Down));
        assert_eq!(state.focused_field(), Some(ProfileField::Location));
        state.handle_key(key(KeyCode::Up));
        assert_eq!(state.focused_field(), Some(ProfileField::Email));
        state.handle_key(key(KeyCode::BackTab));
        assert_eq!(state.focused_field(), Some(ProfileField::Name));
    }

    #[test]
    fn test_failed_save_keeps_form_and_success_closes_it() {
        let mut state = ProfileScreenState::new();
        state.set_profile(profile());
        state.handle_key(key(KeyCode::Char('e')));
        type_str(&mut state, "M");
        state.handle_key(ctrl_s());

        state.save_failed();
        assert!(state.is_editing());
        assert!(matches!(state.handle_key(ctrl_s()), ProfileKeyResult::Save(_)));

        let mut saved = profile();
        saved.full_name = Some("M".to_string());
        state.profile_saved(saved);
        assert!(!state.is_editing());
        assert_eq!(state.profile().map(UserProfile::display_name), Some("M"));
    }

    #[test]
    fn test_render_shows_details() {
        let mut state = ProfileScreenState::new();
        state.set_profile(profile());
        let area = Rect::new(0, 0, 60, 16);
        let mut buf = Buffer::empty(area);

        state.render(area, &mut buf, &Theme::default());

        let text: String = buf.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("meera@example.org"));
        assert!(text.contains("Pune"));
        assert!(text.contains("not set"));
    }
}
