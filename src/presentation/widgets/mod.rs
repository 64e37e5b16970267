mod breath_pacer;
mod status_bar;
mod tab_bar;
mod text_editor;

pub use breath_pacer::{BreathPacer, PacerFrame};
pub use status_bar::StatusBar;
pub use tab_bar::{Tab, TabBar};
pub use text_editor::{EditorOutcome, TextEditorState};
