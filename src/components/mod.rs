use ratatui::Frame;
use ratatui::layout::Rect;

pub mod help_overlay;
pub mod notes_panel;
pub mod status_bar;
pub mod strip;

pub use help_overlay::HelpOverlay;
pub use notes_panel::NotesPanel;
pub use status_bar::StatusBar;
pub use strip::Strip;

pub trait Component {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect);
}
