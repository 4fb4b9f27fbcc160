use ratatui::Frame;
use ratatui::layout::Rect;

use super::{Dashboard, Regions};
use crate::analytics::format_hms;
use crate::components::{Component, NotesPanel, StatusBar};
use crate::theme;
use crate::ui::{safe_set_string, text_width};
use crate::window::decorator::WindowChrome;

const FILE_PICKER_BODY: &str = "Choose a file: multispace open \"Open File\" <path>";
const EMPTY_HINT: &str = "Press 1-9 or click the dock to open an app. ? for help.";

impl Dashboard {
    pub fn render(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        if area != self.area {
            self.set_area(area);
        }
        let regions = self.regions();
        self.render_status(frame, regions.status);
        self.render_windows(frame, regions);
        let (mut chips, _) = self.chip_strip();
        chips.render(frame, regions.chips);
        self.dock_strip().render(frame, regions.dock);
        if let Some(notes) = regions.notes {
            let project = self.workspace.current_project();
            NotesPanel::new(&project.notes, &project.goals).render(frame, notes);
        }
        self.help.render(frame, area);
    }

    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let store = self.workspace.store();
        let project = store.current();
        let position = store
            .projects()
            .iter()
            .position(|p| p.id == project.id)
            .map_or(0, |i| i + 1);
        let mut bar = StatusBar::new();
        bar.set_style(theme::status_bar());
        bar.set_left(format!(
            " \u{25c6} {} [{position}/{}]  \u{23f1} {}",
            project.name,
            store.len(),
            format_hms(store.time_spent()),
        ));

        let timer = self.workspace.timer();
        let state = if timer.is_active() { "\u{25b6}" } else { "\u{23f8}" };
        bar.set_badge(
            format!(
                " {} {} {state} #{} ",
                timer.mode(),
                timer.display(),
                timer.sessions()
            ),
            theme::timer(timer.mode(), timer.is_active()),
        );
        bar.set_right(match self.message() {
            Some(text) => format!("{text} "),
            None => "? help ".to_string(),
        });
        bar.render(frame, area);
    }

    fn render_windows(&self, frame: &mut Frame<'_>, regions: Regions) {
        let bounds = regions.windows;
        let rects = self.window_rects();
        let buffer = frame.buffer_mut();
        if rects.is_empty() {
            let width = text_width(EMPTY_HINT);
            let x = bounds.x + bounds.width.saturating_sub(width) / 2;
            let y = bounds.y + bounds.height / 2;
            safe_set_string(buffer, bounds, x, y, EMPTY_HINT, theme::dim());
            return;
        }
        let focused = self.workspace.windows().focused().map(|w| w.id.as_str());
        for (id, rect) in &rects {
            let Some(window) = self.workspace.windows().get(id) else {
                continue;
            };
            let body = if window.is_file_picker() {
                FILE_PICKER_BODY
            } else {
                window.url.as_str()
            };
            let chrome = WindowChrome {
                title: &window.title,
                body,
                focused: focused == Some(id.as_str()),
                fullscreen: window.is_fullscreen(),
            };
            self.decorator
                .render_window(buffer, *rect, bounds, chrome);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dashboard::Dashboard;
    use crate::dock::Dock;
    use crate::layout::CellScale;
    use crate::project::{EntryKind, MemoryStorage, ProjectStore};
    use crate::timer::ProductivityTimer;
    use crate::window::{Viewport, WindowManager};
    use crate::workspace::Workspace;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn screen(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect()
            })
            .collect()
    }

    fn dashboard() -> Dashboard {
        let store = ProjectStore::open(MemoryStorage::new());
        let wm = WindowManager::with_seed(Viewport::new(1920, 1080), 11);
        let ws = Workspace::new(store, wm, ProductivityTimer::default(), Dock::default());
        Dashboard::new(ws, CellScale::default())
    }

    #[test]
    fn empty_workspace_shows_status_hint_and_dock() {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        let mut dash = dashboard();
        terminal.draw(|f| dash.render(f)).unwrap();
        let lines = screen(&terminal);
        assert!(lines[0].contains("Workspace 1 [1/1]"));
        assert!(lines[0].contains("Focus 25:00"));
        assert!(lines.iter().any(|l| l.contains("Press 1-9")));
        assert!(lines[39].starts_with("Dock"));
        assert!(lines[39].contains("Notion"));
    }

    #[test]
    fn opened_window_is_framed_with_title() {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        let mut dash = dashboard();
        terminal.draw(|f| dash.render(f)).unwrap();
        dash.workspace_mut().open_app(2);
        terminal.draw(|f| dash.render(f)).unwrap();
        let lines = screen(&terminal);
        assert!(lines.iter().any(|l| l.contains("Notion") && l.contains('x')));
        assert!(lines.iter().any(|l| l.contains("https://notion.so")));
        assert!(!lines.iter().any(|l| l.contains("Press 1-9")));
    }

    #[test]
    fn notes_panel_lists_entries() {
        let mut terminal = Terminal::new(TestBackend::new(160, 40)).unwrap();
        let mut dash = dashboard();
        dash.workspace_mut()
            .add_entry(EntryKind::Note, "Finish report")
            .unwrap();
        dash.apply(crate::keybindings::Action::ToggleNotes);
        terminal.draw(|f| dash.render(f)).unwrap();
        let lines = screen(&terminal);
        assert!(lines.iter().any(|l| l.contains("1. Finish report")));
    }
}
