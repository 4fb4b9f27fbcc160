//! Terminal front-end for a [`Workspace`].
//!
//! The dashboard owns no state of its own beyond presentation (visible
//! panels, the last notification). Pointer events are hit-tested against
//! the cell rectangles of the current frame and turned into workspace
//! calls; everything else goes through key bindings.

mod render;

use std::time::Duration;

use crossterm::event::{Event, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect};

use crate::components::{HelpOverlay, Strip};
use crate::event_loop::ControlFlow;
use crate::keybindings::{Action, KeyBindings};
use crate::layout::floating::{FrameHit, frame_hit};
use crate::layout::{CellScale, rect_contains};
use crate::theme;
use crate::window::decorator::{FramedDecorator, HeaderButton, WindowDecorator, header_button_at};
use crate::workspace::{Workspace, WorkspaceEvent};

const NOTES_WIDTH: u16 = 32;
const MESSAGE_TTL: Duration = Duration::from_secs(4);

/// Where each part of the dashboard goes for a given terminal area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Regions {
    pub status: Rect,
    pub windows: Rect,
    pub notes: Option<Rect>,
    pub chips: Rect,
    pub dock: Rect,
}

impl Regions {
    pub fn compute(area: Rect, show_notes: bool) -> Self {
        let [status, middle, chips, dock] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);
        let (windows, notes) = if show_notes && middle.width >= NOTES_WIDTH * 2 {
            let [windows, notes] =
                Layout::horizontal([Constraint::Min(0), Constraint::Length(NOTES_WIDTH)])
                    .areas(middle);
            (windows, Some(notes))
        } else {
            (middle, None)
        };
        Self {
            status,
            windows,
            notes,
            chips,
            dock,
        }
    }
}

#[derive(Debug)]
struct Message {
    text: String,
    remaining: Duration,
}

#[derive(Debug)]
pub struct Dashboard {
    workspace: Workspace,
    scale: CellScale,
    bindings: KeyBindings,
    decorator: Box<dyn WindowDecorator>,
    help: HelpOverlay,
    show_notes: bool,
    area: Rect,
    message: Option<Message>,
}

impl Dashboard {
    pub fn new(workspace: Workspace, scale: CellScale) -> Self {
        let bindings = KeyBindings::default();
        let help = HelpOverlay::new(&bindings);
        Self {
            workspace,
            scale,
            bindings,
            decorator: Box::new(FramedDecorator),
            help,
            show_notes: false,
            area: Rect::default(),
            message: None,
        }
    }

    pub fn with_decorator(mut self, decorator: Box<dyn WindowDecorator>) -> Self {
        self.decorator = decorator;
        self
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    pub fn into_workspace(self) -> Workspace {
        self.workspace
    }

    pub fn help_visible(&self) -> bool {
        self.help.visible()
    }

    pub fn notes_visible(&self) -> bool {
        self.show_notes
    }

    /// Latest notification, if it has not timed out.
    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    pub fn regions(&self) -> Regions {
        Regions::compute(self.area, self.show_notes)
    }

    /// Adopt a new terminal size and resize the pixel viewport to match.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
        self.sync_viewport();
    }

    fn sync_viewport(&mut self) {
        let windows = self.regions().windows;
        if windows.width == 0 || windows.height == 0 {
            return;
        }
        let viewport = self.scale.viewport(windows);
        self.workspace.set_viewport(viewport);
    }

    /// Cell rectangles of visible windows, bottom to top.
    pub fn window_rects(&self) -> Vec<(String, Rect)> {
        let area = self.regions().windows;
        self.workspace
            .windows()
            .draw_order()
            .into_iter()
            .filter(|w| !w.is_minimized())
            .map(|w| (w.id.clone(), self.scale.to_cells(area, w.geometry)))
            .filter(|(_, rect)| rect.width > 0 && rect.height > 0)
            .collect()
    }

    fn dock_strip(&self) -> Strip {
        let items = self
            .workspace
            .dock()
            .apps()
            .iter()
            .enumerate()
            .map(|(i, app)| {
                if i < 9 {
                    format!("{} {} {}", i + 1, app.icon, app.name)
                } else {
                    format!("{} {}", app.icon, app.name)
                }
            })
            .collect();
        Strip::new(items, theme::dock_item()).with_title("Dock", theme::dock_key())
    }

    fn chip_strip(&self) -> (Strip, Vec<String>) {
        let minimized = self.workspace.windows().minimized();
        let ids = minimized.iter().map(|w| w.id.clone()).collect();
        let labels = minimized
            .iter()
            .map(|w| format!(" \u{25ad} {} ", w.title))
            .collect();
        (Strip::new(labels, theme::chip()), ids)
    }

    fn notify(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            remaining: MESSAGE_TTL,
        });
    }

    fn absorb_events(&mut self) {
        for event in self.workspace.take_events() {
            let text = match event {
                WorkspaceEvent::ProjectSwitched { name, created, .. } => {
                    if created {
                        format!("Created {name}")
                    } else {
                        format!("Now working on {name}")
                    }
                }
                WorkspaceEvent::AppOpened { title, .. } => format!("{title} opened"),
                WorkspaceEvent::WindowClosed { title, .. } => format!("{title} closed"),
                WorkspaceEvent::WorkSessionComplete { minutes, sessions } => format!(
                    "Focus session {sessions} complete ({minutes} min). Take a break!"
                ),
                WorkspaceEvent::BreakComplete => "Break over. Back to focus.".to_string(),
                WorkspaceEvent::PersistFailed { reason } => format!("Save failed: {reason}"),
            };
            self.notify(text);
        }
    }

    /// Advance timers and expire the notification.
    pub fn tick(&mut self, elapsed: Duration) {
        self.workspace.tick(elapsed);
        if let Some(message) = &mut self.message {
            message.remaining = message.remaining.saturating_sub(elapsed);
            if message.remaining.is_zero() {
                self.message = None;
            }
        }
        self.absorb_events();
    }

    pub fn handle_event(&mut self, event: &Event) -> ControlFlow {
        let flow = match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => {
                self.handle_mouse(mouse);
                ControlFlow::Continue
            }
            Event::Resize(width, height) => {
                self.set_area(Rect::new(0, 0, *width, *height));
                ControlFlow::Continue
            }
            _ => ControlFlow::Continue,
        };
        self.absorb_events();
        flow
    }

    fn handle_key(&mut self, key: &KeyEvent) -> ControlFlow {
        if self.help.visible() {
            self.help.set_visible(false);
            return ControlFlow::Continue;
        }
        match self.bindings.action_for_key(key) {
            Some(action) => self.apply(action),
            None => ControlFlow::Continue,
        }
    }

    pub fn apply(&mut self, action: Action) -> ControlFlow {
        tracing::trace!(?action, "dashboard action");
        let focused = self.workspace.windows().focused().map(|w| w.id.clone());
        match action {
            Action::Quit => return ControlFlow::Quit,
            Action::OpenApp(index) => {
                self.workspace.open_app(index);
            }
            Action::CycleFocus => {
                self.workspace.cycle_focus();
            }
            Action::ToggleFullscreen => {
                if let Some(id) = focused {
                    self.workspace.toggle_fullscreen(&id);
                }
            }
            Action::Minimize => {
                if let Some(id) = focused {
                    self.workspace.minimize_window(&id);
                }
            }
            Action::CloseWindow => {
                if let Some(id) = focused {
                    self.workspace.close_window(&id);
                }
            }
            Action::ToggleTimer => self.workspace.toggle_timer(),
            Action::ResetTimer => self.workspace.reset_timer(),
            Action::NextProject => {
                if self.workspace.store().len() < 2 {
                    self.notify("Only one project. Press n to create another.");
                } else {
                    self.workspace.next_project();
                }
            }
            Action::NewProject => {
                self.workspace.create_project("");
            }
            Action::ToggleNotes => {
                self.show_notes = !self.show_notes;
                self.sync_viewport();
            }
            Action::ToggleHelp => self.help.toggle(),
            Action::CloseHelp => self.help.set_visible(false),
        }
        ControlFlow::Continue
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        if self.help.visible() {
            return;
        }
        let regions = self.regions();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.pointer_down(regions, mouse.column, mouse.row);
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if self.workspace.windows().is_interacting() {
                    let pointer = self
                        .scale
                        .to_pixels(regions.windows, mouse.column, mouse.row);
                    self.workspace.pointer_move(pointer);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.workspace.pointer_up();
            }
            _ => {}
        }
    }

    fn pointer_down(&mut self, regions: Regions, column: u16, row: u16) {
        if self.workspace.windows().is_interacting() {
            return;
        }
        if let Some(index) = self.dock_strip().item_at(regions.dock, column, row) {
            self.workspace.open_app(index);
            return;
        }
        let (chips, ids) = self.chip_strip();
        if let Some(index) = chips.item_at(regions.chips, column, row) {
            if let Some(id) = ids.get(index) {
                self.workspace.restore_window(id);
            }
            return;
        }
        if !rect_contains(regions.windows, column, row) {
            return;
        }
        let pointer = self.scale.to_pixels(regions.windows, column, row);
        for (id, rect) in self.window_rects().into_iter().rev() {
            let Some(hit) = frame_hit(rect, column, row) else {
                continue;
            };
            match hit {
                FrameHit::Edge(edge) => {
                    self.workspace.pointer_down_edge(&id, edge, pointer);
                }
                FrameHit::Header => match header_button_at(rect, column) {
                    Some(button) => {
                        self.workspace.focus_window(&id);
                        match button {
                            HeaderButton::Minimize => self.workspace.minimize_window(&id),
                            HeaderButton::Fullscreen => self.workspace.toggle_fullscreen(&id),
                            HeaderButton::Close => self.workspace.close_window(&id),
                        };
                    }
                    None => {
                        self.workspace.pointer_down_header(&id, pointer);
                    }
                },
                FrameHit::Body => {
                    self.workspace.focus_window(&id);
                }
            }
            return;
        }
    }

    /// Drop any interaction and write everything out.
    pub fn shutdown(&mut self) {
        self.workspace.cancel_interaction();
        if let Err(err) = self.workspace.save() {
            tracing::warn!(error = %err, "final save failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dock::Dock;
    use crate::project::{MemoryStorage, ProjectStore};
    use crate::timer::ProductivityTimer;
    use crate::window::{Viewport, WindowManager};
    use crossterm::event::{KeyCode, KeyModifiers};

    fn dashboard() -> Dashboard {
        let store = ProjectStore::open(MemoryStorage::new());
        let wm = WindowManager::with_seed(Viewport::new(1920, 1080), 3);
        let ws = Workspace::new(store, wm, ProductivityTimer::default(), Dock::default());
        let mut dash = Dashboard::new(ws, CellScale::default());
        dash.set_area(Rect::new(0, 0, 200, 60));
        dash
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn only_rect(dash: &Dashboard) -> (String, Rect) {
        let rects = dash.window_rects();
        assert_eq!(rects.len(), 1);
        rects[0].clone()
    }

    #[test]
    fn regions_stack_rows_and_side_panel() {
        let r = Regions::compute(Rect::new(0, 0, 100, 30), true);
        assert_eq!(r.status, Rect::new(0, 0, 100, 1));
        assert_eq!(r.dock, Rect::new(0, 29, 100, 1));
        assert_eq!(r.chips, Rect::new(0, 28, 100, 1));
        assert_eq!(r.windows, Rect::new(0, 1, 68, 27));
        assert_eq!(r.notes, Some(Rect::new(68, 1, 32, 27)));
        assert_eq!(Regions::compute(Rect::new(0, 0, 40, 10), true).notes, None);
    }

    #[test]
    fn viewport_tracks_window_area() {
        let dash = dashboard();
        assert_eq!(dash.workspace().windows().viewport(), Viewport::new(2000, 1140));
    }

    #[test]
    fn digit_opens_dock_app_and_notifies() {
        let mut dash = dashboard();
        dash.handle_event(&key('3'));
        let windows = dash.workspace().windows();
        assert_eq!(windows.len(), 1);
        assert_eq!(windows.windows()[0].title, "Notion");
        assert_eq!(dash.message(), Some("Notion opened"));
    }

    #[test]
    fn header_drag_moves_window_by_cells() {
        let mut dash = dashboard();
        dash.handle_event(&key('1'));
        let (id, rect) = only_rect(&dash);
        let before = dash.workspace().windows().get(&id).unwrap().geometry;
        let (col, row) = (rect.x + 3, rect.y + 1);
        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        assert!(dash.workspace().windows().is_interacting());
        dash.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), col + 5, row + 2));
        dash.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), col + 5, row + 2));
        assert!(!dash.workspace().windows().is_interacting());
        let after = dash.workspace().windows().get(&id).unwrap().geometry;
        assert_eq!(after.x, before.x + 50);
        assert_eq!(after.y, before.y + 40);
        assert_eq!(after.width, before.width);
    }

    #[test]
    fn corner_resize_respects_floor() {
        let mut dash = dashboard();
        dash.handle_event(&key('1'));
        let (id, rect) = only_rect(&dash);
        let corner = (rect.x + rect.width - 1, rect.y + rect.height - 1);
        dash.handle_event(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            corner.0,
            corner.1,
        ));
        dash.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), 0, 1));
        dash.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 1));
        let g = dash.workspace().windows().get(&id).unwrap().geometry;
        assert_eq!((g.width, g.height), (300, 200));
    }

    #[test]
    fn header_buttons_minimize_and_close() {
        let mut dash = dashboard();
        dash.handle_event(&key('1'));
        let (id, rect) = only_rect(&dash);
        let min_col = rect.x + rect.width - 6;
        dash.handle_event(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            min_col,
            rect.y + 1,
        ));
        assert!(dash.workspace().windows().get(&id).unwrap().is_minimized());
        assert!(dash.window_rects().is_empty());

        // The chip row restores it.
        let chips = dash.regions().chips;
        dash.handle_event(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            chips.x + 2,
            chips.y,
        ));
        assert!(!dash.workspace().windows().get(&id).unwrap().is_minimized());

        let (_, rect) = only_rect(&dash);
        dash.handle_event(&mouse(
            MouseEventKind::Down(MouseButton::Left),
            rect.x + rect.width - 2,
            rect.y + 1,
        ));
        assert!(dash.workspace().windows().is_empty());
    }

    #[test]
    fn header_button_raises_its_window() {
        let mut dash = dashboard();
        dash.handle_event(&key('1'));
        dash.handle_event(&key('2'));
        let rects = dash.window_rects();
        let lower = rects[0].0.clone();
        let (upper, upper_rect) = rects[1].clone();

        // Park the upper window in the bottom-right corner.
        let (col, row) = (upper_rect.x + 3, upper_rect.y + 1);
        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), col, row));
        dash.handle_event(&mouse(MouseEventKind::Drag(MouseButton::Left), col + 150, row + 40));
        dash.handle_event(&mouse(MouseEventKind::Up(MouseButton::Left), col + 150, row + 40));

        let rects = dash.window_rects();
        let rect_of = |id: &str| rects.iter().find(|(w, _)| w == id).map(|(_, r)| *r).unwrap();
        let lower_rect = rect_of(&lower);
        let button = (lower_rect.x + lower_rect.width - 4, lower_rect.y + 1);
        assert!(!rect_contains(rect_of(&upper), button.0, button.1));

        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), button.0, button.1));
        let windows = dash.workspace().windows();
        let lower_window = windows.get(&lower).unwrap();
        assert!(lower_window.is_fullscreen());
        assert!(lower_window.z_index > windows.get(&upper).unwrap().z_index);
    }

    #[test]
    fn dock_click_opens_app() {
        let mut dash = dashboard();
        let dock = dash.regions().dock;
        // "Dock" title then the first label.
        dash.handle_event(&mouse(MouseEventKind::Down(MouseButton::Left), dock.x + 6, dock.y));
        assert_eq!(dash.workspace().windows().windows()[0].title, "Systematron");
    }

    #[test]
    fn keys_drive_focused_window_and_projects() {
        let mut dash = dashboard();
        dash.handle_event(&key('1'));
        dash.handle_event(&key('f'));
        assert!(dash.workspace().windows().windows()[0].is_fullscreen());
        dash.handle_event(&key('f'));
        dash.handle_event(&key('x'));
        assert!(dash.workspace().windows().is_empty());

        dash.handle_event(&key('p'));
        assert_eq!(
            dash.message(),
            Some("Only one project. Press n to create another.")
        );
        dash.handle_event(&key('n'));
        assert_eq!(dash.workspace().store().len(), 2);
        dash.handle_event(&key('p'));
        assert_eq!(dash.workspace().store().current_id(), "default");
    }

    #[test]
    fn help_swallows_next_key() {
        let mut dash = dashboard();
        dash.handle_event(&key('?'));
        assert!(dash.help_visible());
        assert_eq!(dash.handle_event(&key('q')), ControlFlow::Continue);
        assert!(!dash.help_visible());
        assert_eq!(dash.handle_event(&key('q')), ControlFlow::Quit);
    }

    #[test]
    fn notes_panel_shrinks_viewport() {
        let mut dash = dashboard();
        dash.handle_event(&key('b'));
        assert!(dash.notes_visible());
        assert_eq!(dash.workspace().windows().viewport(), Viewport::new(1680, 1140));
    }

    #[test]
    fn messages_expire() {
        let mut dash = dashboard();
        dash.handle_event(&key('1'));
        assert!(dash.message().is_some());
        dash.tick(Duration::from_secs(5));
        assert!(dash.message().is_none());
    }
}
