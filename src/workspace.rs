//! The workspace root: one place that owns the project store, the window
//! registry, the focus timer and the dock, and keeps them in step.
//!
//! Front-ends never reach into the parts directly for mutations. They call
//! the methods here, which persist at the right moments and queue
//! [`WorkspaceEvent`]s to be drained with [`Workspace::take_events`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;

use crate::analytics::FocusSummary;
use crate::dock::{App, Dock, DockError};
use crate::layout::floating::ResizeEdge;
use crate::project::{
    EntryKind, Project, ProjectError, ProjectStore, RemoteTable, StoreError, SwitchOutcome, backup,
};
use crate::timer::{ProductivityTimer, TimerEvent};
use crate::window::{Point, Viewport, WindowManager};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceEvent {
    ProjectSwitched { id: String, name: String, created: bool },
    AppOpened { id: String, title: String },
    WindowClosed { id: String, title: String },
    WorkSessionComplete { minutes: u32, sessions: u32 },
    BreakComplete,
    PersistFailed { reason: String },
}

#[derive(Debug)]
pub struct Workspace {
    store: ProjectStore,
    windows: WindowManager,
    timer: ProductivityTimer,
    dock: Dock,
    events: Vec<WorkspaceEvent>,
    autosave: Duration,
    since_save: Duration,
}

impl Workspace {
    /// Assemble a workspace; the current project's saved windows are loaded
    /// into the registry. A dock saved on this device replaces `dock`.
    pub fn new(
        store: ProjectStore,
        mut windows: WindowManager,
        timer: ProductivityTimer,
        dock: Dock,
    ) -> Self {
        windows.replace_windows(store.current().windows.clone());
        let dock = store.saved_apps().map(Dock::new).unwrap_or(dock);
        Self {
            store,
            windows,
            timer,
            dock,
            events: Vec::new(),
            autosave: Duration::from_secs(30),
            since_save: Duration::ZERO,
        }
    }

    pub fn with_autosave(mut self, interval: Duration) -> Self {
        self.autosave = interval;
        self
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    pub fn timer(&self) -> &ProductivityTimer {
        &self.timer
    }

    pub fn dock(&self) -> &Dock {
        &self.dock
    }

    pub fn current_project(&self) -> &Project {
        self.store.current()
    }

    /// Drain queued events, including background sync failures that have
    /// arrived since the last call.
    pub fn take_events(&mut self) -> Vec<WorkspaceEvent> {
        for reason in self.store.take_remote_failures() {
            self.events.push(WorkspaceEvent::PersistFailed { reason });
        }
        std::mem::take(&mut self.events)
    }

    fn sync_windows(&mut self) {
        self.store.set_windows(self.windows.windows().to_vec());
    }

    fn write_through(&mut self) -> Result<(), StoreError> {
        self.sync_windows();
        self.since_save = Duration::ZERO;
        self.store.persist()
    }

    /// Sync and persist, reporting failure as an event rather than an error.
    fn persist(&mut self) {
        if let Err(err) = self.write_through() {
            tracing::warn!(error = %err, "persist failed");
            self.events.push(WorkspaceEvent::PersistFailed {
                reason: err.to_string(),
            });
        }
    }

    /// Sync the registry into the current project, write it through and
    /// wait for the remote tier to take it. Used on exit.
    pub fn save(&mut self) -> Result<(), StoreError> {
        self.write_through()?;
        self.store.flush_remote()
    }

    // --- windows -------------------------------------------------------

    pub fn open(&mut self, title: &str, url: &str) -> String {
        let id = self.windows.open(title, url);
        self.events.push(WorkspaceEvent::AppOpened {
            id: id.clone(),
            title: title.to_string(),
        });
        self.persist();
        id
    }

    /// Open the dock entry at `index`.
    pub fn open_app(&mut self, index: usize) -> Option<String> {
        let app = self.dock.get(index)?.clone();
        Some(self.open(&app.name, &app.url))
    }

    pub fn open_app_named(&mut self, name: &str) -> Option<String> {
        let app = self.dock.find(name)?.clone();
        Some(self.open(&app.name, &app.url))
    }

    pub fn close_window(&mut self, id: &str) -> bool {
        let Some(record) = self.windows.close(id) else {
            return false;
        };
        self.events.push(WorkspaceEvent::WindowClosed {
            id: record.id,
            title: record.title,
        });
        self.persist();
        true
    }

    pub fn focus_window(&mut self, id: &str) -> bool {
        self.windows.focus(id).is_some()
    }

    pub fn cycle_focus(&mut self) -> Option<String> {
        self.windows.cycle_focus()
    }

    pub fn minimize_window(&mut self, id: &str) -> bool {
        let changed = self.windows.minimize(id);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn restore_window(&mut self, id: &str) -> bool {
        let changed = self.windows.restore(id);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn toggle_fullscreen(&mut self, id: &str) -> bool {
        let changed = self.windows.toggle_fullscreen(id);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn navigate(&mut self, id: &str, input: &str) -> bool {
        let changed = self.windows.navigate(id, input);
        if changed {
            self.persist();
        }
        changed
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.windows.viewport() != viewport {
            self.windows.set_viewport(viewport);
        }
    }

    pub fn pointer_down_header(&mut self, id: &str, pointer: Point) -> bool {
        self.windows.pointer_down_header(id, pointer)
    }

    pub fn pointer_down_edge(&mut self, id: &str, edge: ResizeEdge, pointer: Point) -> bool {
        self.windows.pointer_down_edge(id, edge, pointer)
    }

    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        self.windows.pointer_move(pointer)
    }

    /// End the active drag/resize and persist the resulting geometry.
    pub fn pointer_up(&mut self) -> Option<String> {
        let id = self.windows.pointer_up()?;
        self.persist();
        Some(id)
    }

    pub fn cancel_interaction(&mut self) {
        self.windows.cancel_interaction();
    }

    // --- projects ------------------------------------------------------

    pub fn switch_project(&mut self, id: &str) -> SwitchOutcome {
        if id == self.store.current_id() {
            return SwitchOutcome::Unchanged;
        }
        self.windows.cancel_interaction();
        self.persist();
        let outcome = self.store.switch_project(id);
        self.windows
            .replace_windows(self.store.current().windows.clone());
        let project = self.store.current();
        self.events.push(WorkspaceEvent::ProjectSwitched {
            id: project.id.clone(),
            name: project.name.clone(),
            created: outcome == SwitchOutcome::Created,
        });
        self.persist();
        outcome
    }

    pub fn create_project(&mut self, name: &str) -> String {
        self.windows.cancel_interaction();
        self.persist();
        let id = self.store.create_project(name);
        self.windows.replace_windows(Vec::new());
        let project = self.store.current();
        self.events.push(WorkspaceEvent::ProjectSwitched {
            id: project.id.clone(),
            name: project.name.clone(),
            created: true,
        });
        self.persist();
        id
    }

    pub fn next_project(&mut self) -> Option<String> {
        let next = self.store.next_project_id()?;
        self.switch_project(&next);
        Some(next)
    }

    pub fn rename_project(&mut self, name: &str) -> Result<(), ProjectError> {
        self.store.rename_current(name)?;
        self.persist();
        Ok(())
    }

    pub fn add_entry(&mut self, kind: EntryKind, text: &str) -> Result<usize, ProjectError> {
        let index = self.store.add_entry(kind, text)?;
        self.persist();
        Ok(index)
    }

    pub fn update_entry(
        &mut self,
        kind: EntryKind,
        index: usize,
        text: &str,
    ) -> Result<(), ProjectError> {
        self.store.update_entry(kind, index, text)?;
        self.persist();
        Ok(())
    }

    pub fn remove_entry(&mut self, kind: EntryKind, index: usize) -> Result<String, ProjectError> {
        let removed = self.store.remove_entry(kind, index)?;
        self.persist();
        Ok(removed)
    }

    pub fn sign_in(
        &mut self,
        table: Box<dyn RemoteTable>,
        user_id: &str,
    ) -> Result<(), StoreError> {
        self.windows.cancel_interaction();
        self.sync_windows();
        self.store.sign_in(table, user_id)?;
        self.windows
            .replace_windows(self.store.current().windows.clone());
        Ok(())
    }

    pub fn sign_out(&mut self) {
        self.windows.cancel_interaction();
        self.sync_windows();
        self.store.sign_out();
        self.windows
            .replace_windows(self.store.current().windows.clone());
    }

    pub fn export_backup(&mut self, dir: &Path) -> Result<PathBuf, StoreError> {
        self.write_through()?;
        backup::export(self.store.all(), dir, Utc::now())
    }

    /// Replace every project with a backup's contents.
    pub fn import_backup(&mut self, path: &Path) -> Result<usize, StoreError> {
        let projects: BTreeMap<String, Project> = backup::import(path)?;
        let count = projects.len();
        self.windows.cancel_interaction();
        self.store.replace_projects(projects);
        self.windows
            .replace_windows(self.store.current().windows.clone());
        self.since_save = Duration::ZERO;
        self.store.persist_all()?;
        tracing::info!(projects = count, "backup imported");
        Ok(count)
    }

    // --- dock ----------------------------------------------------------

    fn save_dock(&mut self) -> Result<(), DockError> {
        self.store
            .save_apps(self.dock.apps())
            .map_err(|err| DockError::Save(err.to_string()))
    }

    pub fn add_app(&mut self, name: &str, url: &str) -> Result<App, DockError> {
        let app = self.dock.add_custom(name, url)?.clone();
        self.save_dock()?;
        Ok(app)
    }

    pub fn move_app(&mut self, from: usize, to: usize) -> Result<(), DockError> {
        self.dock.move_app(from, to)?;
        self.save_dock()
    }

    pub fn set_app_url(&mut self, index: usize, url: &str) -> Result<(), DockError> {
        self.dock.set_url(index, url)?;
        self.save_dock()
    }

    pub fn focus_summary(&self) -> FocusSummary {
        FocusSummary::compute(&self.store.current().focus_sessions, Utc::now())
    }

    // --- timer & time --------------------------------------------------

    pub fn toggle_timer(&mut self) {
        self.timer.toggle();
    }

    pub fn reset_timer(&mut self) {
        self.timer.reset();
    }

    pub fn set_timer_durations(&mut self, work_minutes: u32, break_minutes: u32) {
        self.timer.set_durations(work_minutes, break_minutes);
    }

    /// Feed elapsed wall time: accumulates project time, drives the timer,
    /// records completed work phases and autosaves on the interval.
    pub fn tick(&mut self, elapsed: Duration) {
        self.store.advance(elapsed);
        let mut dirty = false;
        for event in self.timer.advance(elapsed) {
            match event {
                TimerEvent::WorkComplete { minutes } => {
                    self.store.record_focus_session(minutes, Utc::now());
                    self.events.push(WorkspaceEvent::WorkSessionComplete {
                        minutes,
                        sessions: self.timer.sessions(),
                    });
                    dirty = true;
                }
                TimerEvent::BreakComplete => self.events.push(WorkspaceEvent::BreakComplete),
            }
        }
        self.since_save += elapsed;
        if dirty || self.since_save >= self.autosave {
            self.persist();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{LocalStorage, MemoryStorage, MemoryTable};

    fn workspace() -> (Workspace, MemoryStorage) {
        let storage = MemoryStorage::new();
        let store = ProjectStore::open(storage.clone());
        let wm = WindowManager::with_seed(Viewport::new(1920, 1080), 7);
        (
            Workspace::new(store, wm, ProductivityTimer::default(), Dock::default()),
            storage,
        )
    }

    #[test]
    fn opening_an_app_persists_and_reports() {
        let (mut ws, storage) = workspace();
        let id = ws.open_app_named("notion").unwrap();
        assert_eq!(
            ws.take_events(),
            vec![WorkspaceEvent::AppOpened {
                id: id.clone(),
                title: "Notion".into()
            }]
        );
        assert!(ws.take_events().is_empty());
        let raw = storage.get("multispace-projects").unwrap().unwrap();
        assert!(raw.contains(&id));
    }

    #[test]
    fn windows_follow_their_project() {
        let (mut ws, _) = workspace();
        let id = ws.open_app(0).unwrap();
        ws.switch_project("other");
        assert!(ws.windows().is_empty());
        ws.open_app(1);
        ws.switch_project("default");
        assert_eq!(ws.windows().len(), 1);
        assert!(ws.windows().get(&id).is_some());
    }

    #[test]
    fn completed_work_phase_records_session() {
        let (mut ws, _) = workspace();
        ws.set_timer_durations(1, 1);
        ws.toggle_timer();
        ws.take_events();
        ws.tick(Duration::from_secs(60));
        assert_eq!(
            ws.take_events(),
            vec![WorkspaceEvent::WorkSessionComplete {
                minutes: 1,
                sessions: 1
            }]
        );
        assert_eq!(ws.current_project().focus_sessions.len(), 1);
        assert_eq!(ws.focus_summary().total_minutes, 1);
        assert_eq!(ws.store().time_spent(), 60);
    }

    #[test]
    fn autosave_writes_time() {
        let (ws, storage) = workspace();
        let mut ws = ws.with_autosave(Duration::from_secs(5));
        ws.tick(Duration::from_secs(3));
        assert_eq!(storage.get("multispace-time-default").unwrap(), None);
        ws.tick(Duration::from_secs(3));
        assert_eq!(
            storage.get("multispace-time-default").unwrap().as_deref(),
            Some("6")
        );
    }

    #[test]
    fn background_sync_failures_become_events() {
        let (mut ws, _) = workspace();
        let table = MemoryTable::new();
        table.set_unavailable(true);
        ws.sign_in(Box::new(table), "u1").unwrap();
        ws.add_entry(EntryKind::Note, "queued").unwrap();
        ws.store().wait_for_remote();
        assert!(
            ws.take_events()
                .iter()
                .any(|e| matches!(e, WorkspaceEvent::PersistFailed { .. }))
        );
    }

    #[test]
    fn dock_edits_are_saved_on_the_device() {
        let (mut ws, storage) = workspace();
        let app = ws.add_app("Mail", "mail.example.com").unwrap();
        assert_eq!(app.url, "https://mail.example.com");
        ws.move_app(8, 0).unwrap();
        ws.set_app_url(1, "systematron.org").unwrap();
        assert_eq!(ws.move_app(0, 42), Err(DockError::NoSuchApp(42)));

        let store = ProjectStore::open(storage);
        let wm = WindowManager::with_seed(Viewport::new(1920, 1080), 7);
        let ws = Workspace::new(store, wm, ProductivityTimer::default(), Dock::default());
        assert_eq!(ws.dock().apps().len(), 9);
        assert_eq!(ws.dock().get(0).unwrap().name, "Mail");
        assert_eq!(ws.dock().get(1).unwrap().url, "https://systematron.org");
    }

    #[test]
    fn backup_round_trip_replaces_projects() {
        let dir = tempfile::tempdir().unwrap();
        let (mut ws, _) = workspace();
        ws.add_entry(EntryKind::Note, "keep me").unwrap();
        let path = ws.export_backup(dir.path()).unwrap();
        ws.remove_entry(EntryKind::Note, 0).unwrap();
        ws.create_project("Scratch");
        assert_eq!(ws.import_backup(&path).unwrap(), 1);
        assert_eq!(ws.store().len(), 1);
        assert_eq!(ws.current_project().notes, vec!["keep me".to_string()]);
    }
}
