use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use super::remote::{RemoteTable, WorkspaceRow};
use super::storage::{LocalStorage, StoreError};
use super::sync::SyncWorker;
use super::{EntryKind, FocusSession, Project, ProjectError};
use crate::constants::{
    DEFAULT_PROJECT_ID, LOCAL_APPS_KEY, LOCAL_CURRENT_KEY, LOCAL_PROJECTS_KEY,
    LOCAL_TIME_KEY_PREFIX,
};
use crate::dock::App;
use crate::window::WindowRecord;

/// Which tier the store reads from and writes through to.
pub enum Backend {
    Local,
    Remote {
        table: Arc<dyn RemoteTable>,
        sync: SyncWorker,
        user_id: String,
    },
}

impl fmt::Debug for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Local => write!(f, "Local"),
            Backend::Remote { user_id, .. } => {
                f.debug_struct("Remote").field("user_id", user_id).finish()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// Target was already current.
    Unchanged,
    Switched,
    /// Target did not exist and was created empty.
    Created,
}

/// The keyed project collection plus the live time counter of the current
/// project.
///
/// Mutators only touch memory; callers decide when to [`persist`]. Local
/// keys are always written so focus sessions (which the remote schema does
/// not carry) survive. While signed in they are suffixed with `@<user>`, so
/// the signed-out projects are never overwritten by a user's remote data,
/// and the current project is queued for upsert on a background thread.
///
/// [`persist`]: ProjectStore::persist
pub struct ProjectStore {
    local: Box<dyn LocalStorage>,
    backend: Backend,
    projects: BTreeMap<String, Project>,
    current: String,
    live_secs: u64,
    carry: Duration,
}

impl fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectStore")
            .field("backend", &self.backend)
            .field("projects", &self.projects.len())
            .field("current", &self.current)
            .field("live_secs", &self.live_secs)
            .finish()
    }
}

fn default_project() -> Project {
    Project::new(DEFAULT_PROJECT_ID, "Workspace 1")
}

fn time_key(id: &str) -> String {
    format!("{LOCAL_TIME_KEY_PREFIX}{id}")
}

impl ProjectStore {
    /// Open the store on a local tier and load whatever it holds.
    pub fn open(local: impl LocalStorage + 'static) -> Self {
        let mut store = Self {
            local: Box::new(local),
            backend: Backend::Local,
            projects: BTreeMap::new(),
            current: DEFAULT_PROJECT_ID.to_string(),
            live_secs: 0,
            carry: Duration::ZERO,
        };
        store.load_current();
        store.reload();
        store
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    pub fn user_id(&self) -> Option<&str> {
        match &self.backend {
            Backend::Local => None,
            Backend::Remote { user_id, .. } => Some(user_id),
        }
    }

    /// Local key for `base` on the active tier.
    fn key(&self, base: &str) -> String {
        match &self.backend {
            Backend::Local => base.to_string(),
            Backend::Remote { user_id, .. } => format!("{base}@{user_id}"),
        }
    }

    fn load_current(&mut self) {
        if let Ok(Some(id)) = self.local.get(&self.key(LOCAL_CURRENT_KEY))
            && !id.trim().is_empty()
        {
            self.current = id.trim().to_string();
        }
    }

    /// Switch to the remote tier for `user_id` and reload from it.
    ///
    /// Loading is synchronous; later writes go through a background worker.
    pub fn sign_in(
        &mut self,
        table: Box<dyn RemoteTable>,
        user_id: impl Into<String>,
    ) -> Result<(), StoreError> {
        let table: Arc<dyn RemoteTable> = Arc::from(table);
        let sync = SyncWorker::spawn(Arc::clone(&table))?;
        self.flush_time();
        if let Err(err) = self.write_local() {
            tracing::warn!(error = %err, "failed to save local state before sign-in");
        }
        let user_id = user_id.into();
        tracing::info!(user = %user_id, "signed in");
        self.backend = Backend::Remote {
            table,
            sync,
            user_id,
        };
        self.load_current();
        self.reload();
        Ok(())
    }

    /// Save and drain pending upserts, then return to the signed-out
    /// projects exactly as they were before sign-in.
    pub fn sign_out(&mut self) {
        if matches!(self.backend, Backend::Local) {
            return;
        }
        if let Err(err) = self.persist() {
            tracing::warn!(error = %err, "failed to save before sign-out");
        }
        if let Err(err) = self.flush_remote() {
            tracing::warn!(error = %err, "remote sync incomplete at sign-out");
        }
        self.backend = Backend::Local;
        tracing::info!("signed out");
        self.current = DEFAULT_PROJECT_ID.to_string();
        self.load_current();
        self.reload();
    }

    /// Re-read projects from the active tier. Remote failures and empty
    /// remote results fall back to the local tier; nothing here is fatal.
    pub fn reload(&mut self) {
        let local = self.read_local_map();
        let remote = match &self.backend {
            Backend::Local => None,
            Backend::Remote { table, user_id, .. } => match table.select_for_user(user_id) {
                Ok(rows) if rows.is_empty() => {
                    tracing::debug!(user = %user_id, "no remote workspaces; using local state");
                    None
                }
                Ok(rows) => Some(rows),
                Err(err) => {
                    tracing::warn!(error = %err, "remote load failed; using local state");
                    None
                }
            },
        };

        let current = match remote {
            Some(rows) => {
                let preferred = rows
                    .iter()
                    .find(|row| row.id == self.current)
                    .or_else(|| rows.iter().find(|row| row.is_default()))
                    .or_else(|| rows.first())
                    .map(|row| row.id.clone());
                self.projects = rows
                    .into_iter()
                    .map(|row| {
                        let mut project = row.into_project();
                        if let Some(saved) = local.get(&project.id) {
                            project.focus_sessions = saved.focus_sessions.clone();
                        }
                        (project.id.clone(), project)
                    })
                    .collect();
                preferred
            }
            None => {
                self.projects = local;
                if self.projects.is_empty() {
                    let project = default_project();
                    self.projects.insert(project.id.clone(), project);
                }
                Some(self.current.clone())
                    .filter(|id| self.projects.contains_key(id))
                    .or_else(|| {
                        self.projects
                            .contains_key(DEFAULT_PROJECT_ID)
                            .then(|| DEFAULT_PROJECT_ID.to_string())
                    })
                    .or_else(|| self.ordered_ids().into_iter().next())
            }
        };

        self.current = current.unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string());
        if !self.projects.contains_key(&self.current) {
            let project = Project::new(self.current.clone(), "Workspace 1");
            self.projects.insert(self.current.clone(), project);
        }
        self.reset_baseline();
        tracing::debug!(
            projects = self.projects.len(),
            current = %self.current,
            "projects loaded"
        );
    }

    /// The active tier's local map. A user signing in for the first time on
    /// this device starts from a copy of the signed-out projects.
    fn read_local_map(&self) -> BTreeMap<String, Project> {
        let mut raw = self.read_raw(&self.key(LOCAL_PROJECTS_KEY));
        if raw.is_none() && !matches!(self.backend, Backend::Local) {
            raw = self.read_raw(LOCAL_PROJECTS_KEY);
        }
        let Some(raw) = raw else {
            return BTreeMap::new();
        };
        match serde_json::from_str::<BTreeMap<String, Project>>(&raw) {
            Ok(mut map) => {
                // Keys are authoritative.
                for (id, project) in map.iter_mut() {
                    project.id.clone_from(id);
                }
                map
            }
            Err(err) => {
                tracing::warn!(error = %err, "malformed local projects; starting fresh");
                BTreeMap::new()
            }
        }
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.local.get(key) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key, error = %err, "local storage unreadable");
                None
            }
        }
    }

    fn reset_baseline(&mut self) {
        let stored = self.current().total_productivity_time;
        let tracked = self
            .read_raw(&self.key(&time_key(&self.current)))
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(0);
        self.live_secs = stored.max(tracked);
        self.carry = Duration::ZERO;
    }

    fn flush_time(&mut self) {
        let live = self.live_secs;
        if let Some(project) = self.projects.get_mut(&self.current) {
            project.total_productivity_time = live;
        }
    }

    fn write_local(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.projects)?;
        let projects_key = self.key(LOCAL_PROJECTS_KEY);
        let current_key = self.key(LOCAL_CURRENT_KEY);
        let elapsed_key = self.key(&time_key(&self.current));
        self.local.set(&projects_key, &json)?;
        self.local.set(&current_key, &self.current)?;
        self.local.set(&elapsed_key, &self.live_secs.to_string())?;
        Ok(())
    }

    /// Flush the live time, write the local tier and queue the current
    /// project for upsert when signed in.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        self.flush_time();
        self.write_local()?;
        if let Backend::Remote { sync, user_id, .. } = &self.backend {
            sync.submit(WorkspaceRow::from_project(self.current(), user_id));
        }
        Ok(())
    }

    /// Like [`persist`](Self::persist) but queues every project.
    pub fn persist_all(&mut self) -> Result<(), StoreError> {
        self.flush_time();
        self.write_local()?;
        if let Backend::Remote { sync, user_id, .. } = &self.backend {
            for project in self.projects.values() {
                sync.submit(WorkspaceRow::from_project(project, user_id));
            }
        }
        Ok(())
    }

    /// Reasons for background upserts that failed since the last call.
    pub fn take_remote_failures(&self) -> Vec<String> {
        match &self.backend {
            Backend::Local => Vec::new(),
            Backend::Remote { sync, .. } => sync.take_failures(),
        }
    }

    /// Block until queued upserts have been attempted. Failures stay
    /// queued for [`take_remote_failures`](Self::take_remote_failures).
    pub fn wait_for_remote(&self) {
        if let Backend::Remote { sync, .. } = &self.backend {
            sync.flush();
        }
    }

    /// Wait for queued upserts and report any that failed.
    pub fn flush_remote(&self) -> Result<(), StoreError> {
        self.wait_for_remote();
        let failures = self.take_remote_failures();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(StoreError::Unavailable(failures.join("; ")))
        }
    }

    /// The saved dock, if the user ever customized it on this device.
    pub fn saved_apps(&self) -> Option<Vec<App>> {
        let raw = self.read_raw(LOCAL_APPS_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(apps) => Some(apps),
            Err(err) => {
                tracing::warn!(error = %err, "malformed saved dock; using defaults");
                None
            }
        }
    }

    pub fn save_apps(&mut self, apps: &[App]) -> Result<(), StoreError> {
        let json = serde_json::to_string(apps)?;
        self.local.set(LOCAL_APPS_KEY, &json)
    }

    pub fn current_id(&self) -> &str {
        &self.current
    }

    pub fn current(&self) -> &Project {
        // The current id always has an entry; see `reload` and `switch_project`.
        &self.projects[&self.current]
    }

    fn current_mut(&mut self) -> &mut Project {
        self.projects
            .entry(self.current.clone())
            .or_insert_with(default_project)
    }

    pub fn get(&self, id: &str) -> Option<&Project> {
        self.projects.get(id)
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Projects in creation order.
    pub fn projects(&self) -> Vec<&Project> {
        let mut list: Vec<&Project> = self.projects.values().collect();
        list.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        list
    }

    fn ordered_ids(&self) -> Vec<String> {
        self.projects().into_iter().map(|p| p.id.clone()).collect()
    }

    /// The project after the current one in creation order, wrapping.
    pub fn next_project_id(&self) -> Option<String> {
        let ids = self.ordered_ids();
        let pos = ids.iter().position(|id| *id == self.current)?;
        ids.get((pos + 1) % ids.len()).cloned()
    }

    pub fn all(&self) -> &BTreeMap<String, Project> {
        &self.projects
    }

    /// Flush the outgoing project's time, create the target if unseen, make
    /// it current and rebase the live counter on its stored time.
    pub fn switch_project(&mut self, id: &str) -> SwitchOutcome {
        if id == self.current {
            return SwitchOutcome::Unchanged;
        }
        self.flush_time();
        let mut outcome = SwitchOutcome::Switched;
        if !self.projects.contains_key(id) {
            let name = format!("Workspace {}", self.projects.len() + 1);
            self.projects
                .insert(id.to_string(), Project::new(id, name));
            outcome = SwitchOutcome::Created;
        }
        let from = std::mem::replace(&mut self.current, id.to_string());
        self.live_secs = self.current().total_productivity_time;
        self.carry = Duration::ZERO;
        tracing::debug!(%from, to = %self.current, ?outcome, "switched project");
        outcome
    }

    /// Create a project with a fresh id and switch to it. Blank names get
    /// the generated `Workspace N` label.
    pub fn create_project(&mut self, name: &str) -> String {
        let mut stamp = Utc::now().timestamp_millis();
        while self.projects.contains_key(&stamp.to_string()) {
            stamp += 1;
        }
        let id = stamp.to_string();
        self.switch_project(&id);
        let name = name.trim();
        if !name.is_empty() {
            self.current_mut().name = name.to_string();
        }
        id
    }

    pub fn rename_current(&mut self, name: &str) -> Result<(), ProjectError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProjectError::EmptyName);
        }
        self.current_mut().name = name.to_string();
        Ok(())
    }

    pub fn add_entry(&mut self, kind: EntryKind, text: &str) -> Result<usize, ProjectError> {
        self.current_mut().add_entry(kind, text)
    }

    pub fn update_entry(
        &mut self,
        kind: EntryKind,
        index: usize,
        text: &str,
    ) -> Result<(), ProjectError> {
        self.current_mut().update_entry(kind, index, text)
    }

    pub fn remove_entry(&mut self, kind: EntryKind, index: usize) -> Result<String, ProjectError> {
        self.current_mut().remove_entry(kind, index)
    }

    pub fn set_windows(&mut self, windows: Vec<WindowRecord>) {
        self.current_mut().windows = windows;
    }

    /// Accumulate focus time on the current project.
    pub fn advance(&mut self, elapsed: Duration) {
        self.carry += elapsed;
        let whole = self.carry.as_secs();
        self.carry -= Duration::from_secs(whole);
        self.live_secs = self.live_secs.saturating_add(whole);
    }

    /// Live seconds for the current project, including unflushed time.
    pub fn time_spent(&self) -> u64 {
        self.live_secs
    }

    pub fn record_focus_session(&mut self, minutes: u32, at: DateTime<Utc>) {
        self.current_mut().focus_sessions.push(FocusSession {
            completed_at: at,
            minutes,
        });
        tracing::debug!(project = %self.current, minutes, "focus session recorded");
    }

    /// Replace the whole project map, e.g. from a backup. The current
    /// project is kept when it survives, else `default`, else the first.
    ///
    /// Time keys of the replaced projects are dropped so the incoming
    /// totals are not overridden by older, larger counters on next load.
    pub fn replace_projects(&mut self, projects: BTreeMap<String, Project>) {
        let stale: Vec<String> = self
            .projects
            .keys()
            .map(|id| self.key(&time_key(id)))
            .collect();
        for key in stale {
            if let Err(err) = self.local.remove(&key) {
                tracing::warn!(key = %key, error = %err, "failed to drop stale time key");
            }
        }
        self.projects = projects;
        for (id, project) in self.projects.iter_mut() {
            project.id.clone_from(id);
        }
        if self.projects.is_empty() {
            let project = default_project();
            self.projects.insert(project.id.clone(), project);
        }
        if !self.projects.contains_key(&self.current) {
            self.current = if self.projects.contains_key(DEFAULT_PROJECT_ID) {
                DEFAULT_PROJECT_ID.to_string()
            } else {
                self.ordered_ids()
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| DEFAULT_PROJECT_ID.to_string())
            };
        }
        self.live_secs = self.current().total_productivity_time;
        self.carry = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{MemoryStorage, MemoryTable};

    fn store() -> (ProjectStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (ProjectStore::open(storage.clone()), storage)
    }

    #[test]
    fn first_load_creates_default_project() {
        let (store, _) = store();
        assert_eq!(store.current_id(), "default");
        assert_eq!(store.current().name, "Workspace 1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn switch_creates_unseen_and_flushes_time() {
        let (mut store, _) = store();
        store.advance(Duration::from_secs(90));
        assert_eq!(store.switch_project("b"), SwitchOutcome::Created);
        assert_eq!(store.current().name, "Workspace 2");
        assert_eq!(store.time_spent(), 0);
        assert_eq!(store.get("default").unwrap().total_productivity_time, 90);
        assert_eq!(store.switch_project("b"), SwitchOutcome::Unchanged);
        assert_eq!(store.switch_project("default"), SwitchOutcome::Switched);
        assert_eq!(store.time_spent(), 90);
    }

    #[test]
    fn persist_writes_map_and_time_key() {
        let (mut store, storage) = store();
        store.add_entry(EntryKind::Note, "Finish report").unwrap();
        store.advance(Duration::from_millis(2500));
        store.persist().unwrap();
        let raw = storage.get(LOCAL_PROJECTS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"totalProductivityTime\":2"));
        assert_eq!(
            storage.get("multispace-time-default").unwrap().as_deref(),
            Some("2")
        );

        let reopened = ProjectStore::open(storage);
        assert_eq!(reopened.current().notes, vec!["Finish report".to_string()]);
        assert_eq!(reopened.time_spent(), 2);
    }

    #[test]
    fn current_project_survives_reopen() {
        let (mut store, storage) = store();
        store.switch_project("b");
        store.persist().unwrap();
        let reopened = ProjectStore::open(storage.clone());
        assert_eq!(reopened.current_id(), "b");

        // A stale id falls back to the default project.
        let mut storage = storage;
        storage.set(LOCAL_CURRENT_KEY, "gone").unwrap();
        assert_eq!(ProjectStore::open(storage).current_id(), "default");
    }

    #[test]
    fn time_key_ahead_of_map_wins_on_load() {
        let mut storage = MemoryStorage::new();
        storage
            .set(LOCAL_PROJECTS_KEY, r#"{"default":{"id":"default","name":"W","totalProductivityTime":10}}"#)
            .unwrap();
        storage.set("multispace-time-default", "25").unwrap();
        let store = ProjectStore::open(storage);
        assert_eq!(store.time_spent(), 25);
    }

    #[test]
    fn malformed_local_data_yields_default() {
        let mut storage = MemoryStorage::new();
        storage.set(LOCAL_PROJECTS_KEY, "{not json").unwrap();
        let store = ProjectStore::open(storage);
        assert_eq!(store.current_id(), "default");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn create_project_uses_given_name() {
        let (mut store, _) = store();
        let id = store.create_project("  Thesis ");
        assert_eq!(store.current_id(), id);
        assert_eq!(store.current().name, "Thesis");
        let other = store.create_project("");
        assert_ne!(other, id);
        assert_eq!(store.current().name, "Workspace 3");
        assert_eq!(store.projects().len(), 3);
    }

    #[test]
    fn next_project_wraps_in_creation_order() {
        let (mut store, _) = store();
        let second = store.create_project("Second");
        store.switch_project("default");
        assert_eq!(store.next_project_id().as_deref(), Some(second.as_str()));
        store.switch_project(&second);
        assert_eq!(store.next_project_id().as_deref(), Some("default"));
    }

    #[test]
    fn sign_in_prefers_default_row_and_keeps_local_sessions() {
        let (mut store, _) = store();
        store.record_focus_session(25, Utc::now());
        store.persist().unwrap();

        let table = MemoryTable::new();
        let mut other = Project::new("x", "Remote X");
        other.total_productivity_time = 7;
        table.upsert(&WorkspaceRow::from_project(&other, "u1")).unwrap();
        let mut def = Project::new("default", "Remote Default");
        def.total_productivity_time = 40;
        table.upsert(&WorkspaceRow::from_project(&def, "u1")).unwrap();

        store.sign_in(Box::new(table.clone()), "u1").unwrap();
        assert_eq!(store.user_id(), Some("u1"));
        assert_eq!(store.current_id(), "default");
        assert_eq!(store.current().name, "Remote Default");
        assert_eq!(store.time_spent(), 40);
        assert_eq!(store.current().focus_sessions.len(), 1);
    }

    #[test]
    fn remote_failure_falls_back_to_local() {
        let (mut store, _) = store();
        store.add_entry(EntryKind::Goal, "Ship").unwrap();
        store.persist().unwrap();

        let table = MemoryTable::new();
        table.set_unavailable(true);
        store.sign_in(Box::new(table.clone()), "u1").unwrap();
        assert_eq!(store.current().goals, vec!["Ship".to_string()]);
        store.persist().unwrap();
        assert!(store.flush_remote().is_err());

        table.set_unavailable(false);
        store.persist().unwrap();
        store.flush_remote().unwrap();
        let rows = table.select_for_user("u1").unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].goals, Some(vec!["Ship".to_string()]));
        assert_eq!(rows[0].is_default, Some(true));
    }

    #[test]
    fn sign_in_leaves_signed_out_projects_untouched() {
        let (mut store, storage) = store();
        let thesis = store.create_project("Local Thesis");
        store.add_entry(EntryKind::Note, "draft").unwrap();
        store.persist().unwrap();

        let table = MemoryTable::new();
        table
            .upsert(&WorkspaceRow::from_project(&Project::new("default", "Cloud"), "u1"))
            .unwrap();
        store.sign_in(Box::new(table.clone()), "u1").unwrap();
        assert_eq!(store.current().name, "Cloud");
        assert!(store.get(&thesis).is_none());
        store.add_entry(EntryKind::Goal, "remote goal").unwrap();
        store.persist().unwrap();

        store.sign_out();
        assert!(matches!(store.backend(), Backend::Local));
        assert_eq!(store.current_id(), thesis);
        assert_eq!(store.current().notes, vec!["draft".to_string()]);
        assert!(store.get("default").unwrap().goals.is_empty());
        assert_eq!(table.rows()[0].goals, Some(vec!["remote goal".to_string()]));

        let reopened = ProjectStore::open(storage.clone());
        assert_eq!(reopened.get(&thesis).unwrap().name, "Local Thesis");
        assert_eq!(reopened.get("default").unwrap().name, "Workspace 1");

        // Signing back in picks up where the user left off.
        let mut store = ProjectStore::open(storage);
        store.sign_in(Box::new(table), "u1").unwrap();
        assert_eq!(store.current_id(), "default");
        assert_eq!(store.current().goals, vec!["remote goal".to_string()]);
    }

    #[test]
    fn replace_projects_drops_stale_time_keys() {
        let (mut store, storage) = store();
        store.switch_project("b");
        store.advance(Duration::from_secs(50));
        store.persist().unwrap();
        assert_eq!(storage.get("multispace-time-b").unwrap().as_deref(), Some("50"));

        let mut map = BTreeMap::new();
        let mut p = Project::new("default", "Workspace 1");
        p.total_productivity_time = 10;
        map.insert("default".to_string(), p);
        store.replace_projects(map);
        assert_eq!(storage.get("multispace-time-b").unwrap(), None);
        assert_eq!(store.current_id(), "default");
        assert_eq!(store.time_spent(), 10);
    }

    #[test]
    fn saved_dock_is_read_back() {
        let (mut store, storage) = store();
        assert!(store.saved_apps().is_none());
        let apps = vec![App::new("Mail", "https://mail.example.com", "✉")];
        store.save_apps(&apps).unwrap();
        assert_eq!(ProjectStore::open(storage.clone()).saved_apps(), Some(apps));

        let mut storage = storage;
        storage.set(LOCAL_APPS_KEY, "[oops").unwrap();
        assert!(ProjectStore::open(storage).saved_apps().is_none());
    }

    #[test]
    fn replace_projects_keeps_or_picks_current() {
        let (mut store, _) = store();
        let mut map = BTreeMap::new();
        let mut p = Project::new("ignored", "Imported");
        p.total_productivity_time = 12;
        map.insert("imp".to_string(), p);
        store.replace_projects(map);
        assert_eq!(store.current_id(), "imp");
        assert_eq!(store.current().id, "imp");
        assert_eq!(store.time_spent(), 12);
    }
}
