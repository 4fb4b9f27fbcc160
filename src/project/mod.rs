//! Projects (a.k.a. workspaces): named bundles of notes, goals, window
//! layout and accumulated focus time, plus the store that persists them.

pub mod backup;
pub mod remote;
pub mod storage;
mod store;
pub mod sync;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::window::WindowRecord;

pub use remote::{MemoryTable, PostgrestTable, RemoteTable, WorkspaceRow};
pub use storage::{FileStorage, LocalStorage, MemoryStorage, StoreError};
pub use store::{Backend, ProjectStore, SwitchOutcome};
pub use sync::SyncWorker;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectError {
    #[error("project name must not be empty")]
    EmptyName,
    #[error("{0} text must not be empty")]
    EmptyText(EntryKind),
    #[error("no {kind} at index {index} (have {len})")]
    IndexOutOfRange {
        kind: EntryKind,
        index: usize,
        len: usize,
    },
}

/// The two free-text lists every project carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Note,
    Goal,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Note => write!(f, "note"),
            EntryKind::Goal => write!(f, "goal"),
        }
    }
}

/// One completed work phase of the focus timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub completed_at: DateTime<Utc>,
    pub minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: Vec<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub windows: Vec<WindowRecord>,
    /// Seconds spent with this project open.
    #[serde(default)]
    pub total_productivity_time: u64,
    #[serde(default)]
    pub focus_sessions: Vec<FocusSession>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            notes: Vec::new(),
            goals: Vec::new(),
            windows: Vec::new(),
            total_productivity_time: 0,
            focus_sessions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn entries(&self, kind: EntryKind) -> &[String] {
        match kind {
            EntryKind::Note => &self.notes,
            EntryKind::Goal => &self.goals,
        }
    }

    fn entries_mut(&mut self, kind: EntryKind) -> &mut Vec<String> {
        match kind {
            EntryKind::Note => &mut self.notes,
            EntryKind::Goal => &mut self.goals,
        }
    }

    /// Append trimmed text; returns the new entry's index.
    pub fn add_entry(&mut self, kind: EntryKind, text: &str) -> Result<usize, ProjectError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ProjectError::EmptyText(kind));
        }
        let entries = self.entries_mut(kind);
        entries.push(text.to_string());
        Ok(entries.len() - 1)
    }

    pub fn update_entry(
        &mut self,
        kind: EntryKind,
        index: usize,
        text: &str,
    ) -> Result<(), ProjectError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ProjectError::EmptyText(kind));
        }
        let entries = self.entries_mut(kind);
        let len = entries.len();
        let slot = entries
            .get_mut(index)
            .ok_or(ProjectError::IndexOutOfRange { kind, index, len })?;
        *slot = text.to_string();
        Ok(())
    }

    pub fn remove_entry(&mut self, kind: EntryKind, index: usize) -> Result<String, ProjectError> {
        let entries = self.entries_mut(kind);
        let len = entries.len();
        if index >= len {
            return Err(ProjectError::IndexOutOfRange { kind, index, len });
        }
        Ok(entries.remove(index))
    }
}
