//! Remote per-user workspace table, the authenticated persistence tier.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use super::storage::StoreError;
use super::Project;
use crate::constants::DEFAULT_PROJECT_ID;
use crate::window::WindowRecord;

/// One row of the `workspaces` table, keyed by (`id`, `user_id`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceRow {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub notes: Option<Vec<String>>,
    #[serde(default)]
    pub goals: Option<Vec<String>>,
    #[serde(default)]
    pub windows: Option<Vec<WindowRecord>>,
    #[serde(default)]
    pub total_productivity_time: Option<u64>,
    #[serde(default)]
    pub is_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl WorkspaceRow {
    pub fn from_project(project: &Project, user_id: &str) -> Self {
        Self {
            id: project.id.clone(),
            user_id: user_id.to_string(),
            name: project.name.clone(),
            notes: Some(project.notes.clone()),
            goals: Some(project.goals.clone()),
            windows: Some(project.windows.clone()),
            total_productivity_time: Some(project.total_productivity_time),
            is_default: Some(project.id == DEFAULT_PROJECT_ID),
            created_at: Some(project.created_at),
        }
    }

    pub fn is_default(&self) -> bool {
        self.is_default.unwrap_or(false)
    }

    /// Null columns decode as empty. Focus sessions are not stored remotely.
    pub fn into_project(self) -> Project {
        let mut project = Project::new(self.id, self.name);
        project.notes = self.notes.unwrap_or_default();
        project.goals = self.goals.unwrap_or_default();
        project.windows = self.windows.unwrap_or_default();
        project.total_productivity_time = self.total_productivity_time.unwrap_or(0);
        if let Some(created_at) = self.created_at {
            project.created_at = created_at;
        }
        project
    }
}

/// Implementations are shared with the background sync thread.
pub trait RemoteTable: Send + Sync {
    fn select_for_user(&self, user_id: &str) -> Result<Vec<WorkspaceRow>, StoreError>;
    fn upsert(&self, row: &WorkspaceRow) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct TableState {
    rows: BTreeMap<(String, String), WorkspaceRow>,
    unavailable: bool,
}

/// In-memory table. Clones share rows, and the table can be switched
/// offline to exercise fallback paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    state: Arc<Mutex<TableState>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        if let Ok(mut state) = self.state.lock() {
            state.unavailable = unavailable;
        }
    }

    pub fn rows(&self) -> Vec<WorkspaceRow> {
        self.state
            .lock()
            .map(|state| state.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, TableState>, StoreError> {
        let state = self
            .state
            .lock()
            .map_err(|_| StoreError::Unavailable("memory table poisoned".into()))?;
        if state.unavailable {
            return Err(StoreError::Unavailable("memory table offline".into()));
        }
        Ok(state)
    }
}

impl RemoteTable for MemoryTable {
    fn select_for_user(&self, user_id: &str) -> Result<Vec<WorkspaceRow>, StoreError> {
        Ok(self
            .lock()?
            .rows
            .values()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }

    fn upsert(&self, row: &WorkspaceRow) -> Result<(), StoreError> {
        self.lock()?
            .rows
            .insert((row.id.clone(), row.user_id.clone()), row.clone());
        Ok(())
    }
}

/// PostgREST-style HTTP table (`/rest/v1/workspaces`).
#[derive(Debug, Clone)]
pub struct PostgrestTable {
    client: Client,
    base_url: String,
    api_key: String,
    access_token: Option<String>,
}

impl PostgrestTable {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            access_token: None,
        })
    }

    /// Bearer token for row-level security; the API key is used otherwise.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/rest/v1/workspaces", self.base_url)
    }

    fn bearer(&self) -> String {
        format!(
            "Bearer {}",
            self.access_token.as_deref().unwrap_or(&self.api_key)
        )
    }
}

impl RemoteTable for PostgrestTable {
    fn select_for_user(&self, user_id: &str) -> Result<Vec<WorkspaceRow>, StoreError> {
        let url = format!(
            "{}?select=*&user_id=eq.{}",
            self.endpoint(),
            urlencoding::encode(user_id)
        );
        tracing::debug!(%url, "selecting workspaces");
        let rows = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header("Authorization", self.bearer())
            .send()?
            .error_for_status()?
            .json::<Vec<WorkspaceRow>>()?;
        Ok(rows)
    }

    fn upsert(&self, row: &WorkspaceRow) -> Result<(), StoreError> {
        tracing::debug!(id = %row.id, "upserting workspace");
        self.client
            .post(self.endpoint())
            .header("apikey", &self.api_key)
            .header("Authorization", self.bearer())
            .header("Prefer", "resolution=merge-duplicates")
            .json(&[row])
            .send()?
            .error_for_status()?;
        Ok(())
    }
}
