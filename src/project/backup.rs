//! Save-to-device backups of the whole project map.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::storage::StoreError;
use super::Project;

/// On-disk backup. `workspace` is the serialized project map, kept as a
/// string so the file matches what local storage holds.
#[derive(Debug, Serialize, Deserialize)]
struct BackupFile {
    timestamp: DateTime<Utc>,
    workspace: String,
}

pub fn backup_file_name(at: DateTime<Utc>) -> String {
    format!("multispace-backup-{}.json", at.format("%Y-%m-%d"))
}

/// Write a backup into `dir` and return its path.
pub fn export(
    projects: &BTreeMap<String, Project>,
    dir: &Path,
    at: DateTime<Utc>,
) -> Result<PathBuf, StoreError> {
    std::fs::create_dir_all(dir)?;
    let backup = BackupFile {
        timestamp: at,
        workspace: serde_json::to_string(projects)?,
    };
    let path = dir.join(backup_file_name(at));
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, serde_json::to_string_pretty(&backup)?)?;
    std::fs::rename(&tmp, &path)?;
    tracing::info!(path = ?path, projects = projects.len(), "backup exported");
    Ok(path)
}

/// Read a backup. A bare project map (no envelope) is accepted too.
pub fn import(path: &Path) -> Result<BTreeMap<String, Project>, StoreError> {
    let raw = std::fs::read_to_string(path)?;
    let projects = match serde_json::from_str::<BackupFile>(&raw) {
        Ok(backup) => serde_json::from_str(&backup.workspace)?,
        Err(_) => serde_json::from_str(&raw)?,
    };
    Ok(projects)
}
