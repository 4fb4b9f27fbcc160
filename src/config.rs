//! TOML configuration. Every section is optional.
//!
//! ```toml
//! [timer]
//! work_minutes = 50
//! break_minutes = 10
//!
//! [storage]
//! data_dir = "/home/me/.local/share/multispace"
//! autosave_secs = 30
//!
//! [remote]
//! url = "https://project.supabase.co"
//! api_key = "..."
//!
//! [logging]
//! filter = "multispace=debug"
//! file = "/tmp/multispace.log"
//!
//! [[dock.apps]]
//! name = "Mail"
//! url = "mail.example.com"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{DEFAULT_BREAK_MINUTES, DEFAULT_WORK_MINUTES};
use crate::dock::App;
use crate::layout::CellScale;

pub const CONFIG_ENV: &str = "MULTISPACE_CONFIG";
pub const DATA_DIR_ENV: &str = "MULTISPACE_DATA_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no home directory to derive {0} from")]
    NoHome(&'static str),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub timer: TimerConfig,
    pub storage: StorageConfig,
    pub remote: RemoteConfig,
    pub logging: LoggingConfig,
    pub dashboard: DashboardConfig,
    pub dock: DockConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub work_minutes: u32,
    pub break_minutes: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
    /// How often accumulated time is written while the dashboard runs.
    pub autosave_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            autosave_secs: 30,
        }
    }
}

impl StorageConfig {
    pub fn autosave_interval(&self) -> Duration {
        Duration::from_secs(self.autosave_secs.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            access_token: None,
            timeout_secs: 10,
        }
    }
}

impl RemoteConfig {
    pub fn is_configured(&self) -> bool {
        self.url.is_some() && self.api_key.is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: Option<String>,
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub cell_width: i32,
    pub cell_height: i32,
    pub tick_ms: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let scale = CellScale::default();
        Self {
            cell_width: scale.cell_width,
            cell_height: scale.cell_height,
            tick_ms: 250,
        }
    }
}

impl DashboardConfig {
    pub fn cell_scale(&self) -> CellScale {
        CellScale::new(self.cell_width, self.cell_height)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.clamp(16, 1000))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    /// Appended after the built-in apps.
    pub apps: Vec<App>,
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path`; a missing file yields defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text, path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?path, "no config file; using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Data directory: config, then `MULTISPACE_DATA_DIR`, then
    /// `$HOME/.local/share/multispace`.
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        resolve_data_dir(
            self.storage.data_dir.clone(),
            env_path(DATA_DIR_ENV),
            env_path("HOME"),
        )
    }
}

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Config path: explicit flag, then `MULTISPACE_CONFIG`, then
/// `$XDG_CONFIG_HOME/multispace/config.toml`, then `$HOME/.config/...`.
pub fn config_path(explicit: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    resolve_config_path(
        explicit,
        env_path(CONFIG_ENV),
        env_path("XDG_CONFIG_HOME"),
        env_path("HOME"),
    )
}

fn resolve_config_path(
    explicit: Option<PathBuf>,
    from_env: Option<PathBuf>,
    xdg: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit.or(from_env) {
        return Ok(path);
    }
    let base = xdg
        .or_else(|| home.map(|h| h.join(".config")))
        .ok_or(ConfigError::NoHome("the config path"))?;
    Ok(base.join("multispace").join("config.toml"))
}

fn resolve_data_dir(
    configured: Option<PathBuf>,
    from_env: Option<PathBuf>,
    home: Option<PathBuf>,
) -> Result<PathBuf, ConfigError> {
    if let Some(dir) = configured.or(from_env) {
        return Ok(dir);
    }
    home.map(|h| h.join(".local").join("share").join("multispace"))
        .ok_or(ConfigError::NoHome("the data directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn empty_config_is_default() {
        let cfg = Config::from_toml("", Path::new("c.toml")).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.timer.work_minutes, 25);
        assert_eq!(cfg.storage.autosave_interval(), Duration::from_secs(30));
    }

    #[test]
    fn sections_parse() {
        let cfg = Config::from_toml(
            indoc! {r#"
                [timer]
                work_minutes = 50

                [remote]
                url = "https://x.supabase.co"
                api_key = "k"

                [[dock.apps]]
                name = "Mail"
                url = "https://mail.example.com"
            "#},
            Path::new("c.toml"),
        )
        .unwrap();
        assert_eq!(cfg.timer.work_minutes, 50);
        assert_eq!(cfg.timer.break_minutes, 5);
        assert!(cfg.remote.is_configured());
        assert_eq!(cfg.dock.apps[0].icon, "🌐");
    }

    #[test]
    fn bad_toml_reports_path() {
        let err = Config::from_toml("[timer\n", Path::new("bad.toml")).unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn config_path_precedence() {
        let p = |s: &str| Some(PathBuf::from(s));
        assert_eq!(
            resolve_config_path(p("/a.toml"), p("/b.toml"), p("/x"), p("/h")).unwrap(),
            PathBuf::from("/a.toml")
        );
        assert_eq!(
            resolve_config_path(None, p("/b.toml"), p("/x"), p("/h")).unwrap(),
            PathBuf::from("/b.toml")
        );
        assert_eq!(
            resolve_config_path(None, None, p("/x"), p("/h")).unwrap(),
            PathBuf::from("/x/multispace/config.toml")
        );
        assert_eq!(
            resolve_config_path(None, None, None, p("/h")).unwrap(),
            PathBuf::from("/h/.config/multispace/config.toml")
        );
        assert!(resolve_config_path(None, None, None, None).is_err());
    }

    #[test]
    fn data_dir_precedence() {
        let p = |s: &str| Some(PathBuf::from(s));
        assert_eq!(
            resolve_data_dir(None, None, p("/h")).unwrap(),
            PathBuf::from("/h/.local/share/multispace")
        );
        assert_eq!(
            resolve_data_dir(p("/c"), p("/e"), p("/h")).unwrap(),
            PathBuf::from("/c")
        );
    }
}
