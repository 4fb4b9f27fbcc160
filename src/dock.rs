//! The app dock: the catalog of sites a user can open as windows.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{FILE_PICKER_URL, SEARCH_URL_PREFIX};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DockError {
    #[error("app name must not be empty")]
    MissingName,
    #[error("app url must not be empty")]
    MissingUrl,
    #[error("no dock entry at index {0}")]
    NoSuchApp(usize),
    #[error("could not save the dock: {0}")]
    Save(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct App {
    pub name: String,
    pub url: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    "🌐".to_string()
}

impl App {
    pub fn new(name: impl Into<String>, url: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            icon: icon.into(),
        }
    }

    pub fn is_file_picker(&self) -> bool {
        self.url == FILE_PICKER_URL
    }
}

pub fn default_apps() -> Vec<App> {
    vec![
        App::new("Systematron", "https://systematron.com", "⚙"),
        App::new("Word", "https://office.live.com/start/Word.aspx", "📄"),
        App::new("Notion", "https://notion.so", "📝"),
        App::new("Calculator", "https://calculator.net", "🧮"),
        App::new("DuckDuckGo", "https://duckduckgo.com", "🔍"),
        App::new("Figma", "https://figma.com", "🎨"),
        App::new("Open File", FILE_PICKER_URL, "📁"),
        App::new("Spotify", "https://open.spotify.com", "🎵"),
    ]
}

/// Turn address-bar input into something a window can load.
///
/// The file-picker sentinel and absolute http(s) URLs pass through, bare
/// host names get an https scheme, and anything else becomes a web search.
pub fn normalize_address(input: &str) -> String {
    let input = input.trim();
    if input == FILE_PICKER_URL || has_http_scheme(input) {
        return input.to_string();
    }
    if input.contains('.') && !input.contains(' ') {
        return format!("https://{input}");
    }
    format!("{SEARCH_URL_PREFIX}{}", urlencoding::encode(input))
}

fn has_http_scheme(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn with_scheme(url: &str) -> String {
    if has_http_scheme(url) || url == FILE_PICKER_URL {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

#[derive(Debug, Clone)]
pub struct Dock {
    apps: Vec<App>,
}

impl Default for Dock {
    fn default() -> Self {
        Self::new(default_apps())
    }
}

impl Dock {
    pub fn new(apps: Vec<App>) -> Self {
        Self { apps }
    }

    pub fn apps(&self) -> &[App] {
        &self.apps
    }

    pub fn get(&self, index: usize) -> Option<&App> {
        self.apps.get(index)
    }

    /// Case-insensitive lookup by display name.
    pub fn find(&self, name: &str) -> Option<&App> {
        self.apps
            .iter()
            .find(|app| app.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn add_custom(&mut self, name: &str, url: &str) -> Result<&App, DockError> {
        let name = name.trim();
        let url = url.trim();
        if name.is_empty() {
            return Err(DockError::MissingName);
        }
        if url.is_empty() {
            return Err(DockError::MissingUrl);
        }
        self.apps.push(App::new(name, with_scheme(url), default_icon()));
        tracing::debug!(app = name, "added custom dock app");
        let last = self.apps.len() - 1;
        self.apps.get(last).ok_or(DockError::NoSuchApp(last))
    }

    pub fn move_app(&mut self, from: usize, to: usize) -> Result<(), DockError> {
        if from >= self.apps.len() {
            return Err(DockError::NoSuchApp(from));
        }
        if to >= self.apps.len() {
            return Err(DockError::NoSuchApp(to));
        }
        let app = self.apps.remove(from);
        self.apps.insert(to, app);
        Ok(())
    }

    pub fn set_url(&mut self, index: usize, url: &str) -> Result<(), DockError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DockError::MissingUrl);
        }
        let app = self.apps.get_mut(index).ok_or(DockError::NoSuchApp(index))?;
        app.url = with_scheme(url);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_passes_urls_and_sentinel_through() {
        assert_eq!(normalize_address("https://a.b/c"), "https://a.b/c");
        assert_eq!(normalize_address("http://a.b"), "http://a.b");
        assert_eq!(normalize_address(FILE_PICKER_URL), FILE_PICKER_URL);
    }

    #[test]
    fn normalize_adds_scheme_or_searches() {
        assert_eq!(normalize_address("notion.so"), "https://notion.so");
        assert_eq!(
            normalize_address("rust borrow checker"),
            "https://www.google.com/search?q=rust%20borrow%20checker"
        );
        assert_eq!(
            normalize_address("a.b c"),
            "https://www.google.com/search?q=a.b%20c"
        );
    }

    #[test]
    fn custom_apps_need_name_and_url() {
        let mut dock = Dock::default();
        assert_eq!(dock.add_custom(" ", "x.com"), Err(DockError::MissingName));
        assert_eq!(dock.add_custom("X", ""), Err(DockError::MissingUrl));
        let app = dock.add_custom("Mail", "mail.example.com").unwrap();
        assert_eq!(app.url, "https://mail.example.com");
        assert_eq!(dock.apps().len(), 9);
    }

    #[test]
    fn move_app_reorders() {
        let mut dock = Dock::default();
        dock.move_app(0, 2).unwrap();
        assert_eq!(dock.get(2).unwrap().name, "Systematron");
        assert_eq!(dock.get(0).unwrap().name, "Word");
        assert_eq!(dock.move_app(0, 99), Err(DockError::NoSuchApp(99)));
    }

    #[test]
    fn find_is_case_insensitive() {
        let dock = Dock::default();
        assert_eq!(dock.find("notion").unwrap().url, "https://notion.so");
        assert!(dock.find("open file").unwrap().is_file_picker());
    }
}
