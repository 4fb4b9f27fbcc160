//! Shared crate-wide constants.

/// Smallest width (in pixels) a floating window may be resized to.
pub const MIN_WINDOW_WIDTH: i32 = 300;

/// Smallest height (in pixels) a floating window may be resized to.
pub const MIN_WINDOW_HEIGHT: i32 = 200;

/// Size given to windows opened from the dock.
pub const DEFAULT_WINDOW_WIDTH: i32 = 800;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 600;

/// Top-left origin for freshly opened windows before jitter is applied.
pub const OPEN_BASE_X: i32 = 100;
pub const OPEN_BASE_Y: i32 = 60;

/// Exclusive upper bound of the random offset added to the open origin so
/// that consecutive windows do not stack exactly on top of each other.
pub const OPEN_JITTER_X: i32 = 200;
pub const OPEN_JITTER_Y: i32 = 150;

/// Address used by the "Open File" dock entry. It names a local file picker
/// rather than a navigable page.
pub const FILE_PICKER_URL: &str = "file-opener";

/// Default focus session length.
pub const DEFAULT_WORK_MINUTES: u32 = 25;

/// Default break length between focus sessions.
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Identifier of the project created on first launch.
pub const DEFAULT_PROJECT_ID: &str = "default";

/// Local storage key holding the serialized map of every project.
pub const LOCAL_PROJECTS_KEY: &str = "multispace-projects";

/// Prefix of the per-project elapsed-time key in local storage.
pub const LOCAL_TIME_KEY_PREFIX: &str = "multispace-time-";

/// Local key holding the id of the project that was current last.
pub const LOCAL_CURRENT_KEY: &str = "multispace-current";

/// Local key holding the customized dock (order, custom apps, URLs).
pub const LOCAL_APPS_KEY: &str = "multispace-apps";

/// Search engine used when an address bar input is not a URL.
pub const SEARCH_URL_PREFIX: &str = "https://www.google.com/search?q=";
