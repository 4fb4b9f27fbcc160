pub mod decorator;
pub mod zorder;

mod window_manager;

use serde::{Deserialize, Serialize};

use crate::constants::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

pub use window_manager::{WindowManager, WindowPatch};
pub use zorder::ZOrder;

/// Pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Size of the area windows live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Geometry covering the whole viewport.
    pub fn full(&self) -> Geometry {
        Geometry {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        }
    }
}

/// Signed origin and size of a window, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Raise width and height to the window minimums.
    pub fn floored(self) -> Self {
        Self {
            width: self.width.max(MIN_WINDOW_WIDTH),
            height: self.height.max(MIN_WINDOW_HEIGHT),
            ..self
        }
    }

    /// Keep the origin inside `[0, viewport - size]` on both axes. A window
    /// wider or taller than the viewport is pinned to 0 on that axis.
    pub fn clamped_to(self, viewport: Viewport) -> Self {
        let max_x = (viewport.width - self.width).max(0);
        let max_y = (viewport.height - self.height).max(0);
        Self {
            x: self.x.clamp(0, max_x),
            y: self.y.clamp(0, max_y),
            ..self
        }
    }
}

/// Which of the three visual modes a window is in.
///
/// The geometry stashed when entering fullscreen is carried by the
/// `Fullscreen` variant itself, so a fullscreen window can always be
/// restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowMode {
    Normal,
    Minimized,
    Fullscreen { saved: Geometry },
}

/// One floating window hosting an embedded page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredWindow", into = "StoredWindow")]
pub struct WindowRecord {
    pub id: String,
    pub title: String,
    pub url: String,
    pub geometry: Geometry,
    pub z_index: i32,
    pub mode: WindowMode,
}

impl WindowRecord {
    pub fn is_minimized(&self) -> bool {
        matches!(self.mode, WindowMode::Minimized)
    }

    pub fn is_fullscreen(&self) -> bool {
        matches!(self.mode, WindowMode::Fullscreen { .. })
    }

    pub fn saved_geometry(&self) -> Option<Geometry> {
        match self.mode {
            WindowMode::Fullscreen { saved } => Some(saved),
            _ => None,
        }
    }

    pub fn is_file_picker(&self) -> bool {
        self.url == crate::constants::FILE_PICKER_URL
    }
}

/// Flat persisted form of a window, matching the browser record layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredWindow {
    id: String,
    title: String,
    url: String,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    z_index: i32,
    #[serde(default)]
    is_minimized: bool,
    #[serde(default)]
    is_fullscreen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_position: Option<Geometry>,
}

impl From<StoredWindow> for WindowRecord {
    fn from(stored: StoredWindow) -> Self {
        let current = Geometry::new(stored.x, stored.y, stored.width, stored.height);
        let saved = stored.saved_position.unwrap_or(current);
        let (geometry, mode) = match (stored.is_minimized, stored.is_fullscreen) {
            // Minimized wins; drop back to the pre-fullscreen geometry.
            (true, true) => (saved, WindowMode::Minimized),
            (true, false) => (current, WindowMode::Minimized),
            (false, true) => (current, WindowMode::Fullscreen { saved }),
            (false, false) => (current, WindowMode::Normal),
        };
        Self {
            id: stored.id,
            title: stored.title,
            url: stored.url,
            geometry,
            z_index: stored.z_index,
            mode,
        }
    }
}

impl From<WindowRecord> for StoredWindow {
    fn from(record: WindowRecord) -> Self {
        let saved_position = record.saved_geometry();
        Self {
            is_minimized: record.is_minimized(),
            is_fullscreen: record.is_fullscreen(),
            id: record.id,
            title: record.title,
            url: record.url,
            x: record.geometry.x,
            y: record.geometry.y,
            width: record.geometry.width,
            height: record.geometry.height,
            z_index: record.z_index,
            saved_position,
        }
    }
}
