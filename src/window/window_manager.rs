use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Geometry, Point, Viewport, WindowMode, WindowRecord, ZOrder};
use crate::constants::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, OPEN_BASE_X, OPEN_BASE_Y, OPEN_JITTER_X,
    OPEN_JITTER_Y,
};
use crate::dock::normalize_address;
use crate::layout::floating::{
    HeaderDrag, InteractionSession, ResizeDrag, ResizeEdge, apply_drag, apply_resize,
};

/// Partial update merged into a window by [`WindowManager::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowPatch {
    pub title: Option<String>,
    pub url: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

impl WindowPatch {
    pub fn position(x: i32, y: i32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            x: Some(geometry.x),
            y: Some(geometry.y),
            width: Some(geometry.width),
            height: Some(geometry.height),
            ..Self::default()
        }
    }
}

/// Registry of floating windows plus the pointer controller that moves them.
///
/// Windows are kept in creation order; paint/focus order is derived from
/// each record's `z_index`, which is drawn from a counter that only ever
/// grows.
#[derive(Debug)]
pub struct WindowManager {
    windows: Vec<WindowRecord>,
    z_order: ZOrder,
    viewport: Viewport,
    session: Option<InteractionSession>,
    rng: StdRng,
}

impl WindowManager {
    pub fn new(viewport: Viewport) -> Self {
        Self::with_rng(viewport, StdRng::from_entropy())
    }

    /// Deterministic open offsets, for tests and replays.
    pub fn with_seed(viewport: Viewport, seed: u64) -> Self {
        Self::with_rng(viewport, StdRng::seed_from_u64(seed))
    }

    fn with_rng(viewport: Viewport, rng: StdRng) -> Self {
        Self {
            windows: Vec::new(),
            z_order: ZOrder::new(),
            viewport,
            session: None,
            rng,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Adopt a new viewport size: fullscreen windows re-fill it, the rest
    /// are pulled back inside.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if self.viewport == viewport {
            return;
        }
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "viewport changed"
        );
        self.viewport = viewport;
        for window in &mut self.windows {
            window.geometry = match window.mode {
                WindowMode::Fullscreen { .. } => viewport.full(),
                _ => window.geometry.clamped_to(viewport),
            };
        }
    }

    pub fn windows(&self) -> &[WindowRecord] {
        &self.windows
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| w.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| w.id == id)
    }

    /// Highest z-index handed out so far.
    pub fn z_counter(&self) -> i32 {
        self.z_order.current()
    }

    /// Windows sorted bottom-to-top.
    pub fn draw_order(&self) -> Vec<&WindowRecord> {
        let mut ordered: Vec<&WindowRecord> = self.windows.iter().collect();
        ordered.sort_by_key(|w| w.z_index);
        ordered
    }

    /// Topmost window that is not minimized.
    pub fn focused(&self) -> Option<&WindowRecord> {
        self.windows
            .iter()
            .filter(|w| !w.is_minimized())
            .max_by_key(|w| w.z_index)
    }

    pub fn minimized(&self) -> Vec<&WindowRecord> {
        let mut chips: Vec<&WindowRecord> =
            self.windows.iter().filter(|w| w.is_minimized()).collect();
        chips.sort_by_key(|w| w.z_index);
        chips
    }

    /// Open a window for an app. The origin gets a random nudge so repeated
    /// opens do not land exactly on top of each other.
    pub fn open(&mut self, title: impl Into<String>, url: impl Into<String>) -> String {
        let id = self.generate_id();
        let x = OPEN_BASE_X + self.rng.gen_range(0..OPEN_JITTER_X);
        let y = OPEN_BASE_Y + self.rng.gen_range(0..OPEN_JITTER_Y);
        let geometry = Geometry::new(x, y, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)
            .clamped_to(self.viewport);
        let z_index = self.next_z();
        let record = WindowRecord {
            id: id.clone(),
            title: title.into(),
            url: url.into(),
            geometry,
            z_index,
            mode: WindowMode::Normal,
        };
        tracing::debug!(window_id = %id, title = %record.title, z_index, "opened window");
        self.windows.push(record);
        id
    }

    fn next_z(&mut self) -> i32 {
        if let Some(z_index) = self.z_order.next() {
            return z_index;
        }
        self.compact_z_order();
        self.z_order.next().unwrap_or(i32::MAX)
    }

    /// Renumber stacking as `1..=n` in the current order.
    fn compact_z_order(&mut self) {
        let mut order: Vec<usize> = (0..self.windows.len()).collect();
        order.sort_by_key(|&i| self.windows[i].z_index);
        let mut top = 0;
        for (rank, i) in order.into_iter().enumerate() {
            top = i32::try_from(rank + 1).unwrap_or(i32::MAX);
            self.windows[i].z_index = top;
        }
        self.z_order.rebase(top);
        tracing::debug!(windows = self.windows.len(), "compacted z order");
    }

    fn generate_id(&self) -> String {
        let mut stamp = chrono::Utc::now().timestamp_millis();
        loop {
            let id = stamp.to_string();
            if self.get(&id).is_none() {
                return id;
            }
            stamp += 1;
        }
    }

    pub fn close(&mut self, id: &str) -> Option<WindowRecord> {
        let pos = self.windows.iter().position(|w| w.id == id)?;
        self.end_session_for(id);
        let removed = self.windows.remove(pos);
        tracing::debug!(window_id = %id, "closed window");
        Some(removed)
    }

    /// Merge `patch` into the window. Sizes are floored; while fullscreen
    /// only title and url are taken.
    pub fn update(&mut self, id: &str, patch: WindowPatch) -> bool {
        let viewport = self.viewport;
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        if let Some(title) = patch.title {
            window.title = title;
        }
        if let Some(url) = patch.url {
            window.url = url;
        }
        if window.is_fullscreen() {
            return true;
        }
        let g = &mut window.geometry;
        g.x = patch.x.unwrap_or(g.x);
        g.y = patch.y.unwrap_or(g.y);
        g.width = patch.width.unwrap_or(g.width);
        g.height = patch.height.unwrap_or(g.height);
        *g = g.floored().clamped_to(viewport);
        true
    }

    /// Point the window at whatever the user typed in its address bar.
    pub fn navigate(&mut self, id: &str, input: &str) -> bool {
        let url = normalize_address(input);
        self.update(
            id,
            WindowPatch {
                url: Some(url),
                ..WindowPatch::default()
            },
        )
    }

    /// Raise a window above every other one.
    pub fn focus(&mut self, id: &str) -> Option<i32> {
        self.get(id)?;
        let z_index = self.next_z();
        let window = self.get_mut(id)?;
        window.z_index = z_index;
        tracing::trace!(window_id = %id, z_index, "focused window");
        Some(z_index)
    }

    /// Bring the bottom-most visible window to the front.
    pub fn cycle_focus(&mut self) -> Option<String> {
        let id = self
            .windows
            .iter()
            .filter(|w| !w.is_minimized())
            .min_by_key(|w| w.z_index)?
            .id
            .clone();
        self.focus(&id)?;
        Some(id)
    }

    pub fn minimize(&mut self, id: &str) -> bool {
        let Some(window) = self.get(id) else {
            return false;
        };
        if window.is_minimized() {
            return false;
        }
        self.end_session_for(id);
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        if let WindowMode::Fullscreen { saved } = window.mode {
            window.geometry = saved;
        }
        window.mode = WindowMode::Minimized;
        tracing::debug!(window_id = %id, "minimized window");
        true
    }

    pub fn restore(&mut self, id: &str) -> bool {
        let viewport = self.viewport;
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        if !window.is_minimized() {
            return false;
        }
        window.mode = WindowMode::Normal;
        window.geometry = window.geometry.clamped_to(viewport);
        self.focus(id);
        tracing::debug!(window_id = %id, "restored window");
        true
    }

    pub fn toggle_minimize(&mut self, id: &str) -> bool {
        match self.get(id) {
            Some(w) if w.is_minimized() => self.restore(id),
            Some(_) => self.minimize(id),
            None => false,
        }
    }

    /// Enter fullscreen (stashing the current geometry) or leave it
    /// (restoring exactly what was stashed).
    pub fn toggle_fullscreen(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.end_session_for(id);
        let viewport = self.viewport;
        let Some(window) = self.get_mut(id) else {
            return false;
        };
        match window.mode {
            WindowMode::Fullscreen { saved } => {
                window.geometry = saved;
                window.mode = WindowMode::Normal;
                tracing::debug!(window_id = %id, "left fullscreen");
            }
            WindowMode::Normal | WindowMode::Minimized => {
                window.mode = WindowMode::Fullscreen {
                    saved: window.geometry,
                };
                window.geometry = viewport.full();
                tracing::debug!(window_id = %id, "entered fullscreen");
            }
        }
        self.focus(id);
        true
    }

    pub fn session(&self) -> Option<&InteractionSession> {
        self.session.as_ref()
    }

    pub fn is_interacting(&self) -> bool {
        self.session.is_some()
    }

    fn can_start_session(&self, id: &str) -> bool {
        if self.session.is_some() {
            return false;
        }
        matches!(self.get(id), Some(w) if matches!(w.mode, WindowMode::Normal))
    }

    /// Pointer pressed on a window's header: focus it and start dragging.
    pub fn pointer_down_header(&mut self, id: &str, pointer: Point) -> bool {
        if self.session.is_none() {
            self.focus(id);
        }
        if !self.can_start_session(id) {
            return false;
        }
        let Some(window) = self.get(id) else {
            return false;
        };
        let offset = Point::new(pointer.x - window.geometry.x, pointer.y - window.geometry.y);
        self.session = Some(InteractionSession::Drag(HeaderDrag {
            id: id.to_string(),
            offset,
        }));
        true
    }

    /// Pointer pressed on one of a window's resize handles.
    pub fn pointer_down_edge(&mut self, id: &str, edge: ResizeEdge, pointer: Point) -> bool {
        if self.session.is_none() {
            self.focus(id);
        }
        if !self.can_start_session(id) {
            return false;
        }
        let Some(window) = self.get(id) else {
            return false;
        };
        self.session = Some(InteractionSession::Resize(ResizeDrag {
            id: id.to_string(),
            edge,
            start: window.geometry,
            start_pointer: pointer,
        }));
        true
    }

    /// Pointer moved while a session is held.
    pub fn pointer_move(&mut self, pointer: Point) -> bool {
        let Some(session) = self.session.clone() else {
            return false;
        };
        let viewport = self.viewport;
        let Some(window) = self.get_mut(session.window_id()) else {
            self.session = None;
            return false;
        };
        if !matches!(window.mode, WindowMode::Normal) {
            return false;
        }
        window.geometry = match &session {
            InteractionSession::Drag(drag) => {
                apply_drag(window.geometry, drag.offset, pointer, viewport)
            }
            InteractionSession::Resize(resize) => apply_resize(
                resize.start,
                resize.edge,
                resize.start_pointer,
                pointer,
                viewport,
            ),
        };
        true
    }

    /// Pointer released: end the session and report which window it moved.
    pub fn pointer_up(&mut self) -> Option<String> {
        let session = self.session.take()?;
        Some(session.window_id().to_string())
    }

    /// Drop any session without applying further movement.
    pub fn cancel_interaction(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::trace!(window_id = %session.window_id(), "interaction cancelled");
        }
    }

    fn end_session_for(&mut self, id: &str) {
        if self
            .session
            .as_ref()
            .is_some_and(|session| session.window_id() == id)
        {
            self.session = None;
        }
    }

    /// Swap the whole registry, e.g. when another project becomes current.
    /// The z counter is raised past every loaded index and never lowered.
    pub fn replace_windows(&mut self, records: Vec<WindowRecord>) {
        self.cancel_interaction();
        let viewport = self.viewport;
        let mut windows: Vec<WindowRecord> = Vec::with_capacity(records.len());
        for mut record in records {
            if windows.iter().any(|w| w.id == record.id) {
                tracing::warn!(window_id = %record.id, "dropping duplicate window id");
                continue;
            }
            record.geometry = match record.mode {
                WindowMode::Fullscreen { .. } => viewport.full(),
                _ => record.geometry.floored().clamped_to(viewport),
            };
            if let WindowMode::Fullscreen { saved } = record.mode {
                record.mode = WindowMode::Fullscreen {
                    saved: saved.floored(),
                };
            }
            self.z_order.observe(record.z_index);
            windows.push(record);
        }
        self.windows = windows;
    }
}
