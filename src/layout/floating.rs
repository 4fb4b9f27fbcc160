use ratatui::prelude::Rect;

use crate::constants::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};
use crate::window::{Geometry, Point, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    Left,
    Right,
    Top,
    Bottom,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl ResizeEdge {
    pub fn moves_left(self) -> bool {
        matches!(
            self,
            ResizeEdge::Left | ResizeEdge::TopLeft | ResizeEdge::BottomLeft
        )
    }

    pub fn moves_right(self) -> bool {
        matches!(
            self,
            ResizeEdge::Right | ResizeEdge::TopRight | ResizeEdge::BottomRight
        )
    }

    pub fn moves_top(self) -> bool {
        matches!(
            self,
            ResizeEdge::Top | ResizeEdge::TopLeft | ResizeEdge::TopRight
        )
    }

    pub fn moves_bottom(self) -> bool {
        matches!(
            self,
            ResizeEdge::Bottom | ResizeEdge::BottomLeft | ResizeEdge::BottomRight
        )
    }
}

/// Header drag in progress. `offset` is the pointer position relative to
/// the window origin at pointer-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderDrag {
    pub id: String,
    pub offset: Point,
}

/// Edge resize in progress, remembering where it started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeDrag {
    pub id: String,
    pub edge: ResizeEdge,
    pub start: Geometry,
    pub start_pointer: Point,
}

/// The pointer interaction a window manager is currently tracking.
///
/// A session is acquired on pointer-down and released on pointer-up. While
/// one is held, pointer moves are routed to it and nothing else may start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionSession {
    Drag(HeaderDrag),
    Resize(ResizeDrag),
}

impl InteractionSession {
    pub fn window_id(&self) -> &str {
        match self {
            InteractionSession::Drag(drag) => &drag.id,
            InteractionSession::Resize(resize) => &resize.id,
        }
    }
}

/// Position a dragged window so the grab point stays under the pointer,
/// clamped inside the viewport.
pub fn apply_drag(current: Geometry, offset: Point, pointer: Point, viewport: Viewport) -> Geometry {
    Geometry {
        x: pointer.x - offset.x,
        y: pointer.y - offset.y,
        ..current
    }
    .clamped_to(viewport)
}

/// Compute the geometry produced by dragging `edge` from `start_pointer` to
/// `pointer`. The pointer is clamped into the viewport first; the minimum
/// size wins over everything else.
pub fn apply_resize(
    start: Geometry,
    edge: ResizeEdge,
    start_pointer: Point,
    pointer: Point,
    viewport: Viewport,
) -> Geometry {
    let px = pointer.x.clamp(0, viewport.width.max(0));
    let py = pointer.y.clamp(0, viewport.height.max(0));
    let dx = px - start_pointer.x;
    let dy = py - start_pointer.y;

    let mut x = start.x;
    let mut y = start.y;
    let mut width = start.width;
    let mut height = start.height;

    if edge.moves_left() {
        x += dx;
        width -= dx;
    } else if edge.moves_right() {
        width += dx;
    }
    if edge.moves_top() {
        y += dy;
        height -= dy;
    } else if edge.moves_bottom() {
        height += dy;
    }

    // Far edge stays put when the dragged edge hits the floor.
    if width < MIN_WINDOW_WIDTH {
        if edge.moves_left() {
            x = (start.right() - MIN_WINDOW_WIDTH).max(0);
        }
        width = MIN_WINDOW_WIDTH;
    }
    if height < MIN_WINDOW_HEIGHT {
        if edge.moves_top() {
            y = (start.bottom() - MIN_WINDOW_HEIGHT).max(0);
        }
        height = MIN_WINDOW_HEIGHT;
    }

    Geometry {
        x,
        y,
        width,
        height,
    }
}

/// What a pointer press inside a window's cell rectangle grabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameHit {
    Edge(ResizeEdge),
    Header,
    Body,
}

/// Classify a cell inside a framed window: the outer ring is resize
/// handles (corners are diagonal), the row under the top border is the
/// header, the rest is body.
pub fn frame_hit(rect: Rect, column: u16, row: u16) -> Option<FrameHit> {
    if !super::rect_contains(rect, column, row) {
        return None;
    }
    let right = rect.x.saturating_add(rect.width.saturating_sub(1));
    let bottom = rect.y.saturating_add(rect.height.saturating_sub(1));
    let left = column == rect.x;
    let top = row == rect.y;
    let on_right = column == right;
    let on_bottom = row == bottom;
    let edge = match (top, on_bottom, left, on_right) {
        (true, _, true, _) => Some(ResizeEdge::TopLeft),
        (true, _, _, true) => Some(ResizeEdge::TopRight),
        (_, true, true, _) => Some(ResizeEdge::BottomLeft),
        (_, true, _, true) => Some(ResizeEdge::BottomRight),
        (true, _, _, _) => Some(ResizeEdge::Top),
        (_, true, _, _) => Some(ResizeEdge::Bottom),
        (_, _, true, _) => Some(ResizeEdge::Left),
        (_, _, _, true) => Some(ResizeEdge::Right),
        _ => None,
    };
    if let Some(edge) = edge {
        return Some(FrameHit::Edge(edge));
    }
    if row == rect.y.saturating_add(1) {
        return Some(FrameHit::Header);
    }
    Some(FrameHit::Body)
}
