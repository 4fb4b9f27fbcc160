pub mod floating;

use ratatui::prelude::Rect;

use crate::window::{Geometry, Point, Viewport};

/// Conversion between terminal cells and the pixel space windows live in.
///
/// The window manager works in pixels so its floors and defaults match the
/// browser layout; the dashboard maps each cell to a fixed pixel block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScale {
    pub cell_width: i32,
    pub cell_height: i32,
}

impl Default for CellScale {
    fn default() -> Self {
        Self {
            cell_width: 10,
            cell_height: 20,
        }
    }
}

impl CellScale {
    pub fn new(cell_width: i32, cell_height: i32) -> Self {
        Self {
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
        }
    }

    /// Pixel viewport covered by `area`.
    pub fn viewport(&self, area: Rect) -> Viewport {
        Viewport::new(
            i32::from(area.width) * self.cell_width,
            i32::from(area.height) * self.cell_height,
        )
    }

    /// Pixel point at the top-left of a cell, relative to `area`.
    pub fn to_pixels(&self, area: Rect, column: u16, row: u16) -> Point {
        Point::new(
            (i32::from(column) - i32::from(area.x)) * self.cell_width,
            (i32::from(row) - i32::from(area.y)) * self.cell_height,
        )
    }

    /// Cell rectangle covering a pixel geometry, clipped to `area`.
    pub fn to_cells(&self, area: Rect, geometry: Geometry) -> Rect {
        let left = geometry.x.div_euclid(self.cell_width);
        let top = geometry.y.div_euclid(self.cell_height);
        let right = (geometry.right() + self.cell_width - 1).div_euclid(self.cell_width);
        let bottom = (geometry.bottom() + self.cell_height - 1).div_euclid(self.cell_height);
        let clip = |v: i32, max: u16| v.clamp(0, i32::from(max)) as u16;
        let x0 = clip(left, area.width);
        let y0 = clip(top, area.height);
        let x1 = clip(right, area.width);
        let y1 = clip(bottom, area.height);
        Rect {
            x: area.x.saturating_add(x0),
            y: area.y.saturating_add(y0),
            width: x1.saturating_sub(x0),
            height: y1.saturating_sub(y0),
        }
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

#[cfg(test)]
mod tests {
    use super::*;

    const AREA: Rect = Rect {
        x: 0,
        y: 1,
        width: 160,
        height: 45,
    };

    #[test]
    fn default_window_maps_to_eighty_by_thirty_cells() {
        let scale = CellScale::default();
        let rect = scale.to_cells(AREA, Geometry::new(100, 60, 800, 600));
        assert_eq!(
            rect,
            Rect {
                x: 10,
                y: 4,
                width: 80,
                height: 30
            }
        );
    }

    #[test]
    fn pixels_are_relative_to_area_origin() {
        let scale = CellScale::default();
        assert_eq!(scale.to_pixels(AREA, 3, 1), Point::new(30, 0));
        assert_eq!(scale.viewport(AREA), Viewport::new(1600, 900));
    }

    #[test]
    fn rect_contains_edge_cases() {
        let r = Rect {
            x: 0,
            y: 0,
            width: 0,
            height: 5,
        };
        assert!(!rect_contains(r, 0, 0));
        let r2 = Rect {
            x: 1,
            y: 1,
            width: 3,
            height: 3,
        };
        assert!(rect_contains(r2, 1, 1));
        assert!(!rect_contains(r2, 4, 1));
    }

    #[test]
    fn cells_are_clipped_to_area() {
        let scale = CellScale::default();
        let rect = scale.to_cells(AREA, Geometry::new(1400, 800, 800, 600));
        assert_eq!(rect.x + rect.width, AREA.width);
        assert_eq!(rect.y + rect.height, AREA.y + AREA.height);
    }
}
