use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::ui::{safe_set_string, text_width, truncate_to_width};

/// One-row bar: left text, right text, and an optional styled segment
/// (the timer) placed just before the right text.
#[derive(Debug, Default)]
pub struct StatusBar {
    left: String,
    right: String,
    badge: Option<(String, Style)>,
    style: Style,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_left<T: Into<String>>(&mut self, value: T) {
        self.left = value.into();
    }

    pub fn set_right<T: Into<String>>(&mut self, value: T) {
        self.right = value.into();
    }

    pub fn set_badge<T: Into<String>>(&mut self, value: T, style: Style) {
        self.badge = Some((value.into(), style));
    }

    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }
}

impl super::Component for StatusBar {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        if area.height == 0 || area.width == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let row = Rect { height: 1, ..area };
        buffer.set_style(row, self.style);
        let width = usize::from(area.width);

        let left = truncate_to_width(&self.left, width);
        safe_set_string(buffer, row, area.x, area.y, &left, self.style);

        let mut right_edge = area.x.saturating_add(area.width);
        if !self.right.is_empty() {
            let right_w = text_width(&self.right);
            if right_w < area.width {
                right_edge = right_edge.saturating_sub(right_w);
                safe_set_string(buffer, row, right_edge, area.y, &self.right, self.style);
            }
        }
        if let Some((badge, style)) = &self.badge {
            let badge_w = text_width(badge).saturating_add(1);
            let start = right_edge.saturating_sub(badge_w);
            if start > area.x.saturating_add(text_width(&left)) {
                safe_set_string(buffer, row, start, area.y, badge, *style);
            }
        }
    }
}
