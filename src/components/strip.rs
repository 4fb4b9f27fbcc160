use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;

use crate::ui::{safe_set_string, text_width};

/// A row of clickable labels laid out left to right (the dock and the
/// minimized-window chips).
#[derive(Debug, Default)]
pub struct Strip {
    title: Option<String>,
    items: Vec<String>,
    style: Style,
    title_style: Style,
}

impl Strip {
    pub fn new(items: Vec<String>, style: Style) -> Self {
        Self {
            title: None,
            items,
            style,
            title_style: style,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>, style: Style) -> Self {
        self.title = Some(title.into());
        self.title_style = style;
        self
    }

    /// Cell rectangle of every label that fits in `area`, by item index.
    pub fn slots(&self, area: Rect) -> Vec<(usize, Rect)> {
        let mut slots = Vec::new();
        if area.height == 0 {
            return slots;
        }
        let end = area.x.saturating_add(area.width);
        let mut x = area.x;
        if let Some(title) = &self.title {
            x = x.saturating_add(text_width(title)).saturating_add(1);
        }
        for (index, label) in self.items.iter().enumerate() {
            let width = text_width(label);
            if x.saturating_add(width) > end {
                break;
            }
            slots.push((
                index,
                Rect {
                    x,
                    y: area.y,
                    width,
                    height: 1,
                },
            ));
            x = x.saturating_add(width).saturating_add(1);
        }
        slots
    }

    pub fn item_at(&self, area: Rect, column: u16, row: u16) -> Option<usize> {
        self.slots(area)
            .into_iter()
            .find(|(_, rect)| crate::layout::rect_contains(*rect, column, row))
            .map(|(index, _)| index)
    }
}

impl super::Component for Strip {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        if let Some(title) = &self.title {
            safe_set_string(buffer, area, area.x, area.y, title, self.title_style);
        }
        for (index, rect) in self.slots(area) {
            if let Some(label) = self.items.get(index) {
                safe_set_string(buffer, area, rect.x, rect.y, label, self.style);
            }
        }
    }
}
