use ratatui::buffer::Buffer;
use ratatui::prelude::Rect;

use crate::theme;
use crate::ui::{safe_set_string, truncate_to_width};

/// Buttons drawn at the right end of a window's header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderButton {
    Minimize,
    Fullscreen,
    Close,
}

impl HeaderButton {
    pub const ALL: [HeaderButton; 3] = [
        HeaderButton::Minimize,
        HeaderButton::Fullscreen,
        HeaderButton::Close,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            HeaderButton::Minimize => "_",
            HeaderButton::Fullscreen => "\u{25a1}",
            HeaderButton::Close => "x",
        }
    }

    /// Column of this button inside `rect`; buttons sit two cells apart,
    /// ending one cell left of the right border.
    fn column(self, rect: Rect) -> Option<u16> {
        let from_right = match self {
            HeaderButton::Close => 2,
            HeaderButton::Fullscreen => 4,
            HeaderButton::Minimize => 6,
        };
        if rect.width < from_right + 2 {
            return None;
        }
        Some(rect.x + rect.width - from_right)
    }
}

/// Which header button, if any, sits at `column` of a window drawn in
/// `rect`. Only meaningful on the header row.
pub fn header_button_at(rect: Rect, column: u16) -> Option<HeaderButton> {
    HeaderButton::ALL
        .into_iter()
        .find(|button| button.column(rect) == Some(column))
}

/// Everything a decorator needs to paint one window.
#[derive(Debug, Clone, Copy)]
pub struct WindowChrome<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub focused: bool,
    pub fullscreen: bool,
}

pub trait WindowDecorator: std::fmt::Debug {
    /// Paint the window into `rect`, clipped to `bounds`.
    fn render_window(&self, buffer: &mut Buffer, rect: Rect, bounds: Rect, chrome: WindowChrome<'_>);
}

/// Box-drawn frame with a filled header row under the top border.
#[derive(Debug, Default)]
pub struct FramedDecorator;

impl WindowDecorator for FramedDecorator {
    fn render_window(&self, buffer: &mut Buffer, rect: Rect, bounds: Rect, chrome: WindowChrome<'_>) {
        let clip = rect.intersection(bounds).intersection(buffer.area);
        if clip.width == 0 || clip.height == 0 || rect.width < 2 || rect.height < 2 {
            return;
        }
        buffer.set_style(clip, theme::body());
        for y in clip.y..clip.y + clip.height {
            for x in clip.x..clip.x + clip.width {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol(" ");
                }
            }
        }

        let left = rect.x;
        let top = rect.y;
        let right = rect.x + rect.width - 1;
        let bottom = rect.y + rect.height - 1;
        let border = theme::border(chrome.focused);
        let in_clip = |x: u16, y: u16| crate::layout::rect_contains(clip, x, y);

        for x in left..=right {
            for (y, corner_l, corner_r) in [(top, "┌", "┐"), (bottom, "└", "┘")] {
                if in_clip(x, y)
                    && let Some(cell) = buffer.cell_mut((x, y))
                {
                    let symbol = if x == left {
                        corner_l
                    } else if x == right {
                        corner_r
                    } else {
                        "─"
                    };
                    cell.set_symbol(symbol);
                    cell.set_style(border);
                }
            }
        }
        for y in top + 1..bottom {
            for x in [left, right] {
                if in_clip(x, y)
                    && let Some(cell) = buffer.cell_mut((x, y))
                {
                    cell.set_symbol("│");
                    cell.set_style(border);
                }
            }
        }

        // Header row.
        let header_y = top + 1;
        if header_y >= bottom {
            return;
        }
        let header_style = theme::header(chrome.focused);
        let header = Rect {
            x: left + 1,
            y: header_y,
            width: rect.width - 2,
            height: 1,
        }
        .intersection(clip);
        buffer.set_style(header, header_style);
        let title_room = usize::from(rect.width.saturating_sub(10));
        let title = truncate_to_width(chrome.title, title_room);
        safe_set_string(buffer, header, left + 2, header_y, &title, header_style);
        for button in HeaderButton::ALL {
            if let Some(x) = button.column(rect) {
                safe_set_string(buffer, header, x, header_y, button.symbol(), header_style);
            }
        }

        // Body: the address the window shows.
        let body_y = header_y + 1;
        if body_y < bottom {
            let body_room = usize::from(rect.width.saturating_sub(4));
            let body = truncate_to_width(chrome.body, body_room);
            safe_set_string(buffer, clip, left + 2, body_y, &body, theme::body());
        }
        if chrome.fullscreen && body_y + 1 < bottom {
            safe_set_string(
                buffer,
                clip,
                left + 2,
                body_y + 1,
                "fullscreen",
                theme::dim(),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buttons_sit_right_of_title() {
        let rect = Rect::new(10, 5, 20, 8);
        assert_eq!(header_button_at(rect, 28), Some(HeaderButton::Close));
        assert_eq!(header_button_at(rect, 26), Some(HeaderButton::Fullscreen));
        assert_eq!(header_button_at(rect, 24), Some(HeaderButton::Minimize));
        assert_eq!(header_button_at(rect, 27), None);
        assert_eq!(header_button_at(Rect::new(0, 0, 5, 3), 1), None);
    }

    #[test]
    fn renders_frame_title_and_buttons() {
        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        FramedDecorator.render_window(
            &mut buf,
            area,
            area,
            WindowChrome {
                title: "Notion",
                body: "https://notion.so",
                focused: true,
                fullscreen: false,
            },
        );
        assert_eq!(buf[(0, 0)].symbol(), "┌");
        assert_eq!(buf[(19, 5)].symbol(), "┘");
        assert_eq!(buf[(2, 1)].symbol(), "N");
        assert_eq!(buf[(18, 1)].symbol(), "x");
        assert_eq!(buf[(14, 1)].symbol(), "_");
        assert_eq!(buf[(2, 2)].symbol(), "h");
    }
}
