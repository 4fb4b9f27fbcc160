use indoc::indoc;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::components::Component;
use crate::keybindings::KeyBindings;
use crate::theme;
use crate::ui::centered_rect;

const MOUSE_HELP: &str = indoc! {"
    Mouse
      drag a window's title row to move it
      drag its border or corners to resize
      _ minimizes, \u{25a1} toggles fullscreen, x closes
      click a chip in the bottom row to restore it
      click a dock entry to open it
"};

#[derive(Debug)]
pub struct HelpOverlay {
    visible: bool,
    lines: Vec<Line<'static>>,
}

impl HelpOverlay {
    pub fn new(bindings: &KeyBindings) -> Self {
        let key_style = Style::default()
            .fg(theme::accent())
            .add_modifier(Modifier::BOLD);
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from("Keys"),
        ];
        for (keys, action) in bindings.help_entries() {
            lines.push(Line::from(vec![
                Span::styled(format!("  {keys:<12}"), key_style),
                Span::raw(action),
            ]));
        }
        lines.push(Line::default());
        lines.extend(MOUSE_HELP.lines().map(|l| Line::from(l.to_string())));
        Self {
            visible: false,
            lines,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}

impl Component for HelpOverlay {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        if !self.visible || area.width == 0 || area.height == 0 {
            return;
        }
        let height = u16::try_from(self.lines.len() + 2).unwrap_or(u16::MAX);
        let rect = centered_rect(area, 60, height);
        frame.render_widget(Clear, rect);
        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .style(Style::default().bg(theme::dialog_bg()));
        let paragraph = Paragraph::new(self.lines.clone())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, rect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_bindings_and_mouse_help() {
        let help = HelpOverlay::new(&KeyBindings::default());
        assert!(!help.visible());
        let text: Vec<String> = help.lines.iter().map(|l| l.to_string()).collect();
        assert!(text.iter().any(|l| l.contains("Toggle fullscreen")));
        assert!(text.iter().any(|l| l.contains("drag a window's title row")));
    }
}
