use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem};

use crate::components::Component;
use crate::theme;

/// Read-only side panel listing the current project's notes and goals.
#[derive(Debug, Default)]
pub struct NotesPanel {
    notes: Vec<String>,
    goals: Vec<String>,
}

impl NotesPanel {
    pub fn new(notes: &[String], goals: &[String]) -> Self {
        Self {
            notes: notes.to_vec(),
            goals: goals.to_vec(),
        }
    }

    fn list<'a>(title: &'a str, entries: &'a [String], bullet: &'a str) -> List<'a> {
        let items: Vec<ListItem> = if entries.is_empty() {
            vec![ListItem::new(Line::styled("  (none)", theme::dim()))]
        } else {
            entries
                .iter()
                .enumerate()
                .map(|(i, text)| ListItem::new(format!("{bullet}{}. {text}", i + 1)))
                .collect()
        };
        List::new(items).block(
            Block::default()
                .title(Line::styled(
                    title,
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(theme::border(false)),
        )
    }
}

impl Component for NotesPanel {
    fn render(&mut self, frame: &mut Frame<'_>, area: Rect) {
        if area.width < 4 || area.height < 4 {
            return;
        }
        let [notes, goals] =
            Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(area);
        frame.render_widget(Self::list(" Notes ", &self.notes, ""), notes);
        frame.render_widget(Self::list(" Goals ", &self.goals, "\u{25ce} "), goals);
    }
}
