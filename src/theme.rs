use ratatui::style::{Color, Modifier, Style};

use crate::timer::TimerMode;

// Centralized dashboard colors.

pub fn accent() -> Color {
    Color::Rgb(200, 100, 0)
}

pub fn status_bar() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

pub fn header(focused: bool) -> Style {
    if focused {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}

pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Blue)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

pub fn body() -> Style {
    Style::default().fg(Color::Gray)
}

pub fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

pub fn chip() -> Style {
    Style::default().bg(Color::Gray).fg(Color::Black)
}

pub fn dock_item() -> Style {
    Style::default().fg(Color::White)
}

pub fn dock_key() -> Style {
    Style::default().fg(accent()).add_modifier(Modifier::BOLD)
}

pub fn timer(mode: TimerMode, active: bool) -> Style {
    let base = match mode {
        TimerMode::Work => Style::default().fg(Color::LightRed),
        TimerMode::Break => Style::default().fg(Color::LightGreen),
    };
    let base = base.bg(Color::DarkGray);
    if active {
        base.add_modifier(Modifier::BOLD)
    } else {
        base
    }
}

pub fn dialog_bg() -> Color {
    Color::Black
}
