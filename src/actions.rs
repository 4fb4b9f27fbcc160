use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Action {
    Quit,
    /// Open the dock entry at this index.
    OpenApp(usize),
    CycleFocus,
    ToggleFullscreen,
    Minimize,
    CloseWindow,
    // Timer
    ToggleTimer,
    ResetTimer,
    // Projects
    NextProject,
    NewProject,
    ToggleNotes,
    ToggleHelp,
    CloseHelp,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Quit => write!(f, "Quit (saves first)"),
            Action::OpenApp(index) => write!(f, "Open dock app {}", index + 1),
            Action::CycleFocus => write!(f, "Bring next window to front"),
            Action::ToggleFullscreen => write!(f, "Toggle fullscreen"),
            Action::Minimize => write!(f, "Minimize focused window"),
            Action::CloseWindow => write!(f, "Close focused window"),
            Action::ToggleTimer => write!(f, "Start / pause focus timer"),
            Action::ResetTimer => write!(f, "Reset focus timer"),
            Action::NextProject => write!(f, "Switch to next project"),
            Action::NewProject => write!(f, "New project"),
            Action::ToggleNotes => write!(f, "Show / hide notes and goals"),
            Action::ToggleHelp => write!(f, "Show / hide this help"),
            Action::CloseHelp => write!(f, "Close help"),
        }
    }
}
