use std::collections::BTreeMap;
use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub use crate::actions::Action;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCombo {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyCombo {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// Character keys ignore Shift, since terminals report `?` both with
    /// and without it.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        if key.code != self.code {
            return false;
        }
        let mut mods = key.modifiers;
        if matches!(key.code, KeyCode::Char(_)) {
            mods.remove(KeyModifiers::SHIFT);
        }
        mods == self.mods
    }

    pub fn display(&self) -> String {
        let mut parts = Vec::new();
        if self.mods.contains(KeyModifiers::CONTROL) {
            parts.push("Ctrl".to_string());
        }
        if self.mods.contains(KeyModifiers::ALT) {
            parts.push("Alt".to_string());
        }
        let code = match self.code {
            KeyCode::Char(' ') => "Space".to_string(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::BackTab => "Shift+Tab".to_string(),
            other => format!("{other:?}"),
        };
        parts.push(code);
        parts.join("+")
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[derive(Debug, Clone)]
pub struct KeyBindings {
    map: BTreeMap<Action, Vec<KeyCombo>>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        use Action::*;
        let mut kb = Self::empty();
        kb.add(Quit, KeyCombo::plain('q'));
        kb.add(Quit, KeyCombo::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        for (index, digit) in ('1'..='9').enumerate() {
            kb.add(OpenApp(index), KeyCombo::plain(digit));
        }
        kb.add(CycleFocus, KeyCombo::new(KeyCode::Tab, KeyModifiers::NONE));
        kb.add(ToggleFullscreen, KeyCombo::plain('f'));
        kb.add(Minimize, KeyCombo::plain('m'));
        kb.add(CloseWindow, KeyCombo::plain('x'));
        kb.add(ToggleTimer, KeyCombo::plain(' '));
        kb.add(ResetTimer, KeyCombo::plain('r'));
        kb.add(NextProject, KeyCombo::plain('p'));
        kb.add(NewProject, KeyCombo::plain('n'));
        kb.add(ToggleNotes, KeyCombo::plain('b'));
        kb.add(ToggleHelp, KeyCombo::plain('?'));
        kb.add(CloseHelp, KeyCombo::new(KeyCode::Esc, KeyModifiers::NONE));
        kb
    }
}

impl KeyBindings {
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, action: Action, combo: KeyCombo) {
        self.map.entry(action).or_default().push(combo);
    }

    pub fn matches(&self, action: Action, key: &KeyEvent) -> bool {
        self.map
            .get(&action)
            .is_some_and(|list| list.iter().any(|c| c.matches(key)))
    }

    pub fn action_for_key(&self, key: &KeyEvent) -> Option<Action> {
        self.map
            .iter()
            .find(|(_, list)| list.iter().any(|c| c.matches(key)))
            .map(|(action, _)| *action)
    }

    /// One line per action, digits for the dock folded into a single row.
    pub fn help_entries(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        let mut dock_shown = false;
        for (action, combos) in &self.map {
            if let Action::OpenApp(_) = action {
                if !dock_shown {
                    entries.push(("1-9".to_string(), "Open dock app".to_string()));
                    dock_shown = true;
                }
                continue;
            }
            let keys: Vec<String> = combos.iter().map(KeyCombo::display).collect();
            entries.push((keys.join(", "), action.to_string()));
        }
        entries
    }
}
