use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

/// Semantic actions that keys are bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    Back,
    Quit,
    ToggleFocus,
    NextDay,
    PrevDay,
    ResetDate,
    /// Open the selection, or submit a form
    Open,
    Projects,
    Add,
    Edit,
    Reschedule,
    MarkTodo,
    MarkDoing,
    MarkBlocked,
    MarkDone,
    MarkAbandoned,
    Delete,
}

impl Action {
    pub const ALL: [Action; 19] = [
        Action::MoveUp,
        Action::MoveDown,
        Action::Back,
        Action::Quit,
        Action::ToggleFocus,
        Action::NextDay,
        Action::PrevDay,
        Action::ResetDate,
        Action::Open,
        Action::Projects,
        Action::Add,
        Action::Edit,
        Action::Reschedule,
        Action::MarkTodo,
        Action::MarkDoing,
        Action::MarkBlocked,
        Action::MarkDone,
        Action::MarkAbandoned,
        Action::Delete,
    ];

    /// Name used in the `[keys]` config table
    pub fn config_name(self) -> &'static str {
        match self {
            Action::MoveUp => "move_up",
            Action::MoveDown => "move_down",
            Action::Back => "back",
            Action::Quit => "quit",
            Action::ToggleFocus => "toggle_focus",
            Action::NextDay => "next_day",
            Action::PrevDay => "prev_day",
            Action::ResetDate => "reset_date",
            Action::Open => "open",
            Action::Projects => "projects",
            Action::Add => "add",
            Action::Edit => "edit",
            Action::Reschedule => "reschedule",
            Action::MarkTodo => "mark_todo",
            Action::MarkDoing => "mark_doing",
            Action::MarkBlocked => "mark_blocked",
            Action::MarkDone => "mark_done",
            Action::MarkAbandoned => "mark_abandoned",
            Action::Delete => "delete",
        }
    }

    pub fn from_config_name(name: &str) -> Option<Action> {
        Action::ALL.into_iter().find(|a| a.config_name() == name)
    }

    fn default_keys(self) -> &'static [&'static str] {
        match self {
            Action::MoveUp => &["k", "up"],
            Action::MoveDown => &["j", "down"],
            Action::Back => &["esc"],
            Action::Quit => &["q", "ctrl+c"],
            Action::ToggleFocus => &["tab"],
            Action::NextDay => &["l", "right"],
            Action::PrevDay => &["h", "left"],
            Action::ResetDate => &["r"],
            Action::Open => &["enter"],
            Action::Projects => &["ctrl+p"],
            Action::Add => &["a"],
            Action::Edit => &["e"],
            Action::Reschedule => &["s"],
            Action::MarkTodo => &["space"],
            Action::MarkDoing => &["/"],
            Action::MarkBlocked => &["b"],
            Action::MarkDone => &["x"],
            Action::MarkAbandoned => &["shift+a"],
            Action::Delete => &["d"],
        }
    }
}

/// Normalized identifier for a key press, e.g. `j`, `up`, `ctrl+c`, `space`
pub fn key_id(key: &KeyEvent) -> String {
    let base = match key.code {
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().to_string(),
        KeyCode::Up => "up".into(),
        KeyCode::Down => "down".into(),
        KeyCode::Left => "left".into(),
        KeyCode::Right => "right".into(),
        KeyCode::Enter => "enter".into(),
        KeyCode::Esc => "esc".into(),
        KeyCode::Tab => "tab".into(),
        KeyCode::BackTab => "shift+tab".into(),
        KeyCode::Backspace => "backspace".into(),
        KeyCode::Delete => "delete".into(),
        KeyCode::Home => "home".into(),
        KeyCode::End => "end".into(),
        KeyCode::PageUp => "pgup".into(),
        KeyCode::PageDown => "pgdown".into(),
        KeyCode::F(n) => format!("f{n}"),
        _ => "unknown".into(),
    };
    let mut id = String::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        id.push_str("ctrl+");
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        id.push_str("alt+");
    }
    // Shifted letters arrive as uppercase chars; keep them distinct
    if let KeyCode::Char(c) = key.code
        && c.is_uppercase()
    {
        id.push_str("shift+");
    }
    id.push_str(&base);
    id
}

/// Maps key identifiers to actions
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<String, Action>,
}

impl Default for KeyMap {
    fn default() -> Self {
        KeyMap::from_config(&HashMap::new())
    }
}

impl KeyMap {
    /// Defaults with per-action overrides. An override replaces every
    /// default key of that action.
    pub fn from_config(overrides: &HashMap<String, Vec<String>>) -> Self {
        for name in overrides.keys() {
            if Action::from_config_name(name).is_none() {
                warn!(action = %name, "unknown action in [keys]");
            }
        }
        let mut bindings = HashMap::new();
        for action in Action::ALL {
            match overrides.get(action.config_name()) {
                Some(keys) => {
                    for key in keys {
                        bindings.insert(key.to_lowercase(), action);
                    }
                }
                None => {
                    for key in action.default_keys() {
                        bindings.entry(key.to_string()).or_insert(action);
                    }
                }
            }
        }
        KeyMap { bindings }
    }

    pub fn action(&self, key: &KeyEvent) -> Option<Action> {
        self.bindings.get(&key_id(key)).copied()
    }

    /// Keys bound to `action`, sorted for display
    pub fn keys_for(&self, action: Action) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(k, _)| k.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn key_ids() {
        assert_eq!(key_id(&key(KeyCode::Char('j'))), "j");
        assert_eq!(key_id(&key(KeyCode::Char(' '))), "space");
        assert_eq!(key_id(&key(KeyCode::Up)), "up");
        assert_eq!(key_id(&key(KeyCode::Char('J'))), "shift+j");
        assert_eq!(
            key_id(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            "ctrl+c"
        );
    }

    #[test]
    fn default_bindings() {
        let keymap = KeyMap::default();
        assert_eq!(keymap.action(&key(KeyCode::Char('j'))), Some(Action::MoveDown));
        assert_eq!(keymap.action(&key(KeyCode::Down)), Some(Action::MoveDown));
        assert_eq!(keymap.action(&key(KeyCode::Esc)), Some(Action::Back));
        assert_eq!(keymap.action(&key(KeyCode::Tab)), Some(Action::ToggleFocus));
        assert_eq!(
            keymap.action(&KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL)),
            Some(Action::Projects)
        );
        assert_eq!(keymap.action(&key(KeyCode::Char('a'))), Some(Action::Add));
        assert_eq!(
            keymap.action(&KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(Action::MarkAbandoned)
        );
        assert_eq!(keymap.action(&key(KeyCode::Char('z'))), None);
    }

    #[test]
    fn every_action_has_a_config_name() {
        for action in Action::ALL {
            assert_eq!(Action::from_config_name(action.config_name()), Some(action));
        }
    }

    #[test]
    fn overrides_replace_action_keys() {
        let mut overrides = HashMap::new();
        overrides.insert("move_up".to_string(), vec!["w".to_string()]);
        overrides.insert("no_such_action".to_string(), vec!["z".to_string()]);
        let keymap = KeyMap::from_config(&overrides);

        assert_eq!(keymap.action(&key(KeyCode::Char('w'))), Some(Action::MoveUp));
        assert_eq!(keymap.action(&key(KeyCode::Char('k'))), None);
        assert_eq!(keymap.action(&key(KeyCode::Up)), None);
        assert_eq!(keymap.action(&key(KeyCode::Char('z'))), None);
        assert_eq!(keymap.keys_for(Action::MoveDown), vec!["down", "j"]);
    }

    #[test]
    fn override_can_steal_a_default_key() {
        let mut overrides = HashMap::new();
        overrides.insert("delete".to_string(), vec!["x".to_string()]);
        let keymap = KeyMap::from_config(&overrides);
        assert_eq!(keymap.action(&key(KeyCode::Char('x'))), Some(Action::Delete));
    }
}
