//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Only the table view goes through the keymap. Inside modals the keys are
//! fixed (typing must reach the form fields).

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;
use std::path::Path;

use crate::config::parse_kv_line;

/// Semantic actions available on the users table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Open the form in create mode.
    NewUser,
    /// Open the form on the selected row.
    EditSelection,
    /// Ask to delete the selected row.
    DeleteSelection,
    MoveUp,
    MoveDown,
    PrevPage,
    NextPage,
    FirstPage,
    LastPage,
    /// Swallow the key.
    Ignore,
}

const ACTIONS: [(KeyAction, &str); 12] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::NewUser, "NewUser"),
    (KeyAction::EditSelection, "EditSelection"),
    (KeyAction::DeleteSelection, "DeleteSelection"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PrevPage, "PrevPage"),
    (KeyAction::NextPage, "NextPage"),
    (KeyAction::FirstPage, "FirstPage"),
    (KeyAction::LastPage, "LastPage"),
    (KeyAction::Ignore, "Ignore"),
];

/// Canonical mapping from `(KeyModifiers, KeyCode)` to [`KeyAction`].
#[derive(Clone, Debug, PartialEq)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style hjkl, `n`/`e`/`Delete` for the record actions.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Char('a')), KeyAction::NewUser);
        bindings.insert((M::NONE, Enter), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);

        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);

        bindings.insert((M::NONE, Left), KeyAction::PrevPage);
        bindings.insert((M::NONE, Right), KeyAction::NextPage);
        bindings.insert((M::NONE, Char('h')), KeyAction::PrevPage);
        bindings.insert((M::NONE, Char('l')), KeyAction::NextPage);
        bindings.insert((M::NONE, PageUp), KeyAction::PrevPage);
        bindings.insert((M::NONE, PageDown), KeyAction::NextPage);
        bindings.insert((M::NONE, Home), KeyAction::FirstPage);
        bindings.insert((M::NONE, End), KeyAction::LastPage);
        Self { bindings }
    }

    /// Load `path`, or write the defaults there if it does not exist yet.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "could not write default keymap");
        }
        km
    }

    /// Parse `<Action> = <KeySpec>` lines on top of the defaults.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for (lhs, rhs) in contents.lines().filter_map(parse_kv_line) {
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::debug!(line = %format!("{lhs} = {rhs}"), "ignoring keybinding"),
            }
        }
        map
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-desk keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Up, Down, Left, Right, PageUp, PageDown, Home, End, Delete, ?\n");
        let names: Vec<&str> = ACTIONS.iter().map(|(_, n)| *n).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut lines: Vec<String> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| format!("{} = {}", format_action(*action), Self::format_key(*mods, *code)))
            .collect();
        lines.sort();
        for line in lines {
            let _ = writeln!(&mut buf, "{line}");
        }

        crate::config::ensure_parent(path)?;
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }

    /// Format a key like `Ctrl+c` or `PageDown`.
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Home => "Home".to_string(),
            End => "End".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let (mods, rest) = match spec.trim().strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, spec.trim()),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        "Home" => Home,
        "End" => End,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ACTIONS.iter().find(|(_, name)| *name == s.trim()).map(|(a, _)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTIONS
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, name)| *name)
        .unwrap_or("Ignore")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn defaults_resolve_core_actions() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&press(KeyCode::Char('n'), KeyModifiers::NONE)), Some(KeyAction::NewUser));
        assert_eq!(km.resolve(&press(KeyCode::Delete, KeyModifiers::NONE)), Some(KeyAction::DeleteSelection));
        assert_eq!(km.resolve(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)), Some(KeyAction::Quit));
        assert_eq!(km.resolve(&press(KeyCode::Char('x'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn file_entries_override_defaults_and_bad_lines_are_skipped() {
        let km = Keymap::parse("# comment\nNewUser = Ctrl+n\nBogus = x\nQuit = NotAKey\n");
        assert_eq!(km.resolve(&press(KeyCode::Char('n'), KeyModifiers::CONTROL)), Some(KeyAction::NewUser));
        // defaults survive
        assert_eq!(km.resolve(&press(KeyCode::Char('q'), KeyModifiers::NONE)), Some(KeyAction::Quit));
    }

    #[test]
    fn written_file_parses_back_to_the_same_map() {
        let mut path = std::env::temp_dir();
        path.push(format!("user_desk_keymap_{}.conf", std::process::id()));
        let km = Keymap::default();
        km.write_file(&path).unwrap();
        let back = Keymap::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, km);
    }

    #[test]
    fn action_names_round_trip() {
        for (action, name) in ACTIONS {
            assert_eq!(parse_action(name), Some(action));
            assert_eq!(format_action(action), name);
        }
    }
}
