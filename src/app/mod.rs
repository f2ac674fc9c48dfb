//! Application state types and entry glue.
//!
//! Wraps the [`Directory`] session with what only the terminal needs: the
//! selected row, the open modal, colours and key bindings. The event loop
//! itself lives in `update` (re-exported as `run`).
//!
pub mod dispatch;
pub mod keymap;
pub mod update;

use ratatui::style::Color;
use std::path::Path;
use std::time::Instant;

use crate::config::parse_kv_line;
use crate::directory::{Completion, Directory};
use crate::model::{FieldPath, UserId, UserRecord};

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error_fg: Color,
}

impl Theme {
    /// Plain terminal colours.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error_fg: Color::Red,
        }
    }

    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0x89, 0xb4, 0xfa),        // blue
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
        }
    }

    /// Theme keys in file order.
    const KEYS: [&'static str; 11] = [
        "text",
        "muted",
        "title",
        "border",
        "header_bg",
        "header_fg",
        "status_bg",
        "status_fg",
        "highlight_fg",
        "highlight_bg",
        "error_fg",
    ];

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "error_fg" => &mut self.error_fg,
            _ => return None,
        })
    }

    /// Overlay `key = value` lines on `mocha`; unknown keys and bad colours are skipped.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut theme = Self::mocha();
        for (key, val) in contents.lines().filter_map(parse_kv_line) {
            if let (Some(color), Some(slot)) = (parse_color(val), theme.slot(key)) {
                *slot = color;
            }
        }
        Some(theme)
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        let mut copy = *self;
        let mut buf = String::from(
            "# user-desk theme\n# Colors: #RRGGBB, RRGGBB, a name such as gray or light-blue, an index 0-255, or reset\n\n",
        );
        for key in Self::KEYS {
            if let Some(color) = copy.slot(key) {
                buf.push_str(&format!("{key} = {color}\n"));
            }
        }
        crate::config::ensure_parent(path)?;
        std::fs::write(path, buf)
    }

    /// Load the theme at `path`, writing the default there first if it is missing.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let theme = Self::mocha();
        if let Err(err) = theme.write_file(path) {
            tracing::warn!(path = %path.display(), error = %err, "could not write default theme");
        }
        theme
    }
}

/// Anything ratatui's `Color` parser takes, plus bare six-digit hex.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.len() == 6 && s.chars().all(|c| c.is_ascii_hexdigit()) {
        return format!("#{s}").parse().ok();
    }
    s.parse().ok()
}

/// Modal dialogs drawn over the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// Add/edit form; `focus` indexes [`FieldPath::ALL`].
    Form { focus: usize },
    /// "Are you sure?" before a delete. `selected`: 0 = Yes, 1 = No.
    DeleteConfirm { id: UserId, selected: usize },
    Help { scroll: u16 },
}

pub struct AppState {
    pub started_at: Instant,
    pub directory: Directory,
    pub api_url: String,
    /// Row index within the visible page.
    pub selected: usize,
    pub input_mode: InputMode,
    pub modal: Option<ModalState>,
    pub theme: Theme,
    pub keymap: keymap::Keymap,
    pub loading: bool,
}

impl AppState {
    pub fn new(api_url: impl Into<String>, page_size: usize, theme: Theme, keymap: keymap::Keymap) -> Self {
        Self {
            started_at: Instant::now(),
            directory: Directory::new(page_size),
            api_url: api_url.into(),
            selected: 0,
            input_mode: InputMode::Normal,
            modal: None,
            theme,
            keymap,
            loading: false,
        }
    }

    pub fn selected_record(&self) -> Option<&UserRecord> {
        self.directory.visible().get(self.selected)
    }

    pub fn focused_field(&self) -> Option<FieldPath> {
        match self.modal {
            Some(ModalState::Form { focus }) => FieldPath::ALL.get(focus).copied(),
            _ => None,
        }
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    /// Keep the selection inside the current page after the store or page changed.
    pub fn clamp_selection(&mut self) {
        let visible = self.directory.visible().len();
        self.selected = self.selected.min(visible.saturating_sub(1));
    }

    /// Fold a gateway completion into the directory and tidy up the UI around it.
    pub fn apply_completion(&mut self, completion: Completion) {
        if matches!(completion, Completion::Loaded(_)) {
            self.loading = false;
        }
        self.directory.apply(completion);
        if matches!(self.modal, Some(ModalState::Form { .. })) && !self.directory.form().is_open() {
            self.close_modal();
        }
        if let Some(ModalState::DeleteConfirm { id, .. }) = self.modal
            && self.directory.store().get(id).is_none()
        {
            self.close_modal();
        }
        self.clamp_selection();
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
