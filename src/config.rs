//! Command line and on-disk configuration.
//!
//! Connection settings come from the command line (with environment
//! fallbacks). Colours and key bindings live in small `key = value` files
//! under the config directory, written with defaults on first run.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gateway::DEFAULT_API_URL;
use crate::pager::DEFAULT_PAGE_SIZE;

pub const APP_NAME: &str = "user-desk";

#[derive(Clone, Debug, Parser)]
#[command(name = APP_NAME, version, about = "Browse and edit users served by a REST endpoint")]
pub struct Cli {
    /// Users collection URL (list/create at the URL, update/delete at `<URL>/<id>`).
    #[arg(long, env = "USER_DESK_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Rows per table page.
    #[arg(long, env = "USER_DESK_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE, value_parser = parse_page_size)]
    pub page_size: usize,

    /// Per-request timeout in seconds.
    #[arg(long, env = "USER_DESK_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Directory holding `theme.conf` and `keybinds.conf`.
    #[arg(long, env = "USER_DESK_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Log file (the terminal is owned by the UI). Defaults to `<config-dir>/user-desk.log`.
    #[arg(long, env = "USER_DESK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn config_dir(&self) -> PathBuf {
        self.config_dir.clone().unwrap_or_else(default_config_dir)
    }

    pub fn config_file(&self, name: &str) -> PathBuf {
        self.config_dir().join(name)
    }

    pub fn log_file(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.config_file(&format!("{APP_NAME}.log")))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

fn parse_page_size(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("page size must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// `$XDG_CONFIG_HOME/user-desk`, else `~/.config/user-desk`, else the working directory.
pub fn default_config_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".config").join(APP_NAME);
    }
    PathBuf::from(".")
}

/// Split a `key = value` config line. Blank lines and `#` comments yield `None`.
pub(crate) fn parse_kv_line(raw: &str) -> Option<(&str, &str)> {
    let line = raw.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let (lhs, rhs) = line.split_once('=')?;
    let (lhs, rhs) = (lhs.trim(), rhs.trim());
    if lhs.is_empty() || rhs.is_empty() {
        return None;
    }
    Some((lhs, rhs))
}

pub(crate) fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
