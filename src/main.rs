//! user-desk binary entry point.
//!
//! Parses the command line, sets up file logging and the tokio runtime,
//! puts the terminal in raw mode, runs the TUI event loop, and restores the
//! terminal on exit.
//!
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::{Arc, mpsc};

use user_desk::app::dispatch::RuntimeDispatcher;
use user_desk::app::keymap::Keymap;
use user_desk::app::{self, AppState, Theme};
use user_desk::config::Cli;
use user_desk::gateway::HttpGateway;
use user_desk::logging;

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_file())?;
    tracing::info!(api_url = %cli.api_url, page_size = cli.page_size, "starting user-desk");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    let gateway = HttpGateway::new(cli.api_url.clone(), cli.timeout())?;
    let (tx, rx) = mpsc::channel();
    let mut dispatcher = RuntimeDispatcher::new(runtime.handle().clone(), Arc::new(gateway), tx);

    let theme = Theme::load_or_init(&cli.config_file("theme.conf"));
    let keymap = Keymap::load_or_init(&cli.config_file("keybinds.conf"));
    let mut app = AppState::new(cli.api_url.clone(), cli.page_size, theme, keymap);

    let mut terminal = init_terminal().context("init terminal")?;
    let res = app::run(&mut terminal, &mut app, &mut dispatcher, &rx);
    restore_terminal(&mut terminal);

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
