//! Shared UI components (status bar, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};

/// Render the bottom status bar with mode, in-flight requests and the last notice.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Modal => "MODAL",
    };
    let dir = &app.directory;
    let pending = dir.pending_requests();
    let pending_str = if pending > 0 { format!("  pending:{pending}") } else { String::new() };
    let mut spans = vec![Span::raw(format!(
        "mode: {mode}  rows/page:{}{pending_str}",
        dir.pager().page_size()
    ))];
    if let Some(notice) = dir.notice() {
        let style = if notice.is_error() {
            Style::default().fg(app.theme.error_fg).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::raw("  │ "));
        spans.push(Span::styled(notice.message().to_string(), style));
    }
    let p = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the help modal from the live keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let entry = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("{label}: ")),
            Span::styled(keys, Style::default().add_modifier(Modifier::ITALIC)),
        ])
    };
    let keys = |action: KeyAction| app.keymap.keys_for(action).join(" / ");

    let lines: Vec<Line> = vec![
        Line::from(Span::styled("Table", Style::default().add_modifier(Modifier::BOLD))),
        entry("Move", format!("{} / {}", keys(KeyAction::MoveUp), keys(KeyAction::MoveDown))),
        entry("Previous page", keys(KeyAction::PrevPage)),
        entry("Next page", keys(KeyAction::NextPage)),
        entry("First / last page", format!("{} / {}", keys(KeyAction::FirstPage), keys(KeyAction::LastPage))),
        entry("Go to page", "1-9".to_string()),
        entry("Add user", keys(KeyAction::NewUser)),
        entry("Edit user", keys(KeyAction::EditSelection)),
        entry("Delete user", keys(KeyAction::DeleteSelection)),
        entry("Help", keys(KeyAction::OpenHelp)),
        entry("Quit", keys(KeyAction::Quit)),
        Line::raw(""),
        Line::from(Span::styled("Form", Style::default().add_modifier(Modifier::BOLD))),
        entry("Next / previous field", "Tab, Down / Shift+Tab, Up".to_string()),
        entry("Save or update", "Enter".to_string()),
        entry("Close without saving", "Esc".to_string()),
        Line::raw(""),
        Line::from(Span::styled("Delete confirmation", Style::default().add_modifier(Modifier::BOLD))),
        entry("Choose", "Left / Right, y / n".to_string()),
        Line::raw(""),
        entry("Close help", "Esc / Enter".to_string()),
    ];

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
