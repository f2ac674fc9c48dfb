use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::AppState;
use crate::form::FormMode;
use crate::model::{FieldPath, UserId};
use crate::ui::components::centered_rect;

pub fn render_users_table(f: &mut Frame, area: Rect, app: &AppState) {
    let dir = &app.directory;
    let rows = dir.visible().iter().enumerate().map(|(i, u)| {
        let mut style = if i == app.selected {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        if dir.is_deleting(u.id) {
            style = style.fg(app.theme.muted).add_modifier(Modifier::CROSSED_OUT);
        }
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.username.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.phone.clone()),
            Cell::from(u.website.clone()),
            Cell::from(u.company.name.clone()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(5),
        Constraint::Percentage(18),
        Constraint::Percentage(12),
        Constraint::Percentage(20),
        Constraint::Percentage(18),
        Constraint::Percentage(14),
        Constraint::Percentage(18),
    ];
    let header = Row::new(vec!["ID", "Name", "Username", "Email", "Phone", "Website", "Company"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let title = if app.loading { "Users (loading…)" } else { "Users" };
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

/// One button per page; the current page is highlighted even when it lies past the data.
pub fn render_pagination(f: &mut Frame, area: Rect, app: &AppState) {
    let dir = &app.directory;
    let current = dir.pager().page();
    let mut spans = Vec::new();
    for page in 1..=dir.total_pages() {
        let label = format!(" {page} ");
        let style = if page == current {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    if current > dir.total_pages() {
        spans.push(Span::styled(format!("[{current}: no users]"), Style::default().fg(app.theme.muted)));
    }
    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title("Pages")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState, focus: usize) {
    let form = app.directory.form();
    let Some(record) = form.record() else { return };
    let (title, button) = match form.mode() {
        Some(FormMode::Edit) => ("Edit User", "Update"),
        _ => ("Add User", "Save"),
    };

    let mut lines: Vec<Line> = Vec::new();
    for (idx, path) in FieldPath::ALL.iter().enumerate() {
        let marker = if idx == focus { "▶" } else { " " };
        let value = record.field(*path);
        let value_span = if value.is_empty() && idx != focus {
            Span::styled(path.label().to_string(), Style::default().fg(app.theme.muted))
        } else {
            Span::styled(value.to_string(), Style::default().fg(app.theme.text))
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{marker} {:<13}", format!("{}:", path.label()))),
            value_span,
            Span::raw(if idx == focus { "▏" } else { "" }),
        ]));
    }
    lines.push(Line::raw(""));
    let footer = if app.directory.is_submitting() {
        "Saving…".to_string()
    } else {
        format!("Enter: {button}   Esc: Close   Tab/↑/↓: field")
    };
    lines.push(Line::from(Span::styled(footer, Style::default().add_modifier(Modifier::ITALIC))));
    if let Some(err) = form.last_error() {
        lines.push(Line::from(Span::styled(format!("Error: {err}"), Style::default().fg(app.theme.error_fg))));
    }

    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = centered_rect(width, height, area);
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_modal(f: &mut Frame, area: Rect, app: &AppState, id: UserId, selected: usize) {
    let rect = centered_rect(50, 7, area);
    let who = app
        .directory
        .store()
        .get(id)
        .map(|u| format!("{} ({})", u.name, u.id))
        .unwrap_or_else(|| id.to_string());
    let yes = if selected == 0 { "[Yes]" } else { " Yes " };
    let no = if selected == 1 { "[No]" } else { " No " };
    let body = format!("Are you sure you want to delete this user?\n{who}\n\n  {yes}    {no}");
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Delete user")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
