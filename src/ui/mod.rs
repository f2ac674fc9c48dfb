pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_header(f, root[0], app);
    users::render_users_table(f, root[1], app);
    users::render_pagination(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let dir = &app.directory;
    let p = Paragraph::new(format!(
        "{}  users:{}  page {}/{}  | n: add user; Enter: edit; Delete: delete; ←/→: page; ?: help; q: quit",
        app.api_url,
        dir.store().len(),
        dir.pager().page(),
        dir.total_pages(),
    ))
    .block(
        Block::default()
            .title("User Management")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    match &app.modal {
        Some(ModalState::Form { focus }) => users::render_form_modal(f, area, app, *focus),
        Some(ModalState::DeleteConfirm { id, selected }) => users::render_delete_modal(f, area, app, *id, *selected),
        Some(ModalState::Help { scroll }) => components::render_help_modal(f, area, app, *scroll),
        None => {}
    }
}
