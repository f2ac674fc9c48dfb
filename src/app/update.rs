use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::sync::mpsc::Receiver;
use std::time::Duration;
use tracing::{debug, info};

use crate::app::dispatch::Dispatch;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};
use crate::directory::{Completion, Notice};
use crate::error::ActionError;
use crate::model::FieldPath;
use crate::ui;

/// What the loop should do after a key press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Fetch the list once, then draw, drain completions and handle keys until quit.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    dispatcher: &mut dyn Dispatch,
    completions: &Receiver<Completion>,
) -> Result<()> {
    app.loading = true;
    dispatcher.load();

    loop {
        while let Ok(completion) = completions.try_recv() {
            app.apply_completion(completion);
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, key, dispatcher) == Control::Quit
        {
            break;
        }
    }

    info!(uptime_secs = app.started_at.elapsed().as_secs(), "quitting");
    Ok(())
}

pub fn handle_key(app: &mut AppState, key: KeyEvent, dispatcher: &mut dyn Dispatch) -> Control {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Modal => {
            handle_modal_key(app, key.code, dispatcher);
            Control::Continue
        }
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> Control {
    // digits jump straight to a page, like the pagination buttons
    if let KeyCode::Char(c @ '1'..='9') = key.code
        && key.modifiers.is_empty()
    {
        app.directory.go_to(c as usize - '0' as usize);
        app.selected = 0;
        return Control::Continue;
    }

    let Some(action) = app.keymap.resolve(&key) else {
        return Control::Continue;
    };
    match action {
        KeyAction::Quit => return Control::Quit,
        KeyAction::Ignore => {}
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::NewUser => {
            app.directory.open_for_create();
            app.open_modal(ModalState::Form { focus: 0 });
        }
        KeyAction::EditSelection => {
            if let Some(id) = app.selected_record().map(|r| r.id) {
                if app.directory.open_for_edit(id) {
                    app.open_modal(ModalState::Form { focus: 0 });
                } else {
                    app.directory.set_notice(Notice::Info(format!("User {id} is being deleted")));
                }
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(id) = app.selected_record().map(|r| r.id) {
                if app.directory.is_deleting(id) {
                    app.directory.set_notice(Notice::Info(format!("User {id} is already being deleted")));
                } else if app.directory.is_updating(id) {
                    app.directory.set_notice(Notice::Info(format!("User {id} is still being saved")));
                } else {
                    app.open_modal(ModalState::DeleteConfirm { id, selected: 1 });
                }
            }
        }
        KeyAction::MoveUp => app.selected = app.selected.saturating_sub(1),
        KeyAction::MoveDown => {
            if app.selected + 1 < app.directory.visible().len() {
                app.selected += 1;
            }
        }
        KeyAction::PrevPage => {
            app.directory.prev_page();
            app.selected = 0;
        }
        KeyAction::NextPage => {
            app.directory.next_page();
            app.selected = 0;
        }
        KeyAction::FirstPage => {
            app.directory.go_to(1);
            app.selected = 0;
        }
        KeyAction::LastPage => {
            let last = app.directory.total_pages();
            app.directory.go_to(last);
            app.selected = 0;
        }
    }
    Control::Continue
}

fn handle_modal_key(app: &mut AppState, code: KeyCode, dispatcher: &mut dyn Dispatch) {
    match app.modal.clone() {
        Some(ModalState::Form { focus }) => handle_form_key(app, focus, code, dispatcher),
        Some(ModalState::DeleteConfirm { id, selected }) => match code {
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::BackTab => {
                app.modal = Some(ModalState::DeleteConfirm { id, selected: 1 - selected.min(1) });
            }
            KeyCode::Char('y') | KeyCode::Char('Y') => confirm_delete(app, id, true, dispatcher),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => confirm_delete(app, id, false, dispatcher),
            KeyCode::Enter => confirm_delete(app, id, selected == 0, dispatcher),
            _ => {}
        },
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => app.close_modal(),
            KeyCode::Up | KeyCode::Char('k') => app.modal = Some(ModalState::Help { scroll: scroll.saturating_sub(1) }),
            KeyCode::Down | KeyCode::Char('j') => app.modal = Some(ModalState::Help { scroll: scroll.saturating_add(1) }),
            _ => {}
        },
        None => app.input_mode = InputMode::Normal,
    }
}

fn handle_form_key(app: &mut AppState, focus: usize, code: KeyCode, dispatcher: &mut dyn Dispatch) {
    let fields = FieldPath::ALL.len();
    match code {
        KeyCode::Esc => {
            app.directory.cancel();
            app.close_modal();
        }
        KeyCode::Enter => match app.directory.begin_submit() {
            Some(request) => dispatcher.submit(request),
            None => debug!("submit ignored; already in flight"),
        },
        KeyCode::Tab | KeyCode::Down => app.modal = Some(ModalState::Form { focus: (focus + 1) % fields }),
        KeyCode::BackTab | KeyCode::Up => app.modal = Some(ModalState::Form { focus: (focus + fields - 1) % fields }),
        KeyCode::Backspace => edit_focused(app, focus, |value| {
            value.pop();
        }),
        KeyCode::Char(c) => edit_focused(app, focus, |value| value.push(c)),
        _ => {}
    }
}

fn edit_focused(app: &mut AppState, focus: usize, edit: impl FnOnce(&mut String)) {
    let Some(path) = FieldPath::ALL.get(focus).copied() else { return };
    let Some(mut value) = app.directory.form().record().map(|r| r.field(path).to_string()) else {
        return;
    };
    edit(&mut value);
    if let Err(err) = app.directory.set_field(path.as_str(), value) {
        debug!(error = %err, "field edit rejected");
    }
}

fn confirm_delete(app: &mut AppState, id: crate::model::UserId, accepted: bool, dispatcher: &mut dyn Dispatch) {
    app.close_modal();
    match app.directory.begin_delete(id, |_| accepted) {
        Ok(Some(id)) => dispatcher.delete(id),
        Ok(None) => {}
        Err(ActionError::UserCancelled) => app.directory.set_notice(Notice::Info("Delete cancelled".to_string())),
        Err(err) => app.directory.set_notice(Notice::Error(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Theme;
    use crate::app::keymap::Keymap;
    use crate::form::SubmitRequest;
    use crate::model::{UserId, UserRecord};
    use crossterm::event::KeyModifiers;

    #[derive(Default)]
    struct Recorder {
        loads: usize,
        submits: Vec<SubmitRequest>,
        deletes: Vec<UserId>,
    }

    impl Dispatch for Recorder {
        fn load(&mut self) {
            self.loads += 1;
        }
        fn submit(&mut self, request: SubmitRequest) {
            self.submits.push(request);
        }
        fn delete(&mut self, id: UserId) {
            self.deletes.push(id);
        }
    }

    fn app_with(n: u64) -> AppState {
        let mut app = AppState::new("http://x/users", 10, Theme::dark(), Keymap::default());
        let records = (1..=n)
            .map(|i| UserRecord { id: UserId(i), name: format!("user{i}"), ..UserRecord::zero() })
            .collect();
        app.directory.finish_load(Ok(records)).unwrap();
        app
    }

    fn key(app: &mut AppState, d: &mut Recorder, code: KeyCode) -> Control {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE), d)
    }

    fn type_str(app: &mut AppState, d: &mut Recorder, s: &str) {
        for c in s.chars() {
            key(app, d, KeyCode::Char(c));
        }
    }

    #[test]
    fn typing_in_form_fills_focused_field_and_enter_dispatches() {
        let mut app = app_with(3);
        let mut d = Recorder::default();
        key(&mut app, &mut d, KeyCode::Char('n'));
        assert_eq!(app.modal, Some(ModalState::Form { focus: 0 }));

        type_str(&mut app, &mut d, "Ann");
        key(&mut app, &mut d, KeyCode::Backspace);
        for _ in 0..5 {
            key(&mut app, &mut d, KeyCode::Tab);
        }
        type_str(&mut app, &mut d, "Acme");

        let rec = app.directory.form().record().unwrap();
        assert_eq!(rec.name, "An");
        assert_eq!(rec.company.name, "Acme");

        key(&mut app, &mut d, KeyCode::Enter);
        key(&mut app, &mut d, KeyCode::Enter);
        assert_eq!(d.submits.len(), 1);
    }

    #[test]
    fn escape_cancels_without_dispatch() {
        let mut app = app_with(3);
        let mut d = Recorder::default();
        key(&mut app, &mut d, KeyCode::Enter);
        assert!(app.directory.form().is_open());
        key(&mut app, &mut d, KeyCode::Esc);
        assert!(!app.directory.form().is_open());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(d.submits.is_empty());
    }

    #[test]
    fn delete_needs_explicit_yes() {
        let mut app = app_with(3);
        let mut d = Recorder::default();
        key(&mut app, &mut d, KeyCode::Down);
        key(&mut app, &mut d, KeyCode::Delete);
        assert_eq!(app.modal, Some(ModalState::DeleteConfirm { id: UserId(2), selected: 1 }));

        // default button is "No"
        key(&mut app, &mut d, KeyCode::Enter);
        assert!(d.deletes.is_empty());
        assert_eq!(app.directory.notice(), Some(&Notice::Info("Delete cancelled".into())));

        key(&mut app, &mut d, KeyCode::Delete);
        key(&mut app, &mut d, KeyCode::Char('y'));
        assert_eq!(d.deletes, vec![UserId(2)]);
        assert!(app.directory.is_deleting(UserId(2)));
    }

    #[test]
    fn delete_key_waits_for_a_cancelled_edit_to_land() {
        let mut app = app_with(3);
        let mut d = Recorder::default();
        key(&mut app, &mut d, KeyCode::Enter);
        key(&mut app, &mut d, KeyCode::Enter);
        key(&mut app, &mut d, KeyCode::Esc);
        assert_eq!(d.submits.len(), 1);

        key(&mut app, &mut d, KeyCode::Delete);
        assert!(app.modal.is_none());
        assert_eq!(app.directory.notice(), Some(&Notice::Info("User 1 is still being saved".into())));
        assert!(d.deletes.is_empty());
    }

    #[test]
    fn paging_keys_and_digits_move_the_window() {
        let mut app = app_with(25);
        let mut d = Recorder::default();
        key(&mut app, &mut d, KeyCode::Right);
        assert_eq!(app.directory.pager().page(), 2);
        key(&mut app, &mut d, KeyCode::End);
        assert_eq!(app.directory.pager().page(), 3);
        assert_eq!(app.directory.visible().len(), 5);
        key(&mut app, &mut d, KeyCode::Char('4'));
        assert_eq!(app.directory.pager().page(), 4);
        assert!(app.directory.visible().is_empty());
        assert!(app.selected_record().is_none());
        assert_eq!(key(&mut app, &mut d, KeyCode::Char('q')), Control::Quit);
    }
}
