//! Key handling for the add/edit dialog and the help overlay

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::types::Priority;

use super::messages::Message;
use super::state::{ActiveDialog, EditDialogState, EditField};

/// Applies `key` to the open dialog. Anything that needs the controller
/// (saving, deleting, closing) comes back as a follow-up message.
pub fn handle_dialog_key(dialog: &mut ActiveDialog, key: KeyEvent) -> Option<Message> {
    let mut follow_up: Option<Message> = None;

    match dialog {
        ActiveDialog::Edit(state) => {
            if state.date_picker.is_some() {
                handle_date_picker_key(state, key);
            } else {
                handle_edit_dialog_key(state, key, &mut follow_up);
            }
        }
        ActiveDialog::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Enter) {
                follow_up = Some(Message::DismissDialog);
            }
        }
        ActiveDialog::None => {}
    }

    follow_up
}

fn handle_edit_dialog_key(
    state: &mut EditDialogState,
    key: KeyEvent,
    follow_up: &mut Option<Message>,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc => {
            *follow_up = Some(Message::DismissDialog);
        }
        KeyCode::Char('s') if ctrl => {
            *follow_up = Some(Message::SaveTodo);
        }
        KeyCode::Char('u') if ctrl => {
            state.clear_field(state.focused_field);
        }
        KeyCode::Tab | KeyCode::Down => state.move_focus(1),
        KeyCode::BackTab | KeyCode::Up => state.move_focus(-1),
        KeyCode::Left if state.focused_field == EditField::Priority => {
            state.todo.priority = state.todo.priority.previous();
        }
        KeyCode::Right if state.focused_field == EditField::Priority => {
            state.todo.priority = state.todo.priority.next();
        }
        KeyCode::Char(digit @ '1'..='3') if state.focused_field == EditField::Priority => {
            let idx = digit as usize - '1' as usize;
            state.todo.priority = Priority::ALL[idx];
        }
        KeyCode::Left if matches!(state.focused_field, EditField::Delete | EditField::Cancel) => {
            state.move_focus(-1);
        }
        KeyCode::Right if matches!(state.focused_field, EditField::Save | EditField::Delete) => {
            state.move_focus(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter if state.focused_field == EditField::Completed => {
            state.toggle_completed();
        }
        KeyCode::Char(' ') | KeyCode::Enter if state.focused_field == EditField::Deadline => {
            *follow_up = Some(Message::OpenDatePicker);
        }
        KeyCode::Backspace => {
            if let Some(text) = state.text_mut(state.focused_field) {
                text.pop();
            }
        }
        KeyCode::Enter => {
            *follow_up = match state.focused_field {
                EditField::Cancel => Some(Message::DismissDialog),
                EditField::Delete => Some(Message::DeleteTodo),
                EditField::Name | EditField::Description => {
                    state.move_focus(1);
                    None
                }
                _ => Some(Message::SaveTodo),
            };
        }
        KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            if let Some(text) = state.text_mut(state.focused_field) {
                text.push(ch);
            }
        }
        _ => {}
    }
}

fn handle_date_picker_key(state: &mut EditDialogState, key: KeyEvent) {
    let Some(picker) = state.date_picker.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => state.cancel_date_picker(),
        KeyCode::Enter => state.confirm_date_picker(),
        KeyCode::Left | KeyCode::Char('h') => picker.move_days(-1),
        KeyCode::Right | KeyCode::Char('l') => picker.move_days(1),
        KeyCode::Up | KeyCode::Char('k') => picker.move_days(-7),
        KeyCode::Down | KeyCode::Char('j') => picker.move_days(7),
        KeyCode::PageUp => picker.move_months(-1),
        KeyCode::PageDown => picker.move_months(1),
        KeyCode::Char('t') => picker.jump_to_today(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    use super::*;
    use crate::types::{Todo, TodoId, deadline_to_local_date, start_of_day_millis};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn type_text(dialog: &mut ActiveDialog, text: &str) {
        for ch in text.chars() {
            handle_dialog_key(dialog, key(KeyCode::Char(ch)));
        }
    }

    fn edit_state(dialog: &ActiveDialog) -> &EditDialogState {
        match dialog {
            ActiveDialog::Edit(state) => state,
            other => panic!("expected edit dialog, got {other:?}"),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn typing_fills_focused_text_field() {
        let mut dialog = ActiveDialog::Edit(EditDialogState::new(Todo::draft(0)));

        type_text(&mut dialog, "Call mom");
        handle_dialog_key(&mut dialog, key(KeyCode::Backspace));

        assert_eq!(edit_state(&dialog).todo.name, "Call mo");
    }

    #[test]
    fn ctrl_u_clears_field_in_one_action() {
        let mut dialog = ActiveDialog::Edit(EditDialogState::new(Todo::draft(0)));
        type_text(&mut dialog, "scratch");

        let follow_up = handle_dialog_key(&mut dialog, ctrl('u'));

        assert_eq!(follow_up, None);
        assert!(edit_state(&dialog).todo.name.is_empty());
    }

    #[test]
    fn priority_selector_cycles_and_accepts_digits() {
        let mut state = EditDialogState::new(Todo::draft(0));
        state.focused_field = EditField::Priority;
        let mut dialog = ActiveDialog::Edit(state);

        handle_dialog_key(&mut dialog, key(KeyCode::Left));
        assert_eq!(edit_state(&dialog).todo.priority, Priority::High);

        handle_dialog_key(&mut dialog, key(KeyCode::Char('2')));
        assert_eq!(edit_state(&dialog).todo.priority, Priority::Medium);
    }

    #[test]
    fn enter_on_buttons_emits_follow_ups() {
        let mut todo = Todo::draft(0);
        todo.id = Some(TodoId(9));
        let mut state = EditDialogState::new(todo);

        state.focused_field = EditField::Save;
        let mut dialog = ActiveDialog::Edit(state.clone());
        assert_eq!(
            handle_dialog_key(&mut dialog, key(KeyCode::Enter)),
            Some(Message::SaveTodo)
        );

        state.focused_field = EditField::Delete;
        let mut dialog = ActiveDialog::Edit(state.clone());
        assert_eq!(
            handle_dialog_key(&mut dialog, key(KeyCode::Enter)),
            Some(Message::DeleteTodo)
        );

        state.focused_field = EditField::Cancel;
        let mut dialog = ActiveDialog::Edit(state);
        assert_eq!(
            handle_dialog_key(&mut dialog, key(KeyCode::Enter)),
            Some(Message::DismissDialog)
        );
    }

    #[test]
    fn escape_dismisses_dialog() {
        let mut dialog = ActiveDialog::Edit(EditDialogState::new(Todo::draft(0)));
        assert_eq!(
            handle_dialog_key(&mut dialog, key(KeyCode::Esc)),
            Some(Message::DismissDialog)
        );
    }

    #[test]
    fn space_toggles_completed_checkbox() {
        let mut state = EditDialogState::new(Todo::draft(0));
        state.focused_field = EditField::Completed;
        let mut dialog = ActiveDialog::Edit(state);

        handle_dialog_key(&mut dialog, key(KeyCode::Char(' ')));

        assert!(edit_state(&dialog).todo.is_completed);
    }

    #[test]
    fn date_picker_confirm_moves_deadline() {
        let mut state = EditDialogState::new(Todo::draft(start_of_day_millis(date(2025, 5, 10))));
        state.open_date_picker(date(2025, 5, 1));
        let mut dialog = ActiveDialog::Edit(state);

        handle_dialog_key(&mut dialog, key(KeyCode::Right));
        handle_dialog_key(&mut dialog, key(KeyCode::Down));
        handle_dialog_key(&mut dialog, key(KeyCode::PageDown));
        handle_dialog_key(&mut dialog, key(KeyCode::Enter));

        let state = edit_state(&dialog);
        assert!(state.date_picker.is_none());
        assert_eq!(deadline_to_local_date(state.todo.deadline), date(2025, 6, 18));
    }

    #[test]
    fn date_picker_escape_keeps_deadline_and_dialog() {
        let deadline = start_of_day_millis(date(2025, 5, 10));
        let mut state = EditDialogState::new(Todo::draft(deadline));
        state.open_date_picker(date(2025, 5, 1));
        let mut dialog = ActiveDialog::Edit(state);

        handle_dialog_key(&mut dialog, key(KeyCode::Char('t')));
        let follow_up = handle_dialog_key(&mut dialog, key(KeyCode::Esc));

        assert_eq!(follow_up, None);
        let state = edit_state(&dialog);
        assert!(state.date_picker.is_none());
        assert_eq!(state.todo.deadline, deadline);
    }

    #[test]
    fn help_closes_on_question_mark() {
        let mut dialog = ActiveDialog::Help;
        assert_eq!(
            handle_dialog_key(&mut dialog, key(KeyCode::Char('?'))),
            Some(Message::DismissDialog)
        );
    }
}
