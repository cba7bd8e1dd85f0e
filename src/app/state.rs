//! Application state types for screens, dialogs and notices

use std::time::{Duration, Instant};

use chrono::NaiveDate;

use crate::types::{Priority, Todo, deadline_to_local_date, with_date};

use super::date_picker::DatePickerState;

pub const NAME_REQUIRED: &str = "Name cannot be empty";
pub const DESCRIPTION_REQUIRED: &str = "Description cannot be empty";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
pub enum View {
    #[default]
    Dashboard,
    List,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum EditField {
    Name,
    Priority,
    Deadline,
    Description,
    Completed,
    Save,
    Delete,
    Cancel,
}

/// Working copy of the record shown in the add/edit dialog.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct EditDialogState {
    pub todo: Todo,
    pub focused_field: EditField,
    pub date_picker: Option<DatePickerState>,
}

impl EditDialogState {
    pub fn new(todo: Todo) -> Self {
        Self {
            todo,
            focused_field: EditField::Name,
            date_picker: None,
        }
    }

    pub fn title(&self) -> &'static str {
        if self.todo.is_transient() {
            "Add New Todo"
        } else {
            "Edit Todo"
        }
    }

    /// Focus order. Delete only exists for records already in storage.
    pub fn fields(&self) -> Vec<EditField> {
        let mut fields = vec![
            EditField::Name,
            EditField::Priority,
            EditField::Deadline,
            EditField::Description,
            EditField::Completed,
            EditField::Save,
        ];
        if !self.todo.is_transient() {
            fields.push(EditField::Delete);
        }
        fields.push(EditField::Cancel);
        fields
    }

    pub fn move_focus(&mut self, delta: isize) {
        let fields = self.fields();
        let current = fields
            .iter()
            .position(|field| *field == self.focused_field)
            .unwrap_or(0);
        let len = fields.len() as isize;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        self.focused_field = fields[next];
    }

    pub fn text_mut(&mut self, field: EditField) -> Option<&mut String> {
        match field {
            EditField::Name => Some(&mut self.todo.name),
            EditField::Description => Some(&mut self.todo.description),
            _ => None,
        }
    }

    pub fn clear_field(&mut self, field: EditField) {
        if let Some(text) = self.text_mut(field) {
            text.clear();
        }
    }

    pub fn name_error(&self) -> Option<&'static str> {
        self.todo.name.trim().is_empty().then_some(NAME_REQUIRED)
    }

    pub fn description_error(&self) -> Option<&'static str> {
        self.todo
            .description
            .trim()
            .is_empty()
            .then_some(DESCRIPTION_REQUIRED)
    }

    /// First blocking validation message; the name is checked first.
    pub fn validate(&self) -> Result<(), &'static str> {
        match self.name_error().or_else(|| self.description_error()) {
            Some(message) => Err(message),
            None => Ok(()),
        }
    }

    pub fn open_date_picker(&mut self, today: NaiveDate) {
        let initial = deadline_to_local_date(self.todo.deadline);
        self.date_picker = Some(DatePickerState::new(initial, today));
        self.focused_field = EditField::Deadline;
    }

    /// Applies the highlighted day to the deadline and closes the picker.
    pub fn confirm_date_picker(&mut self) {
        if let Some(picker) = self.date_picker.take() {
            self.todo.deadline = with_date(self.todo.deadline, picker.cursor);
        }
    }

    pub fn cancel_date_picker(&mut self) {
        self.date_picker = None;
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.todo.priority = priority;
        self.focused_field = EditField::Priority;
    }

    pub fn toggle_completed(&mut self) {
        self.todo.is_completed = !self.todo.is_completed;
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Edit(EditDialogState),
    Help,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient footer message.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub shown_at: Instant,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Info,
            shown_at: Instant::now(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: NoticeKind::Error,
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.shown_at.elapsed() >= ttl
    }
}
