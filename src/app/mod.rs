pub mod date_picker;
pub mod dialogs;
pub mod interaction;
pub mod messages;
pub mod state;

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use tracing::{debug, warn};

use self::dialogs::handle_dialog_key;
use self::interaction::{InteractionKind, InteractionMap};
pub use self::messages::Message;
pub use self::state::{ActiveDialog, EditDialogState, EditField, Notice, NoticeKind, View};
use crate::db::Database;
use crate::settings::Settings;
use crate::theme::{Theme, ThemePreset};
use crate::types::{Todo, TodoId, now_millis};

const THEME_ENV: &str = "TODO_APP_THEME";

pub struct App {
    pub should_quit: bool,
    pub theme: Theme,
    pub viewport: (u16, u16),
    pub db: Database,
    pub todos: Vec<Todo>,
    /// Set when the last list-all failed; shown instead of the empty-list text.
    pub load_error: Option<String>,
    /// Record the dialog was opened for; `None` while adding.
    pub selected: Option<Todo>,
    pub active_dialog: ActiveDialog,
    pub expanded: HashSet<TodoId>,
    pub cursor: usize,
    /// First card drawn in the list; kept in sync with `cursor` by the renderer.
    pub list_offset: usize,
    pub current_view: View,
    pub notice: Option<Notice>,
    pub interaction_map: InteractionMap,
    pub settings: Settings,
}

impl App {
    /// Builds the interactive app from settings, the environment and CLI overrides.
    pub fn new(db_override: Option<&Path>, cli_theme: Option<ThemePreset>) -> Result<Self> {
        let settings = Settings::load();
        let db_path = resolve_db_path(db_override, &settings)?;
        let db = Database::open(&db_path)
            .with_context(|| format!("failed to open todo database at {}", db_path.display()))?;

        let env_theme = std::env::var(THEME_ENV)
            .ok()
            .and_then(|value| ThemePreset::from_str(&value).ok());
        let effective_theme = resolve_theme(cli_theme, env_theme, &settings);

        Ok(Self::with_database(db, settings, effective_theme))
    }

    pub fn with_database(db: Database, settings: Settings, theme: ThemePreset) -> Self {
        Self {
            should_quit: false,
            theme: Theme::from_preset(theme),
            viewport: (80, 24),
            db,
            todos: Vec::new(),
            load_error: None,
            selected: None,
            active_dialog: ActiveDialog::None,
            expanded: HashSet::new(),
            cursor: 0,
            list_offset: 0,
            current_view: View::Dashboard,
            notice: None,
            interaction_map: InteractionMap::default(),
            settings,
        }
    }

    /// Re-queries storage and replaces the in-memory list wholesale.
    pub fn refresh(&mut self) {
        match self.db.list_all() {
            Ok(todos) => {
                self.todos = todos;
                self.load_error = None;
            }
            Err(err) => {
                warn!(error = %err, "failed to refresh todo list");
                self.todos.clear();
                self.load_error = Some(err.to_string());
                self.notify_error(format!("Could not load todos: {err}"));
            }
        }

        self.cursor = self.cursor.min(self.todos.len().saturating_sub(1));
        let live: HashSet<TodoId> = self.todos.iter().filter_map(|todo| todo.id).collect();
        self.expanded.retain(|id| live.contains(id));
    }

    pub fn toggle_completion(&mut self, todo: &Todo) {
        let updated = Todo {
            is_completed: !todo.is_completed,
            ..todo.clone()
        };
        if let Err(err) = self.db.update(&updated) {
            self.notify_error(format!("Could not update \"{}\": {err}", todo.name));
        }
        self.refresh();
    }

    pub fn request_add(&mut self) {
        self.selected = None;
        self.active_dialog = ActiveDialog::Edit(EditDialogState::new(Todo::draft(now_millis())));
    }

    pub fn request_edit(&mut self, todo: &Todo) {
        self.selected = Some(todo.clone());
        self.active_dialog = ActiveDialog::Edit(EditDialogState::new(todo.clone()));
    }

    /// Inserts a transient record or updates a persisted one, then reloads.
    /// The dialog closes whatever the outcome.
    pub fn save(&mut self, todo: Todo) {
        let outcome = if todo.is_transient() {
            self.db.insert(&todo).map(|_| "added")
        } else {
            self.db.update(&todo).map(|()| "updated")
        };

        match outcome {
            Ok(verb) => {
                debug!(name = %todo.name, verb, "saved todo");
                self.notify(format!("Todo \"{}\" {verb}", todo.name));
            }
            Err(err) => self.notify_error(format!("Could not save \"{}\": {err}", todo.name)),
        }

        self.refresh();
        self.close_dialog();
    }

    pub fn delete(&mut self, todo: &Todo) {
        match todo.id {
            Some(id) => match self.db.delete(id) {
                Ok(()) => self.notify(format!("Todo \"{}\" deleted", todo.name)),
                Err(err) => {
                    self.notify_error(format!("Could not delete \"{}\": {err}", todo.name))
                }
            },
            None => warn!("delete requested for a todo that was never saved"),
        }

        self.refresh();
        self.close_dialog();
    }

    pub fn open_list(&mut self) {
        self.current_view = View::List;
        self.refresh();
    }

    /// Leaves the list screen and forgets everything it held.
    pub fn back_to_dashboard(&mut self) {
        self.current_view = View::Dashboard;
        self.todos.clear();
        self.load_error = None;
        self.expanded.clear();
        self.cursor = 0;
        self.list_offset = 0;
        self.close_dialog();
    }

    pub fn update(&mut self, message: Message) -> Result<()> {
        match message {
            Message::Key(key) => self.handle_key(key)?,
            Message::Mouse(mouse) => self.handle_mouse(mouse)?,
            Message::Tick => {
                let ttl = Duration::from_millis(self.settings.notice_ttl_ms);
                if self.notice.as_ref().is_some_and(|notice| notice.is_expired(ttl)) {
                    self.notice = None;
                }
            }
            Message::Resize(w, h) => {
                self.viewport = (w, h);
                self.interaction_map.clear();
            }
            Message::Quit => self.should_quit = true,
            Message::ToggleHelp => {
                self.active_dialog = match self.active_dialog {
                    ActiveDialog::Help => ActiveDialog::None,
                    _ => ActiveDialog::Help,
                };
            }
            Message::OpenList => self.open_list(),
            Message::BackToDashboard => self.back_to_dashboard(),
            Message::SelectUp => self.cursor = self.cursor.saturating_sub(1),
            Message::SelectDown => {
                if self.cursor + 1 < self.todos.len() {
                    self.cursor += 1;
                }
            }
            Message::ToggleExpand(idx) => {
                if let Some(id) = self.todos.get(idx).and_then(|todo| todo.id) {
                    self.cursor = idx;
                    if !self.expanded.remove(&id) {
                        self.expanded.insert(id);
                    }
                }
            }
            Message::EditTodo(idx) => {
                if let Some(todo) = self.todos.get(idx).cloned() {
                    self.cursor = idx;
                    self.request_edit(&todo);
                }
            }
            Message::ToggleCompletion(idx) => {
                if let Some(todo) = self.todos.get(idx).cloned() {
                    self.cursor = idx;
                    self.toggle_completion(&todo);
                }
            }
            Message::OpenAddDialog => self.request_add(),
            Message::DismissDialog => self.close_dialog(),
            Message::SaveTodo => self.submit_dialog(),
            Message::DeleteTodo => {
                if let ActiveDialog::Edit(state) = &self.active_dialog {
                    let todo = state.todo.clone();
                    self.delete(&todo);
                }
            }
            Message::FocusEditField(field) => {
                if let Some(state) = self.edit_dialog_mut()
                    && state.fields().contains(&field)
                {
                    state.focused_field = field;
                }
            }
            Message::ClearEditField(field) => {
                if let Some(state) = self.edit_dialog_mut() {
                    state.clear_field(field);
                    state.focused_field = field;
                }
            }
            Message::SetPriority(priority) => {
                if let Some(state) = self.edit_dialog_mut() {
                    state.set_priority(priority);
                }
            }
            Message::ToggleCompletedField => {
                if let Some(state) = self.edit_dialog_mut() {
                    state.toggle_completed();
                    state.focused_field = EditField::Completed;
                }
            }
            Message::OpenDatePicker => {
                let today = Local::now().date_naive();
                if let Some(state) = self.edit_dialog_mut() {
                    state.open_date_picker(today);
                }
            }
            Message::PickDate(date) => {
                if let Some(picker) = self
                    .edit_dialog_mut()
                    .and_then(|state| state.date_picker.as_mut())
                {
                    picker.select(date);
                }
            }
            Message::ShiftPickerMonth(delta) => {
                if let Some(picker) = self
                    .edit_dialog_mut()
                    .and_then(|state| state.date_picker.as_mut())
                {
                    picker.move_months(delta);
                }
            }
            Message::ConfirmDatePicker => {
                if let Some(state) = self.edit_dialog_mut() {
                    state.confirm_date_picker();
                }
            }
            Message::CancelDatePicker => {
                if let Some(state) = self.edit_dialog_mut() {
                    state.cancel_date_picker();
                }
            }
        }

        Ok(())
    }

    pub fn notify(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::info(text));
    }

    pub fn notify_error(&mut self, text: impl Into<String>) {
        self.notice = Some(Notice::error(text));
    }

    fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
        self.selected = None;
    }

    fn edit_dialog_mut(&mut self) -> Option<&mut EditDialogState> {
        match &mut self.active_dialog {
            ActiveDialog::Edit(state) => Some(state),
            _ => None,
        }
    }

    /// Validates the dialog's working copy before any storage call.
    fn submit_dialog(&mut self) {
        let ActiveDialog::Edit(state) = &self.active_dialog else {
            return;
        };

        match state.validate() {
            Ok(()) => {
                let todo = state.todo.clone();
                self.save(todo);
            }
            Err(message) => self.notify_error(message),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        if self.active_dialog != ActiveDialog::None {
            if let Some(follow_up) = handle_dialog_key(&mut self.active_dialog, key) {
                self.update(follow_up)?;
            }
            return Ok(());
        }

        let follow_up = match self.current_view {
            View::Dashboard => match key.code {
                KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => Some(Message::OpenList),
                KeyCode::Char('q') => Some(Message::Quit),
                KeyCode::Char('?') => Some(Message::ToggleHelp),
                _ => None,
            },
            View::List => match key.code {
                KeyCode::Up | KeyCode::Char('k') => Some(Message::SelectUp),
                KeyCode::Down | KeyCode::Char('j') => Some(Message::SelectDown),
                KeyCode::Enter => Some(Message::ToggleExpand(self.cursor)),
                KeyCode::Char(' ') => Some(Message::ToggleCompletion(self.cursor)),
                KeyCode::Char('e') => Some(Message::EditTodo(self.cursor)),
                KeyCode::Char('a') => Some(Message::OpenAddDialog),
                KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
                    Some(Message::BackToDashboard)
                }
                KeyCode::Char('q') => Some(Message::Quit),
                KeyCode::Char('?') => Some(Message::ToggleHelp),
                _ => None,
            },
        };

        if let Some(message) = follow_up {
            self.update(message)?;
        }
        Ok(())
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Result<()> {
        let kind = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => InteractionKind::LeftClick,
            MouseEventKind::Down(MouseButton::Right) => InteractionKind::RightClick,
            MouseEventKind::ScrollUp
                if self.current_view == View::List && self.active_dialog == ActiveDialog::None =>
            {
                return self.update(Message::SelectUp);
            }
            MouseEventKind::ScrollDown
                if self.current_view == View::List && self.active_dialog == ActiveDialog::None =>
            {
                return self.update(Message::SelectDown);
            }
            _ => return Ok(()),
        };

        let hit = self
            .interaction_map
            .resolve_message(mouse.column, mouse.row, kind);
        if let Some(message) = hit {
            self.update(message)?;
        }
        Ok(())
    }
}

/// Command line first, then `TODO_APP_THEME`, then the settings file.
fn resolve_theme(
    cli: Option<ThemePreset>,
    env: Option<ThemePreset>,
    settings: &Settings,
) -> ThemePreset {
    cli.or(env).unwrap_or_else(|| settings.theme_preset())
}

/// `<data_local_dir>/todo-app/todo.db`.
pub fn default_db_path() -> Result<PathBuf> {
    let data_dir = dirs::data_local_dir().context("failed to determine local data directory")?;
    Ok(data_dir.join("todo-app").join("todo.db"))
}

/// CLI flag first, then the settings file, then the default location.
pub fn resolve_db_path(cli: Option<&Path>, settings: &Settings) -> Result<PathBuf> {
    match cli.or(settings.database_path.as_deref()) {
        Some(path) => Ok(path.to_path_buf()),
        None => default_db_path(),
    }
}
