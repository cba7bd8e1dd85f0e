use chrono::NaiveDate;
use crossterm::event::{KeyEvent, MouseEvent};

use crate::types::Priority;

use super::state::EditField;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Message {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Tick,
    Resize(u16, u16),
    Quit,
    ToggleHelp,
    OpenList,
    BackToDashboard,
    SelectUp,
    SelectDown,
    /// Card index in the current list.
    ToggleExpand(usize),
    EditTodo(usize),
    ToggleCompletion(usize),
    OpenAddDialog,
    DismissDialog,
    SaveTodo,
    DeleteTodo,
    FocusEditField(EditField),
    ClearEditField(EditField),
    SetPriority(Priority),
    ToggleCompletedField,
    OpenDatePicker,
    PickDate(NaiveDate),
    ShiftPickerMonth(i32),
    ConfirmDatePicker,
    CancelDatePicker,
}
