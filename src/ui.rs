use tuirealm::ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};

use crate::app::date_picker::{DatePickerState, WEEKDAY_HEADER};
use crate::app::interaction::{InteractionLayer, InteractionMap};
use crate::app::{ActiveDialog, App, EditDialogState, EditField, Message, NoticeKind, View};
use crate::theme::Theme;
use crate::types::{Priority, Todo};

const COLLAPSED_CARD_HEIGHT: u16 = 3;
const EXPANDED_CARD_HEIGHT: u16 = 7;
const EDIT_DIALOG_SIZE: (u16, u16) = (60, 21);
const DATE_PICKER_SIZE: (u16, u16) = (30, 13);
const DAY_CELL_WIDTH: u16 = 4;
const CLEAR_MARKER: &str = "[x]";

pub fn render(frame: &mut Frame<'_>, app: &mut App) {
    app.interaction_map.clear();

    let area = frame.area();
    frame.render_widget(
        Block::default().style(
            Style::default()
                .bg(app.theme.base.canvas)
                .fg(app.theme.base.text),
        ),
        area,
    );

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, chunks[0], app);
    match app.current_view {
        View::Dashboard => render_dashboard(frame, chunks[1], app),
        View::List => render_list(frame, chunks[1], app),
    }
    render_footer(frame, chunks[2], app);

    if app.active_dialog != ActiveDialog::None {
        render_dialog(frame, app);
    }
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let theme = app.theme;
    let title_style = Style::default()
        .fg(theme.base.header)
        .add_modifier(Modifier::BOLD);

    match app.current_view {
        View::Dashboard => {
            frame.render_widget(
                Paragraph::new(Span::styled(" Dashboard ", title_style)),
                area,
            );
        }
        View::List => {
            let back = " ← Back ";
            let line = Line::from(vec![
                Span::styled(back, Style::default().fg(theme.base.accent)),
                Span::styled(format!(" Todo List ({}) ", app.todos.len()), title_style),
            ]);
            frame.render_widget(Paragraph::new(line), area);

            let back_rect = Rect::new(area.x, area.y, text_width(back), area.height).intersection(area);
            app.interaction_map
                .register_click(InteractionLayer::Base, back_rect, Message::BackToDashboard);
        }
    }
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let theme = &app.theme;
    let (text, style) = match &app.notice {
        Some(notice) => {
            let color = match notice.kind {
                NoticeKind::Info => theme.base.success,
                NoticeKind::Error => theme.base.danger,
            };
            (
                notice.text.as_str(),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )
        }
        None => (footer_hint(app), Style::default().fg(theme.base.text_muted)),
    };

    frame.render_widget(
        Paragraph::new(format!(" {text} "))
            .alignment(Alignment::Center)
            .style(style),
        area,
    );
}

fn footer_hint(app: &App) -> &'static str {
    match (&app.active_dialog, app.current_view) {
        (ActiveDialog::Edit(state), _) if state.date_picker.is_some() => {
            "arrows: move  PgUp/PgDn: month  t: today  Enter: pick  Esc: cancel"
        }
        (ActiveDialog::Edit(_), _) => "Tab: next field  Ctrl+U: clear  Ctrl+S: save  Esc: cancel",
        (ActiveDialog::Help, _) => "Esc: close help",
        (ActiveDialog::None, View::Dashboard) => "Enter: open list  ?: help  q: quit",
        (ActiveDialog::None, View::List) => {
            "j/k: select  Enter: expand  Space: done  e: edit  a: add  Esc: back  ?: help"
        }
    }
}

fn render_dashboard(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let theme = app.theme;
    let button = centered_area(24, 3, area);
    render_button(frame, button, "Todo List", true, &theme);
    app.interaction_map
        .register_click(InteractionLayer::Base, button, Message::OpenList);

    if button.bottom() < area.bottom() {
        let hint = Rect::new(area.x, button.bottom(), area.width, 1);
        frame.render_widget(
            Paragraph::new("Press Enter or click to open your todos")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.base.text_muted)),
            hint,
        );
    }
}

fn render_list(frame: &mut Frame<'_>, area: Rect, app: &mut App) {
    let theme = app.theme;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)])
        .split(area);
    let (cards_area, add_area) = (chunks[0], chunks[1]);

    if app.todos.is_empty() {
        let (text, style) = match &app.load_error {
            Some(err) => (
                format!("Could not load todos: {err}"),
                Style::default().fg(theme.base.danger),
            ),
            None => (
                "No todos found.".to_string(),
                Style::default().fg(theme.base.text_muted),
            ),
        };
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .style(style)
                .wrap(Wrap { trim: true }),
            centered_area(cards_area.width, 2, cards_area),
        );
    } else {
        app.list_offset = visible_offset(app, cards_area.height);

        let bottom = cards_area.bottom();
        let mut y = cards_area.y;
        for (idx, todo) in app.todos.iter().enumerate().skip(app.list_offset) {
            if y >= bottom {
                break;
            }
            let expanded = is_expanded(app, todo);
            let height = card_height(expanded).min(bottom - y);
            let rect = Rect::new(cards_area.x, y, cards_area.width, height);

            let checkbox = render_card(frame, rect, todo, expanded, idx == app.cursor, &theme);
            app.interaction_map.register_card(
                InteractionLayer::Base,
                rect,
                Message::ToggleExpand(idx),
                Message::EditTodo(idx),
            );
            if let Some(checkbox) = checkbox {
                app.interaction_map.register_click(
                    InteractionLayer::Base,
                    checkbox,
                    Message::ToggleCompletion(idx),
                );
            }

            y = y.saturating_add(height);
        }
    }

    let button = centered_area(16, 3, add_area);
    render_button(frame, button, "Add Todo", false, &theme);
    app.interaction_map
        .register_click(InteractionLayer::Base, button, Message::OpenAddDialog);
}

fn is_expanded(app: &App, todo: &Todo) -> bool {
    todo.id.is_some_and(|id| app.expanded.contains(&id))
}

fn card_height(expanded: bool) -> u16 {
    if expanded {
        EXPANDED_CARD_HEIGHT
    } else {
        COLLAPSED_CARD_HEIGHT
    }
}

/// Smallest scroll change that keeps the cursor's card fully visible.
fn visible_offset(app: &App, height: u16) -> usize {
    let mut offset = app.list_offset.min(app.cursor);
    while offset < app.cursor {
        let used: u32 = app.todos[offset..=app.cursor]
            .iter()
            .map(|todo| u32::from(card_height(is_expanded(app, todo))))
            .sum();
        if used <= u32::from(height) {
            break;
        }
        offset += 1;
    }
    offset
}

/// Draws one card and returns the clickable area of its status checkbox when visible.
fn render_card(
    frame: &mut Frame<'_>,
    area: Rect,
    todo: &Todo,
    expanded: bool,
    selected: bool,
    theme: &Theme,
) -> Option<Rect> {
    let colors = theme.card_colors(todo.priority, selected);
    let mut text_style = Style::default().fg(theme.base.text);
    if todo.is_completed {
        text_style = text_style.add_modifier(Modifier::CROSSED_OUT);
    }
    let muted = Style::default().fg(theme.base.text_muted);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.background));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return None;
    }

    let title_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(Rect { height: 1, ..inner });
    frame.render_widget(
        Paragraph::new(Span::styled(
            todo.name.as_str(),
            text_style.add_modifier(Modifier::BOLD),
        )),
        title_row[0],
    );
    frame.render_widget(
        Paragraph::new(if expanded { "▴" } else { "▾" })
            .alignment(Alignment::Right)
            .style(muted),
        title_row[1],
    );

    if !expanded {
        return None;
    }

    let details = vec![
        Line::from(vec![
            Span::styled("Priority: ", text_style),
            Span::styled(todo.priority.label(), text_style.add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::styled("Deadline: ", text_style),
            Span::styled(todo.formatted_deadline(), text_style),
        ]),
        Line::from(Span::styled(todo.description.as_str(), text_style)),
    ];
    let details_area = Rect {
        y: inner.y + 1,
        height: inner.height.saturating_sub(1).min(3),
        ..inner
    };
    frame.render_widget(Paragraph::new(details), details_area);

    if inner.height < 5 {
        return None;
    }

    let status_row = Rect {
        y: inner.y + 4,
        height: 1,
        ..inner
    };
    let (status, mark) = if todo.is_completed {
        ("Completed", "[x]")
    } else {
        ("Pending", "[ ]")
    };
    let label = format!("Status: {status} ");
    let mark_color = if todo.is_completed {
        theme.base.success
    } else {
        theme.base.text
    };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(label.as_str(), text_style),
            Span::styled(mark, Style::default().fg(mark_color).add_modifier(Modifier::BOLD)),
        ])),
        status_row,
    );

    let mark_x = status_row.x.saturating_add(text_width(&label));
    Some(Rect::new(mark_x, status_row.y, text_width(mark), 1).intersection(status_row))
}

fn render_dialog(frame: &mut Frame<'_>, app: &mut App) {
    let App {
        active_dialog,
        interaction_map,
        theme,
        ..
    } = app;

    match active_dialog {
        ActiveDialog::Edit(state) => {
            render_edit_dialog(frame, state, theme, interaction_map);
            if let Some(picker) = &state.date_picker {
                render_date_picker(frame, picker, theme, interaction_map);
            }
        }
        ActiveDialog::Help => {
            interaction_map.register_click(
                InteractionLayer::Dialog,
                frame.area(),
                Message::DismissDialog,
            );
            let area = render_help_overlay(frame, theme);
            interaction_map.register_blocker(InteractionLayer::Dialog, area);
        }
        ActiveDialog::None => {}
    }
}

fn render_edit_dialog(
    frame: &mut Frame<'_>,
    state: &EditDialogState,
    theme: &Theme,
    map: &mut InteractionMap,
) {
    let full = frame.area();
    map.register_click(InteractionLayer::Dialog, full, Message::DismissDialog);

    let area = centered_area(EDIT_DIALOG_SIZE.0, EDIT_DIALOG_SIZE.1, full);
    map.register_blocker(InteractionLayer::Dialog, area);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .title(format!(" {} ", state.title()))
        .title_alignment(Alignment::Center)
        .style(
            Style::default()
                .bg(theme.dialog_surface())
                .fg(theme.base.text),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(inner);

    let focused = state.focused_field;
    let name_error = state.name_error();
    let description_error = state.description_error();

    render_input_field(
        frame,
        rows[0],
        (" Name ", EditField::Name),
        &state.todo.name,
        focused == EditField::Name,
        name_error.is_some(),
        theme,
        map,
    );
    render_error_line(frame, rows[1], name_error, theme);

    render_priority_selector(frame, rows[2], state, theme, map);

    let deadline_block = field_block(" Deadline ", focused == EditField::Deadline, false, theme);
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::raw(state.todo.formatted_deadline()),
            Span::styled(
                "  (Enter to pick)",
                Style::default().fg(theme.base.text_muted),
            ),
        ]))
        .block(deadline_block),
        rows[3],
    );
    map.register_click(InteractionLayer::Dialog, rows[3], Message::OpenDatePicker);

    render_input_field(
        frame,
        rows[4],
        (" Description ", EditField::Description),
        &state.todo.description,
        focused == EditField::Description,
        description_error.is_some(),
        theme,
        map,
    );
    render_error_line(frame, rows[5], description_error, theme);

    render_checkbox(
        frame,
        rows[6],
        "Completed",
        state.todo.is_completed,
        focused == EditField::Completed,
        theme,
    );
    map.register_click(
        InteractionLayer::Dialog,
        rows[6],
        Message::ToggleCompletedField,
    );

    let buttons: Vec<(EditField, &str, Message)> = state
        .fields()
        .into_iter()
        .filter_map(|field| match field {
            EditField::Save => Some((field, "Save", Message::SaveTodo)),
            EditField::Delete => Some((field, "Delete", Message::DeleteTodo)),
            EditField::Cancel => Some((field, "Cancel", Message::DismissDialog)),
            _ => None,
        })
        .collect();
    let button_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            buttons
                .iter()
                .map(|_| Constraint::Ratio(1, buttons.len() as u32))
                .collect::<Vec<_>>(),
        )
        .split(rows[8]);
    for ((field, label, message), area) in buttons.into_iter().zip(button_areas.iter()) {
        let button = centered_area(12, 3, *area);
        render_button(frame, button, label, focused == field, theme);
        map.register_click(InteractionLayer::Dialog, button, message);
    }
}

#[allow(clippy::too_many_arguments)]
fn render_input_field(
    frame: &mut Frame<'_>,
    area: Rect,
    (label, field): (&str, EditField),
    value: &str,
    is_focused: bool,
    is_invalid: bool,
    theme: &Theme,
    map: &mut InteractionMap,
) {
    let block = field_block(label, is_focused, is_invalid, theme);
    let inner = block.inner(area);
    let marker_width = if value.is_empty() {
        0
    } else {
        text_width(CLEAR_MARKER) + 1
    };
    let text_width_budget = inner.width.saturating_sub(marker_width + 1) as usize;

    let mut shown = visible_tail(value, text_width_budget);
    if is_focused {
        shown.push('▏');
    }
    frame.render_widget(Paragraph::new(shown).block(block), area);
    map.register_click(InteractionLayer::Dialog, area, Message::FocusEditField(field));

    if marker_width > 0 && inner.width > marker_width {
        let marker = Rect::new(
            inner.right().saturating_sub(marker_width),
            inner.y,
            marker_width,
            1,
        );
        frame.render_widget(
            Paragraph::new(CLEAR_MARKER)
                .alignment(Alignment::Right)
                .style(Style::default().fg(theme.base.text_muted)),
            marker,
        );
        map.register_click(InteractionLayer::Dialog, marker, Message::ClearEditField(field));
    }
}

fn render_error_line(frame: &mut Frame<'_>, area: Rect, error: Option<&str>, theme: &Theme) {
    if let Some(error) = error {
        frame.render_widget(
            Paragraph::new(format!(" {error}")).style(Style::default().fg(theme.base.danger)),
            area,
        );
    }
}

fn render_priority_selector(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &EditDialogState,
    theme: &Theme,
    map: &mut InteractionMap,
) {
    let block = field_block(
        " Priority ",
        state.focused_field == EditField::Priority,
        false,
        theme,
    );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut spans = Vec::new();
    let mut x = inner.x;
    for priority in Priority::ALL {
        let label = format!(" {} ", priority.label());
        let width = text_width(&label);
        let style = if priority == state.todo.priority {
            Style::default()
                .bg(theme.priority_tint(priority))
                .fg(theme.base.text)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.base.text_muted)
        };
        map.register_click(
            InteractionLayer::Dialog,
            Rect::new(x, inner.y, width, 1).intersection(inner),
            Message::SetPriority(priority),
        );
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x = x.saturating_add(width + 1);
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_date_picker(
    frame: &mut Frame<'_>,
    picker: &DatePickerState,
    theme: &Theme,
    map: &mut InteractionMap,
) {
    let full = frame.area();
    map.register_click(InteractionLayer::Picker, full, Message::CancelDatePicker);

    let area = centered_area(DATE_PICKER_SIZE.0, DATE_PICKER_SIZE.1, full);
    map.register_blocker(InteractionLayer::Picker, area);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.interactive.focus))
        .title(" Deadline ")
        .title_alignment(Alignment::Center)
        .style(
            Style::default()
                .bg(theme.dialog_surface())
                .fg(theme.base.text),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(inner);

    let header = rows[0];
    frame.render_widget(
        Paragraph::new(picker.month_title())
            .alignment(Alignment::Center)
            .style(
                Style::default()
                    .fg(theme.base.header)
                    .add_modifier(Modifier::BOLD),
            ),
        header,
    );
    let arrow_width = 2_u16.min(header.width);
    let prev = Rect::new(header.x, header.y, arrow_width, 1);
    let next = Rect::new(header.right().saturating_sub(arrow_width), header.y, arrow_width, 1);
    frame.render_widget(Paragraph::new("‹"), prev);
    frame.render_widget(Paragraph::new("›").alignment(Alignment::Right), next);
    map.register_click(InteractionLayer::Picker, prev, Message::ShiftPickerMonth(-1));
    map.register_click(InteractionLayer::Picker, next, Message::ShiftPickerMonth(1));

    let weekdays: Vec<Span> = WEEKDAY_HEADER
        .iter()
        .map(|day| {
            let name = day.to_string();
            Span::styled(
                format!(" {:>2} ", name.get(..2).unwrap_or(name.as_str())),
                Style::default().fg(theme.base.text_muted),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(Line::from(weekdays)), rows[1]);

    let grid_area = rows[2];
    for (week_idx, week) in picker.month_grid().iter().enumerate() {
        let y = grid_area.y.saturating_add(week_idx as u16);
        if y >= grid_area.bottom() {
            break;
        }
        let mut spans = Vec::with_capacity(week.len());
        for (col, day) in week.iter().enumerate() {
            let Some(date) = day else {
                spans.push(Span::raw("    "));
                continue;
            };
            let mut style = Style::default();
            if *date == picker.today {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            if *date == picker.cursor {
                style = style
                    .add_modifier(Modifier::REVERSED)
                    .add_modifier(Modifier::BOLD);
            }
            spans.push(Span::styled(format!(" {:>2} ", chrono::Datelike::day(date)), style));

            let x = grid_area.x.saturating_add(col as u16 * DAY_CELL_WIDTH);
            map.register_click(
                InteractionLayer::Picker,
                Rect::new(x, y, DAY_CELL_WIDTH, 1).intersection(grid_area),
                Message::PickDate(*date),
            );
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)),
            Rect {
                y,
                height: 1,
                ..grid_area
            },
        );
    }

    let actions = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)])
        .split(rows[4]);
    let accent = Style::default().fg(theme.interactive.focus);
    frame.render_widget(
        Paragraph::new("[ OK ]").alignment(Alignment::Center).style(accent),
        actions[0],
    );
    frame.render_widget(
        Paragraph::new("[ Cancel ]")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme.base.text_muted)),
        actions[1],
    );
    map.register_click(InteractionLayer::Picker, actions[0], Message::ConfirmDatePicker);
    map.register_click(InteractionLayer::Picker, actions[1], Message::CancelDatePicker);
}

fn field_block<'a>(title: &'a str, is_focused: bool, is_invalid: bool, theme: &Theme) -> Block<'a> {
    let border = if is_invalid {
        theme.base.danger
    } else if is_focused {
        theme.interactive.focus
    } else {
        theme.interactive.border
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(theme.dialog.input_bg))
}

fn render_button(frame: &mut Frame<'_>, area: Rect, label: &str, is_focused: bool, theme: &Theme) {
    let (bg, fg, border) = if is_focused {
        (
            theme.dialog.button_bg,
            theme.dialog.button_fg,
            theme.interactive.focus,
        )
    } else {
        (
            theme.dialog.input_bg,
            theme.base.text,
            theme.interactive.border,
        )
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(bg).fg(fg));
    frame.render_widget(
        Paragraph::new(label)
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}

fn render_checkbox(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    checked: bool,
    is_focused: bool,
    theme: &Theme,
) {
    let check_mark = if checked { "[x]" } else { "[ ]" };
    let style = if is_focused {
        Style::default().fg(theme.interactive.focus)
    } else {
        Style::default().fg(theme.base.text)
    };
    frame.render_widget(
        Paragraph::new(format!(" {check_mark} {label}")).style(style),
        area,
    );
}

fn render_help_overlay(frame: &mut Frame<'_>, theme: &Theme) -> Rect {
    let area = centered_rect(70, 80, frame.area());
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .style(
            Style::default()
                .bg(theme.dialog_surface())
                .fg(theme.base.text),
        );
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let text = [
        "Dashboard",
        "  Enter or click: open the todo list",
        "Todo List",
        "  j/k or arrows: select a card",
        "  Enter or click: expand / collapse",
        "  Space or click [ ]: mark done / pending",
        "  e or right click: edit",
        "  a or Add Todo: add",
        "  Esc, Backspace, b or ← Back: dashboard",
        "Edit Dialog",
        "  Tab / Shift+Tab: move between fields",
        "  Ctrl+U or click [x]: clear a text field",
        "  1/2/3 or ←/→: priority",
        "  Enter on Deadline: pick a date",
        "  Ctrl+S: save   Esc: cancel",
        "General",
        "  ?: toggle help",
        "  q or Ctrl+C: quit",
    ]
    .join("\n");

    frame.render_widget(Paragraph::new(text), inner);
    area
}

/// Last characters of `value` that fit into `width` cells.
fn visible_tail(value: &str, width: usize) -> String {
    let count = value.chars().count();
    if count <= width {
        return value.to_string();
    }
    value.chars().skip(count - width).collect()
}

fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

fn centered_area(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
