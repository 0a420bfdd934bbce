use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
    Frame, Terminal,
};
use std::io;

use crate::app::{App, AppEvent};
use crate::editor::EditorState;
use crate::filter::Criterion;
use crate::storage::Storage;
use crate::task::{Priority, Status, Task};

/// Which panel receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Form,
}

/// The four form fields, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Description,
    Priority,
    Status,
}

impl Field {
    const ALL: [Field; 4] = [
        Field::Title,
        Field::Description,
        Field::Priority,
        Field::Status,
    ];

    fn next(self) -> Self {
        let i = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(i + 1) % Field::ALL.len()]
    }

    fn prev(self) -> Self {
        let i = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(i + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

/// Presentation-only state; everything that matters lives in [`App`].
struct UiState {
    focus: Focus,
    field: Field,
    selected: usize,
}

pub fn run_app<B: Backend, S: Storage>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    let mut ui = UiState {
        focus: Focus::List,
        field: Field::Title,
        selected: 0,
    };

    loop {
        let visible_len = app.visible_tasks().len();
        ui.selected = ui.selected.min(visible_len.saturating_sub(1));

        terminal.draw(|f| draw(f, app, &ui))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match ui.focus {
            Focus::List => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('n') | KeyCode::Tab => {
                    ui.focus = Focus::Form;
                    ui.field = Field::Title;
                }
                KeyCode::Char('e') => {
                    if let Some(id) = selected_id(app, &ui) {
                        app.apply(AppEvent::EditTask(id));
                        ui.focus = Focus::Form;
                        ui.field = Field::Title;
                    }
                }
                KeyCode::Char('d') => {
                    if let Some(id) = selected_id(app, &ui) {
                        app.apply(AppEvent::DeleteTask(id));
                    }
                }
                KeyCode::Char('s') => {
                    if let Some(id) = selected_id(app, &ui) {
                        if let Some(status) = app.store().get(id).map(|t| t.status.cycle()) {
                            app.apply(AppEvent::SetStatus(id, status));
                        }
                    }
                }
                KeyCode::Left => {
                    let i = criterion_index(app.filter);
                    let i = (i + Criterion::ALL.len() - 1) % Criterion::ALL.len();
                    app.apply(AppEvent::SetFilter(Criterion::ALL[i]));
                }
                KeyCode::Right => {
                    let i = (criterion_index(app.filter) + 1) % Criterion::ALL.len();
                    app.apply(AppEvent::SetFilter(Criterion::ALL[i]));
                }
                KeyCode::Char(c @ '1'..='7') => {
                    let i = c as usize - '1' as usize;
                    app.apply(AppEvent::SetFilter(Criterion::ALL[i]));
                }
                KeyCode::Up => {
                    ui.selected = ui.selected.saturating_sub(1);
                }
                KeyCode::Down => {
                    if ui.selected + 1 < visible_len {
                        ui.selected += 1;
                    }
                }
                _ => {}
            },
            Focus::Form => match key.code {
                KeyCode::Esc => {
                    app.apply(AppEvent::CancelEdit);
                    ui.focus = Focus::List;
                }
                KeyCode::Enter => {
                    let was_editing = app.editor.is_editing();
                    app.apply(AppEvent::Submit);
                    if was_editing && !app.editor.is_editing() {
                        ui.focus = Focus::List;
                    }
                }
                KeyCode::Tab | KeyCode::Down => ui.field = ui.field.next(),
                KeyCode::BackTab | KeyCode::Up => ui.field = ui.field.prev(),
                KeyCode::Left | KeyCode::Right | KeyCode::Char(' ')
                    if matches!(ui.field, Field::Priority | Field::Status) =>
                {
                    match ui.field {
                        Field::Priority => app.editor.cycle_priority(),
                        Field::Status => app.editor.cycle_status(),
                        _ => {}
                    }
                }
                KeyCode::Char(c) => match ui.field {
                    Field::Title => app.editor.title_mut().push(c),
                    Field::Description => app.editor.description_mut().push(c),
                    _ => {}
                },
                KeyCode::Backspace => match ui.field {
                    Field::Title => {
                        app.editor.title_mut().pop();
                    }
                    Field::Description => {
                        app.editor.description_mut().pop();
                    }
                    _ => {}
                },
                _ => {}
            },
        }
    }
}

fn selected_id<S: Storage>(app: &App<S>, ui: &UiState) -> Option<i64> {
    app.visible_tasks().get(ui.selected).map(|t| t.id)
}

fn criterion_index(criterion: Criterion) -> usize {
    Criterion::ALL
        .iter()
        .position(|c| *c == criterion)
        .unwrap_or(0)
}

fn draw<S: Storage>(f: &mut Frame, app: &App<S>, ui: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_form(f, app, ui, chunks[0]);
    draw_filter_bar(f, app, chunks[1]);
    draw_task_list(f, app, ui, chunks[2]);
    draw_help(f, ui, chunks[3]);
}

fn draw_form<S: Storage>(f: &mut Frame, app: &App<S>, ui: &UiState, area: Rect) {
    let title = match &app.editor {
        EditorState::Creating(_) => "New task",
        EditorState::Editing(_) => "Edit task",
    };

    let field_line = |field: Field, name: &str, value: String| {
        let active = ui.focus == Focus::Form && ui.field == field;
        let marker = if active { "> " } else { "  " };
        let style = if active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Line::from(vec![
            Span::raw(marker),
            Span::styled(format!("{name}: "), Style::default().fg(Color::DarkGray)),
            Span::styled(value, style),
        ])
    };

    let lines = vec![
        field_line(Field::Title, "Title", app.editor.title().to_string()),
        field_line(
            Field::Description,
            "Description",
            app.editor.description().to_string(),
        ),
        field_line(
            Field::Priority,
            "Priority",
            app.editor.priority().label().to_string(),
        ),
        field_line(
            Field::Status,
            "Status",
            app.editor.status().label().to_string(),
        ),
    ];

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if ui.focus == Focus::Form {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_filter_bar<S: Storage>(f: &mut Frame, app: &App<S>, area: Rect) {
    let titles: Vec<Line> = Criterion::ALL
        .iter()
        .enumerate()
        .map(|(i, c)| Line::from(format!("{} {}", i + 1, c.label())))
        .collect();
    let tabs = Tabs::new(titles)
        .block(Block::default().title("Filter").borders(Borders::ALL))
        .select(criterion_index(app.filter))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    f.render_widget(tabs, area);
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Green,
        Priority::Medium => Color::Yellow,
        Priority::High => Color::Red,
    }
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Todo => Color::White,
        Status::InProgress => Color::Cyan,
        Status::Done => Color::DarkGray,
    }
}

fn task_line(task: &Task) -> Line<'_> {
    let mut spans = vec![
        Span::styled(
            format!("[{}] ", task.priority.label()),
            Style::default().fg(priority_color(task.priority)),
        ),
        Span::styled(&task.title, Style::default().fg(status_color(task.status))),
    ];
    if !task.description.is_empty() {
        spans.push(Span::styled(
            format!(" - {}", task.description),
            Style::default().fg(Color::DarkGray),
        ));
    }
    spans.push(Span::styled(
        format!(
            " ({}, {})",
            task.status.label(),
            task.created_at.format("%Y-%m-%d")
        ),
        Style::default().fg(Color::DarkGray),
    ));
    Line::from(spans)
}

fn draw_task_list<S: Storage>(f: &mut Frame, app: &App<S>, ui: &UiState, area: Rect) {
    let visible = app.visible_tasks();
    let items: Vec<ListItem> = visible.iter().map(|t| ListItem::new(task_line(t))).collect();

    let block = Block::default()
        .title(format!("Tasks ({})", visible.len()))
        .borders(Borders::ALL)
        .border_style(if ui.focus == Focus::List {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    if visible.is_empty() {
        f.render_widget(Paragraph::new("No tasks found").block(block), area);
        return;
    }

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(ui.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_help(f: &mut Frame, ui: &UiState, area: Rect) {
    let text = match ui.focus {
        Focus::List => {
            "q quit | n new | e edit | d delete | s status | Left/Right or 1-7 filter | Up/Down select"
        }
        Focus::Form => "Enter save | Esc cancel | Tab next field | Space cycle priority/status",
    };
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}
