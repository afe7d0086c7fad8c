//! Board rendering: task table, forms, status bar

use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState},
};

use super::app::{App, FormField, InputMode, TaskForm};
use crate::cli::output::truncate_str;
use crate::domain::display_date;

/// Costs at or above this stand out in the table
const HIGHLIGHT_COST: f64 = 1000.0;

/// Draw the board layout
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Task table
            Constraint::Length(3), // Status bar
        ])
        .split(area);

    draw_table(frame, app, chunks[0]);
    draw_status_bar(frame, app, chunks[1]);

    if let InputMode::Form(form) = app.input_mode() {
        draw_form(frame, form, area);
    }
}

fn draw_table(frame: &mut Frame, app: &App, area: Rect) {
    if !app.is_loaded() {
        let loading = Paragraph::new("Loading tasks...")
            .alignment(Alignment::Center)
            .block(Block::default().title("Tasks").borders(Borders::ALL));
        frame.render_widget(loading, area);
        return;
    }

    let grabbed = app.grabbed();
    let rows: Vec<Row> = app
        .tasks()
        .iter()
        .enumerate()
        .map(|(index, task)| {
            let marker = if grabbed == Some(index) { "*" } else { " " };
            let row = Row::new(vec![
                format!("{}{}", marker, task.order),
                truncate_str(&task.name, 32),
                format!("{:.2}", task.cost),
                display_date(task.due_date),
            ]);
            if task.cost >= HIGHLIGHT_COST {
                row.style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
            } else {
                row
            }
        })
        .collect();

    let title = format!("Tasks ({})", app.tasks().len());
    let table = Table::new(
        rows,
        [
            Constraint::Length(5),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(
        Row::new(vec!["#", "Name", "Cost", "Due"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().title(title).borders(Borders::ALL))
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

    let mut state = TableState::default();
    if !app.tasks().is_empty() {
        state.select(Some(app.selected()));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let (content, style) = match app.input_mode() {
        InputMode::Normal => {
            let msg = app.status_message().unwrap_or(
                "[space]grab [n]ew [e]dit [d]elete [r]efresh [q]uit [?]help",
            );
            (msg.to_string(), Style::default())
        }
        InputMode::Grab => {
            let name = app
                .grabbed()
                .and_then(|index| app.tasks().get(index))
                .map(|t| t.name.as_str())
                .unwrap_or("task");
            (
                format!("Moving '{}' - j/k position, space drop, esc cancel", name),
                Style::default().fg(Color::Cyan),
            )
        }
        InputMode::Form(form) => (
            app.status_message()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{} - tab next field, enter save, esc cancel", form.title())),
            Style::default().fg(Color::Green),
        ),
        InputMode::ConfirmDelete(id) => {
            let name = app
                .tasks()
                .iter()
                .find(|t| t.id == *id)
                .map(|t| t.name.as_str())
                .unwrap_or("task");
            (
                format!("Delete '{}'? [y/n]", name),
                Style::default().fg(Color::Yellow),
            )
        }
    };

    let sync = if app.is_syncing() { " [syncing]" } else { "" };
    let status_text = format!("Roster{} {}", sync, content);

    let paragraph = Paragraph::new(status_text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

fn draw_form(frame: &mut Frame, form: &TaskForm, area: Rect) {
    let popup = centered_rect(52, 9, area);
    frame.render_widget(Clear, popup);

    let line = |label: &str, value: &str, focused: bool| -> Line<'static> {
        let text = if focused {
            format!("{:<6} {}_", label, value)
        } else {
            format!("{:<6} {}", label, value)
        };
        if focused {
            Line::styled(text, Style::default().fg(Color::Yellow))
        } else {
            Line::raw(text)
        }
    };

    let lines = vec![
        line("Name:", &form.name, form.focus == FormField::Name),
        line("Cost:", &form.cost, form.focus == FormField::Cost),
        line("Due:", &form.due, form.focus == FormField::Due),
        Line::raw(""),
        Line::styled(
            "enter: save   esc: cancel",
            Style::default().fg(Color::DarkGray),
        ),
    ];

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title(form.title()).borders(Borders::ALL));

    frame.render_widget(paragraph, popup);
}

/// A fixed-size rect centered in `area`, clamped to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
