//! Rendering. All user-supplied text goes through `Span::raw`, which
//! ratatui draws as literal cells; there is no markup channel for task
//! titles or descriptions to inject into.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, Focus, FormField, Modal, TaskForm};
use crate::task::{Task, TaskStats, TaskStatus};

pub fn draw(f: &mut Frame, app: &App) {
    let mut constraints = Vec::new();
    if app.error_banner.is_some() {
        constraints.push(Constraint::Length(1));
    }
    if app.success_banner.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(f.area());

    let mut row = 0;
    if let Some(banner) = &app.error_banner {
        let style = Style::default().fg(Color::White).bg(Color::Red);
        f.render_widget(Paragraph::new(banner.message()).style(style), rows[row]);
        row += 1;
    }
    if let Some(banner) = &app.success_banner {
        let style = Style::default().fg(Color::Black).bg(Color::Green);
        f.render_widget(Paragraph::new(banner.message()).style(style), rows[row]);
        row += 1;
    }

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(rows[row]);

    draw_task_list(f, app, panes[0]);
    draw_create_form(f, app, panes[1]);
    draw_footer(f, rows[row + 1]);

    match &app.modal {
        Modal::Closed => {}
        Modal::Edit { form, .. } => draw_edit_modal(f, form),
        Modal::ConfirmDelete { title, .. } => draw_confirm_dialog(f, title),
        Modal::Stats(stats) => draw_stats_overlay(f, stats),
    }
}

fn draw_task_list(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title("Tasks")
        .borders(Borders::ALL)
        .border_style(if app.focus == Focus::List && !app.modal.is_open() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });

    if app.loading {
        let placeholder = Paragraph::new("Loading tasks...").block(block);
        f.render_widget(placeholder, area);
        return;
    }
    if app.tasks.is_empty() {
        let placeholder = Paragraph::new("No tasks found. Add your first task!").block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let items: Vec<ListItem> = app.tasks.iter().map(task_card).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));
    let mut state = ListState::default().with_selected(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

/// One card per task: title, status badge, description, created date.
fn task_card(task: &Task) -> ListItem<'_> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                task.title.as_str(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(format!("[{}]", task.status), badge_style(task.status)),
        ]),
        Line::from(Span::styled(
            task.description.as_str(),
            Style::default().fg(Color::Gray),
        )),
    ];
    if let Some(date) = task.created_date() {
        lines.push(Line::from(Span::styled(
            format!("created {date}"),
            Style::default().fg(Color::DarkGray),
        )));
    }
    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn badge_style(status: TaskStatus) -> Style {
    let color = match status {
        TaskStatus::Pending => Color::Yellow,
        TaskStatus::InProgress => Color::Cyan,
        TaskStatus::Completed => Color::Green,
    };
    Style::default().fg(color)
}

fn draw_create_form(f: &mut Frame, app: &App, area: Rect) {
    let active = app.focus == Focus::Form && !app.modal.is_open();
    let block = Block::default()
        .title("Add Task")
        .borders(Borders::ALL)
        .border_style(if active {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        });
    let inner = block.inner(area);
    f.render_widget(block, area);
    draw_form_fields(f, &app.create_form, active, inner);
}

fn draw_form_fields(f: &mut Frame, form: &TaskForm, active: bool, area: Rect) {
    let fields = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    draw_text_field(
        f,
        "Title",
        form.title.value(),
        active && form.focus == FormField::Title,
        fields[0],
    );
    draw_text_field(
        f,
        "Description",
        form.description.value(),
        active && form.focus == FormField::Description,
        fields[1],
    );
    draw_text_field(
        f,
        "Status",
        &format!("< {} >", form.status),
        active && form.focus == FormField::Status,
        fields[2],
    );

    let hint = Paragraph::new("tab next field · enter submit · esc back")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, fields[3]);
}

fn draw_text_field(f: &mut Frame, label: &str, value: &str, focused: bool, area: Rect) {
    let field = Paragraph::new(Span::raw(value)).block(
        Block::default()
            .title(label)
            .borders(Borders::ALL)
            .border_style(if focused {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
            }),
    );
    f.render_widget(field, area);
}

fn draw_edit_modal(f: &mut Frame, form: &TaskForm) {
    let area = centered_rect(60, 70, f.area());
    f.render_widget(Clear, area);
    let block = Block::default().title("Edit Task").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);
    draw_form_fields(f, form, true, inner);
}

fn draw_confirm_dialog(f: &mut Frame, title: &str) {
    let area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, area);
    let block = Block::default().title("Delete Task").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = vec![
        Line::from("Are you sure you want to delete this task?"),
        Line::from(Span::styled(title, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled(
            "[y] delete    [n] cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
}

fn draw_stats_overlay(f: &mut Frame, stats: &TaskStats) {
    let area = centered_rect(50, 40, f.area());
    f.render_widget(Clear, area);
    let block = Block::default().title("Statistics").borders(Borders::ALL);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = vec![
        Line::from(format!("Total:       {}", stats.total_tasks)),
        Line::from(format!("Pending:     {}", stats.pending_tasks)),
        Line::from(format!("In progress: {}", stats.in_progress_tasks)),
        Line::from(format!("Completed:   {}", stats.completed_tasks)),
        Line::from(format!("Completion:  {:.1}%", stats.completion_rate)),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to close",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    f.render_widget(Paragraph::new(text), inner);
}

fn draw_footer(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(
        "q quit · r refresh · ↑/↓ select · enter edit · d delete · s stats · tab add task",
    )
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
