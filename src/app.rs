//! UI controller: all client-side state and its transitions.
//!
//! `App` owns the last task-list snapshot received from the server, the
//! banner pair, the overlay state, and the form contents. It performs no
//! I/O: key events come in through [`App::on_key`], network results through
//! [`App::on_api`], and both may hand back an [`Action`] for the caller to
//! run against the backend. Every mutation is followed by a full-list
//! refetch rather than a local patch.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, error, info};

use crate::api::ApiError;
use crate::task::{Task, TaskInput, TaskStats, TaskStatus};

/// How long an error banner stays on screen.
pub const ERROR_BANNER_TTL: Duration = Duration::from_secs(5);
/// How long a success banner stays on screen.
pub const SUCCESS_BANNER_TTL: Duration = Duration::from_secs(3);

const REQUIRED_FIELDS_MESSAGE: &str = "Title and description are required.";

/// A request the controller wants issued against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    LoadTasks,
    FetchTask(u64),
    CreateTask(TaskInput),
    UpdateTask { id: u64, input: TaskInput },
    DeleteTask(u64),
    LoadStats,
}

/// The outcome of a backend call, delivered back to the controller.
#[derive(Debug)]
pub enum ApiEvent {
    TasksLoaded(Result<Vec<Task>, ApiError>),
    TaskFetched(Result<Task, ApiError>),
    TaskCreated(Result<Task, ApiError>),
    TaskUpdated(Result<Task, ApiError>),
    TaskDeleted { id: u64, result: Result<(), ApiError> },
    StatsLoaded(Result<TaskStats, ApiError>),
}

/// A transient, self-expiring notification.
#[derive(Debug, Clone)]
pub struct Banner {
    message: String,
    expires_at: Instant,
}

impl Banner {
    fn new(message: impl Into<String>, now: Instant, ttl: Duration) -> Self {
        Self {
            message: message.into(),
            expires_at: now + ttl,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    fn expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Single-line text input with a cursor, indexed in characters.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Input {
    value: String,
    cursor: usize,
}

impl Input {
    pub fn with_value(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            cursor: value.chars().count(),
            value,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_index();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.value.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.value.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }
}

/// Which form field currently receives keystrokes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Title,
    Description,
    Status,
}

impl FormField {
    fn next(self) -> Self {
        match self {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Status,
            FormField::Status => FormField::Title,
        }
    }

    fn prev(self) -> Self {
        match self {
            FormField::Title => FormField::Status,
            FormField::Description => FormField::Title,
            FormField::Status => FormField::Description,
        }
    }
}

/// Shared shape of the add-task pane and the edit modal.
#[derive(Debug, Default, Clone)]
pub struct TaskForm {
    pub title: Input,
    pub description: Input,
    pub status: TaskStatus,
    pub focus: FormField,
}

impl TaskForm {
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: Input::with_value(task.title.clone()),
            description: Input::with_value(task.description.clone()),
            status: task.status,
            focus: FormField::Title,
        }
    }

    pub fn input(&self) -> TaskInput {
        TaskInput {
            title: self.title.value().to_string(),
            description: self.description.value().to_string(),
            status: self.status,
        }
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.status = TaskStatus::default();
        self.focus = FormField::Title;
    }

    fn on_key(&mut self, key: &KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Char(c) => match self.focus {
                FormField::Title => self.title.insert(c),
                FormField::Description => self.description.insert(c),
                FormField::Status => {
                    if c == ' ' {
                        self.status = self.status.next();
                    }
                }
            },
            KeyCode::Backspace => match self.focus {
                FormField::Title => self.title.backspace(),
                FormField::Description => self.description.backspace(),
                FormField::Status => {}
            },
            KeyCode::Left => match self.focus {
                FormField::Title => self.title.move_left(),
                FormField::Description => self.description.move_left(),
                FormField::Status => self.status = self.status.prev(),
            },
            KeyCode::Right => match self.focus {
                FormField::Title => self.title.move_right(),
                FormField::Description => self.description.move_right(),
                FormField::Status => self.status = self.status.next(),
            },
            _ => {}
        }
    }
}

/// Overlay over the main screen. Only one can be open at a time.
#[derive(Debug)]
pub enum Modal {
    Closed,
    Edit { id: u64, form: TaskForm },
    ConfirmDelete { id: u64, title: String },
    Stats(TaskStats),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }
}

/// Which pane receives keys when no overlay is open.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    #[default]
    List,
    Form,
}

#[derive(Debug)]
pub struct App {
    pub tasks: Vec<Task>,
    pub selected: usize,
    /// True from the moment a List request is issued until it succeeds.
    /// A failed List leaves it set so the loading placeholder stays up.
    pub loading: bool,
    pub focus: Focus,
    pub create_form: TaskForm,
    pub modal: Modal,
    pub error_banner: Option<Banner>,
    pub success_banner: Option<Banner>,
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// A fresh controller, already in loading state: the caller is expected
    /// to issue the initial [`Action::LoadTasks`].
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            selected: 0,
            loading: true,
            focus: Focus::List,
            create_form: TaskForm::default(),
            modal: Modal::Closed,
            error_banner: None,
            success_banner: None,
            should_quit: false,
        }
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.tasks.get(self.selected)
    }

    /// Drop banners whose TTL has elapsed.
    pub fn tick(&mut self, now: Instant) {
        if self.error_banner.as_ref().is_some_and(|b| b.expired(now)) {
            self.error_banner = None;
        }
        if self.success_banner.as_ref().is_some_and(|b| b.expired(now)) {
            self.success_banner = None;
        }
    }

    pub fn on_key(&mut self, key: KeyEvent, now: Instant) -> Option<Action> {
        match &mut self.modal {
            Modal::Edit { id, form } => match key.code {
                KeyCode::Esc => {
                    self.modal = Modal::Closed;
                    None
                }
                KeyCode::Enter => {
                    let id = *id;
                    let input = form.input();
                    if !required_fields_present(&input) {
                        self.show_error(REQUIRED_FIELDS_MESSAGE, now);
                        return None;
                    }
                    Some(Action::UpdateTask { id, input })
                }
                _ => {
                    form.on_key(&key);
                    None
                }
            },
            Modal::ConfirmDelete { id, .. } => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let id = *id;
                    self.modal = Modal::Closed;
                    Some(Action::DeleteTask(id))
                }
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.modal = Modal::Closed;
                    None
                }
                _ => None,
            },
            Modal::Stats(_) => {
                self.modal = Modal::Closed;
                None
            }
            Modal::Closed => match self.focus {
                Focus::List => self.on_list_key(key),
                Focus::Form => self.on_form_key(key, now),
            },
        }
    }

    fn on_list_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                None
            }
            KeyCode::Char('r') => self.refresh(),
            KeyCode::Char('s') => Some(Action::LoadStats),
            KeyCode::Tab => {
                self.focus = Focus::Form;
                None
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            KeyCode::Down => {
                if self.selected + 1 < self.tasks.len() {
                    self.selected += 1;
                }
                None
            }
            KeyCode::Enter | KeyCode::Char('e') => {
                self.selected_task().map(|task| Action::FetchTask(task.id))
            }
            KeyCode::Char('d') => {
                if let Some((id, title)) = self
                    .selected_task()
                    .map(|task| (task.id, task.title.clone()))
                {
                    self.modal = Modal::ConfirmDelete { id, title };
                }
                None
            }
            _ => None,
        }
    }

    fn on_form_key(&mut self, key: KeyEvent, now: Instant) -> Option<Action> {
        match key.code {
            KeyCode::Esc => {
                self.focus = Focus::List;
                None
            }
            KeyCode::Enter => {
                let input = self.create_form.input();
                if !required_fields_present(&input) {
                    self.show_error(REQUIRED_FIELDS_MESSAGE, now);
                    return None;
                }
                Some(Action::CreateTask(input))
            }
            _ => {
                self.create_form.on_key(&key);
                None
            }
        }
    }

    pub fn on_api(&mut self, event: ApiEvent, now: Instant) -> Option<Action> {
        match event {
            ApiEvent::TasksLoaded(Ok(tasks)) => {
                debug!(count = tasks.len(), "task list loaded");
                self.tasks = tasks;
                self.loading = false;
                if self.selected >= self.tasks.len() {
                    self.selected = self.tasks.len().saturating_sub(1);
                }
                None
            }
            ApiEvent::TasksLoaded(Err(err)) => {
                error!(error = %err, "failed to load tasks");
                self.show_error(
                    "Failed to load tasks. Make sure the backend server is running.",
                    now,
                );
                None
            }
            ApiEvent::TaskFetched(Ok(task)) => {
                self.modal = Modal::Edit {
                    id: task.id,
                    form: TaskForm::from_task(&task),
                };
                None
            }
            ApiEvent::TaskFetched(Err(err)) => {
                error!(error = %err, "failed to load task for editing");
                self.show_error("Failed to load task details.", now);
                None
            }
            ApiEvent::TaskCreated(Ok(task)) => {
                info!(id = task.id, "task created");
                self.show_success("Task added successfully!", now);
                self.create_form.clear();
                self.refresh()
            }
            ApiEvent::TaskCreated(Err(err)) => {
                error!(error = %err, "failed to add task");
                self.show_error("Failed to add task. Please try again.", now);
                None
            }
            ApiEvent::TaskUpdated(Ok(task)) => {
                info!(id = task.id, "task updated");
                self.show_success("Task updated successfully!", now);
                self.modal = Modal::Closed;
                self.refresh()
            }
            ApiEvent::TaskUpdated(Err(err)) => {
                // Modal stays open so the user keeps their edits.
                error!(error = %err, "failed to update task");
                self.show_error("Failed to update task. Please try again.", now);
                None
            }
            ApiEvent::TaskDeleted { id, result: Ok(()) } => {
                info!(id, "task deleted");
                self.show_success("Task deleted successfully!", now);
                self.refresh()
            }
            ApiEvent::TaskDeleted {
                result: Err(err), ..
            } => {
                error!(error = %err, "failed to delete task");
                self.show_error("Failed to delete task. Please try again.", now);
                None
            }
            ApiEvent::StatsLoaded(Ok(stats)) => {
                self.modal = Modal::Stats(stats);
                None
            }
            ApiEvent::StatsLoaded(Err(err)) => {
                error!(error = %err, "failed to load stats");
                self.show_error("Failed to load task statistics.", now);
                None
            }
        }
    }

    /// Discard the current snapshot and ask for a fresh list. The list pane
    /// shows the loading placeholder until the response lands.
    fn refresh(&mut self) -> Option<Action> {
        self.loading = true;
        self.tasks.clear();
        self.selected = 0;
        Some(Action::LoadTasks)
    }

    /// Showing a banner replaces any previous banner of the same kind.
    fn show_error(&mut self, message: impl Into<String>, now: Instant) {
        self.error_banner = Some(Banner::new(message, now, ERROR_BANNER_TTL));
    }

    fn show_success(&mut self, message: impl Into<String>, now: Instant) {
        self.success_banner = Some(Banner::new(message, now, SUCCESS_BANNER_TTL));
    }
}

fn required_fields_present(input: &TaskInput) -> bool {
    !input.title.trim().is_empty() && !input.description.trim().is_empty()
}
