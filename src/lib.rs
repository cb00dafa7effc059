//! taskdeck - terminal client for the task manager REST API.
//!
//! The backend owns every task; this client fetches, renders, and mutates
//! through the CRUD endpoints and re-fetches the full list after every
//! successful mutation.

/// HTTP client for the backend CRUD endpoints
pub mod api;
/// UI controller: state, key handling, banner and modal lifecycle
pub mod app;
/// Domain model shared with the backend
pub mod task;
/// ratatui rendering
pub mod ui;

pub use api::{ApiClient, ApiError};
pub use app::{Action, ApiEvent, App};
pub use task::{Task, TaskInput, TaskStats, TaskStatus};
