//! HTTP client for the task manager backend.
//!
//! Every operation maps to one REST call. Any non-2xx status is treated
//! uniformly as a failure; the response body of a failed call is never
//! parsed. Requests carry no client-side timeout and are never retried.

use reqwest::StatusCode;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::task::{Task, TaskInput, TaskStats};

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can come out of a backend call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a usable response: connection refused,
    /// DNS failure, or a body that was not the JSON we expected.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a status outside the success range.
    #[error("server returned {status}")]
    Http { status: StatusCode },

    /// The endpoint path could not be joined onto the base URL.
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Client for the task CRUD endpoints.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /tasks` — the full task list, in backend order.
    pub async fn list_tasks(&self) -> Result<Vec<Task>> {
        let url = self.endpoint("/tasks")?;
        debug!(%url, "listing tasks");
        let response = self.http.get(url).send().await?;
        let tasks = check_status(response)?.json().await?;
        Ok(tasks)
    }

    /// `GET /tasks/{id}` — a single task snapshot.
    pub async fn get_task(&self, id: u64) -> Result<Task> {
        let url = self.endpoint(&format!("/tasks/{id}"))?;
        debug!(%url, "fetching task");
        let response = self.http.get(url).send().await?;
        let task = check_status(response)?.json().await?;
        Ok(task)
    }

    /// `POST /tasks` — create a task; the backend assigns the id.
    pub async fn create_task(&self, input: &TaskInput) -> Result<Task> {
        let url = self.endpoint("/tasks")?;
        debug!(%url, title = %input.title, "creating task");
        let response = self.http.post(url).json(input).send().await?;
        let task = check_status(response)?.json().await?;
        Ok(task)
    }

    /// `PUT /tasks/{id}` — full replace of title/description/status.
    pub async fn update_task(&self, id: u64, input: &TaskInput) -> Result<Task> {
        let url = self.endpoint(&format!("/tasks/{id}"))?;
        debug!(%url, "updating task");
        let response = self.http.put(url).json(input).send().await?;
        let task = check_status(response)?.json().await?;
        Ok(task)
    }

    /// `DELETE /tasks/{id}` — the response body is ignored.
    pub async fn delete_task(&self, id: u64) -> Result<()> {
        let url = self.endpoint(&format!("/tasks/{id}"))?;
        debug!(%url, "deleting task");
        let response = self.http.delete(url).send().await?;
        check_status(response)?;
        Ok(())
    }

    /// `GET /tasks/stats` — aggregate counts per status.
    pub async fn stats(&self) -> Result<TaskStats> {
        let url = self.endpoint("/tasks/stats")?;
        debug!(%url, "fetching stats");
        let response = self.http.get(url).send().await?;
        let stats = check_status(response)?.json().await?;
        Ok(stats)
    }

    /// `GET /` — whether the backend answers at all. Used once at startup
    /// for a log line; failures here are not surfaced to the user.
    pub async fn health_check(&self) -> Result<bool> {
        let url = self.endpoint("/")?;
        let response = self.http.get(url).send().await?;
        Ok(response.status().is_success())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }
}

fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Http { status })
    }
}
