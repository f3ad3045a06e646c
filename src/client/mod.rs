//! Client side of the task API.
//!
//! [`TaskClient`] speaks HTTP; [`TaskBoard`] and [`TaskForm`] hold the state a
//! front end works with; [`Notifications`] is the session's toast queue.

mod board;
mod form;
mod notify;

pub use board::{Confirm, DeleteOutcome, PendingEdit, StatusEdit, TaskBoard, DELETE_PROMPT};
pub use form::{Flash, Navigation, TaskForm};
pub use notify::{Notification, NotificationKind, Notifications, DEFAULT_DURATION};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::Envelope;
use crate::task::{ObjectId, Task, TaskPayload, TaskStatus};
use crate::util::truncate_chars;

/// Characters of an unparsable body kept in the error message.
const SNIPPET_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error envelope.
    #[error("{0}")]
    Api(String),

    /// The body was not a JSON envelope.
    #[error("Unexpected response (HTTP {status}): {snippet}")]
    UnexpectedResponse { status: u16, snippet: String },

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct TaskClient {
    base_url: String,
    client: reqwest::Client,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn tasks_url(&self) -> String {
        format!("{}/api/tasks", self.base_url)
    }

    fn task_url(&self, id: &str) -> String {
        format!("{}/api/tasks/{}", self.base_url, id)
    }

    /// Send a request and unwrap the envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Envelope<T>, ClientError> {
        let resp = request.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        let envelope: Envelope<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::debug!("Unparsable response body ({}): {}", status, e);
                return Err(ClientError::UnexpectedResponse {
                    status: status.as_u16(),
                    snippet: truncate_chars(&text, SNIPPET_CHARS),
                });
            }
        };

        if !status.is_success() || !envelope.success {
            return Err(ClientError::Api(envelope.error.unwrap_or_else(|| {
                format!("Request failed with HTTP {}", status.as_u16())
            })));
        }
        Ok(envelope)
    }

    async fn send_task(&self, request: reqwest::RequestBuilder) -> Result<Task, ClientError> {
        self.send::<Task>(request)
            .await?
            .data
            .ok_or_else(|| ClientError::Api("Response did not include the task".to_string()))
    }

    pub async fn list(&self) -> Result<Vec<Task>, ClientError> {
        let envelope = self.send::<Vec<Task>>(self.client.get(self.tasks_url())).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    pub async fn get(&self, id: &str) -> Result<Task, ClientError> {
        self.send_task(self.client.get(self.task_url(id))).await
    }

    pub async fn create(&self, payload: &TaskPayload) -> Result<Task, ClientError> {
        self.send_task(self.client.post(self.tasks_url()).json(payload))
            .await
    }

    pub async fn update(&self, id: &str, payload: &TaskPayload) -> Result<Task, ClientError> {
        self.send_task(self.client.put(self.task_url(id)).json(payload))
            .await
    }

    /// Status-only update.
    pub async fn update_status(&self, id: ObjectId, status: TaskStatus) -> Result<Task, ClientError> {
        self.update(&id.to_string(), &TaskPayload::status_only(status))
            .await
    }

    /// Delete a task, returning the server's confirmation message.
    pub async fn delete(&self, id: &str) -> Result<String, ClientError> {
        let envelope = self.send::<serde_json::Value>(self.client.delete(self.task_url(id))).await?;
        Ok(envelope
            .message
            .unwrap_or_else(|| "Task deleted successfully".to_string()))
    }
}
