//! Create/edit flow.

use chrono::{DateTime, Utc};

use super::{ClientError, TaskClient};
use crate::task::{format_timestamp, parse_due_date, Task, TaskPayload, TaskStatus};

/// One-shot success signal handed from the form to the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flash {
    Created,
    Updated,
}

impl Flash {
    pub fn message(self) -> &'static str {
        match self {
            Self::Created => "Task created successfully!",
            Self::Updated => "Task updated successfully!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Back to the list, carrying the success signal.
    ToList(Flash),
    /// Stay on the form; `error` says why.
    Stay,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    /// Id of the task being edited; `None` when creating.
    target: Option<String>,
    /// Due instant as loaded, sent back unchanged while `due_date` still
    /// shows its day.
    loaded_due: Option<DateTime<Utc>>,
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`
    pub due_date: String,
    pub status: TaskStatus,
    pub error: Option<String>,
}

impl TaskForm {
    /// Empty form for a new task.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filled-in form for a new task.
    pub fn create(
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: impl Into<String>,
        status: TaskStatus,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            due_date: due_date.into(),
            status,
            ..Self::default()
        }
    }

    /// Form prefilled from the server copy of `id`.
    pub async fn load(client: &TaskClient, id: &str) -> Result<Self, ClientError> {
        let task = client.get(id).await?;
        Ok(Self::from_task(&task))
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            target: Some(task.id.to_string()),
            loaded_due: Some(task.due_date),
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task.due_date.format("%Y-%m-%d").to_string(),
            status: task.status,
            error: None,
        }
    }

    pub fn is_edit(&self) -> bool {
        self.target.is_some()
    }

    fn payload(&self) -> TaskPayload {
        // Plain dates go out as midnight UTC; anything else is left for the
        // server to judge.
        let due_date = match self.loaded_due {
            Some(loaded) if loaded.format("%Y-%m-%d").to_string() == self.due_date.trim() => {
                format_timestamp(&loaded)
            }
            _ => parse_due_date(&self.due_date)
                .map(|date| format_timestamp(&date))
                .unwrap_or_else(|| self.due_date.clone()),
        };
        TaskPayload {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            due_date: Some(due_date),
            status: Some(self.status.as_str().to_string()),
        }
    }

    /// Create or update. Nothing is sent unless every field is filled in.
    pub async fn submit(&mut self, client: &TaskClient) -> Navigation {
        if self.title.trim().is_empty()
            || self.description.trim().is_empty()
            || self.due_date.trim().is_empty()
        {
            self.error = Some("All fields are required.".to_string());
            return Navigation::Stay;
        }

        let payload = self.payload();
        let result = match &self.target {
            Some(id) => client.update(id, &payload).await.map(|_| Flash::Updated),
            None => client.create(&payload).await.map(|_| Flash::Created),
        };

        match result {
            Ok(flash) => {
                self.error = None;
                Navigation::ToList(flash)
            }
            Err(e) => {
                tracing::warn!("Failed to save task: {}", e);
                self.error = Some(e.to_string());
                Navigation::Stay
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::spawn_api;
    use super::*;

    fn filled() -> TaskForm {
        TaskForm::create(
            "Renew passport",
            "Photos and form",
            "2025-09-30",
            TaskStatus::Pending,
        )
    }

    #[tokio::test]
    async fn test_create_navigates_with_flash() {
        let client = TaskClient::new(spawn_api().await);
        let mut form = filled();

        assert_eq!(
            form.submit(&client).await,
            Navigation::ToList(Flash::Created)
        );
        assert!(form.error.is_none());

        let tasks = client.list().await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Renew passport");
        assert_eq!(
            format_timestamp(&tasks[0].due_date),
            "2025-09-30T00:00:00.000Z"
        );
    }

    #[tokio::test]
    async fn test_missing_field_is_caught_locally() {
        // Unreachable server: the check must fail before any request.
        let client = TaskClient::new("http://127.0.0.1:9");
        let mut form = TaskForm {
            description: "   ".to_string(),
            ..filled()
        };

        assert_eq!(form.submit(&client).await, Navigation::Stay);
        assert_eq!(form.error.as_deref(), Some("All fields are required."));
    }

    #[tokio::test]
    async fn test_edit_prefills_and_updates() {
        let client = TaskClient::new(spawn_api().await);
        let mut create = filled();
        create.submit(&client).await;
        let id = client.list().await.unwrap()[0].id.to_string();

        let mut form = TaskForm::load(&client, &id).await.unwrap();
        assert!(form.is_edit());
        assert_eq!(form.due_date, "2025-09-30");
        assert_eq!(form.status, TaskStatus::Pending);

        form.title = "Renew passport today".to_string();
        form.status = TaskStatus::InProgress;
        assert_eq!(
            form.submit(&client).await,
            Navigation::ToList(Flash::Updated)
        );

        let task = client.get(&id).await.unwrap();
        assert_eq!(task.title, "Renew passport today");
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.description, "Photos and form");
    }

    #[tokio::test]
    async fn test_server_rejection_keeps_form() {
        let client = TaskClient::new(spawn_api().await);
        let mut form = TaskForm {
            title: "x".repeat(101),
            ..filled()
        };

        assert_eq!(form.submit(&client).await, Navigation::Stay);
        assert_eq!(
            form.error.as_deref(),
            Some("Title cannot be more than 100 characters")
        );
        assert!(client.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_unknown_task_fails() {
        let client = TaskClient::new(spawn_api().await);
        let err = TaskForm::load(&client, "000000000000000000000000")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Task not found");
    }

    #[tokio::test]
    async fn test_edit_keeps_time_of_day_unless_date_changes() {
        let client = TaskClient::new(spawn_api().await);
        let created = client
            .create(&TaskPayload {
                title: Some("Dentist".to_string()),
                description: Some("Checkup".to_string()),
                due_date: Some("2025-03-01T10:00:00.000Z".to_string()),
                status: None,
            })
            .await
            .unwrap();
        let id = created.id.to_string();

        let mut form = TaskForm::load(&client, &id).await.unwrap();
        assert_eq!(form.due_date, "2025-03-01");
        form.title = "Dentist (rescheduled)".to_string();
        form.submit(&client).await;
        let task = client.get(&id).await.unwrap();
        assert_eq!(format_timestamp(&task.due_date), "2025-03-01T10:00:00.000Z");

        let mut form = TaskForm::load(&client, &id).await.unwrap();
        form.due_date = "2025-03-02".to_string();
        form.submit(&client).await;
        let task = client.get(&id).await.unwrap();
        assert_eq!(format_timestamp(&task.due_date), "2025-03-02T00:00:00.000Z");
    }

    #[test]
    fn test_create_constructor_is_a_new_form() {
        let form = TaskForm::create("t", "d", "2025-01-01", TaskStatus::Completed);
        assert!(!form.is_edit());
        assert_eq!(form.status, TaskStatus::Completed);
        assert!(form.error.is_none());
    }

    #[test]
    fn test_flash_messages() {
        assert_eq!(Flash::Created.message(), "Task created successfully!");
        assert_eq!(Flash::Updated.message(), "Task updated successfully!");
    }
}
