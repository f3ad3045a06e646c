//! The task list as the front end holds it.
//!
//! The list is fetched once when the board is mounted and afterwards kept in
//! sync locally: status changes are applied optimistically and rolled back on
//! failure, deletes remove the task locally once the server confirms.

use std::collections::HashMap;

use super::form::Flash;
use super::notify::Notifications;
use super::{ClientError, TaskClient};
use crate::task::{ObjectId, Task, TaskStatus};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this task?";

/// A blocking yes/no decision from the user.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Where a task's status widget is in an optimistic edit.
///
/// `Idle → Pending → Committed | RolledBack`, and then back to `Idle`: the
/// terminal states are only ever handed back as outcomes, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEdit {
    Idle,
    Pending { previous: TaskStatus },
    Committed,
    RolledBack { previous: TaskStatus },
}

/// A status edit that has been applied locally but not yet confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingEdit {
    pub id: ObjectId,
    pub previous: TaskStatus,
    pub requested: TaskStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user declined; nothing was sent.
    Cancelled,
    Deleted,
    Failed(String),
}

pub struct TaskBoard {
    client: TaskClient,
    notifications: Notifications,
    tasks: Vec<Task>,
    edits: HashMap<ObjectId, TaskStatus>,
    error: Option<String>,
}

impl TaskBoard {
    /// Fetch the list once and build the board. A failed fetch leaves the
    /// board empty with [`TaskBoard::error`] set.
    pub async fn mount(client: TaskClient, notifications: Notifications) -> Self {
        let mut board = Self {
            client,
            notifications,
            tasks: Vec::new(),
            edits: HashMap::new(),
            error: None,
        };
        match board.client.list().await {
            Ok(tasks) => board.tasks = sort_newest_first(tasks),
            Err(e) => {
                tracing::warn!("Failed to load tasks: {}", e);
                board.error = Some(e.to_string());
            }
        }
        board
    }

    /// Tasks, newest first.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: ObjectId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Diagnostic from the initial load, if it failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn edit_state(&self, id: ObjectId) -> StatusEdit {
        match self.edits.get(&id) {
            Some(previous) => StatusEdit::Pending {
                previous: *previous,
            },
            None => StatusEdit::Idle,
        }
    }

    pub fn is_updating(&self, id: ObjectId) -> bool {
        self.edits.contains_key(&id)
    }

    /// Apply a status locally before the server has confirmed it.
    ///
    /// A second call while the first is still pending is not refused; it
    /// records the current (optimistic) value as its own previous status.
    pub fn begin_status_change(&mut self, id: ObjectId, status: TaskStatus) -> Option<PendingEdit> {
        let task = self.tasks.iter_mut().find(|t| t.id == id)?;
        let previous = task.status;
        task.status = status;
        self.edits.insert(id, previous);
        Some(PendingEdit {
            id,
            previous,
            requested: status,
        })
    }

    /// Resolve a pending edit with the server's answer. The widget is back to
    /// `Idle` afterwards whatever the outcome.
    pub async fn finish_status_change(
        &mut self,
        edit: PendingEdit,
        result: Result<Task, ClientError>,
    ) -> StatusEdit {
        self.edits.remove(&edit.id);
        match result {
            Ok(_) => {
                self.notifications
                    .success(
                        format!("Status updated to {}", edit.requested.label()),
                        None,
                    )
                    .await;
                StatusEdit::Committed
            }
            Err(e) => {
                tracing::warn!("Failed to update status of {}: {}", edit.id, e);
                if let Some(task) = self.tasks.iter_mut().find(|t| t.id == edit.id) {
                    task.status = edit.previous;
                }
                self.notifications
                    .error(format!("Error updating status: {}", e), None)
                    .await;
                StatusEdit::RolledBack {
                    previous: edit.previous,
                }
            }
        }
    }

    /// Optimistic status change: apply, send, then commit or roll back.
    /// Returns `None` if the task is not on the board.
    pub async fn change_status(&mut self, id: ObjectId, status: TaskStatus) -> Option<StatusEdit> {
        let edit = self.begin_status_change(id, status)?;
        let result = self.client.update_status(id, status).await;
        Some(self.finish_status_change(edit, result).await)
    }

    /// Delete after the user confirms. On success the task is removed locally
    /// without refetching; on failure the board is left untouched.
    pub async fn delete(&mut self, id: ObjectId, confirm: &dyn Confirm) -> DeleteOutcome {
        if !confirm.confirm(DELETE_PROMPT) {
            return DeleteOutcome::Cancelled;
        }

        match self.client.delete(&id.to_string()).await {
            Ok(_) => {
                self.tasks.retain(|t| t.id != id);
                self.edits.remove(&id);
                self.notifications
                    .success("Task deleted successfully!", None)
                    .await;
                DeleteOutcome::Deleted
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!("Failed to delete task {}: {}", id, message);
                self.notifications.error(message.clone(), None).await;
                DeleteOutcome::Failed(message)
            }
        }
    }

    /// Show the success signal handed over by the create/edit flow.
    pub async fn consume_flash(&self, flash: Option<Flash>) {
        if let Some(flash) = flash {
            self.notifications.success(flash.message(), None).await;
        }
    }
}

/// Newest first by `createdAt`; ids break ties.
fn sort_newest_first(mut tasks: Vec<Task>) -> Vec<Task> {
    tasks.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
    tasks
}
