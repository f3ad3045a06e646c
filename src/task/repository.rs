//! Validated task operations on top of the store.

use std::sync::Arc;

use thiserror::Error;

use super::id::ObjectId;
use super::model::Task;
use super::validation::{validate_for_create, validate_for_update, TaskPayload, UpdateRequest, ValidationError};
use crate::store::{StoreHandle, TaskStore};

/// Every way a task operation can fail.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("Invalid task ID format")]
    InvalidId,

    #[error("{0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Task not found")]
    NotFound,

    #[error("{0}")]
    Storage(String),
}

/// Check an id's format without touching storage.
pub fn parse_task_id(raw: &str) -> Result<ObjectId, TaskError> {
    ObjectId::parse(raw).map_err(|_| TaskError::InvalidId)
}

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<StoreHandle>,
}

impl TaskRepository {
    pub fn new(store: Arc<StoreHandle>) -> Self {
        Self { store }
    }

    async fn store(&self) -> Result<Arc<dyn TaskStore>, TaskError> {
        self.store.get().await.map_err(TaskError::Storage)
    }

    pub async fn list(&self) -> Result<Vec<Task>, TaskError> {
        self.store()
            .await?
            .list_tasks()
            .await
            .map_err(TaskError::Storage)
    }

    pub async fn get(&self, id: &str) -> Result<Task, TaskError> {
        let id = parse_task_id(id)?;
        self.store()
            .await?
            .get_task(id)
            .await
            .map_err(TaskError::Storage)?
            .ok_or(TaskError::NotFound)
    }

    pub async fn create(&self, payload: &TaskPayload) -> Result<Task, TaskError> {
        let draft = validate_for_create(payload)?;
        self.store()
            .await?
            .insert_task(draft)
            .await
            .map_err(TaskError::Storage)
    }

    pub async fn update(&self, id: &str, payload: &TaskPayload) -> Result<Task, TaskError> {
        let id = parse_task_id(id)?;
        let request = validate_for_update(payload)?;
        let store = self.store().await?;
        let updated = match request {
            UpdateRequest::Full(draft) => store.replace_task(id, draft).await,
            UpdateRequest::Status(status) => store.update_task_status(id, status).await,
        };
        updated.map_err(TaskError::Storage)?.ok_or(TaskError::NotFound)
    }

    pub async fn delete(&self, id: &str) -> Result<Task, TaskError> {
        let id = parse_task_id(id)?;
        self.store()
            .await?
            .delete_task(id)
            .await
            .map_err(TaskError::Storage)?
            .ok_or(TaskError::NotFound)
    }
}
