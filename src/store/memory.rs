//! In-memory task store (non-persistent).

use super::{now_timestamp, TaskStore};
use crate::task::{ObjectId, Task, TaskDraft, TaskStatus};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct InMemoryTaskStore {
    // Kept in insertion order; lookups are linear.
    tasks: Arc<RwLock<Vec<Task>>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self {
            tasks: Arc::new(RwLock::new(Vec::new())),
        }
    }

    async fn modify<F>(&self, id: ObjectId, apply: F) -> Result<Option<Task>, String>
    where
        F: FnOnce(&mut Task) + Send,
    {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.iter_mut().find(|t| t.id == id).map(|task| {
            apply(task);
            task.clone()
        }))
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, String> {
        Ok(self.tasks.read().await.clone())
    }

    async fn get_task(&self, id: ObjectId) -> Result<Option<Task>, String> {
        Ok(self.tasks.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn insert_task(&self, draft: TaskDraft) -> Result<Task, String> {
        let task = Task::from_draft(ObjectId::generate(), draft, now_timestamp());
        self.tasks.write().await.push(task.clone());
        Ok(task)
    }

    async fn replace_task(&self, id: ObjectId, draft: TaskDraft) -> Result<Option<Task>, String> {
        self.modify(id, |task| task.apply_draft(draft, now_timestamp()))
            .await
    }

    async fn update_task_status(
        &self,
        id: ObjectId,
        status: TaskStatus,
    ) -> Result<Option<Task>, String> {
        self.modify(id, |task| task.apply_status(status, now_timestamp()))
            .await
    }

    async fn delete_task(&self, id: ObjectId) -> Result<Option<Task>, String> {
        let mut tasks = self.tasks.write().await;
        let index = tasks.iter().position(|t| t.id == id);
        Ok(index.map(|index| tasks.remove(index)))
    }
}
