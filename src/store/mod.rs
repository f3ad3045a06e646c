//! Task storage with pluggable backends.
//!
//! Supports:
//! - `memory`: In-memory storage (non-persistent, for testing)
//! - `sqlite`: SQLite database holding one JSON document per task
//!
//! Backends are selected by `DATABASE_URL` (`memory://` or `sqlite://<path>`)
//! and opened lazily through [`StoreHandle`].

mod handle;
mod memory;
mod sqlite;

pub use handle::StoreHandle;
pub use memory::InMemoryTaskStore;
pub use sqlite::SqliteTaskStore;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SubsecRound, Utc};

use crate::task::{ObjectId, Task, TaskDraft, TaskStatus};

/// Current time at the precision documents are stored with.
pub fn now_timestamp() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Task store trait - implemented by all storage backends.
///
/// Every write touches exactly one document and is atomic per document.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Whether this store persists data across restarts.
    fn is_persistent(&self) -> bool;

    /// All tasks, in storage (insertion) order.
    async fn list_tasks(&self) -> Result<Vec<Task>, String>;

    /// Get a single task by ID.
    async fn get_task(&self, id: ObjectId) -> Result<Option<Task>, String>;

    /// Insert a new task, assigning its id and timestamps.
    async fn insert_task(&self, draft: TaskDraft) -> Result<Task, String>;

    /// Replace every editable field. Returns `None` if no such task.
    async fn replace_task(&self, id: ObjectId, draft: TaskDraft) -> Result<Option<Task>, String>;

    /// Set only the status. Returns `None` if no such task.
    async fn update_task_status(
        &self,
        id: ObjectId,
        status: TaskStatus,
    ) -> Result<Option<Task>, String>;

    /// Delete a task, returning the removed document.
    async fn delete_task(&self, id: ObjectId) -> Result<Option<Task>, String>;
}

/// Store backend selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Memory,
    Sqlite(PathBuf),
}

impl StoreKind {
    /// Parse a `DATABASE_URL` value.
    pub fn from_url(url: &str) -> Result<Self, String> {
        let url = url.trim();
        if url == "memory" || url == "memory://" {
            return Ok(Self::Memory);
        }
        match url.strip_prefix("sqlite://") {
            Some("") => Err("DATABASE_URL is missing a sqlite path".to_string()),
            Some(path) => Ok(Self::Sqlite(PathBuf::from(path))),
            None => Err(format!("Unsupported DATABASE_URL: {}", url)),
        }
    }
}

/// Open a task store for the given `DATABASE_URL`.
pub async fn open_task_store(url: &str) -> Result<Arc<dyn TaskStore>, String> {
    match StoreKind::from_url(url)? {
        StoreKind::Memory => Ok(Arc::new(InMemoryTaskStore::new())),
        StoreKind::Sqlite(path) => {
            let store = SqliteTaskStore::new(path).await?;
            Ok(Arc::new(store))
        }
    }
}
