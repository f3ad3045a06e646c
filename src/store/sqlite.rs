//! SQLite-backed task store.
//!
//! Each task is kept as a JSON document keyed by its id. The implicit
//! `seq` column preserves insertion order for listing.

use super::{now_timestamp, TaskStore};
use crate::task::{ObjectId, Task, TaskDraft, TaskStatus};
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

const SCHEMA: &str = r#"
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS tasks (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    document TEXT NOT NULL
);
"#;

pub struct SqliteTaskStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteTaskStore {
    pub async fn new(db_path: PathBuf) -> Result<Self, String> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| format!("Failed to create task store dir: {}", e))?;
        }

        // Open database in blocking task
        let conn = tokio::task::spawn_blocking(move || {
            let conn = Connection::open(&db_path)
                .map_err(|e| format!("Failed to open SQLite database: {}", e))?;
            conn.execute_batch(SCHEMA)
                .map_err(|e| format!("Failed to run schema: {}", e))?;
            tracing::debug!("Opened task database at {}", db_path.display());
            Ok::<_, String>(conn)
        })
        .await
        .map_err(|e| format!("Task join error: {}", e))??;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking pool.
    async fn with_conn<T, F>(&self, f: F) -> Result<T, String>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, String> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.blocking_lock();
            f(&conn)
        })
        .await
        .map_err(|e| e.to_string())?
    }

    /// Read, change and write back one document while holding the connection.
    async fn modify<F>(&self, id: ObjectId, apply: F) -> Result<Option<Task>, String>
    where
        F: FnOnce(&mut Task) + Send + 'static,
    {
        self.with_conn(move |conn| {
            let Some(mut task) = load_document(conn, id)? else {
                return Ok(None);
            };
            apply(&mut task);
            conn.execute(
                "UPDATE tasks SET document = ?1 WHERE id = ?2",
                params![encode(&task)?, id.to_hex()],
            )
            .map_err(|e| e.to_string())?;
            Ok(Some(task))
        })
        .await
    }
}

fn encode(task: &Task) -> Result<String, String> {
    serde_json::to_string(task).map_err(|e| format!("Failed to encode task: {}", e))
}

fn decode(document: &str) -> Result<Task, String> {
    serde_json::from_str(document).map_err(|e| format!("Corrupt task document: {}", e))
}

fn load_document(conn: &Connection, id: ObjectId) -> Result<Option<Task>, String> {
    let document: Option<String> = conn
        .query_row(
            "SELECT document FROM tasks WHERE id = ?1",
            params![id.to_hex()],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| e.to_string())?;
    document.as_deref().map(decode).transpose()
}

#[async_trait]
impl TaskStore for SqliteTaskStore {
    fn is_persistent(&self) -> bool {
        true
    }

    async fn list_tasks(&self) -> Result<Vec<Task>, String> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT document FROM tasks ORDER BY seq ASC")
                .map_err(|e| e.to_string())?;
            let documents = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(|e| e.to_string())?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| e.to_string())?;
            documents
                .iter()
                .map(|d| decode(d))
                .collect::<Result<Vec<Task>, String>>()
        })
        .await
    }

    async fn get_task(&self, id: ObjectId) -> Result<Option<Task>, String> {
        self.with_conn(move |conn| load_document(conn, id)).await
    }

    async fn insert_task(&self, draft: TaskDraft) -> Result<Task, String> {
        let task = Task::from_draft(ObjectId::generate(), draft, now_timestamp());
        let document = encode(&task)?;
        let id = task.id.to_hex();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO tasks (id, document) VALUES (?1, ?2)",
                params![id, document],
            )
            .map_err(|e| e.to_string())?;
            Ok(())
        })
        .await?;
        Ok(task)
    }

    async fn replace_task(&self, id: ObjectId, draft: TaskDraft) -> Result<Option<Task>, String> {
        self.modify(id, move |task| task.apply_draft(draft, now_timestamp()))
            .await
    }

    async fn update_task_status(
        &self,
        id: ObjectId,
        status: TaskStatus,
    ) -> Result<Option<Task>, String> {
        self.modify(id, move |task| task.apply_status(status, now_timestamp()))
            .await
    }

    async fn delete_task(&self, id: ObjectId) -> Result<Option<Task>, String> {
        self.with_conn(move |conn| {
            let existing = load_document(conn, id)?;
            if existing.is_some() {
                conn.execute("DELETE FROM tasks WHERE id = ?1", params![id.to_hex()])
                    .map_err(|e| e.to_string())?;
            }
            Ok(existing)
        })
        .await
    }
}
