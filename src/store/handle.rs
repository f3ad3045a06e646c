//! Lazily opened, process-wide store handle.

use std::sync::Arc;

use tokio::sync::OnceCell;

use super::{open_task_store, TaskStore};

/// Opens the configured store on first use and hands out the same instance
/// afterwards. A failed open is not cached; the next caller tries again.
pub struct StoreHandle {
    database_url: String,
    store: OnceCell<Arc<dyn TaskStore>>,
}

impl StoreHandle {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            store: OnceCell::new(),
        }
    }

    /// Wrap an already opened store.
    pub fn from_store(store: Arc<dyn TaskStore>) -> Self {
        Self {
            database_url: String::new(),
            store: OnceCell::new_with(Some(store)),
        }
    }

    pub async fn get(&self) -> Result<Arc<dyn TaskStore>, String> {
        let store = self
            .store
            .get_or_try_init(|| async {
                let store = open_task_store(&self.database_url).await.map_err(|e| {
                    tracing::error!("Failed to open task store: {}", e);
                    e
                })?;
                tracing::info!(
                    "Task store ready (persistent: {})",
                    store.is_persistent()
                );
                Ok::<_, String>(store)
            })
            .await?;
        Ok(Arc::clone(store))
    }
}
