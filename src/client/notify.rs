//! Session-wide notification queue.
//!
//! Every call appends a new entry (nothing is merged or deduplicated). Each
//! entry removes itself once its duration has elapsed; `dismiss` removes it
//! immediately.

use std::fmt;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::util::random_base36;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

static SESSION: OnceLock<Notifications> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub duration: Duration,
}

#[derive(Clone, Default)]
pub struct Notifications {
    entries: Arc<RwLock<Vec<Notification>>>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    /// The queue shared by the whole process.
    pub fn session() -> &'static Notifications {
        SESSION.get_or_init(Notifications::new)
    }

    /// Append a notification and schedule its removal. Returns its id.
    ///
    /// A missing or zero duration falls back to [`DEFAULT_DURATION`].
    pub async fn push(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration: Option<Duration>,
    ) -> String {
        let duration = duration
            .filter(|d| !d.is_zero())
            .unwrap_or(DEFAULT_DURATION);
        let notification = Notification {
            id: random_base36(9),
            kind,
            message: message.into(),
            duration,
        };
        let id = notification.id.clone();
        tracing::debug!("Notification [{}] {}", kind, notification.message);
        self.entries.write().await.push(notification);

        let deadline = Instant::now() + duration;
        let entries = Arc::clone(&self.entries);
        let expired = id.clone();
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            entries.write().await.retain(|n| n.id != expired);
        });

        id
    }

    pub async fn success(&self, message: impl Into<String>, duration: Option<Duration>) -> String {
        self.push(NotificationKind::Success, message, duration).await
    }

    pub async fn error(&self, message: impl Into<String>, duration: Option<Duration>) -> String {
        self.push(NotificationKind::Error, message, duration).await
    }

    pub async fn info(&self, message: impl Into<String>, duration: Option<Duration>) -> String {
        self.push(NotificationKind::Info, message, duration).await
    }

    /// Remove a notification now. Returns whether it was still active.
    pub async fn dismiss(&self, id: &str) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|n| n.id != id);
        entries.len() != before
    }

    /// Snapshot of the active notifications, oldest first.
    pub async fn active(&self) -> Vec<Notification> {
        self.entries.read().await.clone()
    }
}
