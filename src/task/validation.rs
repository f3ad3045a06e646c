//! Payload validation for create and update.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::model::{parse_due_date, TaskDraft, TaskStatus};

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Create/update body as it arrives on the wire. Every field is optional here;
/// which ones are required depends on the operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TaskPayload {
    /// A body that only carries a status.
    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            status: Some(status.as_str().to_string()),
            ..Self::default()
        }
    }
}

/// Every field-level failure of one payload, in field order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .messages.join(", "))]
pub struct ValidationError {
    pub messages: Vec<String>,
}

/// The two shapes an update body can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateMode {
    Full,
    StatusOnly,
}

/// A validated update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRequest {
    Full(TaskDraft),
    Status(TaskStatus),
}

/// Empty strings count as absent.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Decide how an update body is treated, from which fields it carries.
pub fn classify_update(payload: &TaskPayload) -> UpdateMode {
    let editable_absent = present(&payload.title).is_none()
        && present(&payload.description).is_none()
        && present(&payload.due_date).is_none();

    if editable_absent && present(&payload.status).is_some() {
        UpdateMode::StatusOnly
    } else {
        UpdateMode::Full
    }
}

pub fn validate_for_create(payload: &TaskPayload) -> Result<TaskDraft, ValidationError> {
    let mut messages = Vec::new();

    let title = check_text(&payload.title, "Title", TITLE_MAX_CHARS, &mut messages);
    let description = check_text(
        &payload.description,
        "Description",
        DESCRIPTION_MAX_CHARS,
        &mut messages,
    );

    let due_date = match present(&payload.due_date) {
        None => {
            messages.push("Due date is required".to_string());
            None
        }
        Some(raw) => {
            let parsed = parse_due_date(raw);
            if parsed.is_none() {
                messages.push("Due date is not a valid date".to_string());
            }
            parsed
        }
    };

    let status = match present(&payload.status) {
        None => Some(TaskStatus::default()),
        Some(raw) => match raw.parse::<TaskStatus>() {
            Ok(status) => Some(status),
            Err(e) => {
                messages.push(e.to_string());
                None
            }
        },
    };

    match (title, description, due_date, status) {
        (Some(title), Some(description), Some(due_date), Some(status)) if messages.is_empty() => {
            Ok(TaskDraft {
                title,
                description,
                status,
                due_date,
            })
        }
        _ => Err(ValidationError { messages }),
    }
}

pub fn validate_for_update(payload: &TaskPayload) -> Result<UpdateRequest, ValidationError> {
    match classify_update(payload) {
        UpdateMode::Full => validate_for_create(payload).map(UpdateRequest::Full),
        UpdateMode::StatusOnly => {
            let raw = present(&payload.status).unwrap_or_default();
            raw.parse::<TaskStatus>()
                .map(UpdateRequest::Status)
                .map_err(|e| ValidationError {
                    messages: vec![e.to_string()],
                })
        }
    }
}

fn check_text(
    value: &Option<String>,
    field: &str,
    max_chars: usize,
    messages: &mut Vec<String>,
) -> Option<String> {
    match present(value) {
        None => {
            messages.push(format!("{} is required", field));
            None
        }
        Some(text) if text.chars().count() > max_chars => {
            messages.push(format!(
                "{} cannot be more than {} characters",
                field, max_chars
            ));
            None
        }
        Some(text) => Some(text.to_string()),
    }
}
