//! Task definitions, validation and the repository that persists them.

mod id;
mod model;
mod repository;
mod validation;

pub use id::{InvalidObjectId, ObjectId};
pub use model::{format_timestamp, parse_due_date, Task, TaskDraft, TaskStatus, UnknownStatus};
pub use repository::{parse_task_id, TaskError, TaskRepository};
pub use validation::{
    classify_update, validate_for_create, validate_for_update, TaskPayload, UpdateMode,
    UpdateRequest, ValidationError, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS,
};
