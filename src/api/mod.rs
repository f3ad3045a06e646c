//! HTTP API for taskboard.
//!
//! ## Endpoints
//!
//! - `GET /api/test` - Liveness check
//! - `GET /api/tasks` - List tasks
//! - `POST /api/tasks` - Create a task
//! - `GET /api/tasks/{id}` - Get a task
//! - `PUT /api/tasks/{id}` - Update a task (full or status-only)
//! - `DELETE /api/tasks/{id}` - Delete a task

mod routes;
mod tasks;
pub mod types;

pub use routes::{app, serve, AppState};
pub use types::*;
