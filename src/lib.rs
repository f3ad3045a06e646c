//! # taskboard
//!
//! Task tracking over a small REST API.
//!
//! This library provides:
//! - An HTTP API for creating, listing, updating and deleting tasks
//! - Pluggable document storage (in-memory or SQLite)
//! - A client layer that keeps a task list in sync with the server
//!
//! ## Architecture
//!
//! ```text
//!   taskctl ──► client::TaskBoard / TaskForm ──► TaskClient ──HTTP──┐
//!                                                                   ▼
//!                          api (axum) ──► task::TaskRepository ──► store::TaskStore
//! ```
//!
//! ## Modules
//! - `task`: Task model, ids, validation and repository
//! - `store`: Storage backends behind a lazily opened handle
//! - `api`: HTTP routes and the response envelope
//! - `client`: HTTP client, list/form state and notifications

pub mod api;
pub mod client;
pub mod config;
pub mod store;
pub mod task;
pub mod util;

pub use config::Config;
