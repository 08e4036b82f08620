//! # Taskherd
//!
//! A personal task tracker: a CLI and a local web interface over one
//! JSON-file-backed collection of task records.
//!
//! ## Modules
//! - `task`: the task record, patch semantics, parsers and validators
//! - `store`: the file-backed collection and its mutation engine
//! - `sort`: deterministic display ordering
//! - `api`: the axum web interface
//! - `cli`: interactive prompts and text output
//! - `config`: environment-derived paths and addresses

pub mod api;
pub mod cli;
pub mod config;
pub mod sort;
pub mod store;
pub mod task;

pub use config::Config;
pub use store::{SharedTaskStore, TaskStore};
pub use task::{DoneChange, Task, TaskError, TaskPatch};
