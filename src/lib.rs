//! Roster CLI - A terminal client for a shared task roster
//!
//! Roster talks to a remote task store over HTTP and keeps a single
//! ordered task list per session. The list can be reordered by moving
//! one task at a time (grab-and-drop in the TUI, `move` on the command
//! line); the new order is applied locally first and then persisted to
//! the remote store.

pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod remote;

pub use domain::{OrderUpdate, Task, TaskDraft, TaskFields, TaskId, TaskList, ValidationError};
pub use engine::{DragSession, ReorderEngine, TaskSession};
pub use remote::{HttpTaskStore, RemoteError, TaskRepository};
