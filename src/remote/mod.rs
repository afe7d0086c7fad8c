//! Remote task store access
//!
//! The remote store owns task identity and durable order; this module
//! wraps its HTTP interface behind [`TaskRepository`]. No business
//! logic lives here.
//!
//! Mutation policy: `create`, `update_task`, and `delete_task` are
//! followed by a full re-fetch at the call site (mutate, then
//! invalidate-and-reload). `update_order` is the exception: it persists
//! an order the caller has already committed locally, so no reload
//! follows it.

mod http;
pub mod worker;

pub use http::HttpTaskStore;

use thiserror::Error;

use crate::domain::{OrderUpdate, Task, TaskDraft, TaskFields, TaskId};

/// Failures talking to the remote store
#[derive(Debug, Error)]
pub enum RemoteError {
    /// A task with the same name is already active on the server
    #[error("a task named '{0}' is already in progress")]
    Duplicate(String),

    /// The server does not know this task id
    #[error("task {0} not found on the server")]
    NotFound(TaskId),

    /// Transport failure or malformed response
    #[error("network failure: {0}")]
    Network(String),

    /// The server answered with an unexpected status
    #[error("unexpected server response: HTTP {status}")]
    Api { status: u16 },
}

/// The remote operations the client depends on
pub trait TaskRepository {
    /// Fetches the complete task list
    ///
    /// On failure callers keep whatever list they already display
    /// (stale but self-consistent) and report the error once.
    fn fetch_all(&self) -> Result<Vec<Task>, RemoteError>;

    /// Creates a task; the server assigns its id and order
    ///
    /// Fails with [`RemoteError::Duplicate`] when a task with the same
    /// name is already active. Callers reload the list after success.
    fn create(&self, draft: &TaskDraft) -> Result<Task, RemoteError>;

    /// Bulk positional update carrying every task's `{id, order}` pair
    ///
    /// Idempotent: resubmitting an identical mapping must not corrupt
    /// server state. Persists an order already committed locally, so
    /// callers do not reload afterwards.
    fn update_order(&self, updates: &[OrderUpdate]) -> Result<(), RemoteError>;

    /// Edits every field of an existing task except its id
    ///
    /// Fails with [`RemoteError::NotFound`] for unknown ids. Callers
    /// reload the list after success.
    fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<(), RemoteError>;

    /// Deletes a task by id
    ///
    /// Fails with [`RemoteError::NotFound`] for unknown ids. Callers
    /// reload the list after success.
    fn delete_task(&self, id: TaskId) -> Result<(), RemoteError>;
}
