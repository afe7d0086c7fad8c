//! Reorder engine and session orchestration
//!
//! Converts a single drag gesture into a new, locally consistent
//! ordering and propagates it durably. The local commit always happens
//! first (optimistic update); persistence follows and its failure never
//! rolls the list back — the next full reload reconciles.

use log::warn;

use crate::domain::{OrderUpdate, Task, TaskDraft, TaskFields, TaskId, TaskList};
use crate::remote::{RemoteError, TaskRepository};

/// Transient record of the row being moved during a drag gesture
///
/// Created on grab, consumed on drop or cancel; never persisted. Only
/// one session exists at a time — a new grab overwrites the old one
/// (last grab wins, matching a single pointer device).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    source: Option<usize>,
}

impl DragSession {
    pub fn begin(&mut self, index: usize) {
        self.source = Some(index);
    }

    pub fn cancel(&mut self) {
        self.source = None;
    }

    /// Consumes the session, returning the grabbed index
    pub fn take(&mut self) -> Option<usize> {
        self.source.take()
    }

    pub fn active(&self) -> Option<usize> {
        self.source
    }

    pub fn is_active(&self) -> bool {
        self.source.is_some()
    }
}

/// Turns drag gestures into list mutations
#[derive(Debug, Default)]
pub struct ReorderEngine {
    drag: DragSession,
}

impl ReorderEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_start(&mut self, index: usize) {
        self.drag.begin(index);
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    /// The grabbed index, if a drag is in progress
    pub fn dragging(&self) -> Option<usize> {
        self.drag.active()
    }

    /// Drops the grabbed task onto `target`
    ///
    /// No-op (returns `None`) when no drag is active or the grabbed
    /// index fell out of bounds (e.g. the list shrank under a reload).
    /// A target past the end is clamped to the last position. On
    /// success the list is already renumbered and the full `{id,
    /// order}` mapping is returned for persistence. The session is
    /// consumed either way.
    pub fn drop_onto(&mut self, list: &mut TaskList, target: usize) -> Option<Vec<OrderUpdate>> {
        let source = self.drag.take()?;
        if source >= list.len() {
            return None;
        }
        let target = target.min(list.len() - 1);
        list.apply_reorder(source, target).ok()
    }
}

/// A session against one remote task list
///
/// Owns the list, the drag state, and the repository, and exposes the
/// event surface the view layer consumes: `refresh`, `drag_start`,
/// `drop_onto`, `create_task`, `edit_task`, `delete_task`. Used
/// directly by the CLI commands; the TUI wires the same engine and list
/// to a background worker instead so the UI thread never blocks.
pub struct TaskSession<R> {
    repo: R,
    list: TaskList,
    engine: ReorderEngine,
}

impl<R: TaskRepository> TaskSession<R> {
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            list: TaskList::new(),
            engine: ReorderEngine::new(),
        }
    }

    /// Current ordered task sequence
    pub fn tasks(&self) -> &[Task] {
        self.list.tasks()
    }

    pub fn list(&self) -> &TaskList {
        &self.list
    }

    /// Replaces the list with a fresh fetch
    ///
    /// On failure the previously displayed list stands untouched; the
    /// error is logged and returned for display.
    pub fn refresh(&mut self) -> Result<(), RemoteError> {
        match self.repo.fetch_all() {
            Ok(tasks) => {
                self.list.load(tasks);
                Ok(())
            }
            Err(err) => {
                warn!("task fetch failed, previous list stands: {}", err);
                Err(err)
            }
        }
    }

    pub fn drag_start(&mut self, index: usize) {
        self.engine.drag_start(index);
    }

    pub fn drag_cancel(&mut self) {
        self.engine.drag_cancel();
    }

    pub fn dragging(&self) -> Option<usize> {
        self.engine.dragging()
    }

    /// Drops the grabbed task onto `target` and persists the new order
    ///
    /// The list is committed before the network call. `None` means the
    /// gesture was a no-op. `Some(Err(..))` means the move is visible
    /// locally but was not persisted; the list is deliberately not
    /// rolled back and the next `refresh` reconciles.
    pub fn drop_onto(&mut self, target: usize) -> Option<Result<(), RemoteError>> {
        let updates = self.engine.drop_onto(&mut self.list, target)?;
        Some(match self.repo.update_order(&updates) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!("order update not persisted: {}", err);
                Err(err)
            }
        })
    }

    /// Position-based reorder without a gesture (the CLI `move` path)
    pub fn move_task(&mut self, source: usize, target: usize) -> Option<Result<(), RemoteError>> {
        self.engine.drag_start(source);
        self.drop_onto(target)
    }

    /// Creates a task, then reloads the list
    pub fn create_task(&mut self, draft: &TaskDraft) -> Result<Task, RemoteError> {
        let created = self.repo.create(draft)?;
        self.reload_after_mutation();
        Ok(created)
    }

    /// Edits a task's fields, then reloads the list
    pub fn edit_task(&mut self, id: TaskId, fields: &TaskFields) -> Result<(), RemoteError> {
        self.repo.update_task(id, fields)?;
        self.reload_after_mutation();
        Ok(())
    }

    /// Deletes a task, then reloads the list
    pub fn delete_task(&mut self, id: TaskId) -> Result<(), RemoteError> {
        self.repo.delete_task(id)?;
        self.reload_after_mutation();
        Ok(())
    }

    // Mutate-then-reload: a failed reload leaves the previous list
    // (already logged by refresh).
    fn reload_after_mutation(&mut self) {
        let _ = self.refresh();
    }
}
