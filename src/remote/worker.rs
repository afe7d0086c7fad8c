//! Background persistence worker for the TUI
//!
//! Store mutations are synchronous single steps on the UI thread;
//! network calls are not. The worker owns the repository on its own
//! thread, takes jobs over a channel, and delivers each outcome back to
//! the event loop, so the board never blocks on the remote store.
//!
//! One repository call per job. In-flight jobs cannot be cancelled; a
//! later fetch supersedes any stale write's effect on the visible list.

use std::sync::mpsc;
use std::thread;

use log::warn;

use super::{RemoteError, TaskRepository};
use crate::domain::{OrderUpdate, Task, TaskDraft, TaskFields, TaskId};

/// A unit of remote work
#[derive(Debug)]
pub enum RemoteJob {
    Fetch,
    PersistOrder(Vec<OrderUpdate>),
    Create(TaskDraft),
    Edit(TaskId, TaskFields),
    Delete(TaskId),
}

/// Which mutation a [`RemoteOutcome`] refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Edit,
    Delete,
}

impl MutationKind {
    pub fn verb(&self) -> &'static str {
        match self {
            MutationKind::Create => "created",
            MutationKind::Edit => "updated",
            MutationKind::Delete => "deleted",
        }
    }
}

/// Result of one job, delivered to the event loop
#[derive(Debug)]
pub enum RemoteOutcome {
    Fetched(Vec<Task>),
    FetchFailed(RemoteError),
    OrderPersisted,
    OrderFailed(RemoteError),
    Mutated(MutationKind),
    MutationFailed(MutationKind, RemoteError),
}

/// Handle for submitting jobs to the worker
///
/// Dropping the last handle shuts the worker down once its queue
/// drains.
pub struct RemoteHandle {
    jobs: mpsc::Sender<RemoteJob>,
}

impl RemoteHandle {
    pub(crate) fn new(jobs: mpsc::Sender<RemoteJob>) -> Self {
        Self { jobs }
    }

    pub fn fetch(&self) {
        self.submit(RemoteJob::Fetch);
    }

    pub fn persist_order(&self, updates: Vec<OrderUpdate>) {
        self.submit(RemoteJob::PersistOrder(updates));
    }

    pub fn create(&self, draft: TaskDraft) {
        self.submit(RemoteJob::Create(draft));
    }

    pub fn edit(&self, id: TaskId, fields: TaskFields) {
        self.submit(RemoteJob::Edit(id, fields));
    }

    pub fn delete(&self, id: TaskId) {
        self.submit(RemoteJob::Delete(id));
    }

    fn submit(&self, job: RemoteJob) {
        if self.jobs.send(job).is_err() {
            warn!("remote worker is gone; dropping job");
        }
    }
}

/// Spawns the worker thread
///
/// `deliver` is called on the worker thread with each outcome; the TUI
/// passes a sender into its event channel.
pub fn spawn<R, F>(repo: R, deliver: F) -> RemoteHandle
where
    R: TaskRepository + Send + 'static,
    F: Fn(RemoteOutcome) + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        for job in rx {
            deliver(run_job(&repo, job));
        }
    });

    RemoteHandle::new(tx)
}

fn run_job<R: TaskRepository>(repo: &R, job: RemoteJob) -> RemoteOutcome {
    match job {
        RemoteJob::Fetch => match repo.fetch_all() {
            Ok(tasks) => RemoteOutcome::Fetched(tasks),
            Err(err) => {
                warn!("task fetch failed, previous list stands: {}", err);
                RemoteOutcome::FetchFailed(err)
            }
        },
        RemoteJob::PersistOrder(updates) => match repo.update_order(&updates) {
            Ok(()) => RemoteOutcome::OrderPersisted,
            Err(err) => {
                warn!("order update not persisted: {}", err);
                RemoteOutcome::OrderFailed(err)
            }
        },
        RemoteJob::Create(draft) => mutation(MutationKind::Create, repo.create(&draft).map(|_| ())),
        RemoteJob::Edit(id, fields) => mutation(MutationKind::Edit, repo.update_task(id, &fields)),
        RemoteJob::Delete(id) => mutation(MutationKind::Delete, repo.delete_task(id)),
    }
}

fn mutation(kind: MutationKind, result: Result<(), RemoteError>) -> RemoteOutcome {
    match result {
        Ok(()) => RemoteOutcome::Mutated(kind),
        Err(err) => {
            warn!("task {} failed: {}", kind.verb(), err);
            RemoteOutcome::MutationFailed(kind, err)
        }
    }
}
