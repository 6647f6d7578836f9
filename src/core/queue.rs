//! # FIFO job queue owned by the dispatcher.
//!
//! Plain, non-thread-safe FIFO. Correctness depends on single ownership:
//! the queue lives inside the dispatcher task and is never shared, so no
//! lock is needed and mutual exclusion is structural.
//!
//! ## Invariants
//! - `enqueue` appends at the tail, `dequeue` removes from the head, both O(1).
//! - `dequeue` returns `None` iff the queue is empty (`len() == 0`).
//! - FIFO order is preserved for all jobs submitted to the same queue.

use std::collections::VecDeque;

use tokio_util::sync::CancellationToken;

use crate::jobs::JobRef;

/// One queued unit: the job plus the cancellation token minted for it at
/// submission time. Ownership transfers to the executing worker at dequeue.
pub(crate) struct QueuedJob {
    /// The caller-supplied job.
    pub job: JobRef,
    /// Per-item token, a child of the executor's runtime token.
    pub token: CancellationToken,
}

/// FIFO queue of jobs awaiting a pool worker.
pub(crate) struct JobQueue {
    items: VecDeque<QueuedJob>,
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    /// Appends a job at the tail.
    pub fn enqueue(&mut self, job: QueuedJob) {
        self.items.push_back(job);
    }

    /// Removes and returns the head job, or `None` when empty.
    pub fn dequeue(&mut self) -> Option<QueuedJob> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
