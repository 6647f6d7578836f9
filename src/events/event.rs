//! # Runtime events emitted by the dispatcher, workers, and the I/O lane.
//!
//! [`EventKind`] classifies events across three categories:
//! - **Worker events**: activation and parking of pool workers
//! - **Job lifecycle events**: one terminal event per executed job
//! - **Runtime events**: shutdown and fault escalation
//!
//! ## Ordering guarantees
//! Each event carries a globally unique sequence number (`seq`) that
//! increases monotonically. Use `seq` to restore the exact order when events
//! are delivered out of order.
//!
//! ## Example
//! ```rust
//! use taskpool::{Event, EventKind};
//!
//! let ev = Event::now(EventKind::JobFailed)
//!     .with_job("sync-index")
//!     .with_reason("boom");
//!
//! assert_eq!(ev.kind, EventKind::JobFailed);
//! assert_eq!(ev.job.as_deref(), Some("sync-index"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Worker events ===
    /// A pool worker was activated by the dispatcher (counter incremented).
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    WorkerActivated,

    /// A pool worker found the queue empty and parked (counter decremented).
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    WorkerParked,

    // === Job lifecycle events ===
    /// A job was handed to the runner and is starting.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    JobStarting,

    /// A job finished successfully.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    JobCompleted,

    /// A job observed cancellation and unwound cooperatively (non-fault).
    ///
    /// Sets:
    /// - `job`: job name
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    JobCanceled,

    /// A job faulted (error return or caught panic); the fault was routed
    /// to the hook if one was registered.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `reason`: fault message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    JobFailed,

    // === Runtime events ===
    /// A fault escaped a job while no hook was registered; the process is
    /// about to abort.
    ///
    /// Sets:
    /// - `job`: job name
    /// - `reason`: fault message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    FaultEscalated,

    /// Executor shutdown was requested.
    ///
    /// Sets:
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ShutdownRequested,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the job, if applicable.
    pub job: Option<Arc<str>>,
    /// Human-readable reason (fault messages, escalation details).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with the current timestamp and
    /// the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            job: None,
            reason: None,
        }
    }

    /// Attaches a job name.
    #[inline]
    pub fn with_job(mut self, job: impl Into<Arc<str>>) -> Self {
        self.job = Some(job.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::JobStarting);
        let b = Event::now(EventKind::JobCompleted);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::now(EventKind::JobFailed)
            .with_job("j")
            .with_reason("r");
        assert_eq!(ev.job.as_deref(), Some("j"));
        assert_eq!(ev.reason.as_deref(), Some("r"));
    }
}
