//! # Pool worker: the fetch-execute-reschedule loop.
//!
//! Each activated worker repeats:
//! 1. ask the dispatcher for the next job (round-trip);
//! 2. run it via the [`runner`](crate::core::runner);
//! 3. yield the thread before looping.
//!
//! The yield between items is deliberate: a worker never pins its runtime
//! thread across a chain of jobs, so other tasks (including cancellation
//! delivery and the I/O lane) interleave even under a long backlog.
//!
//! A worker exits when the dispatcher replies `None` (its active-worker
//! slot was already released inside that same round-trip) or when the
//! dispatcher has shut down.

use crate::core::dispatcher::DispatcherHandle;
use crate::core::runner;
use crate::events::Bus;

/// Runs one worker until the queue is empty or the dispatcher is gone.
pub(crate) async fn run(handle: DispatcherHandle, bus: Bus) {
    loop {
        match handle.next_job().await {
            Ok(Some(job)) => {
                runner::run_job(job, &bus).await;
                // Cooperative re-scheduling point between items.
                tokio::task::yield_now().await;
            }
            // Parked (slot already released) or dispatcher shut down.
            Ok(None) | Err(_) => break,
        }
    }
}
