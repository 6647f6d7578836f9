//! # Run a single job.
//!
//! Executes one [`QueuedJob`], publishes its terminal lifecycle event, and
//! routes the outcome through the fault policy.
//!
//! ## Outcome flow
//! ```text
//! job.run() → Ok(())            → publish JobCompleted
//! job.run() → Err(Canceled)     → publish JobCanceled (swallowed, no hook)
//! job.run() → Err(Fail)         → publish JobFailed   → hook (or escalate)
//! job panics → caught           → publish JobFailed   → hook (or escalate)
//! ```
//!
//! ## Rules
//! - Always publishes **exactly one** terminal event per job.
//! - Panics are caught at this boundary and converted to [`JobError::Panic`];
//!   a faulting job never takes down its worker.
//! - A fault with no hook registered is process-fatal: it is logged and the
//!   process aborts. Background faults are never lost silently.

use futures::FutureExt;

use crate::{
    core::queue::QueuedJob,
    error::JobError,
    events::{Bus, Event, EventKind},
    hook,
};

/// Executes one job to completion and applies the fault policy.
///
/// Cancellation is a normal outcome: it is published as [`EventKind::JobCanceled`]
/// and never reaches the hook. Any other error, including a caught panic, is
/// published as [`EventKind::JobFailed`] and handed to the registered hook;
/// if no hook is registered the fault escalates and the process aborts.
pub(crate) async fn run_job(item: QueuedJob, bus: &Bus) {
    let name = item.job.name().to_string();
    bus.publish(Event::now(EventKind::JobStarting).with_job(name.as_str()));

    let fut = item.job.run(item.token.clone());
    let outcome = match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
        Ok(Ok(())) => {
            bus.publish(Event::now(EventKind::JobCompleted).with_job(name.as_str()));
            return;
        }
        Ok(Err(e)) => e,
        Err(panic) => JobError::Panic {
            message: panic_message(panic),
        },
    };

    if outcome.is_cancellation() {
        bus.publish(Event::now(EventKind::JobCanceled).with_job(name.as_str()));
        return;
    }

    bus.publish(
        Event::now(EventKind::JobFailed)
            .with_job(name.as_str())
            .with_reason(outcome.to_string()),
    );
    route_fault(&outcome, &name, bus);
}

/// Applies the process-wide fault policy to one escaped fault.
fn route_fault(err: &JobError, job: &str, bus: &Bus) {
    match hook::fault_hook() {
        Some(handler) => handler(err),
        None => {
            bus.publish(
                Event::now(EventKind::FaultEscalated)
                    .with_job(job)
                    .with_reason(err.to_string()),
            );
            log::error!("[taskpool] unhandled fault in job '{job}' with no hook registered: {err}");
            std::process::abort();
        }
    }
}

/// Renders a caught panic payload as a string.
fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
