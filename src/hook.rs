//! # Process-wide fault hook.
//!
//! At most one handler receives every fault that escapes a job (cancellation
//! excluded). Registration is last-writer-wins and there is no
//! unregistration; the slot persists across executor instances.
//!
//! ## Routing policy
//! ```text
//! job outcome ──► Canceled        → swallowed (normal outcome)
//!             ──► fault, hook set → hook(fault), pool loop continues
//!             ──► fault, no hook  → log::error! + process abort
//! ```
//!
//! A background fault with no recovery path must not be lost silently, so
//! the no-hook case is deliberately process-fatal.
//!
//! ## Thread safety
//! The slot is read from any pool worker and from the I/O lane at the moment
//! a fault is routed; a `RwLock` gives tear-free last-writer-wins semantics
//! without requiring readers to coordinate.

use std::sync::{Arc, RwLock};

use crate::error::JobError;

/// Handler invoked with each fault that escapes a job.
pub type FaultHook = Arc<dyn Fn(&JobError) + Send + Sync>;

static HOOK: RwLock<Option<FaultHook>> = RwLock::new(None);

/// Registers the process-wide fault hook, replacing any previous handler.
///
/// Effective for all subsequently-faulting jobs, on every executor in the
/// process. The handler is called synchronously from the worker (or I/O
/// lane) that ran the faulting job, so it should return quickly.
///
/// # Example
/// ```
/// use taskpool::set_fault_hook;
///
/// set_fault_hook(|err| {
///     eprintln!("background job fault: {err}");
/// });
/// ```
pub fn set_fault_hook<H>(handler: H)
where
    H: Fn(&JobError) + Send + Sync + 'static,
{
    let mut slot = HOOK.write().unwrap_or_else(|e| e.into_inner());
    *slot = Some(Arc::new(handler));
}

/// Returns the currently registered hook, if any.
pub(crate) fn fault_hook() -> Option<FaultHook> {
    let slot = HOOK.read().unwrap_or_else(|e| e.into_inner());
    slot.clone()
}

/// Serializes tests that touch the process-wide hook slot.
#[cfg(test)]
pub(crate) fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(|e| e.into_inner())
}
