//! # taskpool
//!
//! **taskpool** is a bounded background work-execution core for tokio.
//!
//! It runs opaque, cancellable async jobs on a fixed-size worker pool fed by
//! a FIFO queue, with a dedicated I/O lane that bypasses pool capacity
//! entirely and a process-wide hook for faults that escape a job.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   callers: submit(job, lane)
//!        │
//!        ├── Lane::Pool ──► ┌──────────────────────────────────────────┐
//!        │                  │ Dispatcher (single serialization point)  │
//!        │                  │  - JobQueue (FIFO, exclusively owned)    │
//!        │                  │  - active-worker counter (≤ workers)     │
//!        │                  │  - activates workers on demand           │
//!        │                  └──────┬──────────────┬────────────────────┘
//!        │                         ▼              ▼
//!        │                  ┌────────────┐ ┌────────────┐
//!        │                  │  worker 1  │ │  worker N  │   fetch ► run ►
//!        │                  │ (fetch loop)│ │(fetch loop)│   yield ► repeat
//!        │                  └──────┬─────┘ └──────┬─────┘
//!        │                         │              │
//!        └── Lane::Io ──► I/O lane task (own channel, never queued,
//!                          │        never counted against the pool)
//!                          ▼
//!                       runner: catch panics, classify outcome
//!                          ├── Ok          → JobCompleted event
//!                          ├── Canceled    → JobCanceled event (swallowed)
//!                          └── fault       → JobFailed event → fault hook
//!                                            (no hook → log + abort)
//! ```
//!
//! ### Guarantees
//! - Queue and counter state are touched only by the dispatcher task; every
//!   other task performs message round-trips. No locks on the hot path.
//! - The active-worker count never exceeds `Config::workers`; activation
//!   happens only inside the submit round-trip that enqueued the item.
//! - Pool jobs dequeue in FIFO submission order; no item runs twice.
//! - Workers yield between items, so a long backlog never pins a runtime
//!   thread.
//! - I/O-lane jobs start regardless of pool saturation.
//! - A fault escaping a job never stops the pool; it reaches the registered
//!   [`set_fault_hook`] handler exactly once, or escalates (process abort)
//!   when no handler exists. Cancellation is swallowed as a normal outcome.
//!
//! ## Features
//! | Area           | Description                                            | Key types / fns                  |
//! |----------------|--------------------------------------------------------|----------------------------------|
//! | **Jobs**       | Define cancellable async work units.                   | [`Job`], [`JobFn`], [`JobRef`]   |
//! | **Execution**  | Bounded pool plus dedicated I/O lane.                  | [`Executor`], [`Lane`]           |
//! | **Faults**     | Process-wide routing of escaped errors and panics.     | [`set_fault_hook`], [`JobError`] |
//! | **Events**     | Seq-numbered lifecycle events over a broadcast bus.    | [`Event`], [`EventKind`], [`Bus`]|
//! | **Config**     | Pool size, bus capacity, shutdown grace.               | [`Config`]                       |
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use taskpool::{Config, Executor, JobError, JobFn, Lane, set_fault_hook};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     set_fault_hook(|err| eprintln!("background fault: {err}"));
//!
//!     let mut cfg = Config::default();
//!     cfg.workers = 2;
//!     let pool = Executor::new(cfg);
//!
//!     // Pool work: queued FIFO, at most 2 running at once.
//!     for i in 0..5 {
//!         pool.submit(
//!             JobFn::arc(format!("step-{i}"), move |ctx: CancellationToken| async move {
//!                 if ctx.is_cancelled() {
//!                     return Err(JobError::Canceled);
//!                 }
//!                 // do work...
//!                 Ok(())
//!             }),
//!             Lane::Pool,
//!         )?;
//!     }
//!
//!     // I/O work: bypasses the queue and the worker bound.
//!     pool.submit(
//!         JobFn::arc("flush-log", |_ctx| async { Ok(()) }),
//!         Lane::Io,
//!     )?;
//!
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!     pool.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod hook;
mod jobs;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{Executor, Lane, is_io_lane};
pub use error::{JobError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use hook::{FaultHook, set_fault_hook};
pub use jobs::{Job, JobFn, JobRef};
