//! # Job abstraction.
//!
//! This module defines the [`Job`] trait (async, cancelable). The common
//! handle type is [`JobRef`], an `Arc<dyn Job>` suitable for moving through
//! the queue and across workers.
//!
//! A job receives a [`CancellationToken`] and should periodically check it to
//! stop cooperatively; the executor treats [`JobError::Canceled`] as a
//! normal outcome, not a fault.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;

/// Shared handle to a job (`Arc<dyn Job>`).
pub type JobRef = Arc<dyn Job>;

/// # Asynchronous, cancelable unit of work.
///
/// A `Job` has a stable [`name`](Job::name) and an async [`run`](Job::run)
/// method that receives a [`CancellationToken`]. The executor never inspects
/// a job beyond invoking it; payload and behavior are entirely the caller's.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use taskpool::{Job, JobError};
///
/// struct Demo;
///
/// #[async_trait]
/// impl Job for Demo {
///     fn name(&self) -> &str { "demo" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), JobError> {
///         if ctx.is_cancelled() {
///             return Err(JobError::Canceled);
///         }
///         // do work...
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Job: Send + Sync + 'static {
    /// Returns a stable, human-readable job name.
    fn name(&self) -> &str;

    /// Executes the job until completion or cancellation.
    ///
    /// Implementations should check `ctx.is_cancelled()` at convenient
    /// points and return [`JobError::Canceled`] promptly when it fires.
    async fn run(&self, ctx: CancellationToken) -> Result<(), JobError>;
}
