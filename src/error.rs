//! Error types used by the taskpool runtime and jobs.
//!
//! Two enums:
//!
//! - [`JobError`] — outcomes of a single job execution that the runner must
//!   classify (cancellation vs. fault).
//! - [`RuntimeError`] — failures of the executor machinery itself.
//!
//! Both provide `as_label`/`as_message` helpers for logging and metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the executor runtime.
///
/// These represent failures of the execution machinery, not of individual
/// jobs: submitting to an executor that has shut down, or a shutdown that
/// did not drain within its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The dispatcher or I/O lane has terminated; no further submissions
    /// or introspection round-trips are possible.
    #[error("executor closed")]
    Closed,

    /// Shutdown grace period was exceeded; some lane did not drain in time.
    #[error("shutdown grace {grace:?} exceeded; forcing termination")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Closed => "runtime_closed",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    ///
    /// # Example
    /// ```
    /// use taskpool::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5) };
    /// assert_eq!(err.as_message(), "grace exceeded after 5s");
    /// ```
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::Closed => "executor closed".to_string(),
            RuntimeError::GraceExceeded { grace } => {
                format!("grace exceeded after {grace:?}")
            }
        }
    }
}

/// # Outcomes of a single job execution.
///
/// Cancellation is a normal, expected outcome and is never routed to the
/// fault hook; everything else is a fault.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum JobError {
    /// Job observed its cancellation token and unwound cooperatively.
    #[error("job cancelled")]
    Canceled,

    /// Job returned an error.
    #[error("job failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Job panicked; the panic was caught at the execution boundary.
    #[error("job panicked: {message}")]
    Panic {
        /// Panic payload rendered as a string.
        message: String,
    },
}

impl JobError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskpool::JobError;
    ///
    /// let err = JobError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "job_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Canceled => "job_canceled",
            JobError::Fail { .. } => "job_failed",
            JobError::Panic { .. } => "job_panicked",
        }
    }

    /// Returns a human-readable message with details about the outcome.
    pub fn as_message(&self) -> String {
        match self {
            JobError::Canceled => "cancelled".to_string(),
            JobError::Fail { error } => format!("error: {error}"),
            JobError::Panic { message } => format!("panic: {message}"),
        }
    }

    /// True for the one non-fault outcome: cooperative cancellation.
    ///
    /// The runner swallows cancellations; only faults reach the hook.
    ///
    /// # Example
    /// ```
    /// use taskpool::JobError;
    ///
    /// assert!(JobError::Canceled.is_cancellation());
    /// assert!(!JobError::Fail { error: "x".into() }.is_cancellation());
    /// ```
    pub fn is_cancellation(&self) -> bool {
        matches!(self, JobError::Canceled)
    }
}
