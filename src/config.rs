//! # Executor configuration.
//!
//! [`Config`] fixes the pool size and ambient runtime knobs for the lifetime
//! of one [`Executor`](crate::Executor). The worker bound is immutable after
//! construction; there is no dynamic resizing.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use taskpool::Config;
//!
//! let mut cfg = Config::default();
//! cfg.workers = 4;
//! cfg.grace = Duration::from_secs(5);
//!
//! assert_eq!(cfg.workers, 4);
//! ```

use std::time::Duration;

/// Construction-time configuration for the executor.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of simultaneously active pool workers.
    ///
    /// Must be positive; a value of 0 is clamped to 1 at construction.
    /// I/O-lane work is not counted against this bound.
    pub workers: usize,
    /// Capacity of the event bus broadcast channel.
    pub bus_capacity: usize,
    /// Maximum time [`Executor::shutdown`](crate::Executor::shutdown) waits
    /// for the dispatcher and I/O lane to drain.
    pub grace: Duration,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `workers = 4`
    /// - `bus_capacity = 1024`
    /// - `grace = 30s`
    fn default() -> Self {
        Self {
            workers: 4,
            bus_capacity: 1024,
            grace: Duration::from_secs(30),
        }
    }
}
