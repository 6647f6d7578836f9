//! Execution core: dispatcher, pool workers, I/O lane, and the facade.
//!
//! Internal modules:
//! - [`queue`]: plain FIFO owned by the dispatcher task;
//! - [`dispatcher`]: serialization point for queue and counter mutations;
//! - [`worker`]: the fetch-execute-reschedule loop of one pool worker;
//! - [`runner`]: executes one job and applies the fault policy;
//! - [`io_lane`]: dedicated lane for I/O-flagged jobs;
//! - [`executor`]: the public facade.

mod dispatcher;
mod executor;
mod io_lane;
mod queue;
mod runner;
mod worker;

pub use executor::{Executor, Lane};
pub use io_lane::is_io_lane;
