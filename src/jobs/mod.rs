//! Job trait and the function-backed adapter.

mod job;
mod job_fn;

pub use job::{Job, JobRef};
pub use job_fn::JobFn;
