//! # I/O lane: dedicated execution for I/O-flagged jobs.
//!
//! One lane task fed by its own unbounded channel. I/O-flagged jobs go
//! straight here and never touch the pool queue or the active-worker
//! counter, so a saturated pool cannot delay them and I/O work never
//! consumes pool capacity.
//!
//! Jobs on the lane run inside a task-local marker scope; [`is_io_lane`]
//! lets a job ask whether it is already executing on the lane so it can
//! skip a needless hand-off (reentrancy optimization, not a correctness
//! requirement).
//!
//! Lane jobs run sequentially in submission order, but there is no ordering
//! guarantee between the lane and the pool: the two are independent streams.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::queue::QueuedJob;
use crate::core::runner;
use crate::error::RuntimeError;
use crate::events::Bus;

tokio::task_local! {
    /// Present only inside futures running on the I/O lane.
    static ON_IO_LANE: ();
}

/// True when the calling task is currently executing on the I/O lane.
///
/// # Example
/// ```
/// use taskpool::is_io_lane;
///
/// assert!(!is_io_lane());
/// ```
pub fn is_io_lane() -> bool {
    ON_IO_LANE.try_with(|_| ()).is_ok()
}

/// Sender half for the lane; owned by the executor.
pub(crate) struct IoLane {
    tx: mpsc::UnboundedSender<QueuedJob>,
}

impl IoLane {
    /// Hands a job directly to the lane (fire-and-forget).
    pub fn submit(&self, job: QueuedJob) -> Result<(), RuntimeError> {
        self.tx.send(job).map_err(|_| RuntimeError::Closed)
    }
}

/// Spawns the lane task and returns its sender plus the join handle.
pub(crate) fn spawn(bus: Bus, shutdown: CancellationToken) -> (IoLane, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<QueuedJob>();
    let task = tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                item = rx.recv() => match item {
                    Some(job) => ON_IO_LANE.scope((), runner::run_job(job, &bus)).await,
                    None => break,
                },
            }
        }
    });
    (IoLane { tx }, task)
}
