//! # Dispatcher: the single serialization point for queue and counter state.
//!
//! One spawned task owns the [`JobQueue`] and the active-worker counter.
//! Every other task (submitters, pool workers, introspection) talks to it
//! through message round-trips on an unbounded channel, so queue and counter
//! mutations are serialized by construction and need no lock.
//!
//! ## Message flow
//! ```text
//! submit()            ──► Submit(job)        ─► enqueue
//!                                             ─► active < workers?
//!                                                  ├─ yes: active += 1,
//!                                                  │       spawn worker
//!                                                  └─ no:  nothing
//!
//! worker next_job()   ──► Next(reply)        ─► dequeue
//!                                                  ├─ Some(job): reply job
//!                                                  └─ None: active -= 1,
//!                                                           reply None (park)
//!
//! active_workers()    ──► ActiveWorkers(reply) ─► reply counter
//! ```
//!
//! ## Rules
//! - `Submit` is the **only** activation site; the counter never exceeds the
//!   configured worker bound.
//! - A worker's slot is released by the dispatcher itself, in the same
//!   round-trip that reports the empty queue; the worker merely observes it.
//! - A freshly activated worker and an existing worker's next iteration may
//!   race for the same item. That is intentional: the counter bounds
//!   concurrency, not which worker runs which item. Dequeue is exclusive, so
//!   no item is ever delivered twice.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::queue::{JobQueue, QueuedJob};
use crate::core::worker;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};

/// Requests understood by the dispatcher task.
pub(crate) enum DispatchMsg {
    /// Enqueue a job and activate a worker if capacity allows.
    Submit(QueuedJob),
    /// Dequeue the head job; an empty queue parks the asking worker.
    Next(oneshot::Sender<Option<QueuedJob>>),
    /// Report the current active-worker count.
    ActiveWorkers(oneshot::Sender<usize>),
}

/// Cloneable sender half used by submitters and workers.
///
/// Every method is a round-trip to the dispatcher task; [`RuntimeError::Closed`]
/// means the dispatcher has shut down.
#[derive(Clone)]
pub(crate) struct DispatcherHandle {
    tx: mpsc::UnboundedSender<DispatchMsg>,
}

impl DispatcherHandle {
    /// Hands a job to the dispatcher (fire-and-forget).
    pub fn submit(&self, job: QueuedJob) -> Result<(), RuntimeError> {
        self.tx
            .send(DispatchMsg::Submit(job))
            .map_err(|_| RuntimeError::Closed)
    }

    /// Requests the next queued job; `None` means the queue was empty and
    /// the caller's worker slot has already been released.
    pub async fn next_job(&self) -> Result<Option<QueuedJob>, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(DispatchMsg::Next(reply_tx))
            .map_err(|_| RuntimeError::Closed)?;
        reply_rx.await.map_err(|_| RuntimeError::Closed)
    }

    /// Reads the current active-worker count (test observation).
    pub async fn active_workers(&self) -> Result<usize, RuntimeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(DispatchMsg::ActiveWorkers(reply_tx))
            .map_err(|_| RuntimeError::Closed)?;
        reply_rx.await.map_err(|_| RuntimeError::Closed)
    }
}

/// Queue and counter state, owned exclusively by the dispatcher task.
struct Dispatcher {
    queue: JobQueue,
    active: usize,
    workers: usize,
    bus: Bus,
    /// Handed to each activated worker so it can run its fetch loop.
    handle: DispatcherHandle,
}

/// Spawns the dispatcher task and returns its handle plus the join handle.
///
/// `workers` is clamped to at least 1. When `shutdown` fires the task stops
/// handing out queued jobs, keeps serving round-trips until every active
/// worker has parked, then exits. Queued-but-unexecuted jobs are dropped at
/// that point (items are transient by contract).
pub(crate) fn spawn(
    workers: usize,
    bus: Bus,
    shutdown: CancellationToken,
) -> (DispatcherHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = DispatcherHandle { tx };
    let dispatcher = Dispatcher {
        queue: JobQueue::new(),
        active: 0,
        workers: workers.max(1),
        bus,
        handle: handle.clone(),
    };
    let task = tokio::spawn(dispatcher.run(rx, shutdown));
    (handle, task)
}

impl Dispatcher {
    /// Serves round-trips until shutdown, then drains the pool.
    ///
    /// The dispatcher keeps a sender to itself (for workers), so the channel
    /// never closes on its own; the shutdown token is the exit path.
    async fn run(
        mut self,
        mut rx: mpsc::UnboundedReceiver<DispatchMsg>,
        shutdown: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                msg = rx.recv() => match msg {
                    Some(msg) => self.handle_msg(msg),
                    None => break,
                },
            }
        }
        self.drain(&mut rx).await;
        if !self.queue.is_empty() {
            log::warn!(
                "[taskpool] dispatcher shutting down with {} queued job(s) dropped",
                self.queue.len()
            );
        }
    }

    /// Keeps serving round-trips after shutdown until every worker has
    /// parked.
    ///
    /// Queued jobs are no longer handed out: each worker finishes its
    /// in-flight item (whose token is already cancelled), asks for the next
    /// one, and is parked with `None`. The dispatcher only exits once the
    /// active-worker count reaches 0, so the executor's grace timeout
    /// covers in-flight pool work, not just the dispatcher itself.
    async fn drain(&mut self, rx: &mut mpsc::UnboundedReceiver<DispatchMsg>) {
        while self.active > 0 {
            match rx.recv().await {
                Some(DispatchMsg::Next(reply)) => {
                    self.active = self.active.saturating_sub(1);
                    self.bus.publish(Event::now(EventKind::WorkerParked));
                    let _ = reply.send(None);
                }
                Some(DispatchMsg::Submit(job)) => {
                    log::warn!(
                        "[taskpool] submission during shutdown; dropping job '{}'",
                        job.job.name()
                    );
                }
                Some(DispatchMsg::ActiveWorkers(reply)) => {
                    let _ = reply.send(self.active);
                }
                None => break,
            }
        }
    }

    fn handle_msg(&mut self, msg: DispatchMsg) {
        match msg {
            DispatchMsg::Submit(job) => {
                self.queue.enqueue(job);
                if self.active < self.workers {
                    self.active += 1;
                    self.bus.publish(Event::now(EventKind::WorkerActivated));
                    tokio::spawn(worker::run(self.handle.clone(), self.bus.clone()));
                }
            }
            DispatchMsg::Next(reply) => match self.queue.dequeue() {
                Some(job) => {
                    // Reply failure means the worker died mid-round-trip;
                    // its slot is released and the dequeued item is dropped.
                    if let Err(lost) = reply.send(Some(job)) {
                        if let Some(item) = lost {
                            log::warn!(
                                "[taskpool] worker vanished; dropping job '{}'",
                                item.job.name()
                            );
                        }
                        self.active = self.active.saturating_sub(1);
                    }
                }
                None => {
                    self.active = self.active.saturating_sub(1);
                    self.bus.publish(Event::now(EventKind::WorkerParked));
                    let _ = reply.send(None);
                }
            },
            DispatchMsg::ActiveWorkers(reply) => {
                let _ = reply.send(self.active);
            }
        }
    }
}
