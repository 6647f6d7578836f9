//! # Executor: public facade wiring both lanes together.
//!
//! [`Executor`] owns the dispatcher, the I/O lane, the event bus, and the
//! runtime cancellation token. Submission is fire-and-forget: `submit`
//! returns immediately with a per-item cancellation token and never reports
//! the job's outcome back to the caller; outcomes flow through the event
//! bus and the fault hook instead.
//!
//! ## High-level architecture
//! ```text
//! submit(job, Lane::Pool) ──► Dispatcher ──► JobQueue ──► pool workers
//!                                  │                        (≤ cfg.workers)
//!                                  └── activates workers on demand
//!
//! submit(job, Lane::Io)   ──────────────────────────────► I/O lane task
//!                                                          (bypasses queue
//!                                                           and counter)
//!
//! Outcomes:  runner ──► Bus (events) ──► subscribers
//!            runner ──► fault hook (faults only, cancellation excluded)
//!
//! Shutdown path:
//!   shutdown() ─► publish ShutdownRequested
//!             ─► cancel runtime token  → propagates to per-item tokens
//!             ─► await dispatcher + lane within cfg.grace
//!                   ├─ drained in time  → Ok(())
//!                   └─ still running    → Err(GraceExceeded)
//! ```

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::dispatcher::{self, DispatcherHandle};
use crate::core::io_lane::{self, IoLane};
use crate::core::queue::QueuedJob;
use crate::error::RuntimeError;
use crate::events::{Bus, Event, EventKind};
use crate::jobs::JobRef;

/// Which execution lane a submitted job is routed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lane {
    /// The bounded worker pool: FIFO queue, on-demand activation.
    Pool,
    /// The dedicated I/O lane: immediate hand-off, no capacity accounting.
    Io,
}

/// Bounded background work executor with a dedicated I/O lane.
///
/// Must be created inside a tokio runtime; construction spawns the
/// dispatcher and lane tasks. The pool size is fixed for the executor's
/// lifetime.
///
/// ## Example
/// ```rust
/// use std::time::Duration;
/// use taskpool::{Config, Executor, JobFn, Lane};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut cfg = Config::default();
///     cfg.workers = 2;
///
///     let pool = Executor::new(cfg);
///     pool.submit(
///         JobFn::arc("hello", |_ctx| async {
///             println!("hello from the pool");
///             Ok(())
///         }),
///         Lane::Pool,
///     )?;
///
///     pool.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct Executor {
    cfg: Config,
    bus: Bus,
    dispatcher: DispatcherHandle,
    io: IoLane,
    token: CancellationToken,
    dispatcher_task: JoinHandle<()>,
    io_task: JoinHandle<()>,
}

impl Executor {
    /// Creates the executor and spawns its dispatcher and I/O lane.
    pub fn new(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        let token = CancellationToken::new();
        let (dispatcher, dispatcher_task) =
            dispatcher::spawn(cfg.workers, bus.clone(), token.child_token());
        let (io, io_task) = io_lane::spawn(bus.clone(), token.child_token());
        Self {
            cfg,
            bus,
            dispatcher,
            io,
            token,
            dispatcher_task,
            io_task,
        }
    }

    /// Submits a job for background execution on the given lane.
    ///
    /// Returns immediately; the job's completion is never awaited here and
    /// its outcome never propagates back to the caller. The returned token
    /// cancels this one item: the job observes it cooperatively and should
    /// unwind with [`JobError::Canceled`](crate::JobError::Canceled).
    pub fn submit(&self, job: JobRef, lane: Lane) -> Result<CancellationToken, RuntimeError> {
        let token = self.token.child_token();
        let item = QueuedJob {
            job,
            token: token.clone(),
        };
        match lane {
            Lane::Pool => self.dispatcher.submit(item)?,
            Lane::Io => self.io.submit(item)?,
        }
        Ok(token)
    }

    /// Current number of active pool workers, in `[0, cfg.workers]`.
    ///
    /// Intended for test observation, not production control flow.
    pub async fn active_workers(&self) -> Result<usize, RuntimeError> {
        self.dispatcher.active_workers().await
    }

    /// Subscribes to the runtime event stream.
    ///
    /// The receiver observes events published after this call; see
    /// [`Bus`](crate::Bus) for lag semantics.
    pub fn events(&self) -> tokio::sync::broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Shuts the executor down, waiting up to [`Config::grace`].
    ///
    /// Cancels the runtime token (which propagates to every in-flight item's
    /// token), then waits for both lanes to drain: the dispatcher exits only
    /// after every active worker has finished its in-flight job and parked,
    /// and the I/O lane finishes the job it is running before it stops.
    /// Queued-but-unexecuted jobs are dropped; items are transient and are
    /// never persisted. Returns [`RuntimeError::GraceExceeded`] if in-flight
    /// work is still running when the grace period ends.
    pub async fn shutdown(self) -> Result<(), RuntimeError> {
        self.bus.publish(Event::now(EventKind::ShutdownRequested));
        self.token.cancel();

        let grace = self.cfg.grace;
        let done = async {
            let _ = self.dispatcher_task.await;
            let _ = self.io_task.await;
        };
        match tokio::time::timeout(grace, done).await {
            Ok(()) => Ok(()),
            Err(_) => Err(RuntimeError::GraceExceeded { grace }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use tokio::sync::Semaphore;

    use crate::error::JobError;
    use crate::hook::set_fault_hook;
    use crate::jobs::{JobFn, JobRef};

    fn config(workers: usize) -> Config {
        Config {
            workers,
            bus_capacity: 256,
            grace: Duration::from_secs(5),
        }
    }

    async fn wait_until(mut probe: impl FnMut() -> bool) {
        for _ in 0..400 {
            if probe() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    async fn wait_for_idle(pool: &Executor) {
        for _ in 0..400 {
            if pool.active_workers().await.unwrap() == 0 {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("pool never drained");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_burst_respects_worker_bound_and_runs_each_job_once() {
        let pool = Executor::new(config(2));

        let current = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let runs = Arc::new(AtomicUsize::new(0));

        for name in ["a", "b", "c", "d", "e"] {
            let current = current.clone();
            let peak = peak.clone();
            let runs = runs.clone();
            let job: JobRef = JobFn::arc(name, move |_ctx| {
                let current = current.clone();
                let peak = peak.clone();
                let runs = runs.clone();
                async move {
                    let now = current.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    current.fetch_sub(1, Ordering::SeqCst);
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            });
            pool.submit(job, Lane::Pool).unwrap();
        }

        let r = runs.clone();
        wait_until(move || r.load(Ordering::SeqCst) == 5).await;
        wait_for_idle(&pool).await;

        assert_eq!(runs.load(Ordering::SeqCst), 5, "each job runs exactly once");
        assert!(
            peak.load(Ordering::SeqCst) <= 2,
            "never more than cfg.workers jobs in flight"
        );

        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_single_worker_preserves_fifo_order() {
        let pool = Executor::new(config(1));

        let order = Arc::new(Mutex::new(Vec::new()));
        for name in ["a", "b", "c", "d", "e"] {
            let order = order.clone();
            pool.submit(
                JobFn::arc(name, move |_ctx| {
                    let order = order.clone();
                    async move {
                        order.lock().unwrap().push(name);
                        Ok(())
                    }
                }),
                Lane::Pool,
            )
            .unwrap();
        }

        let o = order.clone();
        wait_until(move || o.lock().unwrap().len() == 5).await;
        assert_eq!(*order.lock().unwrap(), ["a", "b", "c", "d", "e"]);

        pool.shutdown().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_io_job_runs_while_pool_is_saturated() {
        let pool = Executor::new(config(1));

        // Saturate the single pool slot with a job that blocks on a gate.
        let gate = Arc::new(Semaphore::new(0));
        let g = gate.clone();
        pool.submit(
            JobFn::arc("blocker", move |_ctx| {
                let g = g.clone();
                async move {
                    g.acquire().await.expect("gate closed").forget();
                    Ok(())
                }
            }),
            Lane::Pool,
        )
        .unwrap();

        for _ in 0..400 {
            if pool.active_workers().await.unwrap() == 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(pool.active_workers().await.unwrap(), 1, "pool saturated");

        // The I/O job must start and finish despite pool saturation.
        let io_done = Arc::new(AtomicUsize::new(0));
        let d = io_done.clone();
        pool.submit(
            JobFn::arc("io-probe", move |_ctx| {
                let d = d.clone();
                async move {
                    d.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
            Lane::Io,
        )
        .unwrap();

        let d = io_done.clone();
        wait_until(move || d.load(Ordering::SeqCst) == 1).await;
        assert_eq!(pool.active_workers().await.unwrap(), 1, "pool still saturated");

        gate.add_permits(1);
        wait_for_idle(&pool).await;
        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_fault_is_delivered_once_and_queue_continues() {
        let _guard = crate::hook::test_guard();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        set_fault_hook(move |err| {
            assert!(matches!(err, JobError::Fail { .. }));
            h.fetch_add(1, Ordering::SeqCst);
        });

        let pool = Executor::new(config(1));

        pool.submit(
            JobFn::arc("faulty", |_ctx| async {
                Err(JobError::Fail {
                    error: "broken".into(),
                })
            }),
            Lane::Pool,
        )
        .unwrap();

        let done = Arc::new(AtomicUsize::new(0));
        let d = done.clone();
        pool.submit(
            JobFn::arc("after-fault", move |_ctx| {
                let d = d.clone();
                async move {
                    d.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
            Lane::Pool,
        )
        .unwrap();

        let d = done.clone();
        wait_until(move || d.load(Ordering::SeqCst) == 1).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1, "hook sees the fault exactly once");

        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_item_is_swallowed_and_pool_keeps_going() {
        let _guard = crate::hook::test_guard();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        set_fault_hook(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        let pool = Executor::new(config(1));

        let started = Arc::new(AtomicUsize::new(0));
        let s = started.clone();
        let token = pool
            .submit(
                JobFn::arc("long-haul", move |ctx: CancellationToken| {
                    let s = s.clone();
                    async move {
                        s.fetch_add(1, Ordering::SeqCst);
                        ctx.cancelled().await;
                        Err(JobError::Canceled)
                    }
                }),
                Lane::Pool,
            )
            .unwrap();

        let s = started.clone();
        wait_until(move || s.load(Ordering::SeqCst) == 1).await;
        token.cancel();

        let done = Arc::new(AtomicUsize::new(0));
        let d = done.clone();
        pool.submit(
            JobFn::arc("after-cancel", move |_ctx| {
                let d = d.clone();
                async move {
                    d.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
            Lane::Pool,
        )
        .unwrap();

        let d = done.clone();
        wait_until(move || d.load(Ordering::SeqCst) == 1).await;
        wait_for_idle(&pool).await;
        assert_eq!(hits.load(Ordering::SeqCst), 0, "cancellation never reaches the hook");

        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_events_trace_job_lifecycle() {
        let pool = Executor::new(config(1));
        let mut rx = pool.events();

        pool.submit(JobFn::arc("traced", |_ctx| async { Ok(()) }), Lane::Pool)
            .unwrap();

        let mut kinds = Vec::new();
        while kinds.len() < 4 {
            kinds.push(rx.recv().await.unwrap().kind);
        }
        assert_eq!(
            kinds,
            [
                EventKind::WorkerActivated,
                EventKind::JobStarting,
                EventKind::JobCompleted,
                EventKind::WorkerParked,
            ]
        );

        pool.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_drains_within_grace() {
        let pool = Executor::new(config(2));
        pool.submit(JobFn::arc("quick", |_ctx| async { Ok(()) }), Lane::Pool)
            .unwrap();
        assert!(pool.shutdown().await.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_waits_for_inflight_pool_job() {
        let pool = Executor::new(config(1));

        let started = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));
        let s = started.clone();
        let d = done.clone();
        pool.submit(
            JobFn::arc("slow-but-finite", move |_ctx| {
                let s = s.clone();
                let d = d.clone();
                async move {
                    s.fetch_add(1, Ordering::SeqCst);
                    // Deliberately ignores its token; finishes on its own.
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    d.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            }),
            Lane::Pool,
        )
        .unwrap();

        let s = started.clone();
        wait_until(move || s.load(Ordering::SeqCst) == 1).await;

        pool.shutdown().await.unwrap();
        assert_eq!(
            done.load(Ordering::SeqCst),
            1,
            "shutdown must not return before the in-flight job finished"
        );
    }

    #[tokio::test]
    async fn test_shutdown_reports_grace_exceeded_for_stuck_job() {
        let mut cfg = config(1);
        cfg.grace = Duration::from_millis(100);
        let pool = Executor::new(cfg);

        let started = Arc::new(AtomicUsize::new(0));
        let s = started.clone();
        pool.submit(
            JobFn::arc("stuck", move |_ctx| {
                let s = s.clone();
                async move {
                    s.fetch_add(1, Ordering::SeqCst);
                    futures::future::pending::<()>().await;
                    Ok(())
                }
            }),
            Lane::Pool,
        )
        .unwrap();

        let s = started.clone();
        wait_until(move || s.load(Ordering::SeqCst) == 1).await;

        assert!(matches!(
            pool.shutdown().await,
            Err(RuntimeError::GraceExceeded { .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_after_dispatcher_death_reports_closed() {
        let pool = Executor::new(config(1));
        pool.token.cancel();
        // Give the dispatcher task a moment to observe cancellation.
        tokio::time::sleep(Duration::from_millis(20)).await;

        let res = pool.submit(JobFn::arc("late", |_ctx| async { Ok(()) }), Lane::Pool);
        assert!(matches!(res, Err(RuntimeError::Closed)));
    }
}
