//! Marshalling work onto the host's main thread.
//!
//! Most host APIs may only be touched from the thread that owns the
//! rendering context. A voxel worker that needs one calls
//! [`MainThreadHandle::run_on_main_thread`], which queues the action and
//! blocks on a one-shot `bounded(1)` reply channel. The host calls
//! [`MainThreadDispatcher::pump_pending_tasks`] once per frame; the pump
//! runs every task that was pending when it started, in FIFO order, and
//! replies to each waiter before it returns.
//!
//! The pump never waits on the pool. If the host stops pumping, workers
//! blocked here stay blocked; keeping the pump alive is the host's job.
//!
//! A panicking action is caught, logged with its task id and label, and
//! reported to its own waiter as [`DispatchError::ActionPanicked`]. Other
//! tasks in the same pump are unaffected.

use std::collections::VecDeque;
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, ThreadId};

use crate::pool::panic_message;

// ── Error types ──────────────────────────────────────────────────

/// Why a main-thread action did not produce a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchError {
    /// The action panicked while running on the main thread.
    ActionPanicked {
        /// Sequence id of the task.
        task: u64,
        /// Caller-supplied label.
        label: &'static str,
        /// Panic message.
        message: String,
    },
    /// The dispatcher closed before running the action.
    Abandoned {
        /// Sequence id of the task.
        task: u64,
        /// Caller-supplied label.
        label: &'static str,
    },
}

impl std::fmt::Display for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ActionPanicked {
                task,
                label,
                message,
            } => write!(f, "main-thread task #{task} ({label}) panicked: {message}"),
            Self::Abandoned { task, label } => {
                write!(f, "main-thread task #{task} ({label}) abandoned: dispatcher closed")
            }
        }
    }
}

impl std::error::Error for DispatchError {}

// ── PumpReport ───────────────────────────────────────────────────

/// What one [`MainThreadDispatcher::pump_pending_tasks`] call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PumpReport {
    /// Tasks run, including ones that panicked.
    pub executed: usize,
    /// Tasks whose action panicked.
    pub failed: usize,
}

// ── Shared state ─────────────────────────────────────────────────

/// Runs the action, replies to the waiter, and hands the panic message
/// (if any) back to the pump for logging.
type TaskAction = Box<dyn FnOnce() -> Result<(), String> + Send>;

struct MainThreadTask {
    id: u64,
    label: &'static str,
    action: TaskAction,
}

#[derive(Default)]
struct Pending {
    tasks: VecDeque<MainThreadTask>,
    closed: bool,
}

struct Shared {
    pending: Mutex<Pending>,
    next_id: AtomicU64,
    owner: ThreadId,
}

impl Shared {
    /// Actions never run under this lock, so poisoning cannot leave the
    /// list half-updated; recover the guard instead of propagating.
    fn lock(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── MainThreadDispatcher ─────────────────────────────────────────

/// The host-thread end of the dispatcher.
///
/// Created on the thread that owns the host context and pinned there: the
/// type is neither `Send` nor `Sync`. Hand [`MainThreadHandle`]s to
/// workers instead. Dropping the dispatcher closes it.
pub struct MainThreadDispatcher {
    shared: Arc<Shared>,
    _pinned: PhantomData<*const ()>,
}

impl MainThreadDispatcher {
    /// Dispatcher owned by the calling thread.
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                pending: Mutex::new(Pending::default()),
                next_id: AtomicU64::new(0),
                owner: thread::current().id(),
            }),
            _pinned: PhantomData,
        }
    }

    /// A cloneable handle workers use to reach this thread.
    pub fn handle(&self) -> MainThreadHandle {
        MainThreadHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Run every task pending at the moment of the call, in FIFO order.
    ///
    /// Tasks queued while the pump is running wait for the next call. An
    /// empty pending list returns immediately.
    pub fn pump_pending_tasks(&self) -> PumpReport {
        let batch = {
            let mut pending = self.shared.lock();
            if pending.tasks.is_empty() {
                return PumpReport::default();
            }
            std::mem::take(&mut pending.tasks)
        };

        let mut report = PumpReport::default();
        for task in batch {
            report.executed += 1;
            if let Err(message) = (task.action)() {
                report.failed += 1;
                log::error!(
                    "main-thread task #{} ({}) panicked: {message}",
                    task.id,
                    task.label
                );
            }
        }
        report
    }

    /// Tasks waiting for the next pump.
    pub fn pending_len(&self) -> usize {
        self.shared.lock().tasks.len()
    }

    /// Stop accepting tasks and fail every pending waiter with
    /// [`DispatchError::Abandoned`].
    ///
    /// Returns the number of tasks abandoned. Idempotent.
    pub fn close(&self) -> usize {
        let abandoned = {
            let mut pending = self.shared.lock();
            pending.closed = true;
            std::mem::take(&mut pending.tasks)
        };
        if !abandoned.is_empty() {
            log::warn!(
                "main-thread dispatcher closed with {} pending tasks",
                abandoned.len()
            );
        }
        // Dropping the tasks drops their reply senders, which wakes the
        // waiters.
        abandoned.len()
    }

    /// Whether [`close`](Self::close) has run.
    pub fn is_closed(&self) -> bool {
        self.shared.lock().closed
    }
}

impl Default for MainThreadDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MainThreadDispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for MainThreadDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainThreadDispatcher")
            .field("owner", &self.shared.owner)
            .field("pending", &self.pending_len())
            .finish()
    }
}

// ── MainThreadHandle ─────────────────────────────────────────────

/// Worker-side handle to a [`MainThreadDispatcher`].
#[derive(Clone)]
pub struct MainThreadHandle {
    shared: Arc<Shared>,
}

impl MainThreadHandle {
    /// Run `action` on the main thread and return its result.
    ///
    /// From a worker this blocks until the next pump runs the action.
    /// Called on the main thread itself, the action runs inline, since
    /// waiting there for a pump would never finish.
    pub fn run_on_main_thread<F, T>(
        &self,
        label: &'static str,
        action: F,
    ) -> Result<T, DispatchError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let id = self.shared.next_id.fetch_add(1, Ordering::Relaxed);

        if self.is_main_thread() {
            return panic::catch_unwind(AssertUnwindSafe(action)).map_err(|payload| {
                let message = panic_message(payload.as_ref());
                log::error!("main-thread task #{id} ({label}) panicked inline: {message}");
                DispatchError::ActionPanicked {
                    task: id,
                    label,
                    message,
                }
            });
        }

        let (reply_tx, reply_rx) = crossbeam_channel::bounded(1);
        let task = MainThreadTask {
            id,
            label,
            action: Box::new(move || match panic::catch_unwind(AssertUnwindSafe(action)) {
                Ok(value) => {
                    let _ = reply_tx.send(Ok(value));
                    Ok(())
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    let _ = reply_tx.send(Err(DispatchError::ActionPanicked {
                        task: id,
                        label,
                        message: message.clone(),
                    }));
                    Err(message)
                }
            }),
        };

        {
            let mut pending = self.shared.lock();
            if pending.closed {
                return Err(DispatchError::Abandoned { task: id, label });
            }
            pending.tasks.push_back(task);
        }

        reply_rx
            .recv()
            .unwrap_or(Err(DispatchError::Abandoned { task: id, label }))
    }

    /// Whether the caller is the dispatcher's owning thread.
    pub fn is_main_thread(&self) -> bool {
        thread::current().id() == self.shared.owner
    }
}

impl std::fmt::Debug for MainThreadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainThreadHandle")
            .field("owner", &self.shared.owner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerovox_test_utils::{init_logging, wait_until};
    use proptest::prelude::*;
    use std::time::Duration;

    const WAIT: Duration = Duration::from_secs(5);

    fn waiter(
        handle: &MainThreadHandle,
        label: &'static str,
        value: u32,
    ) -> thread::JoinHandle<Result<u32, DispatchError>> {
        let handle = handle.clone();
        thread::spawn(move || handle.run_on_main_thread(label, move || value))
    }

    #[test]
    fn empty_pump_is_noop() {
        let d = MainThreadDispatcher::new();
        assert_eq!(d.pump_pending_tasks(), PumpReport::default());
        assert_eq!(d.pump_pending_tasks(), PumpReport::default());
    }

    #[test]
    fn single_pump_unblocks_waiter() {
        init_logging();
        let d = MainThreadDispatcher::new();
        let w = waiter(&d.handle(), "read-part-transform", 42);
        assert!(wait_until(WAIT, || d.pending_len() == 1));
        assert!(!w.is_finished());

        let report = d.pump_pending_tasks();
        assert_eq!(report, PumpReport { executed: 1, failed: 0 });
        assert_eq!(w.join().unwrap(), Ok(42));
        assert_eq!(d.pending_len(), 0);
    }

    #[test]
    fn actions_run_on_owner_thread_in_fifo_order() {
        let d = MainThreadDispatcher::new();
        let owner = thread::current().id();
        let order = Arc::new(Mutex::new(Vec::new()));

        let mut waiters = Vec::new();
        for i in 0..3u32 {
            let handle = d.handle();
            let order = Arc::clone(&order);
            waiters.push(thread::spawn(move || {
                handle.run_on_main_thread("ordered", move || {
                    order.lock().unwrap().push(i);
                    thread::current().id()
                })
            }));
            assert!(wait_until(WAIT, || d.pending_len() == i as usize + 1));
        }

        assert_eq!(d.pump_pending_tasks().executed, 3);
        for w in waiters {
            assert_eq!(w.join().unwrap(), Ok(owner));
        }
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn tasks_queued_during_pump_wait_for_next_pump() {
        let d = MainThreadDispatcher::new();
        let handle = d.handle();
        let late: Arc<Mutex<Option<thread::JoinHandle<Result<u32, DispatchError>>>>> =
            Arc::new(Mutex::new(None));

        let first = {
            let handle = handle.clone();
            let late = Arc::clone(&late);
            thread::spawn(move || {
                let inner = handle.clone();
                handle.run_on_main_thread("spawns-late", move || {
                    // Enqueue another task while this pump is draining.
                    let w = waiter(&inner, "late", 9);
                    let queued = wait_until(WAIT, || inner.shared.lock().tasks.len() == 1);
                    *late.lock().unwrap() = Some(w);
                    queued
                })
            })
        };
        assert!(wait_until(WAIT, || d.pending_len() == 1));

        assert_eq!(d.pump_pending_tasks().executed, 1);
        assert_eq!(first.join().unwrap(), Ok(true));
        assert_eq!(d.pending_len(), 1);

        assert_eq!(d.pump_pending_tasks().executed, 1);
        let w = late.lock().unwrap().take().unwrap();
        assert_eq!(w.join().unwrap(), Ok(9));
    }

    #[test]
    fn panicking_action_reports_to_its_waiter_only() {
        init_logging();
        let d = MainThreadDispatcher::new();
        let bad = {
            let handle = d.handle();
            thread::spawn(move || {
                handle.run_on_main_thread("bad", || -> u32 { panic!("host API refused") })
            })
        };
        assert!(wait_until(WAIT, || d.pending_len() == 1));
        let good = waiter(&d.handle(), "good", 5);
        assert!(wait_until(WAIT, || d.pending_len() == 2));

        let report = d.pump_pending_tasks();
        assert_eq!(report, PumpReport { executed: 2, failed: 1 });

        match bad.join().unwrap() {
            Err(DispatchError::ActionPanicked { label, message, .. }) => {
                assert_eq!(label, "bad");
                assert_eq!(message, "host API refused");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(good.join().unwrap(), Ok(5));
    }

    #[test]
    fn owner_thread_runs_inline() {
        let d = MainThreadDispatcher::new();
        let handle = d.handle();
        assert!(handle.is_main_thread());
        assert_eq!(handle.run_on_main_thread("inline", || 3), Ok(3));
        assert_eq!(d.pending_len(), 0);

        let err = handle
            .run_on_main_thread("inline-bad", || -> u8 { panic!("boom") })
            .unwrap_err();
        assert!(matches!(err, DispatchError::ActionPanicked { .. }));
    }

    #[test]
    fn closing_abandons_waiters() {
        let d = MainThreadDispatcher::new();
        let handle = d.handle();
        let w = waiter(&handle, "stranded", 1);
        assert!(wait_until(WAIT, || d.pending_len() == 1));

        drop(d);
        assert!(matches!(
            w.join().unwrap(),
            Err(DispatchError::Abandoned { label: "stranded", .. })
        ));

        // Later requests fail fast.
        let late = waiter(&handle, "late", 2);
        assert!(matches!(
            late.join().unwrap(),
            Err(DispatchError::Abandoned { .. })
        ));
    }

    #[test]
    fn task_ids_are_sequential() {
        let d = MainThreadDispatcher::new();
        d.close();
        let handle = d.handle();
        let ids: Vec<u64> = (0..3)
            .map(|_| match waiter(&handle, "id", 0).join().unwrap() {
                Err(DispatchError::Abandoned { task, .. }) => task,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn one_pump_releases_every_waiter(n in 1usize..8) {
            let d = MainThreadDispatcher::new();
            let waiters: Vec<_> = (0..n as u32).map(|i| waiter(&d.handle(), "batch", i)).collect();
            prop_assert!(wait_until(WAIT, || d.pending_len() == n));
            prop_assert_eq!(d.pump_pending_tasks().executed, n);
            for (i, w) in waiters.into_iter().enumerate() {
                prop_assert_eq!(w.join().unwrap(), Ok(i as u32));
            }
        }
    }
}
