//! Background voxelization for the Aerovox estimator.
//!
//! Voxelizing a vehicle is too slow for the host's render thread, but most
//! host APIs may only be called from that thread. This crate provides the
//! plumbing between the two:
//!
//! ```text
//! Host thread                       Voxel workers (N)
//!     |                                  |
//!     |--queue_voxelization(job)-------->| queue.pop_blocking()
//!     |   [BlockingTaskQueue: FIFO]      | job()
//!     |                                  |   host.run_on_main_thread(f)
//!     |<--pending task-------------------|   blocks on reply_rx
//!     | pump_pending_tasks()             |
//!     |   f()                            |
//!     |--reply via bounded(1)----------->|   resumes
//!     |                                  |
//!     |<--completed pass-----------------| completions_tx.send()
//! ```
//!
//! [`VoxelSession`] wires the pool, the dispatcher and the update
//! throttle together for a host that ticks once per frame.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod metrics;
pub mod pool;
pub mod queue;
pub mod session;
pub mod throttle;

pub use config::{ConfigError, PoolConfig, SessionConfig, ThrottleConfig};
pub use dispatch::{DispatchError, MainThreadDispatcher, MainThreadHandle, PumpReport};
pub use metrics::PoolMetrics;
pub use pool::{Job, ShutdownReport, SubmitError, VoxelizationPool};
pub use queue::BlockingTaskQueue;
pub use session::{GeometryKernel, KernelError, TickReport, VoxelPass, VoxelSession};
pub use throttle::VoxelUpdateThrottle;
