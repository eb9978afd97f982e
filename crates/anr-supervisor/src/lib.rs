//! # anr-supervisor
//!
//! Liveness watchdog for a main/UI thread.
//!
//! A background worker periodically posts a one-shot [`Probe`] onto the work
//! queue of the supervised context and waits for it to run. A probe that
//! misses its timeout gets a grace window to rule out a merely slow target;
//! if it is still unanswered after that, the [`Terminator`] ends the process.
//!
//! ## Guarantees
//!
//! - **One worker thread** per [`Supervisor`]; `start()` is idempotent
//! - **Deferred stop**: `stop()` never preempts an in-flight probe and can be
//!   cancelled by a `start()` before the worker confirms it
//! - **Bounded waits only**: every suspension point observes cancellation
//! - **Sequential probes**: a new probe is only posted once the previous
//!   cycle is resolved
//!
//! ## Architecture
//!
//! - [`supervisor`] - Lifecycle controller and process-wide cell
//! - `worker` - The supervision loop and escalation machine (internal)
//! - [`probe`] - One-shot rendezvous token
//! - [`cancel`] - Cancellation token with cancellable sleeps
//! - [`target`] - Target scheduler and terminator collaborators
//! - [`dispatcher`] - Ready-made main-thread work queue
//! - [`config`] - Timing configuration and validation
//! - [`stats`] - Supervision counters
//! - [`error`] - Supervisor error types
//!
//! ## Example
//!
//! ```rust
//! use anr_supervisor::prelude::*;
//! use std::time::Duration;
//!
//! let config = SupervisorConfig::builder()
//!     .timeout_check(Duration::from_millis(200))
//!     .check_interval(Duration::from_millis(20))
//!     .build()?;
//!
//! let dispatcher = MainThreadDispatcher::new("main");
//! let supervisor = Supervisor::with_target(config, dispatcher.handle())?;
//! supervisor.start()?;
//!
//! // The supervised thread drains its queue as part of its own loop.
//! for _ in 0..20 {
//!     dispatcher.run_for(Duration::from_millis(20));
//! }
//!
//! supervisor.interrupt();
//! assert!(supervisor.stats().responsive > 0);
//! # Ok::<(), SupervisorError>(())
//! ```

#![deny(
    unsafe_op_in_unsafe_fn,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::panic,
    missing_docs,
    missing_debug_implementations
)]
#![warn(clippy::pedantic)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cancel;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod probe;
pub mod state;
pub mod stats;
pub mod supervisor;
pub mod target;
mod worker;

pub mod prelude;

pub use cancel::{CancellationToken, Cancelled};
pub use config::{SupervisorConfig, SupervisorConfigBuilder};
pub use dispatcher::{DispatcherHandle, MainThreadDispatcher};
pub use error::{SupervisorError, SupervisorResult};
pub use probe::Probe;
pub use state::{EscalationPhase, SupervisorState};
pub use stats::{StatsSnapshot, SupervisorStats};
pub use supervisor::{Supervisor, SupervisorCell};
pub use target::{ProcessTerminator, TargetScheduler, Terminator, UnresponsiveReport, WorkItem};
