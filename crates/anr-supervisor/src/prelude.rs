//! Prelude for anr-supervisor.
//!
//! This module re-exports the most commonly used types for convenient importing.
//!
//! # Example
//!
//! ```rust
//! use anr_supervisor::prelude::*;
//!
//! let dispatcher = MainThreadDispatcher::new("main");
//! let supervisor = Supervisor::with_target(SupervisorConfig::default(), dispatcher.handle())?;
//! assert_eq!(supervisor.state(), SupervisorState::Stopped);
//! # Ok::<(), SupervisorError>(())
//! ```

pub use crate::config::{SupervisorConfig, SupervisorConfigBuilder};
pub use crate::dispatcher::{DispatcherHandle, MainThreadDispatcher};
pub use crate::error::{SupervisorError, SupervisorResult};
pub use crate::probe::Probe;
pub use crate::state::SupervisorState;
pub use crate::stats::StatsSnapshot;
pub use crate::supervisor::{Supervisor, SupervisorCell};
pub use crate::target::{ProcessTerminator, TargetScheduler, Terminator, UnresponsiveReport, WorkItem};
