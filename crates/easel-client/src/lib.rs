//! Easel Client
//!
//! The concurrency boundary of the workflow core. Everything upstream
//! (discovery, field mutation, payload construction) is synchronous and
//! pure; this crate owns the two operations that cross into the outside
//! world — submitting a built payload and waiting for its execution
//! record — plus staging caller-provided bytes into resource fields.
//!
//! Both submission adapters sit over the same submit/poll contract:
//! [`BlockingRunner`] suspends inside its wait loop on the caller's
//! task, [`EventRunner`] returns immediately and signals completion via
//! an event channel and an awaitable future.

mod blocking;
mod error;
mod events;
mod executor;
mod staging;

pub use blocking::BlockingRunner;
pub use error::{AssetError, ExecutorError, RunError, StageError};
pub use events::{EventRunner, ExecutionEvent, RunningSubmission};
pub use executor::{AssetStore, GraphExecutor, PollOutcome, Ticket};
pub use staging::stage_resource;
