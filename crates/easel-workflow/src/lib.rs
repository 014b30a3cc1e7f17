//! Easel Workflow
//!
//! This crate turns an immutable [`easel_definition::WorkflowDefinition`]
//! into a programmatically controllable [`WorkflowHandle`]: form-tree
//! traversal assigns stable input indices, the field-type registry builds
//! a typed field per discovered input, and submission payloads are built
//! by deep-copying the raw export and substituting wire values at each
//! descriptor's provenance path — never adding or removing a key.
//!
//! Output-capable nodes are classified once per handle into exposed
//! outputs and debug sinks.

mod classify;
mod descriptor;
mod error;
mod handle;
mod traversal;

pub use classify::{BoardWriterSet, OutputSlot, classify};
pub use descriptor::InputDescriptor;
pub use error::{DiscoveryError, HandleError, SubmissionError};
pub use handle::{DiscoveryOptions, HandleState, Submission, WorkflowHandle};
pub use traversal::traverse;
