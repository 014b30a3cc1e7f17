//! Easel Output
//!
//! Given a terminal [`ExecutionRecord`], correlate each exposed output
//! node of a workflow back to the asset names it produced, via tiered
//! evidence: direct per-node results, then the legacy flat asset list,
//! then structural inference over the execution graph, then nothing.
//!
//! Correlation never fails — weak evidence is represented as a reduced
//! [`EvidenceTier`], and a non-terminal record yields tier `None` for
//! every node rather than a partial mapping.

mod correlate;
mod record;

pub use correlate::{EvidenceTier, OutputRecord, correlate};
pub use record::{ExecutionRecord, ExecutionStatus, NodeResult};
