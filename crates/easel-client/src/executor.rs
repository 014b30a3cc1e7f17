use async_trait::async_trait;
use bytes::Bytes;

use easel_output::ExecutionRecord;
use easel_workflow::Submission;

use crate::error::{AssetError, ExecutorError};

/// Opaque handle to an accepted submission, issued by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticket(pub String);

impl std::fmt::Display for Ticket {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// One poll's worth of progress.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
  /// Not terminal yet.
  Running,
  /// The execution reached a terminal status.
  Complete(ExecutionRecord),
}

/// The external service that executes submission payloads.
///
/// This core owns no wire protocol; implementations adapt whatever HTTP
/// or event-stream transport the deployment uses.
#[async_trait]
pub trait GraphExecutor: Send + Sync {
  /// Hand a built payload to the executor.
  async fn submit(&self, submission: &Submission) -> Result<Ticket, ExecutorError>;

  /// Ask for the current state of a submission.
  async fn poll(&self, ticket: &Ticket) -> Result<PollOutcome, ExecutorError>;

  /// Best-effort cancellation. Partially produced assets may still
  /// surface on a later correlation.
  async fn cancel(&self, ticket: &Ticket) -> Result<(), ExecutorError>;
}

/// The external service that stores binary assets.
#[async_trait]
pub trait AssetStore: Send + Sync {
  /// Retrieve an asset by name.
  async fn fetch(&self, name: &str) -> Result<Bytes, AssetError>;

  /// Store bytes, returning the name the executor will know them by.
  async fn store(&self, data: Bytes, extension_hint: &str) -> Result<String, AssetError>;
}
