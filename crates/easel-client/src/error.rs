use thiserror::Error;

use easel_workflow::HandleError;

/// Errors from the graph-executor collaborator.
#[derive(Debug, Error)]
pub enum ExecutorError {
  /// The executor refused the submission.
  #[error("submission rejected: {message}")]
  Rejected { message: String },

  /// The executor knows no such submission.
  #[error("unknown submission: {ticket}")]
  UnknownTicket { ticket: String },

  /// The transport to the executor failed.
  #[error("executor transport failed: {message}")]
  Transport { message: String },
}

/// Errors from the asset-store collaborator.
#[derive(Debug, Error)]
pub enum AssetError {
  /// The requested asset was not found.
  #[error("asset not found: {0}")]
  NotFound(String),

  /// The transport to the store failed.
  #[error("asset store transport failed: {message}")]
  Transport { message: String },

  /// An I/O error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Errors while driving a submission to its terminal record.
#[derive(Debug, Error)]
pub enum RunError {
  #[error(transparent)]
  Executor(#[from] ExecutorError),

  /// The wait exceeded the configured timeout.
  #[error("execution did not reach a terminal status within {waited_ms}ms")]
  TimedOut { waited_ms: u64 },

  /// The caller cancelled the wait; cancellation was signalled to the
  /// executor best-effort.
  #[error("execution cancelled")]
  Cancelled,

  /// The poll task ended without delivering a terminal record.
  #[error("poll task ended unexpectedly")]
  PollTaskEnded,
}

/// Errors while staging caller bytes into a resource field.
#[derive(Debug, Error)]
pub enum StageError {
  #[error(transparent)]
  Asset(#[from] AssetError),

  #[error(transparent)]
  Handle(#[from] HandleError),
}
