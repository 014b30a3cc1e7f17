use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

use easel_output::ExecutionRecord;
use easel_workflow::Submission;

use crate::error::RunError;
use crate::executor::{GraphExecutor, PollOutcome};

/// Submit-and-wait on the caller's task.
///
/// Suspension happens only inside [`BlockingRunner::run`]; it returns on
/// terminal status, timeout, or cancellation.
#[derive(Debug, Clone)]
pub struct BlockingRunner {
  poll_interval: Duration,
  timeout: Duration,
}

impl Default for BlockingRunner {
  fn default() -> Self {
    Self {
      poll_interval: Duration::from_millis(500),
      timeout: Duration::from_secs(600),
    }
  }
}

impl BlockingRunner {
  pub fn new(poll_interval: Duration, timeout: Duration) -> Self {
    Self {
      poll_interval,
      timeout,
    }
  }

  /// Submit the payload and poll until the execution record is terminal.
  ///
  /// Cancellation is forwarded to the executor best-effort: a cancel
  /// failure is logged, not returned, and the caller still gets
  /// [`RunError::Cancelled`].
  #[instrument(name = "blocking_run", skip(self, executor, submission, cancel))]
  pub async fn run(
    &self,
    executor: &dyn GraphExecutor,
    submission: &Submission,
    cancel: CancellationToken,
  ) -> Result<ExecutionRecord, RunError> {
    let ticket = executor.submit(submission).await?;
    info!(ticket = %ticket, "submission accepted");

    let started = Instant::now();
    loop {
      if started.elapsed() >= self.timeout {
        error!(ticket = %ticket, "wait timed out");
        return Err(RunError::TimedOut {
          waited_ms: started.elapsed().as_millis() as u64,
        });
      }

      tokio::select! {
        _ = cancel.cancelled() => {
          if let Err(e) = executor.cancel(&ticket).await {
            warn!(ticket = %ticket, error = %e, "best-effort cancel failed");
          }
          return Err(RunError::Cancelled);
        }
        _ = tokio::time::sleep(self.poll_interval) => {}
      }

      match executor.poll(&ticket).await? {
        PollOutcome::Running => {}
        PollOutcome::Complete(record) => {
          info!(ticket = %ticket, status = ?record.status, "execution terminal");
          return Ok(record);
        }
      }
    }
  }
}
