use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use easel_output::{ExecutionRecord, ExecutionStatus};
use easel_workflow::Submission;

use crate::error::RunError;
use crate::executor::{GraphExecutor, PollOutcome, Ticket};

/// Progress signals emitted while an execution runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionEvent {
  /// The executor accepted the submission.
  Accepted { ticket: Ticket },
  /// Still running at the latest poll.
  Progress,
  /// Terminal: completed.
  Completed,
  /// Terminal: failed.
  Failed,
  /// Terminal: cancelled.
  Cancelled,
}

/// A submission in flight: its ticket, an event stream, and an awaitable
/// terminal record.
#[derive(Debug)]
pub struct RunningSubmission {
  pub ticket: Ticket,
  /// Progress events; closes after the terminal event.
  pub events: mpsc::Receiver<ExecutionEvent>,
  done: oneshot::Receiver<Result<ExecutionRecord, RunError>>,
}

impl RunningSubmission {
  /// Await the terminal execution record.
  pub async fn wait(self) -> Result<ExecutionRecord, RunError> {
    self.done.await.map_err(|_| RunError::PollTaskEnded)?
  }
}

/// Cooperative submission: returns immediately, completion is signalled
/// via the event channel and the awaited future.
#[derive(Debug, Clone)]
pub struct EventRunner {
  poll_interval: Duration,
}

impl Default for EventRunner {
  fn default() -> Self {
    Self {
      poll_interval: Duration::from_millis(500),
    }
  }
}

impl EventRunner {
  pub fn new(poll_interval: Duration) -> Self {
    Self { poll_interval }
  }

  /// Submit and spawn the poll loop.
  ///
  /// The loop emits [`ExecutionEvent::Progress`] per non-terminal poll,
  /// one terminal event, and then resolves [`RunningSubmission::wait`].
  #[instrument(name = "event_run", skip(self, executor, submission, cancel))]
  pub async fn start(
    &self,
    executor: Arc<dyn GraphExecutor>,
    submission: Submission,
    cancel: CancellationToken,
  ) -> Result<RunningSubmission, RunError> {
    let ticket = executor.submit(&submission).await?;
    info!(ticket = %ticket, "submission accepted");

    let (events_tx, events_rx) = mpsc::channel(32);
    let (done_tx, done_rx) = oneshot::channel();

    // A lagging consumer must not stall the poll loop.
    let _ = events_tx
      .try_send(ExecutionEvent::Accepted {
        ticket: ticket.clone(),
      });

    let poll_interval = self.poll_interval;
    let loop_ticket = ticket.clone();
    tokio::spawn(async move {
      let result = poll_loop(
        executor.as_ref(),
        &loop_ticket,
        poll_interval,
        cancel,
        &events_tx,
      )
      .await;
      let _ = done_tx.send(result);
    });

    Ok(RunningSubmission {
      ticket,
      events: events_rx,
      done: done_rx,
    })
  }
}

async fn poll_loop(
  executor: &dyn GraphExecutor,
  ticket: &Ticket,
  poll_interval: Duration,
  cancel: CancellationToken,
  events: &mpsc::Sender<ExecutionEvent>,
) -> Result<ExecutionRecord, RunError> {
  loop {
    tokio::select! {
      _ = cancel.cancelled() => {
        if let Err(e) = executor.cancel(ticket).await {
          warn!(ticket = %ticket, error = %e, "best-effort cancel failed");
        }
        let _ = events.try_send(ExecutionEvent::Cancelled);
        return Err(RunError::Cancelled);
      }
      _ = tokio::time::sleep(poll_interval) => {}
    }

    match executor.poll(ticket).await? {
      PollOutcome::Running => {
        let _ = events.try_send(ExecutionEvent::Progress);
      }
      PollOutcome::Complete(record) => {
        let terminal = match record.status {
          ExecutionStatus::Canceled => ExecutionEvent::Cancelled,
          ExecutionStatus::Failed => ExecutionEvent::Failed,
          _ => ExecutionEvent::Completed,
        };
        info!(ticket = %ticket, status = ?record.status, "execution terminal");
        let _ = events.try_send(terminal);
        return Ok(record);
      }
    }
  }
}
