// File: ./src/persist.rs
// Background worker that writes list snapshots in the order they were taken
use crate::config::Config;
use crate::error::PersistenceError;
use crate::list::Snapshot;
use crate::repository::TaskRepository;
use futures::FutureExt;
use futures::future::BoxFuture;
use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            attempts: config.save_attempts(),
            delay: config.retry_delay(),
        }
    }

    pub fn no_retry() -> Self {
        Self {
            attempts: 1,
            delay: Duration::ZERO,
        }
    }

    fn backoff(&self, failed_attempts: u32) -> Duration {
        self.delay
            .saturating_mul(2u32.saturating_pow(failed_attempts.saturating_sub(1)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    pub revision: u64,
    pub task_count: usize,
    pub attempts: u32,
}

/// Outcome notifications for hosts that watch saves instead of awaiting tickets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistEvent {
    Saved(SaveReceipt),
    Failed {
        revision: u64,
        task_count: usize,
        message: String,
    },
}

struct SaveJob {
    snapshot: Snapshot,
    reply: oneshot::Sender<Result<SaveReceipt, PersistenceError>>,
}

/// Resolves once the snapshot it was issued for has been saved or given up on.
/// Dropping it does not cancel the save.
#[derive(Debug)]
pub struct SaveTicket {
    revision: u64,
    rx: oneshot::Receiver<Result<SaveReceipt, PersistenceError>>,
    delivered: bool,
}

impl SaveTicket {
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub async fn outcome(self) -> Result<SaveReceipt, PersistenceError> {
        self.rx.await.unwrap_or(Err(PersistenceError::QueueClosed))
    }

    /// Non-blocking check, `None` while the save is still pending. The result
    /// is handed out once; later calls return `None` again.
    pub fn try_outcome(&mut self) -> Option<Result<SaveReceipt, PersistenceError>> {
        if self.delivered {
            return None;
        }
        let outcome = match self.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(oneshot::error::TryRecvError::Empty) => return None,
            Err(oneshot::error::TryRecvError::Closed) => Err(PersistenceError::QueueClosed),
        };
        self.delivered = true;
        Some(outcome)
    }
}

impl IntoFuture for SaveTicket {
    type Output = Result<SaveReceipt, PersistenceError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        self.outcome().boxed()
    }
}

/// Sending side of the save worker. Jobs run one at a time in submission
/// order, so a later snapshot can never be overwritten by an earlier one.
#[derive(Clone, Debug)]
pub struct SaveQueue {
    tx: mpsc::UnboundedSender<SaveJob>,
}

impl SaveQueue {
    /// Starts the worker on the current tokio runtime. It stops once every
    /// clone of the returned queue has been dropped and pending jobs are done.
    pub fn spawn(
        repo: Arc<dyn TaskRepository>,
        policy: RetryPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<PersistEvent>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<SaveJob>();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let revision = job.snapshot.revision;
                let task_count = job.snapshot.tasks.len();
                let outcome = save_with_retry(repo.as_ref(), job.snapshot, policy).await;

                let event = match &outcome {
                    Ok(receipt) => PersistEvent::Saved(*receipt),
                    Err(e) => PersistEvent::Failed {
                        revision,
                        task_count,
                        message: e.to_string(),
                    },
                };
                // Nobody listening is fine.
                let _ = event_tx.send(event);
                let _ = job.reply.send(outcome);
            }
        });

        (Self { tx }, event_rx)
    }

    pub fn submit(&self, snapshot: Snapshot) -> SaveTicket {
        let (reply, rx) = oneshot::channel();
        let revision = snapshot.revision;
        if self.tx.send(SaveJob { snapshot, reply }).is_err() {
            // The job and its reply sender are dropped, so the ticket reports QueueClosed.
            warn!(revision, "save queue is closed, snapshot not persisted");
        }
        SaveTicket {
            revision,
            rx,
            delivered: false,
        }
    }
}

async fn save_with_retry(
    repo: &dyn TaskRepository,
    snapshot: Snapshot,
    policy: RetryPolicy,
) -> Result<SaveReceipt, PersistenceError> {
    let Snapshot { revision, tasks } = snapshot;
    let task_count = tasks.len();
    let attempts = policy.attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match repo.save(tasks.clone()).await {
            Ok(()) => {
                info!(revision, task_count, attempt, "tasks saved");
                return Ok(SaveReceipt {
                    revision,
                    task_count,
                    attempts: attempt,
                });
            }
            Err(e) if attempt < attempts => {
                warn!(revision, attempt, error = %e, "save failed, retrying");
                tokio::time::sleep(policy.backoff(attempt)).await;
            }
            Err(e) => {
                error!(revision, attempt, error = %e, "save failed, giving up");
                return Err(PersistenceError::Save {
                    task_count,
                    attempts: attempt,
                    source: e,
                });
            }
        }
    }
}
