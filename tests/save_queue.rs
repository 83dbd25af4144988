use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use todolist::dialog::{CommitOutcome, TaskDialog};
use todolist::error::PersistenceError;
use todolist::list::TaskList;
use todolist::model::{Priority, TagMode, Task};
use todolist::persist::{PersistEvent, RetryPolicy, SaveQueue};
use todolist::repository::TaskRepository;

/// Records the length of every saved list. The first save is slow, so an
/// unordered writer would finish it last.
#[derive(Default)]
struct SlowFirstRepo {
    calls: AtomicUsize,
    saved_lengths: Mutex<Vec<usize>>,
}

#[async_trait]
impl TaskRepository for SlowFirstRepo {
    async fn save(&self, tasks: Vec<Task>) -> Result<()> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.saved_lengths.lock().unwrap().push(tasks.len());
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Task>> {
        Ok(vec![])
    }
}

/// Fails the first `failures` saves.
struct FlakyRepo {
    failures: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl TaskRepository for FlakyRepo {
    async fn save(&self, _tasks: Vec<Task>) -> Result<()> {
        if self.calls.fetch_add(1, Ordering::SeqCst) < self.failures {
            bail!("disk full");
        }
        Ok(())
    }

    async fn load(&self) -> Result<Vec<Task>> {
        Ok(vec![])
    }
}

fn policy(attempts: u32) -> RetryPolicy {
    RetryPolicy {
        attempts,
        delay: Duration::from_millis(1),
    }
}

fn commit(list: &TaskList, queue: &SaveQueue, title: &str) -> CommitOutcome {
    let mut dialog = TaskDialog::new(TagMode::FreeText, list.clone(), queue.clone());
    let draft = dialog.draft_mut();
    draft.title = title.to_string();
    draft.description = "d".to_string();
    draft.date = "2024-5-1".to_string();
    dialog.request_commit()
}

#[tokio::test]
async fn successive_commits_are_saved_in_commit_order() {
    let repo = Arc::new(SlowFirstRepo::default());
    let (queue, _events) = SaveQueue::spawn(repo.clone(), policy(1));
    let list = TaskList::default();

    let mut tickets = Vec::new();
    for title in ["one", "two", "three"] {
        match commit(&list, &queue, title) {
            CommitOutcome::Committed { ticket, .. } => tickets.push(ticket),
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    assert_eq!(list.len(), 3);

    for (i, ticket) in tickets.into_iter().enumerate() {
        assert_eq!(ticket.revision(), i as u64 + 1);
        let receipt = ticket.await.unwrap();
        assert_eq!(receipt.task_count, i + 1);
    }
    assert_eq!(*repo.saved_lengths.lock().unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn transient_failure_is_retried() {
    let repo = Arc::new(FlakyRepo {
        failures: 1,
        calls: AtomicUsize::new(0),
    });
    let (queue, mut events) = SaveQueue::spawn(repo.clone(), policy(3));
    let list = TaskList::default();

    let CommitOutcome::Committed { ticket, .. } = commit(&list, &queue, "retry me") else {
        panic!("valid draft should commit");
    };
    let receipt = ticket.await.unwrap();
    assert_eq!(receipt.attempts, 2);
    assert_eq!(repo.calls.load(Ordering::SeqCst), 2);
    assert_eq!(events.recv().await, Some(PersistEvent::Saved(receipt)));
}

#[tokio::test]
async fn exhausted_retries_are_reported_but_task_stays_listed() {
    let repo = Arc::new(FlakyRepo {
        failures: usize::MAX,
        calls: AtomicUsize::new(0),
    });
    let (queue, mut events) = SaveQueue::spawn(repo, policy(2));
    let list = TaskList::default();

    let CommitOutcome::Committed { ticket, task } = commit(&list, &queue, "doomed") else {
        panic!("valid draft should commit");
    };
    match ticket.await {
        Err(PersistenceError::Save {
            task_count,
            attempts,
            source,
        }) => {
            assert_eq!(task_count, 1);
            assert_eq!(attempts, 2);
            assert!(source.to_string().contains("disk full"));
        }
        other => panic!("expected save failure, got {other:?}"),
    }

    match events.recv().await {
        Some(PersistEvent::Failed {
            revision, message, ..
        }) => {
            assert_eq!(revision, 1);
            assert!(message.contains("disk full"));
        }
        other => panic!("expected failure event, got {other:?}"),
    }
    // Optimistic append is not rolled back.
    assert_eq!(list.snapshot(), vec![task]);
}

#[tokio::test]
async fn dropped_ticket_still_saves() {
    let repo = Arc::new(SlowFirstRepo::default());
    let (queue, mut events) = SaveQueue::spawn(repo.clone(), policy(1));
    let list = TaskList::default();

    let task = Task::new("t", "d", "2024-1-1", vec![], Priority::Critical).unwrap();
    drop(queue.submit(list.append(task)));

    assert!(matches!(events.recv().await, Some(PersistEvent::Saved(_))));
    assert_eq!(*repo.saved_lengths.lock().unwrap(), vec![1]);
}

#[tokio::test]
async fn try_outcome_reports_pending_then_done() {
    let repo = Arc::new(SlowFirstRepo::default());
    let (queue, mut events) = SaveQueue::spawn(repo, policy(1));
    let list = TaskList::default();

    let task = Task::new("t", "d", "2024-1-1", vec![], Priority::Low).unwrap();
    let mut ticket = queue.submit(list.append(task));
    assert!(ticket.try_outcome().is_none());

    events.recv().await;
    tokio::task::yield_now().await;
    assert!(matches!(ticket.try_outcome(), Some(Ok(_))));
    // A host polling every frame must not see the success turn into an error.
    assert!(ticket.try_outcome().is_none());
    assert!(ticket.try_outcome().is_none());
}
