use chrono::NaiveDate;
use std::sync::Arc;
use todolist::dialog::{CloseReason, CommitOutcome, DialogState, TaskDialog};
use todolist::draft::DraftField;
use todolist::list::TaskList;
use todolist::model::{Priority, TagField, TagMode, Task, TaskTag};
use todolist::persist::{RetryPolicy, SaveQueue};
use todolist::picker::FixedPicker;
use todolist::repository::{MemoryRepository, TaskRepository};

fn open_dialog(mode: TagMode) -> (TaskDialog, TaskList, Arc<MemoryRepository>) {
    let repo = Arc::new(MemoryRepository::new());
    let (queue, _events) = SaveQueue::spawn(repo.clone(), RetryPolicy::no_retry());
    let list = TaskList::default();
    let dialog = TaskDialog::new(mode, list.clone(), queue);
    (dialog, list, repo)
}

fn fill(dialog: &mut TaskDialog) {
    let draft = dialog.draft_mut();
    draft.title = "Buy milk".to_string();
    draft.description = "2%".to_string();
    draft.date = "2024-3-9".to_string();
}

#[tokio::test]
async fn commit_appends_task_and_saves_whole_list() {
    let (mut dialog, list, repo) = open_dialog(TagMode::FreeText);
    fill(&mut dialog);
    *dialog.draft_mut().free_text_tags_mut().unwrap() = "work, home, ".to_string();
    dialog.draft_mut().set_priority_position(1.0);

    let CommitOutcome::Committed { task, ticket } = dialog.request_commit() else {
        panic!("valid draft should commit");
    };

    // The append is visible before the save has been awaited.
    assert_eq!(list.len(), 1);
    assert_eq!(task.tags(), ["work", "home"]);
    assert_eq!(task.priority().label(), "Medium");
    assert_eq!(dialog.state(), DialogState::Closed(CloseReason::Committed));

    let receipt = ticket.await.expect("save should succeed");
    assert_eq!(receipt.task_count, 1);
    assert_eq!(receipt.attempts, 1);
    assert_eq!(repo.load().await.unwrap(), list.snapshot());
}

#[tokio::test]
async fn commit_resets_draft() {
    let (mut dialog, _list, _repo) = open_dialog(TagMode::FreeText);
    fill(&mut dialog);
    *dialog.draft_mut().free_text_tags_mut().unwrap() = "a".to_string();
    dialog.draft_mut().priority = Priority::High;

    assert!(matches!(
        dialog.request_commit(),
        CommitOutcome::Committed { .. }
    ));

    let draft = dialog.draft();
    assert!(draft.title.is_empty());
    assert!(draft.description.is_empty());
    assert!(draft.date.is_empty());
    assert_eq!(draft.tags, TagField::FreeText(String::new()));
    assert_eq!(draft.priority.label(), "Low");
}

#[tokio::test]
async fn single_enum_tag_commits_one_label() {
    let (mut dialog, list, _repo) = open_dialog(TagMode::SingleEnum);
    fill(&mut dialog);
    assert!(dialog.select_tag(TaskTag::Family));

    let CommitOutcome::Committed { task, .. } = dialog.request_commit() else {
        panic!("valid draft should commit");
    };
    assert_eq!(task.tags(), ["Family"]);
    assert_eq!(list.snapshot(), vec![task]);
}

#[tokio::test]
async fn incomplete_draft_is_rejected_without_side_effects() {
    for missing in [DraftField::Title, DraftField::Description, DraftField::Date] {
        let (mut dialog, list, repo) = open_dialog(TagMode::FreeText);
        fill(&mut dialog);
        let draft = dialog.draft_mut();
        match missing {
            DraftField::Title => draft.title.clear(),
            DraftField::Description => draft.description.clear(),
            _ => draft.date.clear(),
        }

        let CommitOutcome::Rejected(err) = dialog.request_commit() else {
            panic!("draft without {missing} should be rejected");
        };
        assert_eq!(err.missing, vec![missing]);
        assert_eq!(dialog.state(), DialogState::Editing);
        assert!(dialog.validation_error().unwrap().is_missing(missing));

        tokio::task::yield_now().await;
        assert!(list.is_empty());
        assert_eq!(repo.save_count(), 0);
        // The draft keeps what the user typed.
        assert!(!dialog.draft().title.is_empty() || missing == DraftField::Title);
    }
}

#[tokio::test]
async fn validation_error_clears_once_fixed() {
    let (mut dialog, _list, _repo) = open_dialog(TagMode::FreeText);
    dialog.draft_mut().title = "t".to_string();
    assert!(matches!(dialog.request_commit(), CommitOutcome::Rejected(_)));

    dialog.draft_mut().description = "d".to_string();
    dialog.revalidate();
    let err = dialog.validation_error().unwrap();
    assert_eq!(err.missing, vec![DraftField::Date]);

    let picked = NaiveDate::from_ymd_opt(2024, 3, 9);
    assert!(dialog.request_date_pick(&FixedPicker(picked)).await);
    assert!(dialog.validation_error().is_none());
    assert_eq!(dialog.draft().date, "2024-3-9");
}

#[tokio::test]
async fn dismiss_never_touches_the_list() {
    let existing = Task::new("old", "d", "2024-1-1", vec![], Priority::Low).unwrap();
    let repo = Arc::new(MemoryRepository::new());
    let (queue, _events) = SaveQueue::spawn(repo.clone(), RetryPolicy::no_retry());
    let list = TaskList::new(vec![existing.clone()]);

    let mut dialog = TaskDialog::new(TagMode::FreeText, list.clone(), queue);
    fill(&mut dialog);
    dialog.request_dismiss();

    assert_eq!(dialog.state(), DialogState::Closed(CloseReason::Dismissed));
    assert_eq!(list.snapshot(), vec![existing]);
    assert!(matches!(dialog.request_commit(), CommitOutcome::NotEditing));
    assert_eq!(list.len(), 1);
    tokio::task::yield_now().await;
    assert_eq!(repo.save_count(), 0);
}

#[tokio::test]
async fn cancelled_date_pick_keeps_draft() {
    let (mut dialog, _list, _repo) = open_dialog(TagMode::FreeText);
    dialog.draft_mut().date = "2023-12-1".to_string();
    assert!(!dialog.request_date_pick(&FixedPicker(None)).await);
    assert_eq!(dialog.draft().date, "2023-12-1");
    assert_eq!(dialog.state(), DialogState::Editing);
}

#[tokio::test]
async fn closed_dialog_ignores_date_pick_and_tag_selection() {
    let (mut dialog, _list, _repo) = open_dialog(TagMode::SingleEnum);
    dialog.request_dismiss();
    let picked = NaiveDate::from_ymd_opt(2024, 1, 2);
    assert!(!dialog.request_date_pick(&FixedPicker(picked)).await);
    assert!(!dialog.select_tag(TaskTag::Work));
    assert!(dialog.draft().date.is_empty());
}
