// File: ./src/dialog.rs
// Controller behind the "Add New Task" dialog
use crate::draft::TaskDraft;
use crate::error::ValidationError;
use crate::list::TaskList;
use crate::model::{TagMode, Task, TaskTag, format_task_date, parse_task_date};
use crate::persist::{SaveQueue, SaveTicket};
use crate::picker::DatePicker;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Dismissed,
    Committed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Editing,
    Closed(CloseReason),
}

#[derive(Debug)]
pub enum CommitOutcome {
    /// The task is already in the list; `ticket` reports how the save went.
    Committed { task: Task, ticket: SaveTicket },
    /// Nothing changed and the dialog is still open.
    Rejected(ValidationError),
    /// The dialog was already closed.
    NotEditing,
}

/// One open dialog. Create a new one each time the dialog is shown.
#[derive(Debug)]
pub struct TaskDialog {
    draft: TaskDraft,
    state: DialogState,
    list: TaskList,
    queue: SaveQueue,
    validation: Option<ValidationError>,
}

impl TaskDialog {
    pub fn new(mode: TagMode, list: TaskList, queue: SaveQueue) -> Self {
        Self {
            draft: TaskDraft::new(mode),
            state: DialogState::Editing,
            list,
            queue,
            validation: None,
        }
    }

    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state == DialogState::Editing
    }

    pub fn draft(&self) -> &TaskDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut TaskDraft {
        &mut self.draft
    }

    /// Set by a rejected commit, for highlighting the missing fields.
    pub fn validation_error(&self) -> Option<&ValidationError> {
        self.validation.as_ref()
    }

    /// Re-checks a previously reported validation error after edits.
    /// Does nothing if no error is being shown.
    pub fn revalidate(&mut self) {
        if self.validation.is_some() {
            self.validation = self.draft.validate().err();
        }
    }

    pub fn request_dismiss(&mut self) {
        if !self.is_editing() {
            return;
        }
        self.draft.reset();
        self.validation = None;
        self.state = DialogState::Closed(CloseReason::Dismissed);
        debug!("task dialog dismissed");
    }

    /// Asks `picker` for a date and stores it as `YYYY-M-D`.
    /// Returns whether the draft's date changed.
    pub async fn request_date_pick(&mut self, picker: &dyn DatePicker) -> bool {
        if !self.is_editing() {
            return false;
        }
        let initial = parse_task_date(&self.draft.date);
        match picker.pick(initial).await {
            Some(date) => {
                self.draft.date = format_task_date(date);
                self.revalidate();
                true
            }
            None => false,
        }
    }

    /// Dropdown selection for single-tag dialogs.
    pub fn select_tag(&mut self, tag: TaskTag) -> bool {
        self.is_editing() && self.draft.select_tag(tag)
    }

    /// Validates the draft, appends the task and queues a save of the whole
    /// list. The append is visible to list readers before the save is queued.
    /// Saves from successive commits are written in commit order.
    pub fn request_commit(&mut self) -> CommitOutcome {
        if !self.is_editing() {
            return CommitOutcome::NotEditing;
        }

        let task = match self.draft.materialize() {
            Ok(task) => task,
            Err(e) => {
                debug!(error = %e, "task draft rejected");
                self.validation = Some(e.clone());
                return CommitOutcome::Rejected(e);
            }
        };

        let snapshot = self.list.append(task.clone());
        info!(title = task.title(), revision = snapshot.revision, "task added");
        let ticket = self.queue.submit(snapshot);

        self.draft.reset();
        self.validation = None;
        self.state = DialogState::Closed(CloseReason::Committed);

        CommitOutcome::Committed { task, ticket }
    }
}
