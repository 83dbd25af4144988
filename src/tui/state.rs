use crate::dialog::{CommitOutcome, TaskDialog};
use crate::draft::DraftField;
use crate::list::TaskList;
use crate::model::{TagMode, TaskTag};
use crate::persist::{PersistEvent, SaveQueue};
use crate::tui::calendar::CalendarPopup;
use ratatui::widgets::ListState;

/// Focus order inside the dialog, Tab moves forward.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FormFocus {
    Title,
    Description,
    Date,
    Tags,
    Priority,
    Confirm,
}

impl FormFocus {
    const ORDER: [FormFocus; 6] = [
        FormFocus::Title,
        FormFocus::Description,
        FormFocus::Date,
        FormFocus::Tags,
        FormFocus::Priority,
        FormFocus::Confirm,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }

    pub fn field(self) -> Option<DraftField> {
        match self {
            FormFocus::Title => Some(DraftField::Title),
            FormFocus::Description => Some(DraftField::Description),
            FormFocus::Date => Some(DraftField::Date),
            FormFocus::Tags => Some(DraftField::Tags),
            FormFocus::Priority => Some(DraftField::Priority),
            FormFocus::Confirm => None,
        }
    }
}

pub struct DialogForm {
    pub dialog: TaskDialog,
    pub focus: FormFocus,
    /// Open tag dropdown and its highlighted row.
    pub dropdown: Option<ListState>,
    pub calendar: Option<CalendarPopup>,
}

impl DialogForm {
    fn new(dialog: TaskDialog) -> Self {
        Self {
            dialog,
            focus: FormFocus::Title,
            dropdown: None,
            calendar: None,
        }
    }

    fn text_buffer(&mut self) -> Option<&mut String> {
        let draft = self.dialog.draft_mut();
        match self.focus {
            FormFocus::Title => Some(&mut draft.title),
            FormFocus::Description => Some(&mut draft.description),
            FormFocus::Tags => draft.free_text_tags_mut(),
            _ => None,
        }
    }

    pub fn enter_char(&mut self, c: char) {
        if let Some(buf) = self.text_buffer() {
            buf.push(c);
            self.dialog.revalidate();
        }
    }

    pub fn delete_char(&mut self) {
        if let Some(buf) = self.text_buffer() {
            buf.pop();
            self.dialog.revalidate();
        }
    }

    pub fn shift_priority(&mut self, delta: i32) {
        let draft = self.dialog.draft_mut();
        draft.priority = draft.priority.shifted(delta);
    }

    pub fn open_dropdown(&mut self) {
        if self.dialog.draft().tag_mode() != TagMode::SingleEnum {
            return;
        }
        let mut state = ListState::default();
        state.select(Some(0));
        self.dropdown = Some(state);
    }

    pub fn move_dropdown(&mut self, delta: i32) {
        if let Some(state) = &mut self.dropdown {
            let len = TaskTag::ALL.len() as i32;
            let current = state.selected().unwrap_or(0) as i32;
            state.select(Some((current + delta).rem_euclid(len) as usize));
        }
    }

    pub fn confirm_dropdown(&mut self) {
        if let Some(state) = self.dropdown.take()
            && let Some(tag) = state.selected().and_then(|i| TaskTag::ALL.get(i).copied())
        {
            self.dialog.select_tag(tag);
        }
    }

    pub fn is_missing(&self, field: DraftField) -> bool {
        self.dialog
            .validation_error()
            .is_some_and(|e| e.is_missing(field))
    }
}

pub struct AppState {
    pub tasks: TaskList,
    pub list_state: ListState,
    pub message: String,
    pub tag_mode: TagMode,
    pub form: Option<DialogForm>,
    queue: SaveQueue,
}

impl AppState {
    pub fn new(tasks: TaskList, tag_mode: TagMode, queue: SaveQueue) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            tasks,
            list_state,
            message: "a: Add | q: Quit".to_string(),
            tag_mode,
            form: None,
            queue,
        }
    }

    pub fn open_dialog(&mut self) {
        let dialog = TaskDialog::new(self.tag_mode, self.tasks.clone(), self.queue.clone());
        self.form = Some(DialogForm::new(dialog));
    }

    pub fn dismiss_dialog(&mut self) {
        if let Some(mut form) = self.form.take() {
            form.dialog.request_dismiss();
        }
    }

    /// Commits the open dialog. The save result arrives later as a [`PersistEvent`].
    pub fn commit_dialog(&mut self) {
        let Some(form) = &mut self.form else {
            return;
        };
        match form.dialog.request_commit() {
            CommitOutcome::Committed { task, .. } => {
                self.message = format!("Added \"{}\". Saving...", task.title());
                self.form = None;
                let last = self.tasks.len().saturating_sub(1);
                self.list_state.select(Some(last));
            }
            CommitOutcome::Rejected(e) => {
                self.message = format!("Error: {}", e);
            }
            CommitOutcome::NotEditing => {
                self.form = None;
            }
        }
    }

    pub fn on_persist_event(&mut self, event: PersistEvent) {
        self.message = match event {
            PersistEvent::Saved(receipt) => format!("Saved {} task(s).", receipt.task_count),
            PersistEvent::Failed { message, .. } => format!("Error: {}", message),
        };
    }

    pub fn next(&mut self) {
        let len = self.tasks.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.tasks.len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }
}
