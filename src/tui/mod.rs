pub mod calendar;
pub mod state;
pub mod view;

use crate::config::Config;
use crate::list::TaskList;
use crate::logging;
use crate::model::parse_task_date;
use crate::persist::{PersistEvent, RetryPolicy, SaveQueue};
use crate::picker::{DatePicker, FixedPicker, TodayPicker};
use crate::repository::TaskRepository;
use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use calendar::{CalendarKey, CalendarPopup};
use state::{AppState, FormFocus};
use std::io::{self, Stdout};
use std::sync::Arc;
use tokio::sync::mpsc;

type Term = Terminal<CrosstermBackend<Stdout>>;

#[derive(PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub async fn run() -> Result<()> {
    let config = Config::load()?;
    if let Some(dir) = Config::data_dir() {
        logging::init_file_logging(&dir)?;
    }

    let repo = Arc::new(config.repository()?);
    let tasks = repo
        .load()
        .await
        .with_context(|| format!("loading tasks from {}", repo.path().display()))?;
    let list = TaskList::new(tasks);
    let (queue, events) = SaveQueue::spawn(repo, RetryPolicy::from_config(&config));
    let mut app_state = AppState::new(list, config.tag_mode, queue);

    enable_raw_mode()?;
    let mut terminal = or_restore(setup_terminal(), || {
        let _ = restore_terminal();
    })?;

    let result = event_loop(&mut terminal, &mut app_state, events).await;

    restore_terminal()?;
    terminal.show_cursor()?;

    result
}

fn setup_terminal() -> Result<Term> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

/// Runs `restore` when `result` is an error, then passes the result through.
fn or_restore<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

async fn event_loop(
    terminal: &mut Term,
    app_state: &mut AppState,
    mut events: mpsc::UnboundedReceiver<PersistEvent>,
) -> Result<()> {
    let mut reader = EventStream::new();
    let picker = TodayPicker;

    loop {
        terminal.draw(|f| view::draw(f, app_state))?;

        tokio::select! {
            Some(event) = events.recv() => app_state.on_persist_event(event),
            input = reader.next() => match input {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    if handle_key(app_state, key, &picker).await == Flow::Quit {
                        break;
                    }
                }
                Some(Ok(Event::Mouse(mouse))) if app_state.form.is_none() => match mouse.kind {
                    MouseEventKind::ScrollDown => app_state.next(),
                    MouseEventKind::ScrollUp => app_state.previous(),
                    _ => {}
                },
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
        }
    }
    Ok(())
}

async fn handle_key(app_state: &mut AppState, key: KeyEvent, picker: &dyn DatePicker) -> Flow {
    if app_state.form.is_none() {
        // --- LIST MODE ---
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Char('a') => app_state.open_dialog(),
            KeyCode::Down | KeyCode::Char('j') => app_state.next(),
            KeyCode::Up | KeyCode::Char('k') => app_state.previous(),
            _ => {}
        }
        return Flow::Continue;
    }
    let Some(form) = app_state.form.as_mut() else {
        return Flow::Continue;
    };

    // --- DATE POPUP ---
    if let Some(cal) = &mut form.calendar {
        match cal.handle_key(key.code) {
            CalendarKey::Pending => {}
            CalendarKey::Confirmed(date) => {
                form.calendar = None;
                form.dialog.request_date_pick(&FixedPicker(Some(date))).await;
            }
            CalendarKey::Cancelled => form.calendar = None,
        }
        return Flow::Continue;
    }

    // --- TAG DROPDOWN ---
    if form.dropdown.is_some() {
        match key.code {
            KeyCode::Down | KeyCode::Tab => form.move_dropdown(1),
            KeyCode::Up | KeyCode::BackTab => form.move_dropdown(-1),
            KeyCode::Enter => form.confirm_dropdown(),
            KeyCode::Esc => form.dropdown = None,
            _ => {}
        }
        return Flow::Continue;
    }

    // --- DIALOG ---
    match key.code {
        KeyCode::Esc => app_state.dismiss_dialog(),
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.previous(),
        KeyCode::Left if form.focus == FormFocus::Priority => form.shift_priority(-1),
        KeyCode::Right if form.focus == FormFocus::Priority => form.shift_priority(1),
        KeyCode::Enter => match form.focus {
            FormFocus::Date => {
                // The popup starts on the current date, or today.
                let current = parse_task_date(&form.dialog.draft().date);
                if let Some(start) = picker.pick(current).await {
                    form.calendar = Some(CalendarPopup::new(start));
                }
            }
            FormFocus::Tags => form.open_dropdown(),
            FormFocus::Confirm => app_state.commit_dialog(),
            _ => form.focus = form.focus.next(),
        },
        KeyCode::Backspace => form.delete_char(),
        KeyCode::Char(c) => form.enter_char(c),
        _ => {}
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TagMode;
    use crate::repository::MemoryRepository;
    use chrono::NaiveDate;
    use std::cell::Cell;

    fn app() -> AppState {
        let (queue, _events) =
            SaveQueue::spawn(Arc::new(MemoryRepository::new()), RetryPolicy::no_retry());
        let mut app = AppState::new(TaskList::default(), TagMode::FreeText, queue);
        app.open_dialog();
        app
    }

    async fn press(app: &mut AppState, code: KeyCode, picker: &dyn DatePicker) {
        handle_key(app, KeyEvent::from(code), picker).await;
    }

    #[tokio::test]
    async fn date_field_opens_calendar_and_stores_chosen_day() {
        let mut app = app();
        let start = FixedPicker(NaiveDate::from_ymd_opt(2024, 3, 9));
        press(&mut app, KeyCode::Tab, &start).await;
        press(&mut app, KeyCode::Tab, &start).await;
        press(&mut app, KeyCode::Enter, &start).await;
        assert!(app.form.as_ref().unwrap().calendar.is_some());

        for code in [KeyCode::Right, KeyCode::Down, KeyCode::PageDown, KeyCode::Enter] {
            press(&mut app, code, &start).await;
        }
        let form = app.form.as_ref().unwrap();
        assert!(form.calendar.is_none());
        assert_eq!(form.dialog.draft().date, "2024-4-17");
    }

    #[tokio::test]
    async fn esc_closes_calendar_without_touching_date() {
        let mut app = app();
        let start = FixedPicker(NaiveDate::from_ymd_opt(2024, 3, 9));
        app.form.as_mut().unwrap().focus = FormFocus::Date;
        press(&mut app, KeyCode::Enter, &start).await;
        press(&mut app, KeyCode::Left, &start).await;
        press(&mut app, KeyCode::Esc, &start).await;

        // The dialog stays open; only the popup went away.
        let form = app.form.as_ref().unwrap();
        assert!(form.calendar.is_none());
        assert_eq!(form.dialog.draft().date, "");
    }

    #[test]
    fn failed_setup_restores_terminal() {
        let restored = Cell::new(false);
        let failed: Result<()> = Err(anyhow::anyhow!("no tty"));
        assert!(or_restore(failed, || restored.set(true)).is_err());
        assert!(restored.get());

        let restored = Cell::new(false);
        assert_eq!(or_restore(Ok(7), || restored.set(true)).unwrap(), 7);
        assert!(!restored.get());
    }
}
