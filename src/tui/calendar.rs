// Month view popup opened from the Date field
use chrono::{Datelike, Days, Months, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarKey {
    Pending,
    Confirmed(NaiveDate),
    Cancelled,
}

/// Left/Right move a day, Up/Down a week, PageUp/PageDown a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarPopup {
    pub cursor: NaiveDate,
}

impl CalendarPopup {
    pub fn new(start: NaiveDate) -> Self {
        Self { cursor: start }
    }

    pub fn handle_key(&mut self, code: KeyCode) -> CalendarKey {
        let moved = match code {
            KeyCode::Enter => return CalendarKey::Confirmed(self.cursor),
            KeyCode::Esc => return CalendarKey::Cancelled,
            KeyCode::Left | KeyCode::Char('h') => self.cursor.checked_sub_days(Days::new(1)),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.checked_add_days(Days::new(1)),
            KeyCode::Up | KeyCode::Char('k') => self.cursor.checked_sub_days(Days::new(7)),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.checked_add_days(Days::new(7)),
            KeyCode::PageUp => self.cursor.checked_sub_months(Months::new(1)),
            KeyCode::PageDown => self.cursor.checked_add_months(Months::new(1)),
            _ => None,
        };
        if let Some(date) = moved {
            self.cursor = date;
        }
        CalendarKey::Pending
    }

    /// Day numbers of the cursor's month laid out Monday first.
    pub fn weeks(&self) -> Vec<[Option<u32>; 7]> {
        let first = self.cursor.with_day(1).unwrap_or(self.cursor);
        let offset = first.weekday().num_days_from_monday() as usize;
        let days = days_in_month(first);

        let mut weeks = Vec::new();
        let mut week = [None; 7];
        for day in 1..=days {
            let slot = (offset + day as usize - 1) % 7;
            week[slot] = Some(day);
            if slot == 6 {
                weeks.push(week);
                week = [None; 7];
            }
        }
        if week.iter().any(Option::is_some) {
            weeks.push(week);
        }
        weeks
    }
}

fn days_in_month(first: NaiveDate) -> u32 {
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .map_or(31, |last| last.day())
}
