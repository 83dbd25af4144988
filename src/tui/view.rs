use crate::draft::DraftField;
use crate::model::{Priority, TagField, TaskTag};
use crate::tui::calendar::CalendarPopup;
use crate::tui::state::{AppState, DialogForm, FormFocus};
use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph},
};
use std::hash::{DefaultHasher, Hash, Hasher};

pub fn draw(f: &mut Frame, state: &mut AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(f.area());

    // --- Task List ---
    let items: Vec<ListItem> = state.tasks.with_tasks(|tasks| {
        tasks
            .iter()
            .map(|t| {
                let style = match t.priority() {
                    Priority::Critical | Priority::High => Style::default().fg(Color::Red),
                    Priority::MediumHigh => Style::default().fg(Color::Yellow),
                    _ => Style::default().fg(Color::White),
                };
                let mut spans = vec![
                    Span::styled(t.title().to_string(), style),
                    Span::raw(format!(" ({}) [{}]", t.date(), t.priority())),
                ];
                for tag in t.tags() {
                    spans.push(Span::raw(" "));
                    spans.push(Span::styled(format!("#{}", tag), Style::default().fg(tag_color(tag))));
                }
                ListItem::new(Line::from(spans))
            })
            .collect()
    });

    let title = format!(" Tasks ({}) ", items.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        );
    f.render_stateful_widget(list, chunks[0], &mut state.list_state);

    // --- Footer ---
    let footer_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    let status_color = if state.message.contains("Error") {
        Color::Red
    } else {
        Color::Cyan
    };
    let status = Paragraph::new(state.message.clone())
        .style(Style::default().fg(status_color))
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::TOP | Borders::BOTTOM)
                .title(" Status "),
        );
    let shortcuts = if state.form.as_ref().is_some_and(|form| form.calendar.is_some()) {
        "←/→: Day | ↑/↓: Week | PgUp/PgDn: Month | Enter: OK | Esc: Back"
    } else if state.form.is_some() {
        "Tab: Next | ←/→: Prio | Enter: Pick/OK | Esc: Cancel"
    } else {
        "a: Add | j/k: Move | q: Quit"
    };
    let help = Paragraph::new(shortcuts)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::TOP | Borders::BOTTOM)
                .title(" Actions "),
        );
    f.render_widget(status, footer_chunks[0]);
    f.render_widget(help, footer_chunks[1]);

    if let Some(form) = &mut state.form {
        draw_dialog(f, form);
    }
}

fn draw_dialog(f: &mut Frame, form: &mut DialogForm) {
    let area = centered(f.area(), 60, 21);
    f.render_widget(Clear, area);
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(" Add New Task ")
        .border_style(Style::default().fg(Color::Yellow));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(inner);

    let draft = form.dialog.draft();
    let tags_text = match &draft.tags {
        TagField::FreeText(raw) => raw.clone(),
        TagField::SingleEnum(Some(tag)) => format!("{} ▾", tag),
        TagField::SingleEnum(None) => "(choose) ▾".to_string(),
    };
    let tags_title = match &draft.tags {
        TagField::FreeText(_) => "Tags (comma-separated)",
        TagField::SingleEnum(_) => "Tag",
    };
    let date_text = if draft.date.is_empty() {
        "Select Date".to_string()
    } else {
        draft.date.clone()
    };

    let text_rows = [
        (FormFocus::Title, "Task Title", draft.title.clone()),
        (FormFocus::Description, "Task Description", draft.description.clone()),
        (FormFocus::Date, "Date", date_text),
        (FormFocus::Tags, tags_title, tags_text),
    ];
    for (i, (focus, label, value)) in text_rows.into_iter().enumerate() {
        let missing = focus.field().is_some_and(|fld| form.is_missing(fld));
        f.render_widget(field_widget(label, value, form.focus == focus, missing), rows[i]);
    }

    let priority = draft.priority;
    let gauge = Gauge::default()
        .block(field_block(
            &format!("Priority: {}", priority),
            form.focus == FormFocus::Priority,
            form.is_missing(DraftField::Priority),
        ))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(f64::from(priority.position()) / f64::from(crate::model::priority::MAX_POSITION))
        .label(priority.label());
    f.render_widget(gauge, rows[4]);

    let ok_style = if form.focus == FormFocus::Confirm {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default().fg(Color::Green)
    };
    let ok = Paragraph::new(Span::styled(" OK ", ok_style))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(ok, rows[5]);

    if let Some(dropdown) = &mut form.dropdown {
        let anchor = rows[3];
        let popup = Rect {
            x: anchor.x + 2,
            y: anchor.y + 2,
            width: anchor.width.saturating_sub(4).min(20),
            height: TaskTag::ALL.len() as u16 + 2,
        }
        .intersection(f.area());
        let items: Vec<ListItem> = TaskTag::ALL
            .iter()
            .map(|t| ListItem::new(t.label()).style(Style::default().fg(tag_color(t.label()))))
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        f.render_widget(Clear, popup);
        f.render_stateful_widget(list, popup, dropdown);
    }

    if let Some(calendar) = &form.calendar {
        draw_calendar(f, calendar, rows[2]);
    }
}

fn draw_calendar(f: &mut Frame, calendar: &CalendarPopup, anchor: Rect) {
    let weeks = calendar.weeks();
    let popup = Rect {
        x: anchor.x + 2,
        y: anchor.y + 2,
        width: 22,
        height: weeks.len() as u16 + 3,
    }
    .intersection(f.area());

    let cursor_day = calendar.cursor.day();
    let mut lines = vec![Line::from(Span::styled(
        "Mo Tu We Th Fr Sa Su",
        Style::default().fg(Color::DarkGray),
    ))];
    for week in weeks {
        let mut spans = Vec::new();
        for (i, day) in week.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(match day {
                Some(d) if *d == cursor_day => Span::styled(
                    format!("{:>2}", d),
                    Style::default().fg(Color::Black).bg(Color::Yellow),
                ),
                Some(d) => Span::raw(format!("{:>2}", d)),
                None => Span::raw("  "),
            });
        }
        lines.push(Line::from(spans));
    }

    let title = format!(" {} ", calendar.cursor.format("%B %Y"));
    let grid = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    f.render_widget(Clear, popup);
    f.render_widget(grid, popup);
}

fn field_block(title: &str, focused: bool, missing: bool) -> Block<'static> {
    let border = if missing {
        Style::default().fg(Color::Red)
    } else if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let title = if missing {
        format!(" {} (required) ", title)
    } else {
        format!(" {} ", title)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border)
}

fn field_widget(label: &str, value: String, focused: bool, missing: bool) -> Paragraph<'static> {
    let value = if focused { format!("{}_", value) } else { value };
    Paragraph::new(value).block(field_block(label, focused, missing))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [area] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    area
}

/// Stable pastel color per tag name.
fn tag_color(tag: &str) -> Color {
    let mut hasher = DefaultHasher::new();
    tag.hash(&mut hasher);
    let hash = hasher.finish();

    let h = (hash % 360) as f32;
    let s = 0.40 + ((hash >> 16) % 51) as f32 / 100.0;
    let l = 0.65 + ((hash >> 32) % 26) as f32 / 100.0;

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match h as u32 / 60 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let to_u8 = |v: f32| ((v + m) * 255.0).round() as u8;
    Color::Rgb(to_u8(r), to_u8(g), to_u8(b))
}
