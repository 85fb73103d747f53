use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::agent;
use crate::models::{Status, Tone};
use crate::scoring::{self, MatchTier};
use crate::store::Tracker;

struct AppState {
    selected: usize,
    scroll_offset: u16,
    today: NaiveDate,
    /// Shown in the footer instead of the key help until the next key press.
    message: Option<String>,
}

impl AppState {
    fn new(today: NaiveDate) -> Self {
        Self {
            selected: 0,
            scroll_offset: 0,
            today,
            message: None,
        }
    }

    fn next(&mut self, len: usize) {
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }
}

fn status_for_key(code: KeyCode) -> Option<Status> {
    match code {
        KeyCode::Char('w') => Some(Status::Waiting),
        KeyCode::Char('d') => Some(Status::InDiscussion),
        KeyCode::Char('i') => Some(Status::Interview),
        KeyCode::Char('n') => Some(Status::NoResponse),
        KeyCode::Char('x') => Some(Status::Rejected),
        KeyCode::Char('t') => Some(Status::Interested),
        KeyCode::Char('o') => Some(Status::Offer),
        _ => None,
    }
}

pub fn run_browse(tracker: &mut Tracker, today: NaiveDate) -> Result<()> {
    if tracker.is_empty() {
        println!("No applications tracked yet.");
        return Ok(());
    }

    let mut state = AppState::new(today);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, tracker);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut AppState,
    tracker: &mut Tracker,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, tracker, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if handle_key(state, tracker, key.code) {
                break;
            }
            list_state.select(Some(state.selected));
        }
    }
    Ok(())
}

/// Apply one key press. Returns `true` when the browser should close.
fn handle_key(state: &mut AppState, tracker: &mut Tracker, code: KeyCode) -> bool {
    state.message = None;
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Down | KeyCode::Char('j') => state.next(tracker.len()),
        KeyCode::Up | KeyCode::Char('k') => state.prev(),
        KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
        KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
        KeyCode::Delete | KeyCode::Char('D') => {
            state.message = Some(match tracker.remove(state.selected) {
                Ok(removed) => saved_or(tracker, format!("Removed {}", removed.company)),
                Err(e) => format!("Remove failed: {e}"),
            });
            if tracker.is_empty() {
                return true;
            }
            state.clamp(tracker.len());
        }
        code => {
            if let Some(status) = status_for_key(code) {
                state.message = match tracker.set_status(state.selected, status) {
                    Ok(()) => tracker.save_error().map(|e| format!("Not saved: {e}")),
                    Err(e) => Some(format!("Status update failed: {e}")),
                };
            }
        }
    }
    false
}

fn saved_or(tracker: &Tracker, done: String) -> String {
    match tracker.save_error() {
        Some(error) => format!("Not saved: {error}"),
        None => done,
    }
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Neutral => Color::Gray,
        Tone::Positive => Color::Green,
        Tone::Negative => Color::Red,
        Tone::Highlight => Color::Yellow,
    }
}

fn draw(frame: &mut Frame, state: &AppState, tracker: &Tracker, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(frame.area());

    // Left panel: tracked applications
    let items: Vec<ListItem> = tracker
        .applications()
        .iter()
        .enumerate()
        .map(|(i, app)| {
            let company: String = if app.company.chars().count() > 28 {
                format!("{}...", app.company.chars().take(25).collect::<String>())
            } else {
                app.company.clone()
            };
            let line = Line::from(vec![
                Span::styled("● ", Style::default().fg(tone_color(app.status.tone()))),
                Span::raw(format!("#{:<3} {}", i + 1, company)),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Tracker ({}) ", tracker.len())),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: application detail
    let detail = build_detail(state, tracker);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    // Footer help
    let help_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let footer = match &state.message {
        Some(message) => Paragraph::new(format!(" {message}")).style(Style::default().fg(Color::Yellow)),
        None => Paragraph::new(
            " j/k:navigate  J/K:scroll  w:waiting d:discussion i:interview n:no-response x:rejected t:interested o:offer  D:delete  q:quit",
        )
        .style(Style::default().fg(Color::DarkGray)),
    };
    frame.render_widget(footer, help_area[1]);
}

fn build_detail<'a>(state: &AppState, tracker: &'a Tracker) -> Text<'a> {
    let Ok(app) = tracker.get(state.selected) else {
        return Text::raw("No application selected");
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        &app.company,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if !app.role.is_empty() {
        lines.push(Line::from(app.role.as_str()));
    }

    lines.push(Line::from(Span::styled(
        format!("Status: {}", app.status),
        Style::default().fg(tone_color(app.status.tone())),
    )));
    lines.push(Line::from(format!("Added: {}", app.date)));
    if !app.source.is_empty() {
        lines.push(Line::from(format!("Source: {}", app.source)));
    }

    if let Some(badge) = agent::interview_badge(app, state.today) {
        let when = if app.interview_time.is_empty() {
            app.interview_date.clone()
        } else {
            format!("{} {}", app.interview_date, app.interview_time)
        };
        lines.push(Line::from(Span::styled(
            format!("Interview: {} ({})", when, badge),
            Style::default().fg(Color::Cyan),
        )));
    }

    if !app.role.is_empty() {
        let score = scoring::match_score(&app.role, "", "");
        lines.push(Line::from(format!(
            "Role match: {:.1}/5.0 {} {}",
            score,
            scoring::progress_bar(score, 10),
            MatchTier::from_score(score).label()
        )));
    }

    lines.push(Line::from(""));

    if app.has_contact() {
        lines.push(Line::from(Span::styled(
            "Contact",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for (label, value) in [
            ("Name", &app.contact_name),
            ("Phone", &app.contact_phone),
            ("Email", &app.contact_email),
        ] {
            if !value.is_empty() {
                lines.push(Line::from(format!("  {label}: {value}")));
            }
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        format!("Timeline ({})", app.timeline.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for event in &app.timeline {
        if event.note.is_empty() {
            lines.push(Line::from(format!("  {} - {}", event.date, event.event)));
        } else {
            lines.push(Line::from(format!("  {} - {}: {}", event.date, event.event, event.note)));
        }
    }

    if !app.notes.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Notes",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for line in textwrap::fill(&app.notes, 70).lines() {
            lines.push(Line::from(format!("  {}", line)));
        }
    }

    Text::from(lines)
}
