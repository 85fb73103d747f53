use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::directory::TARGET_ROLES;
use crate::models::{Application, Status};

const FOLLOW_UP_AFTER_DAYS: i64 = 14;
const PREPARE_AFTER_DAYS: i64 = 7;

const TIPS: [&str; 3] = [
    "A portfolio weighs more than a CV in creative roles.",
    "Try scoring a role slightly outside your comfort zone.",
    "AI skills are a strong card right now. Mention them in every application.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind {
    FollowUp,
    Tracking,
    AllClear,
    Hint,
    Focus,
    Tip,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub text: String,
}

impl Suggestion {
    fn new(kind: SuggestionKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }
}

/// Resolve a tracker date against `today`.
///
/// Accepts `dd.mm.` (year implicit) and `dd.mm.yyyy`. An implicit-year date
/// that would lie in the future is taken from the previous year.
pub fn resolve_date(value: &str, today: NaiveDate) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.trim().split('.').filter(|p| !p.is_empty()).collect();
    let (day, month, year) = match parts.as_slice() {
        [d, m] => (d.parse::<u32>().ok()?, m.parse::<u32>().ok()?, None),
        [d, m, y] => (
            d.parse::<u32>().ok()?,
            m.parse::<u32>().ok()?,
            Some(y.parse::<i32>().ok()?),
        ),
        _ => return None,
    };

    if let Some(year) = year {
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let this_year = NaiveDate::from_ymd_opt(today.year(), month, day);
    match this_year {
        Some(date) if date <= today => Some(date),
        _ => NaiveDate::from_ymd_opt(today.year() - 1, month, day),
    }
}

pub fn days_since(app: &Application, today: NaiveDate) -> Option<i64> {
    resolve_date(&app.date, today).map(|date| (today - date).num_days())
}

/// Reminders derived from the tracker plus one focus role and one tip.
pub fn suggestions<R: Rng + ?Sized>(
    applications: &[Application],
    today: NaiveDate,
    rng: &mut R,
) -> Vec<Suggestion> {
    let mut out = Vec::new();

    if applications.is_empty() {
        out.push(Suggestion::new(
            SuggestionKind::Hint,
            "Add applications to the tracker and follow-up reminders will show up here.",
        ));
    } else {
        let mut found = false;
        for app in applications.iter().filter(|a| a.status == Status::Waiting) {
            let Some(days) = days_since(app, today) else { continue };
            if days > FOLLOW_UP_AFTER_DAYS {
                out.push(Suggestion::new(
                    SuggestionKind::FollowUp,
                    format!(
                        "Follow-up: {} days since applying to {} with no news. A short check-in could help.",
                        days, app.company
                    ),
                ));
                found = true;
            } else if days > PREPARE_AFTER_DAYS {
                out.push(Suggestion::new(
                    SuggestionKind::Tracking,
                    format!(
                        "Tracking: {} has been waiting for a week. Good time to draft a follow-up message.",
                        app.company
                    ),
                ));
                found = true;
            }
        }
        if !found {
            out.push(Suggestion::new(
                SuggestionKind::AllClear,
                "Tracker is in order: no overdue replies right now.",
            ));
        }
    }

    if let Some(role) = TARGET_ROLES.choose(rng) {
        out.push(Suggestion::new(
            SuggestionKind::Focus,
            format!("Focus: {role} is in demand. Have you run the power search for it this week?"),
        ));
    }
    if let Some(tip) = TIPS.choose(rng) {
        out.push(Suggestion::new(SuggestionKind::Tip, format!("Tip: {tip}")));
    }

    out
}

/// Countdown label for a scheduled interview.
pub fn interview_badge(app: &Application, today: NaiveDate) -> Option<String> {
    if app.status != Status::Interview {
        return None;
    }
    let date = NaiveDate::parse_from_str(&app.interview_date, "%Y-%m-%d").ok()?;
    let badge = match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        n if n > 1 => format!("In {n} days"),
        _ => "Passed".to_string(),
    };
    Some(badge)
}
