use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::store::TrackerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Waiting")]
    Waiting,
    #[serde(rename = "In discussion")]
    InDiscussion,
    #[serde(rename = "Interview")]
    Interview,
    #[serde(rename = "No response")]
    NoResponse,
    #[serde(rename = "Rejected")]
    Rejected,
    #[serde(rename = "Interested")]
    Interested,
    #[serde(rename = "Offer")]
    Offer,
}

impl Status {
    pub const ALL: [Status; 7] = [
        Status::Waiting,
        Status::InDiscussion,
        Status::Interview,
        Status::NoResponse,
        Status::Rejected,
        Status::Interested,
        Status::Offer,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Waiting => "Waiting",
            Status::InDiscussion => "In discussion",
            Status::Interview => "Interview",
            Status::NoResponse => "No response",
            Status::Rejected => "Rejected",
            Status::Interested => "Interested",
            Status::Offer => "Offer",
        }
    }

    /// Colour class used by the list and browser views.
    pub fn tone(self) -> Tone {
        match self {
            Status::InDiscussion | Status::Interview => Tone::Positive,
            Status::NoResponse | Status::Rejected => Tone::Negative,
            Status::Offer => Tone::Highlight,
            Status::Waiting | Status::Interested => Tone::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Positive,
    Negative,
    Highlight,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

impl FromStr for Status {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect();

        Status::ALL
            .iter()
            .copied()
            .find(|status| status.label().to_lowercase() == normalized)
            .ok_or_else(|| TrackerError::UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub date: String,
    pub event: String,
    #[serde(default)]
    pub note: String,
}

/// One row of the tracker file. Optional fields written by older versions of
/// the file are back-filled with empty values when read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub company: String,
    #[serde(default)]
    pub role: String,
    pub status: Status,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub interview_date: String,
    #[serde(default)]
    pub interview_time: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
}

impl Application {
    pub fn has_contact(&self) -> bool {
        !(self.contact_name.is_empty()
            && self.contact_phone.is_empty()
            && self.contact_email.is_empty())
    }
}

/// Fields collected when a new application is entered.
#[derive(Debug, Clone, Default)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub status: Option<Status>,
    pub source: String,
}

#[derive(Debug, Clone, Default)]
pub struct ContactUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub const EVENT_KINDS: [&str; 5] = ["Email sent", "Reply received", "Interview", "Follow-up", "Other"];

pub const SOURCES: [&str; 5] = ["LinkedIn", "Direct search", "Network", "Job market portal", "Other"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_labels_and_aliases() {
        assert_eq!("Waiting".parse::<Status>().unwrap(), Status::Waiting);
        assert_eq!("in discussion".parse::<Status>().unwrap(), Status::InDiscussion);
        assert_eq!("no-response".parse::<Status>().unwrap(), Status::NoResponse);
        assert_eq!(" OFFER ".parse::<Status>().unwrap(), Status::Offer);
    }

    #[test]
    fn test_status_rejects_unknown() {
        let err = "ghosted".parse::<Status>().unwrap_err();
        assert!(err.to_string().contains("ghosted"));
    }

    #[test]
    fn test_status_serializes_as_label() {
        let json = serde_json::to_string(&Status::InDiscussion).unwrap();
        assert_eq!(json, "\"In discussion\"");
    }

    #[test]
    fn test_application_backfills_missing_fields() {
        let json = r#"{"company": "Reaktor", "role": "Designer", "status": "Waiting", "date": "03.02."}"#;
        let app: Application = serde_json::from_str(json).unwrap();
        assert_eq!(app.company, "Reaktor");
        assert_eq!(app.contact_email, "");
        assert_eq!(app.interview_date, "");
        assert!(app.timeline.is_empty());
        assert!(!app.has_contact());
    }

    #[test]
    fn test_status_tone() {
        assert_eq!(Status::Interview.tone(), Tone::Positive);
        assert_eq!(Status::Rejected.tone(), Tone::Negative);
        assert_eq!(Status::Offer.tone(), Tone::Highlight);
        assert_eq!(Status::Waiting.tone(), Tone::Neutral);
    }
}
