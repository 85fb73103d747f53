use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::models::{Application, ContactUpdate, NewApplication, Status, TimelineEvent};

/// Format used for the `date` column and timeline entries (year is implicit).
pub const SHORT_DATE_FORMAT: &str = "%d.%m.";

#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    #[error("company name must not be empty")]
    EmptyCompany,

    #[error("no application #{} (tracker has {len})", .index + 1)]
    IndexOutOfRange { index: usize, len: usize },

    #[error("unknown status '{0}'. Available: Waiting, In discussion, Interview, No response, Rejected, Interested, Offer")]
    UnknownStatus(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidDate(String),
}

/// The tracked applications plus the file that mirrors them.
///
/// Applications are identified by their position in the list. Every mutation
/// rewrites the whole file; a failed write is logged, remembered in
/// [`Tracker::save_error`], and the in-memory list stays authoritative for the
/// rest of the command.
pub struct Tracker {
    path: PathBuf,
    applications: Vec<Application>,
    save_error: Option<String>,
}

impl Tracker {
    /// Open the tracker file. A missing or unreadable file yields an empty list.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let applications = if path.exists() {
            match load_applications(&path) {
                Ok(apps) => {
                    debug!(path = %path.display(), count = apps.len(), "tracker loaded");
                    apps
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %format!("{e:#}"), "could not load tracker, starting empty");
                    Vec::new()
                }
            }
        } else {
            debug!(path = %path.display(), "tracker file not found, starting empty");
            Vec::new()
        };
        Self {
            path,
            applications,
            save_error: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&Application, TrackerError> {
        let len = self.applications.len();
        self.applications
            .get(index)
            .ok_or(TrackerError::IndexOutOfRange { index, len })
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut Application, TrackerError> {
        let len = self.applications.len();
        self.applications
            .get_mut(index)
            .ok_or(TrackerError::IndexOutOfRange { index, len })
    }

    /// Write the full list to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string_pretty(&self.applications)
            .context("Failed to serialize applications")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        Ok(())
    }

    /// Why the latest write failed, or `None` if it succeeded.
    pub fn save_error(&self) -> Option<&str> {
        self.save_error.as_deref()
    }

    /// Save, logging and remembering the failure instead of returning it.
    fn persist(&mut self) {
        self.save_error = match self.save() {
            Ok(()) => None,
            Err(e) => {
                let message = format!("{e:#}");
                warn!(path = %self.path.display(), error = %message, "failed to save tracker");
                Some(message)
            }
        };
    }

    /// Append a new application and return its index.
    pub fn add(&mut self, new: NewApplication, today: NaiveDate) -> Result<usize, TrackerError> {
        let company = new.company.trim();
        if company.is_empty() {
            return Err(TrackerError::EmptyCompany);
        }

        let date = today.format(SHORT_DATE_FORMAT).to_string();
        let application = Application {
            company: company.to_string(),
            role: new.role.trim().to_string(),
            status: new.status.unwrap_or(Status::Waiting),
            date: date.clone(),
            source: new.source,
            contact_name: String::new(),
            contact_phone: String::new(),
            contact_email: String::new(),
            interview_date: String::new(),
            interview_time: String::new(),
            notes: String::new(),
            timeline: vec![TimelineEvent {
                date,
                event: "Added to tracker".to_string(),
                note: String::new(),
            }],
        };

        self.applications.push(application);
        let index = self.applications.len() - 1;
        info!(index, company, "application added");
        self.persist();
        Ok(index)
    }

    /// Overwrite the status. Leaving `Interview` clears the interview slot.
    pub fn set_status(&mut self, index: usize, status: Status) -> Result<(), TrackerError> {
        let app = self.get_mut(index)?;
        app.status = status;
        if status != Status::Interview {
            app.interview_date.clear();
            app.interview_time.clear();
        }
        info!(index, status = %status, "status updated");
        self.persist();
        Ok(())
    }

    pub fn update_contact(&mut self, index: usize, update: ContactUpdate) -> Result<(), TrackerError> {
        let app = self.get_mut(index)?;
        if let Some(name) = update.name {
            app.contact_name = name.trim().to_string();
        }
        if let Some(phone) = update.phone {
            app.contact_phone = phone.trim().to_string();
        }
        if let Some(email) = update.email {
            app.contact_email = email.trim().to_string();
        }
        self.persist();
        Ok(())
    }

    /// Move the application to `Interview` and record when it takes place.
    pub fn schedule_interview(
        &mut self,
        index: usize,
        date: &str,
        time: Option<&str>,
    ) -> Result<(), TrackerError> {
        let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| TrackerError::InvalidDate(date.to_string()))?;
        let app = self.get_mut(index)?;
        app.status = Status::Interview;
        app.interview_date = parsed.format("%Y-%m-%d").to_string();
        app.interview_time = time.map(|t| t.trim().to_string()).unwrap_or_default();
        self.persist();
        Ok(())
    }

    pub fn add_event(
        &mut self,
        index: usize,
        event: &str,
        note: &str,
        today: NaiveDate,
    ) -> Result<(), TrackerError> {
        let app = self.get_mut(index)?;
        app.timeline.push(TimelineEvent {
            date: today.format(SHORT_DATE_FORMAT).to_string(),
            event: event.to_string(),
            note: note.to_string(),
        });
        self.persist();
        Ok(())
    }

    pub fn set_notes(&mut self, index: usize, notes: &str) -> Result<(), TrackerError> {
        self.get_mut(index)?.notes = notes.to_string();
        self.persist();
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<Application, TrackerError> {
        let len = self.applications.len();
        if index >= len {
            return Err(TrackerError::IndexOutOfRange { index, len });
        }
        let removed = self.applications.remove(index);
        info!(index, company = %removed.company, "application removed");
        self.persist();
        Ok(removed)
    }
}

fn load_applications(path: &Path) -> Result<Vec<Application>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_app(company: &str) -> NewApplication {
        NewApplication {
            company: company.to_string(),
            role: "Visual designer".to_string(),
            status: None,
            source: "LinkedIn".to_string(),
        }
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tracker = Tracker::open(dir.path().join("applications.json"));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_open_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applications.json");
        fs::write(&path, "{not json").unwrap();
        let tracker = Tracker::open(&path);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_add_rejects_blank_company() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::open(dir.path().join("applications.json"));
        let result = tracker.add(new_app("   "), day(2026, 3, 4));
        assert!(matches!(result, Err(TrackerError::EmptyCompany)));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_add_sets_defaults_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("applications.json");
        let mut tracker = Tracker::open(&path);

        let index = tracker.add(new_app(" Futurice "), day(2026, 3, 4)).unwrap();
        assert_eq!(index, 0);

        let app = tracker.get(0).unwrap();
        assert_eq!(app.company, "Futurice");
        assert_eq!(app.status, Status::Waiting);
        assert_eq!(app.date, "04.03.");
        assert_eq!(app.timeline.len(), 1);
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip_preserves_order_and_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applications.json");

        let mut tracker = Tracker::open(&path);
        tracker.add(new_app("SEK"), day(2026, 1, 10)).unwrap();
        tracker.add(new_app("Miltton"), day(2026, 1, 11)).unwrap();
        tracker
            .update_contact(
                1,
                ContactUpdate {
                    name: Some("Anna".to_string()),
                    phone: None,
                    email: Some("anna@example.com".to_string()),
                },
            )
            .unwrap();
        tracker.schedule_interview(0, "2026-02-01", Some("10:00")).unwrap();

        let reloaded = Tracker::open(&path);
        assert_eq!(reloaded.applications(), tracker.applications());
        assert_eq!(reloaded.get(0).unwrap().company, "SEK");
        assert_eq!(reloaded.get(1).unwrap().contact_email, "anna@example.com");
    }

    #[test]
    fn test_round_trip_backfills_legacy_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applications.json");
        fs::write(
            &path,
            r#"[{"company": "Valve", "role": "UX", "status": "Rejected", "date": "01.02."}]"#,
        )
        .unwrap();

        let tracker = Tracker::open(&path);
        tracker.save().unwrap();
        let reloaded = Tracker::open(&path);

        let app = reloaded.get(0).unwrap();
        assert_eq!(app.status, Status::Rejected);
        assert_eq!(app.contact_name, "");
        assert_eq!(app.interview_time, "");
        assert_eq!(reloaded.applications(), tracker.applications());
    }

    #[test]
    fn test_leaving_interview_clears_slot() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::open(dir.path().join("applications.json"));
        tracker.add(new_app("Vincit"), day(2026, 5, 5)).unwrap();
        tracker.schedule_interview(0, "2026-05-20", None).unwrap();
        assert_eq!(tracker.get(0).unwrap().status, Status::Interview);
        assert_eq!(tracker.get(0).unwrap().interview_date, "2026-05-20");

        tracker.set_status(0, Status::Offer).unwrap();
        let app = tracker.get(0).unwrap();
        assert_eq!(app.status, Status::Offer);
        assert_eq!(app.interview_date, "");
    }

    #[test]
    fn test_schedule_interview_rejects_bad_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::open(dir.path().join("applications.json"));
        tracker.add(new_app("Avidly"), day(2026, 5, 5)).unwrap();
        let result = tracker.schedule_interview(0, "20.5.2026", None);
        assert!(matches!(result, Err(TrackerError::InvalidDate(_))));
        assert_eq!(tracker.get(0).unwrap().status, Status::Waiting);
    }

    #[test]
    fn test_remove_shifts_positions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("applications.json");
        let mut tracker = Tracker::open(&path);
        tracker.add(new_app("A"), day(2026, 1, 1)).unwrap();
        tracker.add(new_app("B"), day(2026, 1, 1)).unwrap();
        tracker.add(new_app("C"), day(2026, 1, 1)).unwrap();

        let removed = tracker.remove(1).unwrap();
        assert_eq!(removed.company, "B");
        assert_eq!(tracker.get(1).unwrap().company, "C");

        let reloaded = Tracker::open(&path);
        assert_eq!(reloaded.len(), 2);
    }

    #[test]
    fn test_out_of_range_index() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::open(dir.path().join("applications.json"));
        let err = tracker.set_status(3, Status::Rejected).unwrap_err();
        assert!(matches!(err, TrackerError::IndexOutOfRange { index: 3, len: 0 }));
        assert!(err.to_string().contains("#4"));
        assert!(tracker.remove(0).is_err());
    }

    #[test]
    fn test_add_event_appends_to_timeline() {
        let dir = tempfile::tempdir().unwrap();
        let mut tracker = Tracker::open(dir.path().join("applications.json"));
        tracker.add(new_app("Reaktor"), day(2026, 6, 1)).unwrap();
        tracker.add_event(0, "Email sent", "cover letter v2", day(2026, 6, 3)).unwrap();
        let timeline = &tracker.get(0).unwrap().timeline;
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline[1].date, "03.06.");
        assert_eq!(timeline[1].note, "cover letter v2");
    }

    #[test]
    fn test_failed_save_is_reported_and_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("tracker");
        let mut tracker = Tracker::open(folder.join("applications.json"));
        tracker.add(new_app("Solita"), day(2026, 4, 1)).unwrap();
        assert!(tracker.save_error().is_none());

        // Replace the folder with a plain file so the next write cannot land.
        fs::remove_dir_all(&folder).unwrap();
        fs::write(&folder, "").unwrap();
        tracker.set_status(0, Status::Rejected).unwrap();
        assert!(tracker.save_error().is_some());
        assert_eq!(tracker.get(0).unwrap().status, Status::Rejected);

        fs::remove_file(&folder).unwrap();
        tracker.set_notes(0, "second try").unwrap();
        assert!(tracker.save_error().is_none());
        assert_eq!(Tracker::open(folder.join("applications.json")).len(), 1);
    }
}
