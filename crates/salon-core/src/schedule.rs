//! # Local Schedule List
//!
//! The home dashboard keeps a small schedule list (appointments, reminders)
//! on the device only. Nothing here is sent to the backend.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

const MAX_TITLE_LEN: usize = 100;

/// One entry on the home screen schedule list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScheduleEntry {
    #[ts(as = "String")]
    pub id: Uuid,
    pub title: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// `None` for all-day entries, which sort first.
    #[ts(as = "Option<String>")]
    pub time: Option<NaiveTime>,
    pub done: bool,
}

impl ScheduleEntry {
    fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or(NaiveTime::MIN))
    }
}

/// In-memory schedule list.
#[derive(Debug, Clone, Default)]
pub struct ScheduleBook {
    // Insertion order is kept; it breaks ties between equal times.
    entries: Vec<ScheduleEntry>,
}

impl ScheduleBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an entry and returns its id.
    pub fn add(
        &mut self,
        title: &str,
        date: NaiveDate,
        time: Option<NaiveTime>,
    ) -> ValidationResult<Uuid> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::Required {
                field: "title".to_string(),
            });
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title".to_string(),
                max: MAX_TITLE_LEN,
            });
        }

        let id = Uuid::new_v4();
        self.entries.push(ScheduleEntry {
            id,
            title: title.to_string(),
            date,
            time,
            done: false,
        });
        Ok(id)
    }

    /// Removes an entry. Returns false if it did not exist.
    pub fn remove(&mut self, id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Flips the done flag and returns the new value.
    pub fn toggle_done(&mut self, id: Uuid) -> Option<bool> {
        let entry = self.entries.iter_mut().find(|e| e.id == id)?;
        entry.done = !entry.done;
        Some(entry.done)
    }

    /// Entries for one day, all-day entries first, then by time.
    pub fn for_date(&self, date: NaiveDate) -> Vec<&ScheduleEntry> {
        let mut day: Vec<&ScheduleEntry> = self.entries.iter().filter(|e| e.date == date).collect();
        // sort_by_key is stable, so equal times keep insertion order
        day.sort_by_key(|e| e.time);
        day
    }

    /// The next `limit` open entries starting at or after `now`.
    pub fn upcoming(&self, now: NaiveDateTime, limit: usize) -> Vec<&ScheduleEntry> {
        let mut open: Vec<&ScheduleEntry> = self
            .entries
            .iter()
            .filter(|e| !e.done && e.starts_at() >= now)
            .collect();
        open.sort_by_key(|e| e.starts_at());
        open.truncate(limit);
        open
    }
}
