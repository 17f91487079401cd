use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Mood labels offered by the entry form, in display order.
pub const MOOD_LABELS: &[&str] = &[
    "Happy", "Sad", "Excited", "Angry", "Stressed", "Calm", "Anxious", "Grateful", "Tired",
    "Energetic",
];

pub fn is_known_mood(label: &str) -> bool {
    MOOD_LABELS.contains(&label)
}

/// An entry that broke the store contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("invalid entry: missing id")]
    MissingId,
    #[error("invalid entry {id}: missing created_at")]
    MissingCreatedAt { id: u64 },
    #[error("invalid entry {id}: missing mood")]
    MissingMood { id: u64 },
}

/// Entry as persisted by the store. Every field is optional here so that a
/// broken record is reported instead of silently dropped by serde.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EntryRecord {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub mood: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: u64,
    pub created_at: String,
    pub mood: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Entry {
    /// Parses `created_at`. RFC 3339 text keeps its own offset; a timestamp
    /// without an offset is read as UTC. Returns `None` for anything else.
    pub fn timestamp(&self) -> Option<DateTime<FixedOffset>> {
        let raw = self.created_at.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts);
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc().fixed_offset())
    }

    /// Calendar day of the entry in `offset`.
    pub fn day_in(&self, offset: &FixedOffset) -> Option<NaiveDate> {
        self.timestamp()
            .map(|ts| ts.with_timezone(offset).date_naive())
    }

    pub fn notes_text(&self) -> &str {
        self.notes.as_deref().unwrap_or("")
    }
}

impl TryFrom<EntryRecord> for Entry {
    type Error = EntryError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let id = record.id.ok_or(EntryError::MissingId)?;
        let created_at = record
            .created_at
            .ok_or(EntryError::MissingCreatedAt { id })?;
        let mood = record.mood.ok_or(EntryError::MissingMood { id })?;

        Ok(Self {
            id,
            created_at,
            mood,
            notes: record.notes,
        })
    }
}

impl From<&Entry> for EntryRecord {
    fn from(entry: &Entry) -> Self {
        Self {
            id: Some(entry.id),
            created_at: Some(entry.created_at.clone()),
            mood: Some(entry.mood.clone()),
            notes: entry.notes.clone(),
        }
    }
}

pub fn entries_from_records(records: &[EntryRecord]) -> Result<Vec<Entry>, EntryError> {
    records.iter().cloned().map(Entry::try_from).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    #[serde(default)]
    pub next_id: u64,
    #[serde(default)]
    pub entries: Vec<EntryRecord>,
}

impl AppData {
    pub fn entries(&self) -> Result<Vec<Entry>, EntryError> {
        entries_from_records(&self.entries)
    }
}

#[derive(Debug, Deserialize)]
pub struct NewEntry {
    pub mood: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodShare {
    pub mood: String,
    pub count: u64,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_entries: u64,
    pub mood_counts: BTreeMap<String, u64>,
    pub mood_breakdown: Vec<MoodShare>,
    pub most_common_mood: Option<String>,
    pub most_common_count: u64,
    pub unique_days_tracked: u64,
    pub current_streak: u64,
    pub average_entries_per_day: f64,
}

#[derive(Debug, Serialize)]
pub struct SettingsResponse {
    pub theme: crate::config::Theme,
    pub utc_offset_minutes: i32,
}
