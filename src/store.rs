//! Storage collaborator boundary
//!
//! The engine never owns intake records. It pulls snapshots through
//! [`EntrySource`], which any record store can implement. [`MemoryStore`] is a
//! `Vec`-backed implementation used by the CLI, the FFI layer and tests.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::ComputeError;
use crate::settings::Settings;
use crate::types::{DrinkType, Entry};
use crate::window::entries_in_range;

/// Read-only queries the engine needs from a record store
pub trait EntrySource {
    /// All entries with `from_ms <= timestamp <= to_ms`, in any order
    fn entries_between(&self, from_ms: i64, to_ms: i64) -> Vec<Entry>;

    /// Current settings, `None` if the user never saved any
    fn settings(&self) -> Option<Settings>;
}

/// In-memory record store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    entries: Vec<Entry>,
    settings: Option<Settings>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing entries; entries without an id get one
    pub fn with_entries(entries: Vec<Entry>) -> Self {
        let mut store = Self::new();
        for entry in entries {
            store.insert(entry);
        }
        store
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = Some(settings);
    }

    /// Record a new intake and return its id
    pub fn add(&mut self, timestamp: i64, amount_ml: f64, drink_type: DrinkType) -> String {
        self.insert(Entry::new(timestamp, amount_ml, drink_type))
    }

    /// Store an entry, assigning an id if it has none
    pub fn insert(&mut self, mut entry: Entry) -> String {
        if entry.id.is_empty() {
            entry.id = Uuid::new_v4().to_string();
        }
        let id = entry.id.clone();
        debug!(id = %id, amount_ml = entry.amount_ml, "stored entry");
        self.entries.push(entry);
        id
    }

    /// Delete an entry by id, returning it if it existed
    pub fn remove(&mut self, id: &str) -> Option<Entry> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        debug!(id, "removed entry");
        Some(self.entries.remove(index))
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl EntrySource for MemoryStore {
    fn entries_between(&self, from_ms: i64, to_ms: i64) -> Vec<Entry> {
        entries_in_range(&self.entries, from_ms, to_ms).cloned().collect()
    }

    fn settings(&self) -> Option<Settings> {
        self.settings.clone()
    }
}

/// Parse a JSON array of entries
pub fn parse_array(json: &str) -> Result<Vec<Entry>, ComputeError> {
    let entries: Vec<Entry> = serde_json::from_str(json)?;
    Ok(entries)
}

/// Parse NDJSON (one entry per line, blank lines ignored)
pub fn parse_ndjson(ndjson: &str) -> Result<Vec<Entry>, ComputeError> {
    let mut entries = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<Entry>(trimmed) {
            Ok(entry) => entries.push(entry),
            Err(e) => {
                return Err(ComputeError::ParseError(format!(
                    "Failed to parse line {}: {}",
                    line_num + 1,
                    e
                )));
            }
        }
    }
    Ok(entries)
}

/// Problem found with a stored entry
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EntryIssue {
    #[error("amount must be positive, got {0}")]
    NonPositiveAmount(f64),

    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(i64),
}

/// Result of validating one entry
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub index: usize,
    pub entry_id: Option<String>,
    pub issue: EntryIssue,
}

/// Check one entry for values the engine cannot aggregate
pub fn validate_entry(entry: &Entry) -> Result<(), EntryIssue> {
    if !entry.amount_ml.is_finite() || entry.amount_ml <= 0.0 {
        return Err(EntryIssue::NonPositiveAmount(entry.amount_ml));
    }
    if chrono::DateTime::from_timestamp_millis(entry.timestamp).is_none() {
        return Err(EntryIssue::TimestampOutOfRange(entry.timestamp));
    }
    Ok(())
}

/// Validate entries, returning only the failures
pub fn validate_entries(entries: &[Entry]) -> Vec<ValidationResult> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            validate_entry(entry).err().map(|issue| ValidationResult {
                index,
                entry_id: (!entry.id.is_empty()).then(|| entry.id.clone()),
                issue,
            })
        })
        .collect()
}
