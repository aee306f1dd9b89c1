//! Core types for the Hydro Pace engine
//!
//! This module defines the records supplied by the storage collaborator and the
//! values derived from them: pacing results, checkpoint guidance, weekly and
//! monthly summaries.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ComputeError;

/// Kind of beverage recorded with an intake entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrinkType {
    #[default]
    Water,
    Coffee,
    Tea,
    Other,
}

impl DrinkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DrinkType::Water => "water",
            DrinkType::Coffee => "coffee",
            DrinkType::Tea => "tea",
            DrinkType::Other => "other",
        }
    }
}

impl FromStr for DrinkType {
    type Err = ComputeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" => Ok(DrinkType::Water),
            "coffee" => Ok(DrinkType::Coffee),
            "tea" => Ok(DrinkType::Tea),
            "other" => Ok(DrinkType::Other),
            other => Err(ComputeError::ParseError(format!(
                "unknown drink type: {}",
                other
            ))),
        }
    }
}

/// A single timestamped intake record, owned by the storage collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Opaque identifier assigned by storage (empty until stored)
    #[serde(default)]
    pub id: String,
    /// Instant of the intake (milliseconds since the Unix epoch)
    pub timestamp: i64,
    /// Amount consumed (millilitres)
    pub amount_ml: f64,
    /// Beverage kind
    #[serde(rename = "type", default)]
    pub drink_type: DrinkType,
    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Entry {
    pub fn new(timestamp: i64, amount_ml: f64, drink_type: DrinkType) -> Self {
        Self {
            id: String::new(),
            timestamp,
            amount_ml,
            drink_type,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Total intake for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayStat {
    pub date: NaiveDate,
    pub total_ml: f64,
}

/// Where actual intake sits relative to the expected curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PacingLabel {
    Behind,
    OnPace,
    Ahead,
}

impl PacingLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            PacingLabel::Behind => "behind",
            PacingLabel::OnPace => "on_pace",
            PacingLabel::Ahead => "ahead",
        }
    }
}

/// Comparison of actual intake against the expected curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PacingResult {
    /// Amount that should have been consumed by now (ml)
    pub expected_ml: f64,
    /// Actual minus expected (ml); positive means ahead
    pub diff_ml: f64,
    pub label: PacingLabel,
}

/// Amount needed by the next checkpoint to stay on pace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guidance {
    /// Instant of the next checkpoint
    pub at: DateTime<FixedOffset>,
    /// Amount still missing at that checkpoint (ml, never negative)
    pub need_ml: f64,
}

/// Guidance as shown to the user, rounded up to a quick amount
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub at: DateTime<FixedOffset>,
    pub need_ml: f64,
    /// Quick amount covering `need_ml`
    pub amount_ml: f64,
}

/// Seven-day summary ending today
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStats {
    /// Oldest first, today last
    pub days: Vec<DayStat>,
    /// Consecutive days meeting the goal
    pub streak: u32,
}

/// A populated day cell of the monthly grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthCell {
    pub date: NaiveDate,
    pub total_ml: f64,
    pub met_goal: bool,
    /// Heatmap intensity (0-1)
    pub fill_ratio: f64,
}

/// Calendar month laid out as Monday-first week rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// `None` marks padding cells outside the month
    pub weeks: Vec<[Option<MonthCell>; 7]>,
}

impl MonthGrid {
    /// Number of cells including padding
    pub fn cell_count(&self) -> usize {
        self.weeks.len() * 7
    }

    /// Populated cells in calendar order
    pub fn days(&self) -> impl Iterator<Item = &MonthCell> {
        self.weeks.iter().flat_map(|week| week.iter().flatten())
    }
}

/// Everything the home view needs for the current moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayStatus {
    pub date: NaiveDate,
    pub total_ml: f64,
    pub goal_ml: f64,
    /// Share of the goal reached, capped at 100
    pub progress_pct: u32,
    pub pacing: PacingResult,
    pub guidance: Guidance,
    /// Present only when the user is behind and something is due
    pub suggestion: Option<Suggestion>,
    /// Today's entries, newest first
    pub entries: Vec<Entry>,
}
