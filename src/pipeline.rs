//! Pipeline orchestration
//!
//! This module provides the public API for Hydro Pace. It pulls snapshots from
//! an [`EntrySource`], applies settings defaults and validation, and runs the
//! pure pacing and aggregation stages.

use chrono::{DateTime, FixedOffset, TimeZone};
use tracing::{debug, warn};

use crate::error::ComputeError;
use crate::guidance::{next_checkpoint_guidance, suggest};
use crate::monthly::monthly_grid;
use crate::pacing::{classify, expected_by_now};
use crate::settings::Settings;
use crate::store::{parse_array, EntrySource, MemoryStore};
use crate::types::{DrinkType, Entry, MonthGrid, TodayStatus, WeeklyStats};
use crate::weekly::{weekly_stats, WEEK_DAYS};
use crate::window::{
    day_range, entries_in_range, month_bounds, shift_days, supported_instant, total_in_range,
};

/// Stored settings, or the defaults, validated
pub fn resolve_settings<S: EntrySource + ?Sized>(source: &S) -> Result<Settings, ComputeError> {
    let settings = match source.settings() {
        Some(settings) => settings,
        None => {
            debug!("no stored settings, using defaults");
            Settings::default()
        }
    };

    if let Err(e) = settings.validate() {
        warn!(error = %e, "rejected settings");
        return Err(e);
    }

    Ok(settings)
}

/// Evaluate today's intake against the pacing curve.
///
/// `entries` may contain other days; only those on `now`'s local day count.
///
/// Stages:
/// 1. Day slicing - today's entries and total
/// 2. Pacing - expected amount and classification
/// 3. Guidance - next checkpoint need and the quick-amount suggestion
pub fn evaluate_today<Tz: TimeZone>(
    entries: &[Entry],
    settings: &Settings,
    now: &DateTime<Tz>,
) -> TodayStatus {
    let date = now.date_naive();
    let (from_ms, to_ms) = day_range(date, &now.timezone());

    // Stage 1: today's entries, newest first
    let mut today: Vec<Entry> = entries_in_range(entries, from_ms, to_ms).cloned().collect();
    today.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    let total_ml = total_in_range(&today, from_ms, to_ms);

    // Stage 2: pacing
    let expected_ml = expected_by_now(
        now,
        settings.wake_hour,
        settings.sleep_hour,
        settings.daily_goal_ml,
    );
    let pacing = classify(total_ml, expected_ml);

    // Stage 3: guidance
    let guidance = next_checkpoint_guidance(
        now,
        settings.wake_hour,
        settings.sleep_hour,
        settings.daily_goal_ml,
        total_ml,
        settings.step_minutes,
    );
    let suggestion = suggest(&pacing, &guidance, &settings.quick_amounts_ml);

    debug!(
        %date,
        total_ml,
        expected_ml,
        label = pacing.label.as_str(),
        "evaluated today"
    );

    TodayStatus {
        date,
        total_ml,
        goal_ml: settings.daily_goal_ml,
        progress_pct: progress_pct(total_ml, settings.daily_goal_ml),
        pacing,
        guidance,
        suggestion,
        entries: today,
    }
}

/// Share of the goal reached, rounded and capped at 100
pub fn progress_pct(total_ml: f64, goal_ml: f64) -> u32 {
    if goal_ml <= 0.0 {
        return 0;
    }
    (total_ml / goal_ml * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Today's status from a record store
pub fn today_status<S, Tz>(source: &S, now: &DateTime<Tz>) -> Result<TodayStatus, ComputeError>
where
    S: EntrySource + ?Sized,
    Tz: TimeZone,
{
    let settings = resolve_settings(source)?;
    let (from_ms, to_ms) = day_range(now.date_naive(), &now.timezone());
    let entries = source.entries_between(from_ms, to_ms);
    Ok(evaluate_today(&entries, &settings, now))
}

/// Seven-day summary from a record store
pub fn weekly_summary<S, Tz>(source: &S, now: &DateTime<Tz>) -> Result<WeeklyStats, ComputeError>
where
    S: EntrySource + ?Sized,
    Tz: TimeZone,
{
    let settings = resolve_settings(source)?;
    let tz = now.timezone();
    let today = now.date_naive();

    let (from_ms, _) = day_range(shift_days(today, -(WEEK_DAYS - 1)), &tz);
    let (_, to_ms) = day_range(today, &tz);
    let entries = source.entries_between(from_ms, to_ms);
    debug!(entries = entries.len(), "loaded weekly snapshot");

    Ok(weekly_stats(&entries, now, settings.daily_goal_ml))
}

/// Monthly grid from a record store
pub fn monthly_summary<S, Tz>(
    source: &S,
    year: i32,
    month: u32,
    tz: &Tz,
) -> Result<MonthGrid, ComputeError>
where
    S: EntrySource + ?Sized,
    Tz: TimeZone,
{
    let settings = resolve_settings(source)?;
    let (first, last) = month_bounds(year, month)
        .ok_or_else(|| ComputeError::InvalidDate(format!("{}-{:02}", year, month)))?;

    let (from_ms, _) = day_range(first, tz);
    let (_, to_ms) = day_range(last, tz);
    let entries = source.entries_between(from_ms, to_ms);
    debug!(entries = entries.len(), year, month, "loaded monthly snapshot");

    monthly_grid(&entries, year, month, settings.daily_goal_ml, tz)
}

/// Interpret an epoch-millisecond instant at a fixed UTC offset
pub fn zoned_instant(
    timestamp_ms: i64,
    utc_offset_minutes: i32,
) -> Result<DateTime<FixedOffset>, ComputeError> {
    let tz = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
        .ok_or(ComputeError::InvalidOffset(utc_offset_minutes))?;
    let utc = supported_instant(timestamp_ms)
        .ok_or_else(|| ComputeError::InvalidTimestamp(timestamp_ms.to_string()))?;
    Ok(utc.with_timezone(&tz))
}

/// Build a store from entries JSON and optional settings JSON
fn store_from_json(
    entries_json: &str,
    settings_json: Option<&str>,
) -> Result<MemoryStore, ComputeError> {
    let mut store = MemoryStore::with_entries(parse_array(entries_json)?);
    if let Some(json) = settings_json {
        store.set_settings(Settings::from_json(json)?);
    }
    Ok(store)
}

/// Compute today's status from JSON inputs.
///
/// # Arguments
/// * `entries_json` - JSON array of entries
/// * `settings_json` - Settings JSON, defaults apply when `None`
/// * `now_ms` - Reference instant (ms since epoch)
/// * `utc_offset_minutes` - Local offset from UTC (e.g. 120 for UTC+02:00)
///
/// # Example
/// ```ignore
/// let status = today_status_json(entries_json, None, now_ms, 60)?;
/// ```
pub fn today_status_json(
    entries_json: &str,
    settings_json: Option<&str>,
    now_ms: i64,
    utc_offset_minutes: i32,
) -> Result<String, ComputeError> {
    let store = store_from_json(entries_json, settings_json)?;
    let now = zoned_instant(now_ms, utc_offset_minutes)?;
    let status = today_status(&store, &now)?;
    Ok(serde_json::to_string(&status)?)
}

/// Compute the weekly summary from JSON inputs
pub fn weekly_stats_json(
    entries_json: &str,
    settings_json: Option<&str>,
    now_ms: i64,
    utc_offset_minutes: i32,
) -> Result<String, ComputeError> {
    let store = store_from_json(entries_json, settings_json)?;
    let now = zoned_instant(now_ms, utc_offset_minutes)?;
    let stats = weekly_summary(&store, &now)?;
    Ok(serde_json::to_string(&stats)?)
}

/// Compute a monthly grid from JSON inputs
pub fn monthly_grid_json(
    entries_json: &str,
    settings_json: Option<&str>,
    year: i32,
    month: u32,
    utc_offset_minutes: i32,
) -> Result<String, ComputeError> {
    let store = store_from_json(entries_json, settings_json)?;
    let tz = FixedOffset::east_opt(utc_offset_minutes.saturating_mul(60))
        .ok_or(ComputeError::InvalidOffset(utc_offset_minutes))?;
    let grid = monthly_summary(&store, year, month, &tz)?;
    Ok(serde_json::to_string(&grid)?)
}

/// Stateful tracker for hosts that keep entries in memory between calls.
///
/// Use this when the host does not have its own record store.
#[derive(Debug, Clone, Default)]
pub struct HydrationTracker {
    store: MemoryStore,
}

impl HydrationTracker {
    /// Create a tracker with default settings and no entries
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a tracker with explicit settings
    pub fn with_settings(settings: Settings) -> Result<Self, ComputeError> {
        settings.validate()?;
        let mut store = MemoryStore::new();
        store.set_settings(settings);
        Ok(Self { store })
    }

    /// Replace settings from JSON
    pub fn load_settings(&mut self, json: &str) -> Result<(), ComputeError> {
        let settings = Settings::from_json(json)?;
        settings.validate()?;
        self.store.set_settings(settings);
        Ok(())
    }

    /// Append entries from a JSON array, returning how many were loaded
    pub fn load_entries(&mut self, json: &str) -> Result<usize, ComputeError> {
        let entries = parse_array(json)?;
        let count = entries.len();
        for entry in entries {
            self.store.insert(entry);
        }
        debug!(count, "loaded entries");
        Ok(count)
    }

    /// Serialize all entries to a JSON array
    pub fn save_entries(&self) -> Result<String, ComputeError> {
        Ok(serde_json::to_string(self.store.entries())?)
    }

    /// Record an intake and return its id
    pub fn add(&mut self, timestamp: i64, amount_ml: f64, drink_type: DrinkType) -> String {
        self.store.add(timestamp, amount_ml, drink_type)
    }

    /// Remove an intake by id (undo)
    pub fn undo(&mut self, id: &str) -> Option<Entry> {
        self.store.remove(id)
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn status<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<TodayStatus, ComputeError> {
        today_status(&self.store, now)
    }

    pub fn weekly<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Result<WeeklyStats, ComputeError> {
        weekly_summary(&self.store, now)
    }

    pub fn monthly<Tz: TimeZone>(
        &self,
        year: i32,
        month: u32,
        tz: &Tz,
    ) -> Result<MonthGrid, ComputeError> {
        monthly_summary(&self.store, year, month, tz)
    }
}
