//! Monthly heatmap grid
//!
//! Groups a month's entries by local calendar day and lays the days out in
//! Monday-first week rows, padded with empty cells on both ends so every row
//! holds exactly seven cells.

use chrono::{Datelike, TimeZone};
use std::collections::HashMap;

use crate::error::ComputeError;
use crate::types::{Entry, MonthCell, MonthGrid};
use crate::window::{day_range, entries_in_range, local_date, month_bounds};

/// Monday-first weekday index (Monday = 0 ... Sunday = 6)
pub fn monday_index(date: &impl Datelike) -> u32 {
    (date.weekday().num_days_from_sunday() + 6) % 7
}

/// Per-day totals and goal flags for a calendar month
pub fn monthly_grid<Tz: TimeZone>(
    entries: &[Entry],
    year: i32,
    month: u32,
    goal_ml: f64,
    tz: &Tz,
) -> Result<MonthGrid, ComputeError> {
    let (first, last) = month_bounds(year, month)
        .ok_or_else(|| ComputeError::InvalidDate(format!("{}-{:02}", year, month)))?;

    let (from_ms, _) = day_range(first, tz);
    let (_, to_ms) = day_range(last, tz);

    let mut totals = HashMap::new();
    for entry in entries_in_range(entries, from_ms, to_ms) {
        if let Some(date) = local_date(entry.timestamp, tz) {
            *totals.entry(date).or_insert(0.0) += entry.amount_ml;
        }
    }

    let mut cells: Vec<Option<MonthCell>> = Vec::with_capacity(42);
    cells.extend((0..monday_index(&first)).map(|_| None));

    for date in first.iter_days().take_while(|date| *date <= last) {
        let total_ml = totals.get(&date).copied().unwrap_or(0.0);
        cells.push(Some(MonthCell {
            date,
            total_ml,
            met_goal: total_ml >= goal_ml,
            fill_ratio: (total_ml / goal_ml.max(1.0)).min(1.0),
        }));
    }

    while cells.len() % 7 != 0 {
        cells.push(None);
    }

    let weeks = cells
        .chunks(7)
        .map(|chunk| std::array::from_fn(|i| chunk[i].clone()))
        .collect();

    Ok(MonthGrid { year, month, weeks })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DrinkType;
    use chrono::{FixedOffset, NaiveDate, Utc};
    use pretty_assertions::assert_eq;

    fn ms(y: i32, m: u32, d: u32, h: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().timestamp_millis()
    }

    #[test]
    fn test_monday_index() {
        // 2024-05-01 is a Wednesday, 2024-09-01 a Sunday, 2024-01-01 a Monday
        assert_eq!(monday_index(&NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()), 2);
        assert_eq!(monday_index(&NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()), 6);
        assert_eq!(monday_index(&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), 0);
    }

    #[test]
    fn test_month_starting_wednesday() {
        let grid = monthly_grid(&[], 2024, 5, 2000.0, &Utc).unwrap();
        let first_week = &grid.weeks[0];
        assert!(first_week[0].is_none());
        assert!(first_week[1].is_none());
        assert_eq!(
            first_week[2].as_ref().map(|c| c.date),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        // 2 leading + 31 days = 33, padded to 35
        assert_eq!(grid.cell_count(), 35);
        assert_eq!(grid.days().count(), 31);
        assert!(grid.weeks[4][5].is_none());
        assert!(grid.weeks[4][6].is_none());
    }

    #[test]
    fn test_month_starting_sunday_needs_six_rows() {
        let grid = monthly_grid(&[], 2024, 9, 2000.0, &Utc).unwrap();
        // 6 leading + 30 days = 36, padded to 42
        assert_eq!(grid.weeks.len(), 6);
        assert_eq!(grid.cell_count() % 7, 0);
    }

    #[test]
    fn test_february_starting_monday_fills_exactly() {
        // 2021-02-01 is a Monday and February 2021 has 28 days
        let grid = monthly_grid(&[], 2021, 2, 2000.0, &Utc).unwrap();
        assert_eq!(grid.weeks.len(), 4);
        assert!(grid.weeks.iter().flatten().all(|cell| cell.is_some()));
    }

    #[test]
    fn test_totals_and_goal_flags() {
        let entries = vec![
            Entry::new(ms(2024, 5, 1, 8), 1500.0, DrinkType::Water),
            Entry::new(ms(2024, 5, 1, 20), 500.0, DrinkType::Tea),
            Entry::new(ms(2024, 5, 2, 9), 1000.0, DrinkType::Water),
            Entry::new(ms(2024, 4, 30, 23), 900.0, DrinkType::Water),
            Entry::new(ms(2024, 6, 1, 0), 900.0, DrinkType::Water),
        ];

        let grid = monthly_grid(&entries, 2024, 5, 2000.0, &Utc).unwrap();
        let days: Vec<&MonthCell> = grid.days().collect();

        assert_eq!(
            days[0],
            &MonthCell {
                date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                total_ml: 2000.0,
                met_goal: true,
                fill_ratio: 1.0,
            }
        );
        assert_eq!(days[1].total_ml, 1000.0);
        assert!(!days[1].met_goal);
        assert_eq!(days[1].fill_ratio, 0.5);

        assert_eq!(days[2].total_ml, 0.0);
        assert!(!days[2].met_goal);
        assert_eq!(days[30].total_ml, 0.0);
    }

    #[test]
    fn test_grouping_uses_local_dates() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        // 22:00 UTC on April 30th is 01:00 on May 1st at +03:00
        let entries = vec![Entry::new(ms(2024, 4, 30, 22), 700.0, DrinkType::Water)];

        let grid = monthly_grid(&entries, 2024, 5, 2000.0, &tz).unwrap();
        let first = grid.days().next().unwrap();
        assert_eq!(first.total_ml, 700.0);
    }

    #[test]
    fn test_monthly_grid_is_idempotent() {
        let entries = vec![
            Entry::new(ms(2024, 5, 1, 8), 1500.0, DrinkType::Water),
            Entry::new(ms(2024, 5, 14, 12), 2200.0, DrinkType::Tea),
            Entry::new(ms(2024, 5, 31, 23), 400.0, DrinkType::Coffee),
        ];
        let tz = FixedOffset::west_opt(4 * 3600).unwrap();

        let first = monthly_grid(&entries, 2024, 5, 2000.0, &tz).unwrap();
        let second = monthly_grid(&entries, 2024, 5, 2000.0, &tz).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.days().filter(|cell| cell.met_goal).count(), 1);
    }

    #[test]
    fn test_invalid_month() {
        assert!(matches!(
            monthly_grid(&[], 2024, 13, 2000.0, &Utc),
            Err(ComputeError::InvalidDate(_))
        ));
    }
}
