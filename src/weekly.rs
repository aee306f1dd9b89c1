//! Weekly summary and goal streak

use chrono::{DateTime, TimeZone};

use crate::types::{DayStat, Entry, WeeklyStats};
use crate::window::{day_range, shift_days, total_in_range};

/// Number of days in the weekly summary
pub const WEEK_DAYS: i64 = 7;

/// Totals for the seven local days ending on `now`'s day, plus the streak
pub fn weekly_stats<Tz: TimeZone>(entries: &[Entry], now: &DateTime<Tz>, goal_ml: f64) -> WeeklyStats {
    let tz = now.timezone();
    let today = now.date_naive();

    let days: Vec<DayStat> = (0..WEEK_DAYS)
        .rev()
        .map(|offset| {
            let date = shift_days(today, -offset);
            let (from_ms, to_ms) = day_range(date, &tz);
            DayStat {
                date,
                total_ml: total_in_range(entries, from_ms, to_ms),
            }
        })
        .collect();

    let streak = streak(&days, goal_ml);

    WeeklyStats { days, streak }
}

/// Consecutive days meeting the goal, counted backward from the last day.
///
/// A last day still short of the goal does not break the streak; counting
/// then starts from the day before it.
pub fn streak(days: &[DayStat], goal_ml: f64) -> u32 {
    let Some(last) = days.len().checked_sub(1) else {
        return 0;
    };

    let start = if days[last].total_ml >= goal_ml {
        Some(last)
    } else {
        last.checked_sub(1)
    };

    match start {
        Some(start) => days[..=start]
            .iter()
            .rev()
            .take_while(|day| day.total_ml >= goal_ml)
            .count() as u32,
        None => 0,
    }
}
