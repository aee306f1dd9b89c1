//! Pacing
//!
//! The expected-intake curve rises linearly across the active window (wake hour
//! to sleep hour) from 0 to the daily goal. Actual intake is classified against
//! that curve with a fixed tolerance band.

use chrono::{DateTime, TimeZone};

use crate::types::{PacingLabel, PacingResult};
use crate::window::{at_hour, shift_days};

/// Half-width of the on-pace band (ml)
pub const PACE_THRESHOLD_ML: f64 = 150.0;

/// The active drinking window anchored on a calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveWindow<Tz: TimeZone> {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl<Tz: TimeZone> ActiveWindow<Tz> {
    /// Window opening at `wake_hour` on `now`'s local day.
    ///
    /// When the sleep hour is at or before the wake hour the window crosses
    /// midnight and closes on the following day.
    pub fn for_day(now: &DateTime<Tz>, wake_hour: u32, sleep_hour: u32) -> Self {
        let tz = now.timezone();
        let day = now.date_naive();

        let start = at_hour(day, wake_hour, &tz);
        let mut end = at_hour(day, sleep_hour, &tz);
        if end <= start {
            end = at_hour(shift_days(day, 1), sleep_hour, &tz);
        }

        Self { start, end }
    }

    /// Window length in milliseconds
    pub fn duration_ms(&self) -> i64 {
        self.end.timestamp_millis() - self.start.timestamp_millis()
    }

    /// Elapsed fraction of the window at `instant` (0-1)
    pub fn progress<Tz2: TimeZone>(&self, instant: &DateTime<Tz2>) -> f64 {
        let total_ms = self.duration_ms();
        if total_ms <= 0 {
            return 0.0;
        }

        let elapsed_ms = instant.timestamp_millis() - self.start.timestamp_millis();
        (elapsed_ms as f64 / total_ms as f64).clamp(0.0, 1.0)
    }

    /// Intake the curve expects by `instant`, rounded to whole millilitres
    pub fn expected_at<Tz2: TimeZone>(&self, instant: &DateTime<Tz2>, daily_goal_ml: f64) -> f64 {
        if self.duration_ms() <= 0 {
            return 0.0;
        }
        (daily_goal_ml * self.progress(instant)).round()
    }
}

/// Amount that should have been consumed by `now`
pub fn expected_by_now<Tz: TimeZone>(
    now: &DateTime<Tz>,
    wake_hour: u32,
    sleep_hour: u32,
    daily_goal_ml: f64,
) -> f64 {
    ActiveWindow::for_day(now, wake_hour, sleep_hour).expected_at(now, daily_goal_ml)
}

/// Label actual intake against the expected amount
pub fn classify(actual_ml: f64, expected_ml: f64) -> PacingResult {
    let diff_ml = actual_ml - expected_ml;

    let label = if diff_ml.abs() < PACE_THRESHOLD_ML {
        PacingLabel::OnPace
    } else if diff_ml < 0.0 {
        PacingLabel::Behind
    } else {
        PacingLabel::Ahead
    };

    PacingResult {
        expected_ml,
        diff_ml,
        label,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap()
    }

    #[test]
    fn test_expected_at_window_edges() {
        assert_eq!(expected_by_now(&at(9, 0), 9, 22, 2000.0), 0.0);
        assert_eq!(expected_by_now(&at(22, 0), 9, 22, 2000.0), 2000.0);
    }

    #[test]
    fn test_expected_at_midpoint() {
        // 6.5 h into a 13 h window
        assert_eq!(expected_by_now(&at(15, 30), 9, 22, 2000.0), 1000.0);
    }

    #[test]
    fn test_expected_outside_window() {
        assert_eq!(expected_by_now(&at(6, 45), 9, 22, 2000.0), 0.0);
        assert_eq!(expected_by_now(&at(23, 59), 9, 22, 2000.0), 2000.0);
    }

    #[test]
    fn test_expected_is_monotonic() {
        let mut now = at(0, 0);
        let mut previous = 0.0;
        for _ in 0..(24 * 60) {
            let expected = expected_by_now(&now, 9, 22, 2000.0);
            assert!(expected >= previous, "dropped at {}", now);
            previous = expected;
            now += Duration::minutes(1);
        }
        assert_eq!(previous, 2000.0);
    }

    #[test]
    fn test_expected_rounds_to_whole_ml() {
        // 1 h of 13 h: 2000 / 13 = 153.8
        assert_eq!(expected_by_now(&at(10, 0), 9, 22, 2000.0), 154.0);
    }

    #[test]
    fn test_overnight_window() {
        let late = at(23, 0);
        let window = ActiveWindow::for_day(&late, 22, 7);
        assert_eq!(window.duration_ms(), 9 * 3_600_000);
        assert_eq!(window.end, Utc.with_ymd_and_hms(2024, 1, 16, 7, 0, 0).unwrap());
        // 1 h of 9 h: 2000 / 9 = 222.2
        assert_eq!(window.expected_at(&late, 2000.0), 222.0);

        let early = at(3, 0);
        let window = ActiveWindow::for_day(&early, 22, 7);
        assert_eq!(window.duration_ms(), 9 * 3_600_000);
        assert_eq!(window.start, at(22, 0));
    }

    #[test]
    fn test_equal_hours_span_full_day() {
        let window = ActiveWindow::for_day(&at(12, 0), 8, 8);
        assert_eq!(window.duration_ms(), 24 * 3_600_000);
    }

    #[test]
    fn test_window_follows_local_day() {
        let tz = FixedOffset::west_opt(8 * 3600).unwrap();
        // 01:00 UTC on the 16th is 17:00 on the 15th at -08:00
        let now = Utc
            .with_ymd_and_hms(2024, 1, 16, 1, 0, 0)
            .unwrap()
            .with_timezone(&tz);
        let window = ActiveWindow::for_day(&now, 9, 22);
        assert_eq!(window.start, tz.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
        // 8 h of 13 h
        assert_eq!(expected_by_now(&now, 9, 22, 1300.0), 800.0);
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(classify(500.0, 500.0).label, PacingLabel::OnPace);
        assert_eq!(classify(349.0, 500.0).label, PacingLabel::Behind);
        assert_eq!(classify(649.0, 500.0).label, PacingLabel::OnPace);
        assert_eq!(classify(351.0, 500.0).label, PacingLabel::OnPace);
        assert_eq!(classify(651.0, 500.0).label, PacingLabel::Ahead);
    }

    #[test]
    fn test_classify_boundary_is_off_pace() {
        assert_eq!(classify(350.0, 500.0).label, PacingLabel::Behind);
        assert_eq!(classify(650.0, 500.0).label, PacingLabel::Ahead);
    }

    #[test]
    fn test_classify_reports_diff() {
        let result = classify(300.0, 451.0);
        assert_eq!(
            result,
            PacingResult {
                expected_ml: 451.0,
                diff_ml: -151.0,
                label: PacingLabel::Behind,
            }
        );
    }
}
