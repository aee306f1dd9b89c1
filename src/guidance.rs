//! Checkpoint guidance
//!
//! The active window is divided into checkpoints every `step_minutes`, counted
//! from the window start. Guidance answers "how much do I need before the next
//! checkpoint to be back on the curve", and the suggestion layer rounds that up
//! to one of the user's quick amounts.

use chrono::{DateTime, Duration, TimeZone};

use crate::pacing::{ActiveWindow, PACE_THRESHOLD_ML};
use crate::types::{Guidance, PacingResult, Suggestion};

/// First checkpoint strictly after `now`, clamped to the window end
pub fn next_checkpoint<Tz: TimeZone>(
    window: &ActiveWindow<Tz>,
    now: &DateTime<Tz>,
    step_minutes: u32,
) -> DateTime<Tz> {
    let step_ms = i64::from(step_minutes.max(1)) * 60_000;
    let start_ms = window.start.timestamp_millis();
    let end_ms = window.end.timestamp_millis();
    let now_ms = now.timestamp_millis();

    let checkpoint_ms = if now_ms < start_ms {
        start_ms
    } else {
        start_ms + ((now_ms - start_ms) / step_ms + 1) * step_ms
    };

    window.start.clone() + Duration::milliseconds(checkpoint_ms.min(end_ms) - start_ms)
}

/// Amount needed by the next checkpoint to stay on pace
pub fn next_checkpoint_guidance<Tz: TimeZone>(
    now: &DateTime<Tz>,
    wake_hour: u32,
    sleep_hour: u32,
    daily_goal_ml: f64,
    total_today_ml: f64,
    step_minutes: u32,
) -> Guidance {
    let window = ActiveWindow::for_day(now, wake_hour, sleep_hour);
    let at = next_checkpoint(&window, now, step_minutes);
    let expected_at_checkpoint = window.expected_at(&at, daily_goal_ml);

    Guidance {
        at: at.fixed_offset(),
        need_ml: (expected_at_checkpoint - total_today_ml).max(0.0).round(),
    }
}

/// Round a need up to the smallest quick amount that covers it.
///
/// Falls back to the largest quick amount when none is big enough, and to the
/// need itself when no quick amounts are configured. Nothing is suggested for a
/// need of zero or less.
pub fn round_up_to_quick(need_ml: f64, quick_amounts_ml: &[f64]) -> f64 {
    if need_ml <= 0.0 {
        return 0.0;
    }

    let mut sorted = quick_amounts_ml.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    sorted
        .iter()
        .copied()
        .find(|amount| *amount >= need_ml)
        .or_else(|| sorted.last().copied())
        .unwrap_or(need_ml)
}

/// Whether guidance is worth showing: clearly behind and something is due
pub fn should_surface(pacing: &PacingResult, guidance: &Guidance) -> bool {
    pacing.diff_ml < -PACE_THRESHOLD_ML && guidance.need_ml > 0.0
}

/// User-facing suggestion, if the surfacing rule holds
pub fn suggest(
    pacing: &PacingResult,
    guidance: &Guidance,
    quick_amounts_ml: &[f64],
) -> Option<Suggestion> {
    if !should_surface(pacing, guidance) {
        return None;
    }

    Some(Suggestion {
        at: guidance.at,
        need_ml: guidance.need_ml,
        amount_ml: round_up_to_quick(guidance.need_ml, quick_amounts_ml),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::classify;
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn at(day: u32, h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, day, h, m, 0).unwrap()
    }

    #[test]
    fn test_guidance_mid_window() {
        let guidance = next_checkpoint_guidance(&at(15, 10, 20), 9, 22, 2000.0, 100.0, 60);
        assert_eq!(guidance.at, at(15, 11, 0).fixed_offset());
        // 2 h of 13 h: 307.7 -> 308
        assert_eq!(guidance.need_ml, 208.0);
    }

    #[test]
    fn test_checkpoint_is_strictly_after_now() {
        let guidance = next_checkpoint_guidance(&at(15, 11, 0), 9, 22, 2000.0, 0.0, 60);
        assert_eq!(guidance.at, at(15, 12, 0).fixed_offset());
    }

    #[test]
    fn test_before_window_points_at_start() {
        let guidance = next_checkpoint_guidance(&at(15, 7, 0), 9, 22, 2000.0, 0.0, 60);
        assert_eq!(guidance.at, at(15, 9, 0).fixed_offset());
        assert_eq!(guidance.need_ml, 0.0);
    }

    #[test]
    fn test_last_step_clamps_to_window_end() {
        // 45 min steps: 21:45 is a boundary, the next one (22:30) lies past sleep
        let guidance = next_checkpoint_guidance(&at(15, 21, 50), 9, 22, 2000.0, 1500.0, 45);
        assert_eq!(guidance.at, at(15, 22, 0).fixed_offset());
        assert_eq!(guidance.need_ml, 500.0);
    }

    #[test]
    fn test_after_window_expects_full_goal() {
        let guidance = next_checkpoint_guidance(&at(15, 23, 30), 9, 22, 2000.0, 1200.0, 60);
        assert_eq!(guidance.at, at(15, 22, 0).fixed_offset());
        assert_eq!(guidance.need_ml, 800.0);
    }

    #[test]
    fn test_need_never_negative() {
        let guidance = next_checkpoint_guidance(&at(15, 12, 10), 9, 22, 2000.0, 1800.0, 60);
        assert_eq!(guidance.need_ml, 0.0);
    }

    #[test]
    fn test_overnight_checkpoint_crosses_midnight() {
        let guidance = next_checkpoint_guidance(&at(15, 23, 10), 22, 7, 2000.0, 0.0, 60);
        assert_eq!(guidance.at, at(16, 0, 0).fixed_offset());
        // 2 h of 9 h: 444.4 -> 444
        assert_eq!(guidance.need_ml, 444.0);
    }

    #[test]
    fn test_round_up_to_quick() {
        assert_eq!(round_up_to_quick(300.0, &[150.0, 250.0, 330.0, 500.0]), 330.0);
        assert_eq!(round_up_to_quick(0.0, &[150.0, 250.0, 330.0, 500.0]), 0.0);
        assert_eq!(round_up_to_quick(-20.0, &[150.0]), 0.0);
        assert_eq!(round_up_to_quick(1000.0, &[150.0, 330.0]), 330.0);
        assert_eq!(round_up_to_quick(250.0, &[150.0, 250.0]), 250.0);
    }

    #[test]
    fn test_round_up_sorts_quick_amounts() {
        assert_eq!(round_up_to_quick(200.0, &[500.0, 150.0, 330.0]), 330.0);
        assert_eq!(round_up_to_quick(900.0, &[500.0, 750.0, 150.0]), 750.0);
    }

    #[test]
    fn test_round_up_without_quick_amounts() {
        assert_eq!(round_up_to_quick(120.0, &[]), 120.0);
    }

    #[test]
    fn test_suggestion_only_when_clearly_behind() {
        let quick = [150.0, 250.0, 330.0, 500.0, 750.0];
        let guidance = Guidance {
            at: at(15, 14, 0).fixed_offset(),
            need_ml: 300.0,
        };

        let behind = classify(500.0, 651.0);
        let suggestion = suggest(&behind, &guidance, &quick).unwrap();
        assert_eq!(suggestion.amount_ml, 330.0);
        assert_eq!(suggestion.need_ml, 300.0);

        let edge = classify(500.0, 650.0);
        assert!(suggest(&edge, &guidance, &quick).is_none());

        let ahead = classify(900.0, 650.0);
        assert!(suggest(&ahead, &guidance, &quick).is_none());

        let nothing_due = Guidance {
            need_ml: 0.0,
            ..guidance
        };
        assert!(suggest(&behind, &nothing_due, &quick).is_none());
    }
}
