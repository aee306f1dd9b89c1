//! Calendar windows
//!
//! Day and month boundaries used to slice the entry list. All arithmetic is done
//! on local calendar dates so month lengths and DST transitions are respected;
//! instants only appear at the edges, as milliseconds since the Unix epoch.

use chrono::{
    DateTime, Datelike, Days, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    TimeZone, Utc,
};

use crate::types::Entry;

/// Resolve a local wall-clock time in `tz`.
///
/// Ambiguous times (clocks falling back) resolve to the earliest instant.
/// Times inside a DST gap are read with the offset in force before the
/// transition, which moves them forward by the width of the gap.
pub fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let offset_secs = naive
                .checked_sub_signed(Duration::hours(3))
                .and_then(|before_gap| tz.offset_from_local_datetime(&before_gap).earliest())
                .map(|offset| offset.fix().local_minus_utc())
                .unwrap_or(0);
            let utc = naive
                .checked_sub_signed(Duration::seconds(i64::from(offset_secs)))
                .unwrap_or(naive);
            tz.from_utc_datetime(&utc)
        }
    }
}

/// Whether day and week arithmetic around `date` stays inside chrono's range.
///
/// One full year of margin on each side covers the seven-day history and any
/// UTC offset.
pub fn is_supported_date(date: NaiveDate) -> bool {
    date.year() > NaiveDate::MIN.year() && date.year() < NaiveDate::MAX.year()
}

/// UTC instant of an epoch-millisecond timestamp, `None` outside the supported range
pub fn supported_instant(timestamp_ms: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(timestamp_ms).filter(|utc| is_supported_date(utc.date_naive()))
}

/// Shift a calendar date by whole days, saturating at the representable range
pub fn shift_days(date: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };

    shifted.unwrap_or(if days >= 0 {
        NaiveDate::MAX
    } else {
        NaiveDate::MIN
    })
}

/// Shift an instant by whole calendar days, keeping its local wall-clock time
pub fn shift_instant_days<Tz: TimeZone>(instant: &DateTime<Tz>, days: i64) -> DateTime<Tz> {
    let tz = instant.timezone();
    let local = instant.naive_local();
    resolve_local(&tz, shift_days(local.date(), days).and_time(local.time()))
}

/// Local midnight opening `date`
pub fn start_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    resolve_local(tz, date.and_time(NaiveTime::MIN))
}

/// Last millisecond of `date` (23:59:59.999 local)
pub fn end_of_day<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    start_of_day(shift_days(date, 1), tz) - Duration::milliseconds(1)
}

/// Inclusive millisecond range covering the local calendar day
pub fn day_range<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> (i64, i64) {
    (
        start_of_day(date, tz).timestamp_millis(),
        end_of_day(date, tz).timestamp_millis(),
    )
}

/// `date` at `hour:00:00.000` local
pub fn at_hour<Tz: TimeZone>(date: NaiveDate, hour: u32, tz: &Tz) -> DateTime<Tz> {
    resolve_local(
        tz,
        date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour)),
    )
}

/// Local calendar date of an epoch-millisecond timestamp
pub fn local_date<Tz: TimeZone>(timestamp_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp_ms).map(|utc| utc.with_timezone(tz).date_naive())
}

/// Move `(year, month)` by `offset` months, `None` if the year leaves `i32`
pub fn shift_month(year: i32, month: u32, offset: i32) -> Option<(i32, u32)> {
    let index = i64::from(year) * 12 + (i64::from(month) - 1) + i64::from(offset);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    Some((year, index.rem_euclid(12) as u32 + 1))
}

/// First and last calendar day of a month, `None` if the month is invalid or
/// outside the supported range
pub fn month_bounds(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    if !is_supported_date(first) {
        return None;
    }
    let (next_year, next_month) = shift_month(year, month, 1)?;
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)?.pred_opt()?;
    Some((first, last))
}

/// Entries whose timestamp falls within `[from_ms, to_ms]`
pub fn entries_in_range(entries: &[Entry], from_ms: i64, to_ms: i64) -> impl Iterator<Item = &Entry> {
    entries
        .iter()
        .filter(move |entry| entry.timestamp >= from_ms && entry.timestamp <= to_ms)
}

/// Sum of `amount_ml` over entries within `[from_ms, to_ms]`
pub fn total_in_range(entries: &[Entry], from_ms: i64, to_ms: i64) -> f64 {
    entries_in_range(entries, from_ms, to_ms)
        .map(|entry| entry.amount_ml)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};
    use chrono_tz::America::New_York;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_range_utc() {
        let (start, end) = day_range(date(2024, 1, 15), &Utc);
        assert_eq!(start, 1_705_276_800_000);
        assert_eq!(end, 1_705_276_800_000 + 86_400_000 - 1);
    }

    #[test]
    fn test_day_range_respects_offset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let (start, end) = day_range(date(2024, 1, 15), &tz);
        // Local midnight at +02:00 is 22:00 UTC the previous day
        assert_eq!(start, 1_705_276_800_000 - 2 * 3_600_000);
        assert_eq!(end - start, 86_400_000 - 1);

        let last = end_of_day(date(2024, 1, 15), &tz);
        assert_eq!((last.hour(), last.minute(), last.second()), (23, 59, 59));
        assert_eq!(last.timestamp_subsec_millis(), 999);
    }

    #[test]
    fn test_shift_days_rolls_over_months_and_years() {
        assert_eq!(shift_days(date(2024, 1, 31), 1), date(2024, 2, 1));
        assert_eq!(shift_days(date(2024, 3, 1), -1), date(2024, 2, 29));
        assert_eq!(shift_days(date(2023, 3, 1), -1), date(2023, 2, 28));
        assert_eq!(shift_days(date(2024, 12, 31), 1), date(2025, 1, 1));
        assert_eq!(shift_days(date(2025, 1, 3), -6), date(2024, 12, 28));
        assert_eq!(shift_days(date(2024, 6, 10), 0), date(2024, 6, 10));
    }

    #[test]
    fn test_shift_instant_keeps_wall_clock() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let instant = tz.with_ymd_and_hms(2024, 2, 28, 18, 30, 0).unwrap();
        let shifted = shift_instant_days(&instant, 2);
        assert_eq!(shifted, tz.with_ymd_and_hms(2024, 3, 1, 18, 30, 0).unwrap());
    }

    #[test]
    fn test_at_hour() {
        let at = at_hour(date(2024, 1, 15), 9, &Utc);
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_local_date_uses_zone() {
        // 2024-01-15T23:30:00Z
        let ts = 1_705_361_400_000;
        assert_eq!(local_date(ts, &Utc), Some(date(2024, 1, 15)));
        let tz = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(local_date(ts, &tz), Some(date(2024, 1, 16)));
    }

    #[test]
    fn test_total_in_range_is_inclusive() {
        let entries = vec![
            Entry::new(999, 100.0, crate::types::DrinkType::Water),
            Entry::new(1_000, 200.0, crate::types::DrinkType::Water),
            Entry::new(1_500, 300.0, crate::types::DrinkType::Tea),
            Entry::new(2_000, 400.0, crate::types::DrinkType::Coffee),
            Entry::new(2_001, 500.0, crate::types::DrinkType::Water),
        ];
        assert_eq!(total_in_range(&entries, 1_000, 2_000), 900.0);
        assert_eq!(total_in_range(&[], 1_000, 2_000), 0.0);
    }

    #[test]
    fn test_shift_month() {
        assert_eq!(shift_month(2024, 1, -1), Some((2023, 12)));
        assert_eq!(shift_month(2024, 12, 1), Some((2025, 1)));
        assert_eq!(shift_month(2024, 5, 0), Some((2024, 5)));
        assert_eq!(shift_month(2024, 5, -17), Some((2022, 12)));
    }

    #[test]
    fn test_shift_month_extreme_offsets() {
        let (year, _) = shift_month(2024, 5, i32::MAX).unwrap();
        assert!(year > 2024);
        let (year, _) = shift_month(2024, 5, i32::MIN).unwrap();
        assert!(year < 2024);
        assert_eq!(shift_month(i32::MAX, 12, 1), None);
        assert_eq!(shift_month(i32::MIN, 1, -1), None);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(
            month_bounds(2024, 2),
            Some((date(2024, 2, 1), date(2024, 2, 29)))
        );
        assert_eq!(
            month_bounds(2024, 12),
            Some((date(2024, 12, 1), date(2024, 12, 31)))
        );
        assert_eq!(month_bounds(2024, 13), None);
        assert_eq!(month_bounds(2024, 0), None);
        assert_eq!(month_bounds(NaiveDate::MAX.year(), 1), None);
        assert_eq!(month_bounds(NaiveDate::MIN.year(), 12), None);
    }

    #[test]
    fn test_supported_instant_bounds() {
        let min_ms = DateTime::<Utc>::MIN_UTC.timestamp_millis();
        let max_ms = DateTime::<Utc>::MAX_UTC.timestamp_millis();
        assert!(supported_instant(min_ms + 3_600_000).is_none());
        assert!(supported_instant(max_ms).is_none());
        assert!(supported_instant(1_705_276_800_000).is_some());
    }

    #[test]
    fn test_resolve_local_at_range_edge_does_not_panic() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let resolved = resolve_local(&tz, NaiveDateTime::MIN);
        assert_eq!(resolved.naive_utc(), NaiveDateTime::MIN);
    }

    fn new_york(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_gap_time_moves_forward() {
        // 2024-03-10 02:00-03:00 does not exist in New York
        let resolved = resolve_local(&New_York, new_york(2024, 3, 10, 2, 30));
        assert_eq!(resolved, New_York.with_ymd_and_hms(2024, 3, 10, 3, 30, 0).unwrap());
        assert_eq!(
            resolved.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 3, 10, 7, 30, 0).unwrap()
        );

        let two = at_hour(date(2024, 3, 10), 2, &New_York);
        assert_eq!(two.with_timezone(&Utc), Utc.with_ymd_and_hms(2024, 3, 10, 7, 0, 0).unwrap());
    }

    #[test]
    fn test_ambiguous_time_takes_earliest() {
        // 2024-11-03 01:00-02:00 happens twice in New York (EDT, then EST)
        let resolved = resolve_local(&New_York, new_york(2024, 11, 3, 1, 30));
        assert_eq!(
            resolved.with_timezone(&Utc),
            Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_day_range_on_dst_days() {
        const HOUR_MS: i64 = 3_600_000;

        let (start, end) = day_range(date(2024, 3, 10), &New_York);
        assert_eq!(end - start + 1, 23 * HOUR_MS);

        let (start, end) = day_range(date(2024, 11, 3), &New_York);
        assert_eq!(end - start + 1, 25 * HOUR_MS);

        let (start, end) = day_range(date(2024, 7, 4), &New_York);
        assert_eq!(end - start + 1, 24 * HOUR_MS);
    }

    #[test]
    fn test_shift_instant_across_dst_keeps_wall_clock() {
        let evening = New_York.with_ymd_and_hms(2024, 3, 9, 20, 0, 0).unwrap();
        let shifted = shift_instant_days(&evening, 1);
        assert_eq!(shifted, New_York.with_ymd_and_hms(2024, 3, 10, 20, 0, 0).unwrap());
        assert_eq!(shifted.timestamp_millis() - evening.timestamp_millis(), 23 * 3_600_000);
    }
}
