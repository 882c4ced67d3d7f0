//! UTC calendar arithmetic for resets and the event window.
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, Utc, Weekday};

use crate::constants::{
    EVENT_END_HOUR, EVENT_END_MINUTE, EVENT_END_SECOND, EVENT_TIMER_SPAN_DAYS, MAX_PROJECTION_DAYS,
    MS_PER_DAY, MS_PER_HOUR, MS_PER_MINUTE,
};
use crate::numbers::{clamp_pct, u64_to_f64};

/// Pin a picked calendar date to the event's end-of-day instant (23:59:59 UTC).
#[must_use]
pub fn event_end_from_date(date: NaiveDate) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(EVENT_END_HOUR, EVENT_END_MINUTE, EVENT_END_SECOND)
        .unwrap_or_default();
    date.and_time(time).and_utc()
}

/// Whole days left in the event, rounded up, floored at 0 and capped at the projection horizon.
#[must_use]
pub fn days_remaining(event_end: DateTime<Utc>, now: DateTime<Utc>) -> u32 {
    let diff_ms = (event_end - now).num_milliseconds();
    if diff_ms <= 0 {
        return 0;
    }
    let days = diff_ms.saturating_add(MS_PER_DAY - 1) / MS_PER_DAY;
    u32::try_from(days)
        .unwrap_or(MAX_PROJECTION_DAYS)
        .min(MAX_PROJECTION_DAYS)
}

/// The first reset on `reset_day` strictly after today's date.
#[must_use]
pub fn next_weekly_reset(now: DateTime<Utc>, reset_day: Weekday) -> NaiveDate {
    let today = now.date_naive();
    let ahead = (7 + reset_day.num_days_from_monday() - today.weekday().num_days_from_monday()) % 7;
    let ahead = if ahead == 0 { 7 } else { ahead };
    today
        .checked_add_days(Days::new(u64::from(ahead)))
        .unwrap_or(NaiveDate::MAX)
}

/// Weekly resets (00:00 UTC on `reset_day`) after today and not after the event end.
#[must_use]
pub fn weeks_remaining(event_end: DateTime<Utc>, now: DateTime<Utc>, reset_day: Weekday) -> u32 {
    let mut count = 0;
    let mut reset = next_weekly_reset(now, reset_day);
    while reset_instant(reset) <= event_end {
        count += 1;
        let Some(next) = reset.checked_add_days(Days::new(7)) else {
            break;
        };
        reset = next;
    }
    count
}

/// The next 00:00 UTC daily reset.
#[must_use]
pub fn next_daily_reset(now: DateTime<Utc>) -> DateTime<Utc> {
    let tomorrow = now.date_naive().succ_opt().unwrap_or(NaiveDate::MAX);
    reset_instant(tomorrow)
}

/// Countdown to the event end as `"Xd Xh Xm"`.
#[must_use]
pub fn format_time_remaining(event_end: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (event_end - now).num_milliseconds().max(0);
    let days = diff / MS_PER_DAY;
    let hours = (diff % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (diff % MS_PER_HOUR) / MS_PER_MINUTE;
    format!("{days}d {hours}h {minutes}m")
}

/// Countdown to the next daily reset as `"Xh Xm"`.
#[must_use]
pub fn format_until_next_reset(now: DateTime<Utc>) -> String {
    let diff = (next_daily_reset(now) - now).num_milliseconds().max(0);
    let hours = diff / MS_PER_HOUR;
    let minutes = (diff % MS_PER_HOUR) / MS_PER_MINUTE;
    format!("{hours}h {minutes}m")
}

/// Elapsed share of the event timer bar for the given days remaining.
#[must_use]
pub fn event_progress_pct(days_remaining: u32) -> f64 {
    let span = u64_to_f64(u64::from(EVENT_TIMER_SPAN_DAYS));
    let left = u64_to_f64(u64::from(days_remaining));
    clamp_pct((1.0 - left / span) * 100.0)
}

fn reset_instant(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn end_date_is_pinned_to_last_second() {
        let end = event_end_from_date(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 3, 4, 23, 59, 59).unwrap());
    }

    #[test]
    fn days_remaining_rounds_up_and_clamps() {
        let now = at(2026, 2, 2, 12, 0);
        let end = event_end_from_date(NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());
        // 7 days 11h59m59s
        assert_eq!(days_remaining(end, now), 8);
        assert_eq!(days_remaining(now, now), 0);
        assert_eq!(days_remaining(at(2026, 1, 1, 0, 0), now), 0);
        let far = event_end_from_date(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap());
        assert_eq!(days_remaining(far, now), MAX_PROJECTION_DAYS);
        assert_eq!(days_remaining(at(2026, 2, 2, 12, 1), now), 1);
    }

    #[test]
    fn next_weekly_reset_is_strictly_after_today() {
        // 2026-02-02 is a Monday.
        assert_eq!(
            next_weekly_reset(at(2026, 2, 2, 0, 0), Weekday::Mon),
            NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()
        );
        assert_eq!(
            next_weekly_reset(at(2026, 2, 8, 23, 0), Weekday::Mon),
            NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()
        );
        assert_eq!(
            next_weekly_reset(at(2026, 2, 4, 8, 0), Weekday::Mon),
            NaiveDate::from_ymd_opt(2026, 2, 9).unwrap()
        );
    }

    #[test]
    fn weeks_remaining_counts_mondays_in_window() {
        let now = at(2026, 2, 4, 8, 0);
        let end = event_end_from_date(NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        // Feb 9, 16, 23, Mar 2
        assert_eq!(weeks_remaining(end, now, Weekday::Mon), 4);
        let sunday_end = event_end_from_date(NaiveDate::from_ymd_opt(2026, 2, 8).unwrap());
        assert_eq!(weeks_remaining(sunday_end, now, Weekday::Mon), 0);
        let monday_end = event_end_from_date(NaiveDate::from_ymd_opt(2026, 2, 9).unwrap());
        assert_eq!(weeks_remaining(monday_end, now, Weekday::Mon), 1);
        assert_eq!(weeks_remaining(at(2026, 1, 1, 0, 0), now, Weekday::Mon), 0);
    }

    #[test]
    fn countdown_strings() {
        let now = at(2026, 2, 2, 21, 30);
        let end = Utc.with_ymd_and_hms(2026, 2, 4, 23, 59, 59).unwrap();
        assert_eq!(format_time_remaining(end, now), "2d 2h 29m");
        assert_eq!(format_time_remaining(now, end), "0d 0h 0m");
        assert_eq!(format_until_next_reset(now), "2h 30m");
        assert_eq!(next_daily_reset(now), at(2026, 2, 3, 0, 0));
    }

    #[test]
    fn event_progress_tracks_timer_span() {
        assert!(event_progress_pct(30).abs() < f64::EPSILON);
        assert!((event_progress_pct(15) - 50.0).abs() < 1e-9);
        assert!((event_progress_pct(0) - 100.0).abs() < f64::EPSILON);
        assert!(event_progress_pct(31).abs() < f64::EPSILON);
    }
}
