//! Weekly blackout rules for ranking modes.
//!
//! A mode is either always open or closed on a fixed set of UTC weekdays.
//! The same predicate drives today's aggregate, the day-count split of the
//! event projection and the unlock calendar walk.
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Per-mode availability configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// UTC weekdays on which the mode awards no points.
    #[serde(default)]
    pub closed_on: SmallVec<[Weekday; 2]>,
}

impl Availability {
    /// A rule with no blackout days.
    #[must_use]
    pub fn always_open() -> Self {
        Self::default()
    }

    /// A rule closed on the given weekdays.
    #[must_use]
    pub fn with_blackout(days: &[Weekday]) -> Self {
        Self {
            closed_on: days.iter().copied().collect(),
        }
    }

    /// Whether the mode has any blackout day at all.
    #[must_use]
    pub fn is_restricted(&self) -> bool {
        !self.closed_on.is_empty()
    }

    #[must_use]
    pub fn is_open_on(&self, weekday: Weekday) -> bool {
        !self.closed_on.contains(&weekday)
    }

    #[must_use]
    pub fn is_open_on_date(&self, date: NaiveDate) -> bool {
        self.is_open_on(date.weekday())
    }

    /// Count open days among `days` consecutive calendar days starting at `start`.
    #[must_use]
    pub fn open_days_from(&self, start: NaiveDate, days: u32) -> u32 {
        if !self.is_restricted() {
            return days;
        }
        let mut open = 0;
        for offset in 0..days {
            let Some(date) = start.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            if self.is_open_on_date(date) {
                open += 1;
            }
        }
        open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 2).unwrap()
    }

    #[test]
    fn always_open_counts_every_day() {
        let rule = Availability::always_open();
        assert!(!rule.is_restricted());
        assert!(rule.is_open_on(Weekday::Mon));
        assert_eq!(rule.open_days_from(monday(), 10), 10);
    }

    #[test]
    fn blackout_days_are_closed() {
        let rule = Availability::with_blackout(&[Weekday::Mon, Weekday::Tue]);
        assert!(rule.is_restricted());
        assert!(!rule.is_open_on(Weekday::Mon));
        assert!(!rule.is_open_on(Weekday::Tue));
        assert!(rule.is_open_on(Weekday::Wed));
        assert!(rule.is_open_on(Weekday::Sun));
    }

    #[test]
    fn open_days_skip_each_blackout_pair() {
        let rule = Availability::with_blackout(&[Weekday::Mon, Weekday::Tue]);
        assert_eq!(rule.open_days_from(monday(), 7), 5);
        assert_eq!(rule.open_days_from(monday(), 14), 10);
        // Wednesday start: the pair lands on offsets 5 and 6.
        let wednesday = monday().succ_opt().unwrap().succ_opt().unwrap();
        assert_eq!(rule.open_days_from(wednesday, 5), 5);
        assert_eq!(rule.open_days_from(wednesday, 6), 5);
        assert_eq!(rule.open_days_from(monday(), 0), 0);
    }

    #[test]
    fn weekday_names_deserialize() {
        let rule: Availability = serde_json::from_str(r#"{"closed_on":["Mon","Tuesday"]}"#).unwrap();
        assert_eq!(rule, Availability::with_blackout(&[Weekday::Mon, Weekday::Tue]));
        let open: Availability = serde_json::from_str("{}").unwrap();
        assert!(!open.is_restricted());
    }
}
