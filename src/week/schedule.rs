//! Unlock scheduler: which days are reachable at a given instant, and how
//! long until the next one opens.
//!
//! Each day unlocks at UTC midnight of its calendar date. The table is static
//! configuration; nothing here holds runtime state. Callers pass the current
//! instant in, which keeps every check deterministic and testable.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use std::fmt;

use crate::week::days::DayId;

/// Year the shipped week runs in.
pub const DEFAULT_YEAR: i32 = 2026;

/// First day of the week (Rose Day) in February.
const FIRST_FEB_DAY: u32 = 7;

/// Fixed day → unlock-instant table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockSchedule {
    dates: [DateTime<Utc>; DayId::COUNT],
}

impl Default for UnlockSchedule {
    fn default() -> Self {
        Self::for_year(DEFAULT_YEAR)
    }
}

impl UnlockSchedule {
    /// The week of February 7–14 in `year`, one day per DayId in canonical order.
    ///
    /// Years outside chrono's range fall back to the default year.
    pub fn for_year(year: i32) -> Self {
        let mut dates = [DateTime::<Utc>::UNIX_EPOCH; DayId::COUNT];
        for (i, slot) in dates.iter_mut().enumerate() {
            let day = FIRST_FEB_DAY + i as u32;
            *slot = utc_midnight(year, 2, day)
                .or_else(|| utc_midnight(DEFAULT_YEAR, 2, day))
                .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        }
        Self { dates }
    }

    /// Build a schedule from explicit instants (canonical day order).
    #[cfg(test)]
    pub fn from_dates(dates: [DateTime<Utc>; DayId::COUNT]) -> Self {
        Self { dates }
    }

    /// The instant `day` becomes reachable.
    pub fn unlock_date(&self, day: DayId) -> DateTime<Utc> {
        self.dates[day.index()]
    }

    /// True iff test mode is on or `now` has reached the day's unlock instant.
    pub fn is_unlocked(&self, day: DayId, now: DateTime<Utc>, test_mode: bool) -> bool {
        test_mode || now >= self.unlock_date(day)
    }

    /// The still-locked day with the earliest unlock instant, and the time left.
    ///
    /// Scans in canonical order; on equal instants the earlier day wins.
    /// Returns `None` once every day is unlocked.
    pub fn next_unlock(&self, now: DateTime<Utc>) -> Option<NextUnlock> {
        let mut best: Option<(DayId, DateTime<Utc>)> = None;
        for day in DayId::ALL {
            let date = self.unlock_date(day);
            if date <= now {
                continue;
            }
            match best {
                Some((_, best_date)) if best_date <= date => {}
                _ => best = Some((day, date)),
            }
        }
        best.map(|(day, date)| NextUnlock {
            day,
            remaining: Remaining::from_delta(date - now),
        })
    }
}

fn utc_midnight(year: i32, month: u32, day: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Client epoch milliseconds from the `now` param. Missing, malformed or
/// negative input reads as 0.
pub fn millis_from_param(raw: Option<&str>) -> u64 {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|ms| ms.is_finite() && *ms >= 0.0)
        .map(|ms| ms as u64)
        .unwrap_or(0)
}

/// The instant `ms` milliseconds after the Unix epoch.
pub fn instant_at(ms: u64) -> DateTime<Utc> {
    i64::try_from(ms)
        .ok()
        .and_then(DateTime::from_timestamp_millis)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// The next day to unlock and the time left until it does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextUnlock {
    pub day: DayId,
    pub remaining: Remaining,
}

/// Time left, floored into whole days, hours and minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Remaining {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl Remaining {
    pub fn from_delta(delta: TimeDelta) -> Self {
        let total_minutes = delta.num_minutes().max(0);
        Self {
            days: total_minutes / (24 * 60),
            hours: (total_minutes / 60) % 24,
            minutes: total_minutes % 60,
        }
    }
}

impl fmt::Display for Remaining {
    /// Coarsest two non-zero units, e.g. `2d 5h`, `3h 12m`, `7m`, `<1m`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d {}h", self.days, self.hours)
        } else if self.hours > 0 {
            write!(f, "{}h {}m", self.hours, self.minutes)
        } else if self.minutes > 0 {
            write!(f, "{}m", self.minutes)
        } else {
            f.write_str("<1m")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn default_table_is_feb_7_to_14() {
        let s = UnlockSchedule::default();
        assert_eq!(s.unlock_date(DayId::Rose), at(2026, 2, 7, 0, 0));
        assert_eq!(s.unlock_date(DayId::Kiss), at(2026, 2, 13, 0, 0));
        assert_eq!(s.unlock_date(DayId::Valentine), at(2026, 2, 14, 0, 0));
    }

    #[test]
    fn test_mode_unlocks_everything() {
        let s = UnlockSchedule::default();
        for now in [DateTime::<Utc>::UNIX_EPOCH, at(2026, 2, 1, 0, 0), at(2030, 1, 1, 0, 0)] {
            for day in DayId::ALL {
                assert!(s.is_unlocked(day, now, true));
            }
        }
    }

    #[test]
    fn unlock_is_threshold_on_date() {
        let s = UnlockSchedule::default();
        assert!(!s.is_unlocked(DayId::Hug, at(2026, 2, 11, 23, 59), false));
        assert!(s.is_unlocked(DayId::Hug, at(2026, 2, 12, 0, 0), false));
        assert!(s.is_unlocked(DayId::Hug, at(2026, 2, 20, 0, 0), false));
    }

    #[test]
    fn unlock_is_monotonic_in_time() {
        let s = UnlockSchedule::default();
        for day in DayId::ALL {
            let mut seen_unlocked = false;
            for hour in 0..(24 * 12) {
                let now = at(2026, 2, 5, 0, 0) + TimeDelta::hours(hour);
                let unlocked = s.is_unlocked(day, now, false);
                assert!(!(seen_unlocked && !unlocked), "{day} re-locked at {now}");
                seen_unlocked |= unlocked;
            }
            assert!(seen_unlocked);
        }
    }

    #[test]
    fn next_unlock_before_the_week() {
        let s = UnlockSchedule::default();
        let next = s.next_unlock(at(2026, 2, 5, 10, 30)).unwrap();
        assert_eq!(next.day, DayId::Rose);
        assert_eq!(
            next.remaining,
            Remaining {
                days: 1,
                hours: 13,
                minutes: 30
            }
        );
        assert_eq!(next.remaining.to_string(), "1d 13h");
    }

    #[test]
    fn next_unlock_mid_week_skips_unlocked_days() {
        let s = UnlockSchedule::default();
        let next = s.next_unlock(at(2026, 2, 10, 21, 15)).unwrap();
        assert_eq!(next.day, DayId::Promise);
        assert_eq!(next.remaining.to_string(), "2h 45m");
    }

    #[test]
    fn next_unlock_exactly_on_boundary_moves_on() {
        let s = UnlockSchedule::default();
        let next = s.next_unlock(at(2026, 2, 9, 0, 0)).unwrap();
        assert_eq!(next.day, DayId::Teddy);
    }

    #[test]
    fn next_unlock_none_after_valentine() {
        let s = UnlockSchedule::default();
        assert!(s.next_unlock(at(2026, 2, 14, 0, 0)).is_none());
        assert!(s.next_unlock(at(2027, 1, 1, 0, 0)).is_none());
    }

    #[test]
    fn next_unlock_tie_prefers_canonical_order() {
        let same = at(2026, 3, 1, 0, 0);
        let mut dates = [at(2026, 1, 1, 0, 0); DayId::COUNT];
        dates[DayId::Teddy.index()] = same;
        dates[DayId::Hug.index()] = same;
        let s = UnlockSchedule::from_dates(dates);
        let next = s.next_unlock(at(2026, 2, 1, 0, 0)).unwrap();
        assert_eq!(next.day, DayId::Teddy);
    }

    #[test]
    fn remaining_formats_minutes_and_sub_minute() {
        let s = UnlockSchedule::default();
        let next = s.next_unlock(at(2026, 2, 6, 23, 53)).unwrap();
        assert_eq!(next.remaining.to_string(), "7m");

        let r = Remaining::from_delta(TimeDelta::seconds(42));
        assert_eq!(r.to_string(), "<1m");
    }

    #[test]
    fn for_year_shifts_the_table() {
        let s = UnlockSchedule::for_year(2027);
        assert_eq!(s.unlock_date(DayId::Rose), at(2027, 2, 7, 0, 0));
    }

    #[test]
    fn now_param_parses_and_falls_back_to_epoch() {
        fn instant_from_millis(raw: Option<&str>) -> DateTime<Utc> {
            instant_at(millis_from_param(raw))
        }
        let ms = at(2026, 2, 9, 12, 0).timestamp_millis().to_string();
        assert_eq!(instant_from_millis(Some(ms.as_str())), at(2026, 2, 9, 12, 0));
        assert_eq!(instant_from_millis(Some("1770638400000.7")).timestamp(), 1_770_638_400);
        assert_eq!(instant_from_millis(Some("garbage")), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(instant_from_millis(None), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(instant_from_millis(Some("-5")), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn millis_param_floors_and_rejects_junk() {
        assert_eq!(millis_from_param(Some(" 1500.9 ")), 1500);
        assert_eq!(millis_from_param(Some("NaN")), 0);
        assert_eq!(millis_from_param(Some("-1")), 0);
        assert_eq!(instant_at(u64::MAX), DateTime::<Utc>::UNIX_EPOCH);
    }
}
