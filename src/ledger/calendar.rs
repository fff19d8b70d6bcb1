//! Pure calendar arithmetic over `NaiveDate`. No time component, no time zones.

use chrono::{Datelike, Duration, NaiveDate};

/// Highest day of month that exists in every month, February included.
pub const MAX_BILLING_DAY: u32 = 28;

/// Clamps a raw day-of-month into `[1, MAX_BILLING_DAY]`.
pub fn clamp_billing_day(day: i64) -> u32 {
    day.clamp(1, MAX_BILLING_DAY as i64) as u32
}

/// Zero-based month index (`year * 12 + month - 1`), convenient for month stepping.
pub fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month() as i32 - 1
}

/// Builds the date at `day` of the month identified by `index`.
///
/// Returns `None` only when the year falls outside chrono's supported range or
/// the day does not exist in that month.
pub fn date_in_month(index: i32, day: u32) -> Option<NaiveDate> {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Same calendar month shifted by `months` (negative allowed), day clamped to the
/// last day of the target month.
pub fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = month_index(date) + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((next_first - first).num_days() as u32)
}

/// Number of calendar days covered by `[start, end]`, both ends included.
/// Zero when `end` precedes `start`.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    if end < start {
        0
    } else {
        (end - start).num_days() + 1
    }
}

/// First date `>= cursor` in the series `anchor + k * step_days` (`k >= 0`).
/// `None` when that date lies past the end of the calendar.
pub fn next_on_linear_grid(
    anchor: NaiveDate,
    cursor: NaiveDate,
    step_days: i64,
) -> Option<NaiveDate> {
    if cursor <= anchor {
        return Some(anchor);
    }
    let diff = (cursor - anchor).num_days();
    let steps = (diff + step_days - 1).div_euclid(step_days);
    anchor.checked_add_signed(Duration::days(steps * step_days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn billing_day_is_clamped() {
        assert_eq!(clamp_billing_day(31), 28);
        assert_eq!(clamp_billing_day(0), 1);
        assert_eq!(clamp_billing_day(-4), 1);
        assert_eq!(clamp_billing_day(15), 15);
    }

    #[test]
    fn month_index_round_trips_through_date_in_month() {
        let idx = month_index(date(2024, 12, 5));
        assert_eq!(date_in_month(idx, 28), Some(date(2024, 12, 28)));
        assert_eq!(date_in_month(idx + 1, 28), Some(date(2025, 1, 28)));
        assert_eq!(date_in_month(idx - 12, 1), Some(date(2023, 12, 1)));
    }

    #[test]
    fn shift_month_clamps_to_month_end() {
        assert_eq!(shift_month(date(2024, 1, 31), 1), Some(date(2024, 2, 29)));
        assert_eq!(shift_month(date(2023, 1, 31), 1), Some(date(2023, 2, 28)));
        assert_eq!(shift_month(date(2024, 3, 15), -3), Some(date(2023, 12, 15)));
    }

    #[test]
    fn inclusive_days_counts_both_ends() {
        assert_eq!(inclusive_days(date(2024, 5, 1), date(2024, 5, 1)), 1);
        assert_eq!(inclusive_days(date(2024, 5, 1), date(2024, 5, 3)), 3);
        assert_eq!(inclusive_days(date(2024, 5, 3), date(2024, 5, 1)), 0);
    }

    #[test]
    fn linear_grid_snaps_forward() {
        let anchor = date(2024, 1, 3);
        assert_eq!(next_on_linear_grid(anchor, date(2023, 12, 1), 7), Some(anchor));
        assert_eq!(next_on_linear_grid(anchor, anchor, 7), Some(anchor));
        assert_eq!(
            next_on_linear_grid(anchor, date(2024, 1, 4), 7),
            Some(date(2024, 1, 10))
        );
        assert_eq!(
            next_on_linear_grid(anchor, date(2024, 1, 10), 7),
            Some(date(2024, 1, 10))
        );
    }
}
