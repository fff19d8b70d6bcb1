use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::errors::RentalError;

use super::calendar::{date_in_month, days_in_month, month_index};

/// Closed date range `[start, end]` used for reporting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RentalError> {
        if end < start {
            return Err(RentalError::InvalidInput(
                "window end must not precede start".into(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Calendar month containing `date`.
    pub fn month_of(date: NaiveDate) -> Option<Self> {
        let index = month_index(date);
        let start = date_in_month(index, 1)?;
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        let end = date_in_month(index, days_in_month(year, month)?)?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_is_inclusive() {
        let window = DateWindow::new(date(2024, 2, 1), date(2024, 2, 29)).unwrap();
        assert!(window.contains(date(2024, 2, 1)));
        assert!(window.contains(date(2024, 2, 29)));
        assert!(!window.contains(date(2024, 3, 1)));
    }

    #[test]
    fn reversed_window_is_rejected() {
        assert!(DateWindow::new(date(2024, 2, 2), date(2024, 2, 1)).is_err());
    }

    #[test]
    fn month_window_covers_leap_february() {
        let window = DateWindow::month_of(date(2024, 2, 14)).unwrap();
        assert_eq!(window.start, date(2024, 2, 1));
        assert_eq!(window.end, date(2024, 2, 29));
    }
}
