//! Month-grid date math for the calendar widget.
//!
//! The widget itself is a rendering concern; what it needs from the core
//! is the month's day list, the leading weekday offset for a Su–Sa grid,
//! and month paging.

use chrono::{Datelike, NaiveDate};

/// One page of the calendar: a year/month pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    /// 1-based, always within 1..=12.
    month: u32,
}

impl MonthGrid {
    /// The grid containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).expect("month is within 1..=12")
    }

    /// Number of days in this month, leap years included.
    pub fn day_count(self) -> u32 {
        let next = self.next().first_day();
        (next - self.first_day()).num_days() as u32
    }

    /// Weekday of the 1st (0 = Sunday) — the number of leading blanks in
    /// a Su–Sa grid.
    pub fn leading_weekday(self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    /// All dates of the month, in order.
    pub fn days(self) -> Vec<NaiveDate> {
        let first = self.first_day();
        (0..self.day_count())
            .map(|offset| first + chrono::Duration::days(i64::from(offset)))
            .collect()
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }
}
