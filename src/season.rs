//! Ramadan season windows and the date range served to clients
//!
//! The season table is keyed by Gregorian year. Requests are answered for the
//! days between "today" and the end of the season, never more than a handful
//! of days at once so the number of upstream lookups stays bounded.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::{IftarError, Result};

/// Built-in season table: (year, (start month, day), (end month, day))
const DEFAULT_SEASONS: &[(i32, (u32, u32), (u32, u32))] = &[
    (2024, (3, 11), (4, 9)),
    (2025, (3, 1), (3, 30)),
    (2026, (2, 18), (3, 19)),
    (2027, (2, 7), (3, 8)),
];

/// Inclusive start and end of a season
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeasonWindow {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// March 1 - March 30, used for years missing from the table
    #[must_use]
    pub fn fallback(year: i32) -> Self {
        Self {
            start: ymd(year, 3, 1),
            end: ymd(year, 3, 30),
        }
    }
}

/// Season windows by year
#[derive(Debug, Clone)]
pub struct SeasonCalendar {
    windows: BTreeMap<i32, SeasonWindow>,
}

impl Default for SeasonCalendar {
    fn default() -> Self {
        let windows = DEFAULT_SEASONS
            .iter()
            .map(|&(year, (sm, sd), (em, ed))| {
                (year, SeasonWindow::new(ymd(year, sm, sd), ymd(year, em, ed)))
            })
            .collect();
        Self { windows }
    }
}

impl SeasonCalendar {
    /// Built-in table with `overrides` replacing or adding years
    #[must_use]
    pub fn with_overrides(overrides: impl IntoIterator<Item = (i32, SeasonWindow)>) -> Self {
        let mut calendar = Self::default();
        calendar.windows.extend(overrides);
        calendar
    }

    /// Season window for `year`, falling back to March when unknown
    #[must_use]
    pub fn window_for(&self, year: i32) -> SeasonWindow {
        self.windows
            .get(&year)
            .copied()
            .unwrap_or_else(|| SeasonWindow::fallback(year))
    }

    /// Resolve the date range to serve for `today`
    pub fn resolve(&self, today: NaiveDate, max_days: usize) -> Result<DateRange> {
        let window = self.window_for(today.year());
        if window.start > window.end {
            return Err(IftarError::config(format!(
                "Season {} starts ({}) after it ends ({})",
                today.year(),
                window.start,
                window.end
            )));
        }

        let start = today.clamp(window.start, window.end);
        let end = window.end;

        let dates = start
            .iter_days()
            .take_while(|d| *d <= end)
            .take(max_days)
            .collect();

        Ok(DateRange { start, end, dates })
    }
}

/// Dates to query, with the untruncated bounds they were taken from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// At most `max_days` consecutive days starting at `start`
    pub dates: Vec<NaiveDate>,
}

impl DateRange {
    /// Dates formatted as `YYYY-MM-DD`
    #[must_use]
    pub fn date_strings(&self) -> Vec<String> {
        self.dates.iter().map(|d| format_date(*d)).collect()
    }
}

#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

// Only called with constant month/day pairs that exist in every year.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}
