//! ISO 8601 week numbering.
//!
//! Week 1 of a year is the Monday-based week holding that year's first Thursday, so
//! it starts on the Monday on or before Jan 1 when Jan 1 falls on Monday through
//! Thursday, and on the following Monday otherwise. Every day belongs to exactly one
//! week year; late December days may belong to week 1 of the next year and early
//! January days to the last week (52 or 53) of the previous one.

use super::{Calendar, YearCache};
use crate::consts::{DAYS_PER_WEEK, ISO_FIRST_WEEK_LAST_WEEKDAY, QUARTER_MONTH_OFFSETS};
use crate::prelude::*;
use crate::types::clamped_date;
use crate::{CalendarSettings, DateRange, WeekDaySettings, WeekOfYear, WeekStandard};

impl Calendar {
    /// Builds an ISO 8601 calendar: the year starts on Jan 1 and weeks on Monday,
    /// whatever the settings say. The settings are kept so [`Calendar::is_changed`]
    /// still notices when the host edits them.
    pub fn iso8601(calendar: &CalendarSettings, week_day: &WeekDaySettings) -> Self {
        log::debug!("built ISO 8601 calendar");
        Self {
            calendar_settings: *calendar,
            week_day_settings: *week_day,
            week_standard: WeekStandard::Iso8601,
            first_day_of_week: Weekday::Mon,
            first_month_of_year: 0,
            first_day_of_year: 1,
            quarter_first_months: QUARTER_MONTH_OFFSETS,
            day_selection: true,
            fiscal_year_end_label: false,
            first_week_cache: YearCache::default(),
            first_full_week_cache: YearCache::default(),
        }
    }

    /// Resolves the week year of `date` by comparing it with the first-week starts of
    /// its own year and the next one.
    pub(super) fn iso_week_year(&self, date: NaiveDate) -> i32 {
        let year = date.year();
        if date >= self.date_of_first_week(year + 1) {
            year + 1
        } else if date < self.date_of_first_week(year) {
            year - 1
        } else {
            year
        }
    }

    pub(super) fn iso_week(&self, date: NaiveDate) -> WeekOfYear {
        let week_year = self.iso_week_year(date);
        let days = (date - self.date_of_first_week(week_year)).num_days();
        let number = 1 + days / DAYS_PER_WEEK;
        WeekOfYear::new(u32::try_from(number).unwrap_or(u32::MAX), week_year)
    }
}

/// Monday starting ISO week 1 of `year`
pub(super) fn first_week_start(year: i32) -> NaiveDate {
    let jan_first = clamped_date(year, 0, 1);
    let weekday = jan_first.weekday().num_days_from_monday();
    if weekday <= ISO_FIRST_WEEK_LAST_WEEKDAY {
        jan_first
            .checked_sub_days(Days::new(u64::from(weekday)))
            .unwrap_or(jan_first)
    } else {
        jan_first
            .checked_add_days(Days::new(u64::from(7 - weekday)))
            .unwrap_or(jan_first)
    }
}

/// The Monday-to-Monday week containing `date`
pub(super) fn week_period(date: NaiveDate) -> DateRange {
    let back = u64::from(date.weekday().num_days_from_monday());
    let start = date.checked_sub_days(Days::new(back)).unwrap_or(date);
    let end = start
        .checked_add_days(Days::new(DAYS_PER_WEEK.unsigned_abs()))
        .unwrap_or(NaiveDate::MAX);
    DateRange::from_ordered(start, end)
}
