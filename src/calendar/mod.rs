//! Fiscal calendar arithmetic.
//!
//! A [`Calendar`] is an immutable snapshot of the host's calendar settings. It answers
//! "which fiscal year / week / quarter does this day belong to" and "where does the
//! bucket containing this day start and end". The two per-year lookups that every week
//! computation needs are memoized inside the instance; a settings change builds a new
//! instance rather than patching the caches.

mod factory;
mod iso8601;

pub use factory::CalendarFactory;

use std::cell::RefCell;
use std::collections::HashMap;

use crate::consts::{DAYS_PER_WEEK, QUARTERS_PER_YEAR, QUARTER_MONTH_OFFSETS};
use crate::prelude::*;
use crate::types::clamped_date;
use crate::{
    CalendarSettings, DateRange, WeekDaySettings, WeekOfYear, WeekStandard, WeekStandardSettings,
};

type YearCache = RefCell<HashMap<i32, NaiveDate>>;

#[derive(Debug, Clone)]
pub struct Calendar {
    calendar_settings:     CalendarSettings,
    week_day_settings:     WeekDaySettings,
    week_standard:         WeekStandard,

    first_day_of_week:     Weekday,
    first_month_of_year:   u32,
    first_day_of_year:     u32,
    quarter_first_months:  [u32; 4],
    day_selection:         bool,
    fiscal_year_end_label: bool,

    first_week_cache:      YearCache,
    first_full_week_cache: YearCache,
}

impl Calendar {
    /// Builds a calendar following the configured fiscal year and first day of week.
    ///
    /// The day of month is expected to be clamped already
    /// (see [`CalendarSettings::with_clamped_day`]).
    pub fn new(calendar: &CalendarSettings, week_day: &WeekDaySettings) -> Self {
        let first_month_of_year = calendar.month.get();
        let calendar_instance = Self {
            calendar_settings: *calendar,
            week_day_settings: *week_day,
            week_standard: WeekStandard::NotSet,
            first_day_of_week: week_day.day.weekday(),
            first_month_of_year,
            first_day_of_year: calendar.day.get(),
            quarter_first_months: QUARTER_MONTH_OFFSETS.map(|offset| first_month_of_year + offset),
            day_selection: week_day.day_selection,
            fiscal_year_end_label: calendar.treat_as_end_of_fiscal_year
                && !calendar.starts_on_january_first(),
            first_week_cache: YearCache::default(),
            first_full_week_cache: YearCache::default(),
        };
        log::debug!(
            "built calendar: fiscal year starts month {} day {}, weeks start {:?} (selection {})",
            calendar_instance.first_month_of_year,
            calendar_instance.first_day_of_year,
            calendar_instance.first_day_of_week,
            calendar_instance.day_selection,
        );
        calendar_instance
    }

    pub const fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    /// Zero-based first month of the fiscal year
    pub const fn first_month_of_year(&self) -> u32 {
        self.first_month_of_year
    }

    pub const fn first_day_of_year(&self) -> u32 {
        self.first_day_of_year
    }

    /// Zero-based first month of each quarter; values past 11 fall in the next
    /// Gregorian year.
    pub const fn quarter_first_months(&self) -> [u32; 4] {
        self.quarter_first_months
    }

    pub const fn week_standard(&self) -> WeekStandard {
        self.week_standard
    }

    /// The day after `date`
    pub fn next_date(&self, date: NaiveDate) -> NaiveDate {
        date.succ_opt().unwrap_or(date)
    }

    /// First day of fiscal year `year`
    pub fn fiscal_year_start(&self, year: i32) -> NaiveDate {
        clamped_date(year, self.first_month_of_year, self.first_day_of_year)
    }

    /// Fiscal year of `date`: its Gregorian year, minus one when it precedes that
    /// year's fiscal start.
    pub fn determine_year(&self, date: NaiveDate) -> i32 {
        let year = date.year();
        if date < self.fiscal_year_start(year) {
            year - 1
        } else {
            year
        }
    }

    /// Year number shown to users for fiscal year `year`.
    pub const fn label_year(&self, year: i32) -> i32 {
        if self.fiscal_year_end_label {
            year + 1
        } else {
            year
        }
    }

    /// Year the week containing `date` is counted in
    pub fn determine_week_year(&self, date: NaiveDate) -> i32 {
        match self.week_standard {
            WeekStandard::NotSet => self.determine_year(date),
            WeekStandard::Iso8601 => self.iso_week_year(date),
        }
    }

    /// Week number and week year of `date`
    pub fn determine_week(&self, date: NaiveDate) -> WeekOfYear {
        match self.week_standard {
            WeekStandard::NotSet => self.fiscal_week(date),
            WeekStandard::Iso8601 => self.iso_week(date),
        }
    }

    /// Start of week 1 of `year`
    pub fn date_of_first_week(&self, year: i32) -> NaiveDate {
        memoized(&self.first_week_cache, year, || match self.week_standard {
            WeekStandard::NotSet => self.fiscal_year_start(year),
            WeekStandard::Iso8601 => iso8601::first_week_start(year),
        })
    }

    /// Start of the first week of `year` that begins on the configured first day of
    /// week. Equals [`Self::date_of_first_week`] unless week 1 is a short week.
    pub fn date_of_first_full_week(&self, year: i32) -> NaiveDate {
        memoized(&self.first_full_week_cache, year, || {
            let first_week = self.date_of_first_week(year);
            match (self.week_standard, self.day_selection) {
                (WeekStandard::Iso8601, _) | (WeekStandard::NotSet, false) => first_week,
                (WeekStandard::NotSet, true) => {
                    let offset = days_until(first_week.weekday(), self.first_day_of_week);
                    first_week
                        .checked_add_days(Days::new(offset))
                        .unwrap_or(first_week)
                }
            }
        })
    }

    fn fiscal_week(&self, date: NaiveDate) -> WeekOfYear {
        let year = self.determine_year(date);
        let first_full_week = self.date_of_first_full_week(year);
        if date < first_full_week {
            return WeekOfYear::new(1, year);
        }

        let short_first_week = self.date_of_first_week(year) != first_full_week;
        let full_weeks = (date - first_full_week).num_days() / DAYS_PER_WEEK;
        let number = 1 + full_weeks + i64::from(short_first_week);
        WeekOfYear::new(u32::try_from(number).unwrap_or(u32::MAX), year)
    }

    /// Bounds of the week containing `date`.
    ///
    /// Fiscal weeks never cross a fiscal year boundary, so the first and last week of a
    /// year may be short. ISO weeks always span Monday to Monday.
    pub fn week_period(&self, date: NaiveDate) -> DateRange {
        match self.week_standard {
            WeekStandard::Iso8601 => iso8601::week_period(date),
            WeekStandard::NotSet => {
                let year = self.determine_year(date);
                let anchor = self.date_of_first_full_week(year);
                let back = days_until(anchor.weekday(), date.weekday());
                let week_start = date.checked_sub_days(Days::new(back)).unwrap_or(date);
                let week_end = week_start
                    .checked_add_days(Days::new(DAYS_PER_WEEK.unsigned_abs()))
                    .unwrap_or(NaiveDate::MAX);

                DateRange::from_ordered(
                    week_start.max(self.date_of_first_week(year)),
                    week_end.min(self.date_of_first_week(year + 1)),
                )
            }
        }
    }

    /// Bounds of the Gregorian month containing `date`
    pub fn month_period(&self, date: NaiveDate) -> DateRange {
        DateRange::from_ordered(
            clamped_date(date.year(), date.month0(), 1),
            clamped_date(date.year(), date.month0() + 1, 1),
        )
    }

    /// Start of zero-based `quarter` of fiscal year `year`. Quarters past the fourth
    /// continue into the following fiscal years.
    pub fn quarter_start_date(&self, year: i32, quarter: u32) -> NaiveDate {
        let carry = i32::try_from(quarter / QUARTERS_PER_YEAR).unwrap_or(i32::MAX);
        let month = self.quarter_first_months[(quarter % QUARTERS_PER_YEAR) as usize];
        clamped_date(year.saturating_add(carry), month, self.first_day_of_year)
    }

    /// Fiscal year and zero-based quarter containing `date`
    pub fn quarter_index(&self, date: NaiveDate) -> (i32, u32) {
        let year = self.determine_year(date);
        let quarter = (0..QUARTERS_PER_YEAR)
            .rev()
            .find(|&q| date >= self.quarter_start_date(year, q))
            .unwrap_or(0);
        (year, quarter)
    }

    /// "Q1" to "Q4"
    pub fn quarter_name(&self, date: NaiveDate) -> String {
        let (_, quarter) = self.quarter_index(date);
        format!("Q{}", quarter + 1)
    }

    /// Bounds of the fiscal quarter containing `date`
    pub fn quarter_period(&self, date: NaiveDate) -> DateRange {
        let (year, quarter) = self.quarter_index(date);
        DateRange::from_ordered(
            self.quarter_start_date(year, quarter),
            self.quarter_start_date(year, quarter + 1),
        )
    }

    /// Bounds of the fiscal year containing `date`
    pub fn year_period(&self, date: NaiveDate) -> DateRange {
        let year = self.determine_year(date);
        DateRange::from_ordered(self.fiscal_year_start(year), self.fiscal_year_start(year + 1))
    }

    /// True when the given settings differ from the ones this calendar was built from.
    /// A changed calendar is replaced, never updated.
    pub fn is_changed(
        &self,
        calendar: &CalendarSettings,
        week_day: &WeekDaySettings,
        week_standard: &WeekStandardSettings,
    ) -> bool {
        self.calendar_settings != *calendar
            || self.week_day_settings != *week_day
            || self.week_standard != week_standard.standard
    }
}

/// Days to step forward from `from` to reach the next `to` (0 when equal)
fn days_until(from: Weekday, to: Weekday) -> u64 {
    let from = u64::from(from.num_days_from_monday());
    let to = u64::from(to.num_days_from_monday());
    (to + 7 - from) % 7
}

fn memoized(cache: &YearCache, year: i32, compute: impl FnOnce() -> NaiveDate) -> NaiveDate {
    let cached = cache.borrow().get(&year).copied();
    if let Some(date) = cached {
        return date;
    }
    let date = compute();
    cache.borrow_mut().insert(year, date);
    date
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, range, standard_calendar};
    use proptest::prelude::*;

    #[test]
    fn test_determine_year_standard_calendar() {
        let calendar = standard_calendar(0, 1, 0);

        assert_eq!(calendar.determine_year(date(2020, 1, 1)), 2020);
        assert_eq!(calendar.determine_year(date(2019, 12, 31)), 2019);
    }

    #[test]
    fn test_determine_year_fiscal_calendar() {
        struct TestCase {
            month:    u8,
            day:      u8,
            date:     NaiveDate,
            expected: i32,
        }

        let cases = [
            TestCase {
                month:    3,
                day:      1,
                date:     date(2020, 3, 31),
                expected: 2019,
            },
            TestCase {
                month:    3,
                day:      1,
                date:     date(2020, 4, 1),
                expected: 2020,
            },
            TestCase {
                month:    6,
                day:      15,
                date:     date(2020, 7, 14),
                expected: 2019,
            },
            TestCase {
                month:    6,
                day:      15,
                date:     date(2020, 7, 15),
                expected: 2020,
            },
            TestCase {
                month:    11,
                day:      31,
                date:     date(2021, 1, 1),
                expected: 2020,
            },
        ];

        for case in &cases {
            let calendar = standard_calendar(case.month, case.day, 0);
            assert_eq!(
                calendar.determine_year(case.date),
                case.expected,
                "{} with fiscal start {}/{}",
                case.date,
                case.month,
                case.day
            );
        }
    }

    #[test]
    fn test_fiscal_start_on_leap_day_is_clamped() {
        let calendar = standard_calendar(1, 29, 0);

        assert_eq!(calendar.fiscal_year_start(2020), date(2020, 2, 29));
        assert_eq!(calendar.fiscal_year_start(2021), date(2021, 2, 28));
        assert_eq!(calendar.determine_year(date(2021, 2, 28)), 2021);
        assert_eq!(calendar.determine_year(date(2021, 2, 27)), 2020);
    }

    #[test]
    fn test_first_week_dates() {
        // Jan 1 2020 is a Wednesday
        let calendar = standard_calendar(0, 1, 0);
        assert_eq!(calendar.date_of_first_week(2020), date(2020, 1, 1));
        assert_eq!(calendar.date_of_first_full_week(2020), date(2020, 1, 5));

        // Jan 1 2023 is a Sunday
        assert_eq!(calendar.date_of_first_week(2023), date(2023, 1, 1));
        assert_eq!(calendar.date_of_first_full_week(2023), date(2023, 1, 1));
    }

    #[test]
    fn test_first_full_week_without_day_selection() {
        let calendar = Calendar::new(
            &CalendarSettings::default(),
            &WeekDaySettings::disabled(),
        );
        assert_eq!(calendar.date_of_first_full_week(2020), date(2020, 1, 1));
        assert_eq!(calendar.determine_week(date(2020, 1, 7)), WeekOfYear::new(1, 2020));
        assert_eq!(calendar.determine_week(date(2020, 1, 8)), WeekOfYear::new(2, 2020));
        assert_eq!(
            calendar.week_period(date(2020, 1, 9)),
            range((2020, 1, 8), (2020, 1, 15))
        );
    }

    #[test]
    fn test_determine_week_with_short_first_week() {
        let calendar = standard_calendar(0, 1, 0);

        struct TestCase {
            date:     NaiveDate,
            expected: u32,
        }

        let cases = [
            TestCase {
                date:     date(2020, 1, 1),
                expected: 1,
            },
            TestCase {
                date:     date(2020, 1, 4),
                expected: 1,
            },
            TestCase {
                date:     date(2020, 1, 5),
                expected: 2,
            },
            TestCase {
                date:     date(2020, 1, 11),
                expected: 2,
            },
            TestCase {
                date:     date(2020, 1, 12),
                expected: 3,
            },
            TestCase {
                date:     date(2020, 12, 31),
                expected: 53,
            },
        ];

        for case in &cases {
            assert_eq!(
                calendar.determine_week(case.date),
                WeekOfYear::new(case.expected, 2020),
                "{}",
                case.date
            );
        }
    }

    #[test]
    fn test_determine_week_with_full_first_week() {
        let calendar = standard_calendar(0, 1, 0);

        assert_eq!(calendar.determine_week(date(2023, 1, 1)), WeekOfYear::new(1, 2023));
        assert_eq!(calendar.determine_week(date(2023, 1, 7)), WeekOfYear::new(1, 2023));
        assert_eq!(calendar.determine_week(date(2023, 1, 8)), WeekOfYear::new(2, 2023));
    }

    #[test]
    fn test_determine_week_uses_fiscal_year() {
        // Fiscal year starts Apr 1; Apr 1 2020 is a Wednesday, weeks start Monday
        let calendar = standard_calendar(3, 1, 1);

        assert_eq!(calendar.determine_week(date(2020, 3, 31)).year, 2019);
        assert_eq!(calendar.determine_week(date(2020, 4, 1)), WeekOfYear::new(1, 2020));
        assert_eq!(calendar.determine_week(date(2020, 4, 5)), WeekOfYear::new(1, 2020));
        assert_eq!(calendar.determine_week(date(2020, 4, 6)), WeekOfYear::new(2, 2020));
    }

    #[test]
    fn test_week_period_is_clipped_to_fiscal_year() {
        let calendar = standard_calendar(0, 1, 0);

        assert_eq!(
            calendar.week_period(date(2020, 1, 2)),
            range((2020, 1, 1), (2020, 1, 5))
        );
        assert_eq!(
            calendar.week_period(date(2020, 1, 8)),
            range((2020, 1, 5), (2020, 1, 12))
        );
        // Sunday Dec 27 2020 starts a week cut short by the new year
        assert_eq!(
            calendar.week_period(date(2020, 12, 30)),
            range((2020, 12, 27), (2021, 1, 1))
        );
    }

    #[test]
    fn test_month_period_is_gregorian() {
        let calendar = standard_calendar(3, 15, 0);

        assert_eq!(
            calendar.month_period(date(2020, 2, 10)),
            range((2020, 2, 1), (2020, 3, 1))
        );
        assert_eq!(
            calendar.month_period(date(2020, 12, 31)),
            range((2020, 12, 1), (2021, 1, 1))
        );
    }

    #[test]
    fn test_quarter_start_dates() {
        let calendar = standard_calendar(9, 1, 0);

        assert_eq!(calendar.quarter_first_months(), [9, 12, 15, 18]);
        assert_eq!(calendar.quarter_start_date(2020, 0), date(2020, 10, 1));
        assert_eq!(calendar.quarter_start_date(2020, 1), date(2021, 1, 1));
        assert_eq!(calendar.quarter_start_date(2020, 3), date(2021, 7, 1));
        assert_eq!(calendar.quarter_start_date(2020, 4), date(2021, 10, 1));
    }

    #[test]
    fn test_quarter_start_day_clamped_to_short_months() {
        let calendar = standard_calendar(0, 31, 0);

        assert_eq!(calendar.quarter_start_date(2021, 1), date(2021, 4, 30));
        assert_eq!(calendar.quarter_start_date(2021, 2), date(2021, 7, 31));
    }

    #[test]
    fn test_quarter_index_and_name() {
        let calendar = standard_calendar(9, 1, 0);

        assert_eq!(calendar.quarter_index(date(2020, 10, 1)), (2020, 0));
        assert_eq!(calendar.quarter_index(date(2021, 2, 15)), (2020, 1));
        assert_eq!(calendar.quarter_index(date(2021, 9, 30)), (2020, 3));
        assert_eq!(calendar.quarter_name(date(2021, 5, 1)), "Q3");
        assert_eq!(
            calendar.quarter_period(date(2021, 5, 1)),
            range((2021, 4, 1), (2021, 7, 1))
        );
    }

    #[test]
    fn test_year_period() {
        let calendar = standard_calendar(6, 1, 0);

        assert_eq!(
            calendar.year_period(date(2020, 3, 1)),
            range((2019, 7, 1), (2020, 7, 1))
        );
        assert_eq!(
            calendar.year_period(date(2020, 7, 1)),
            range((2020, 7, 1), (2021, 7, 1))
        );
    }

    #[test]
    fn test_label_year() {
        let mut settings = CalendarSettings::new(
            crate::MonthIndex::new(6).unwrap(),
            crate::DayOfMonth::FIRST,
        );
        settings.treat_as_end_of_fiscal_year = true;
        let calendar = Calendar::new(&settings, &WeekDaySettings::default());
        assert_eq!(calendar.label_year(2020), 2021);

        // A Gregorian fiscal year ends in the year it starts
        let mut gregorian = CalendarSettings::default();
        gregorian.treat_as_end_of_fiscal_year = true;
        let calendar = Calendar::new(&gregorian, &WeekDaySettings::default());
        assert_eq!(calendar.label_year(2020), 2020);
    }

    #[test]
    fn test_next_date() {
        let calendar = standard_calendar(0, 1, 0);
        assert_eq!(calendar.next_date(date(2020, 2, 28)), date(2020, 2, 29));
        assert_eq!(calendar.next_date(date(2020, 12, 31)), date(2021, 1, 1));
    }

    #[test]
    fn test_is_changed() {
        let calendar_settings = CalendarSettings::default();
        let week_day = WeekDaySettings::default();
        let standard = WeekStandardSettings::default();
        let calendar = Calendar::new(&calendar_settings, &week_day);

        assert!(!calendar.is_changed(&calendar_settings, &week_day, &standard));

        let moved =
            CalendarSettings::new(crate::MonthIndex::new(3).unwrap(), crate::DayOfMonth::FIRST);
        assert!(calendar.is_changed(&moved, &week_day, &standard));
        assert!(calendar.is_changed(&calendar_settings, &WeekDaySettings::disabled(), &standard));
        assert!(calendar.is_changed(
            &calendar_settings,
            &week_day,
            &WeekStandardSettings::new(WeekStandard::Iso8601)
        ));
    }

    #[test]
    fn test_caches_are_per_instance() {
        let first = standard_calendar(0, 1, 0);
        assert_eq!(first.date_of_first_full_week(2020), date(2020, 1, 5));

        let second = standard_calendar(0, 1, 1);
        assert_eq!(second.date_of_first_full_week(2020), date(2020, 1, 6));
        assert_eq!(first.date_of_first_full_week(2020), date(2020, 1, 5));
    }

    fn arb_date() -> impl Strategy<Value = NaiveDate> {
        (0u64..20_000).prop_map(|offset| date(1990, 1, 1) + Days::new(offset))
    }

    fn arb_calendar() -> impl Strategy<Value = Calendar> {
        (0u8..12, 1u8..=31, 0u8..7, any::<bool>()).prop_map(|(month, day, weekday, selection)| {
            let mut calendar = standard_calendar(month, day, weekday);
            if !selection {
                let settings = CalendarSettings::new(
                    crate::MonthIndex::new(month).unwrap(),
                    crate::DayOfMonth::new(day).unwrap(),
                )
                .with_clamped_day();
                calendar = Calendar::new(&settings, &WeekDaySettings::disabled());
            }
            calendar
        })
    }

    proptest! {
        #[test]
        fn prop_periods_contain_their_date(calendar in arb_calendar(), d in arb_date()) {
            prop_assert!(calendar.year_period(d).contains(d));
            prop_assert!(calendar.quarter_period(d).contains(d));
            prop_assert!(calendar.month_period(d).contains(d));
            prop_assert!(calendar.week_period(d).contains(d));
        }

        #[test]
        fn prop_quarter_within_year(calendar in arb_calendar(), d in arb_date()) {
            let year = calendar.year_period(d);
            let quarter = calendar.quarter_period(d);
            prop_assert!(year.start() <= quarter.start());
            prop_assert!(quarter.end() <= year.end());
        }

        #[test]
        fn prop_week_number_advances_by_at_most_one(calendar in arb_calendar(), d in arb_date()) {
            let today = calendar.determine_week(d);
            let tomorrow = calendar.determine_week(calendar.next_date(d));
            if today.year == tomorrow.year {
                prop_assert!(
                    tomorrow.number == today.number || tomorrow.number == today.number + 1,
                    "{} -> {}", today, tomorrow
                );
            } else {
                prop_assert_eq!(tomorrow.number, 1);
                prop_assert_eq!(tomorrow.year, today.year + 1);
            }
        }

        #[test]
        fn prop_week_period_matches_week_bucket(calendar in arb_calendar(), d in arb_date()) {
            let week = calendar.determine_week(d);
            let period = calendar.week_period(d);
            let mut day = period.start();
            while day < period.end() {
                prop_assert_eq!(calendar.determine_week(day), week);
                day = calendar.next_date(day);
            }
        }
    }
}
