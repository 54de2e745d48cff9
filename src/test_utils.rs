//! Shared fixtures for unit tests.

use crate::prelude::*;
use crate::{
    BucketKey, Calendar, CalendarFactory, CalendarSettings, DatePeriod, DateRange, DayOfMonth,
    Granularity, GranularityType, MonthIndex, WeekDaySettings, WeekOfYear, WeekStandard,
    WeekStandardSettings, WeekdayIndex,
};

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn range(start: (i32, u32, u32), end: (i32, u32, u32)) -> DateRange {
    DateRange::new(date(start.0, start.1, start.2), date(end.0, end.1, end.2)).unwrap()
}

/// Calendar from the host's raw primitives, with the day clamped as the host does
pub fn standard_calendar(month: u8, day: u8, weekday: u8) -> Calendar {
    let settings =
        CalendarSettings::new(MonthIndex::new(month).unwrap(), DayOfMonth::new(day).unwrap())
            .with_clamped_day();
    Calendar::new(&settings, &WeekDaySettings::new(WeekdayIndex::new(weekday).unwrap()))
}

pub fn iso_calendar() -> Calendar {
    CalendarFactory::create(
        &WeekStandardSettings::new(WeekStandard::Iso8601),
        &CalendarSettings::default(),
        &WeekDaySettings::default(),
    )
}

/// A whole period of the January 2020 bucket
pub fn whole_period(start: NaiveDate, end: NaiveDate, index: usize) -> DatePeriod {
    let mut period = DatePeriod::open(
        vec![BucketKey::from("Jan"), BucketKey::from(2020)],
        start,
        WeekOfYear::new(1, 2020),
        2020,
        index,
    );
    period.end_date = end;
    period
}

/// Builds `kind` over the days `first..=last`
pub fn build_granularity(
    kind: GranularityType,
    calendar: &Calendar,
    first: NaiveDate,
    last: NaiveDate,
) -> Granularity {
    let mut granularity = Granularity::new(kind);
    granularity.reset_date_periods();

    let mut day = first;
    while day <= last {
        granularity.add_date(calendar, day);
        day = calendar.next_date(day);
    }
    granularity.set_new_end_date(calendar.next_date(last));
    granularity
}
