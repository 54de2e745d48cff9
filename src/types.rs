use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_DAY_OF_MONTH, MAX_MONTH_INDEX, MAX_WEEKDAY_INDEX, MIN_DAY, MONTHS_PER_YEAR,
};
use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;

/// Error raised when a configuration primitive supplied by the host is out of range.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ConfigError {
    #[display(fmt = "Invalid month index: {} (must be 0-{})", "_0", MAX_MONTH_INDEX)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day of month: {} (must be 1-{})", "_0", MAX_DAY_OF_MONTH)]
    InvalidDay(u8),
    #[display(fmt = "Invalid weekday index: {} (must be 0-{})", "_0", MAX_WEEKDAY_INDEX)]
    InvalidWeekday(u8),
}

impl std::error::Error for ConfigError {}

/// A zero-based month index guaranteed to be in the range `0..=MAX_MONTH_INDEX` (0..=11).
/// January is 0, matching the host's configuration primitives.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct MonthIndex(u8);

impl MonthIndex {
    pub const JANUARY: Self = Self(0);

    /// Creates a new month index, validating that it's <= `MAX_MONTH_INDEX`
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidMonth` if the value is > `MAX_MONTH_INDEX`.
    pub const fn new(value: u8) -> Result<Self, ConfigError> {
        if value > MAX_MONTH_INDEX {
            return Err(ConfigError::InvalidMonth(value));
        }
        Ok(Self(value))
    }

    /// Returns the zero-based month as u32, the unit chrono arithmetic works in
    #[inline]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }
}

impl TryFrom<u8> for MonthIndex {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MonthIndex> for u8 {
    fn from(month: MonthIndex) -> Self {
        month.0
    }
}

impl fmt::Display for MonthIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A day of month in `MIN_DAY..=MAX_DAY_OF_MONTH` (1..=31).
/// Whether the day exists in a particular month is the caller's concern,
/// see [`crate::CalendarSettings::with_clamped_day`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayOfMonth(NonZeroU8);

impl DayOfMonth {
    pub const FIRST: Self = Self(NonZeroU8::MIN);

    /// Creates a new day of month, validating that it's non-zero and <= `MAX_DAY_OF_MONTH`
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidDay` if the value is 0 or > `MAX_DAY_OF_MONTH`.
    pub fn new(value: u8) -> Result<Self, ConfigError> {
        let non_zero = NonZeroU8::new(value).ok_or(ConfigError::InvalidDay(value))?;
        if value > MAX_DAY_OF_MONTH {
            return Err(ConfigError::InvalidDay(value));
        }
        Ok(Self(non_zero))
    }

    /// Returns the day value as u32
    #[inline]
    pub const fn get(self) -> u32 {
        self.0.get() as u32
    }

    /// Clamps the day to the longest length `month` can have (29 for February).
    pub fn clamp_to_month(self, month: MonthIndex) -> Self {
        let max = if month.0 == FEBRUARY {
            FEBRUARY_DAYS_LEAP
        } else {
            DAYS_IN_MONTH[month.0 as usize]
        };
        NonZeroU8::new(self.0.get().min(max)).map_or(Self::FIRST, Self)
    }
}

impl Default for DayOfMonth {
    fn default() -> Self {
        Self::FIRST
    }
}

impl TryFrom<u8> for DayOfMonth {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DayOfMonth> for u8 {
    fn from(day: DayOfMonth) -> Self {
        day.0.get()
    }
}

impl fmt::Display for DayOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const WEEKDAYS_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// A weekday index counted from Sunday (0) to Saturday (6).
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekdayIndex(u8);

impl WeekdayIndex {
    pub const SUNDAY: Self = Self(0);
    pub const MONDAY: Self = Self(1);

    /// Creates a new weekday index, validating that it's <= `MAX_WEEKDAY_INDEX`
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidWeekday` if the value is > `MAX_WEEKDAY_INDEX`.
    pub const fn new(value: u8) -> Result<Self, ConfigError> {
        if value > MAX_WEEKDAY_INDEX {
            return Err(ConfigError::InvalidWeekday(value));
        }
        Ok(Self(value))
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Returns the chrono weekday this index names
    pub const fn weekday(self) -> Weekday {
        WEEKDAYS_FROM_SUNDAY[self.0 as usize]
    }
}

impl From<Weekday> for WeekdayIndex {
    fn from(weekday: Weekday) -> Self {
        // num_days_from_sunday is always 0..=6
        Self(weekday.num_days_from_sunday() as u8)
    }
}

impl TryFrom<u8> for WeekdayIndex {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<WeekdayIndex> for u8 {
    fn from(weekday: WeekdayIndex) -> Self {
        weekday.0
    }
}

impl fmt::Display for WeekdayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Helper functions

pub const fn is_leap_year(year: i32) -> bool {
    (year.rem_euclid(LEAP_YEAR_CYCLE) == 0 && year.rem_euclid(CENTURY_CYCLE) != 0)
        || year.rem_euclid(GREGORIAN_CYCLE) == 0
}

pub const fn days_in_month(year: i32, month0: u32) -> u32 {
    debug_assert!(month0 < MONTHS_PER_YEAR);

    if month0 == FEBRUARY as u32 && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP as u32
    } else {
        DAYS_IN_MONTH[month0 as usize] as u32
    }
}

/// Builds the date `(year, month0, day)`.
///
/// `month0` values of 12 or more roll into later years and `day` is clamped to the
/// length of the resulting month. Years chrono cannot represent saturate to
/// `NaiveDate::MIN` / `NaiveDate::MAX`.
pub fn clamped_date(year: i32, month0: u32, day: u32) -> NaiveDate {
    let carry = i32::try_from(month0 / MONTHS_PER_YEAR).unwrap_or(i32::MAX);
    let year = year.saturating_add(carry);
    let month0 = month0 % MONTHS_PER_YEAR;
    let day = day.clamp(u32::from(MIN_DAY), days_in_month(year, month0));
    NaiveDate::from_ymd_opt(year, month0 + 1, day).unwrap_or(if year < 0 {
        NaiveDate::MIN
    } else {
        NaiveDate::MAX
    })
}
