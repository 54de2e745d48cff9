//! Date bucketing for timeline range selectors.
//!
//! A contiguous range of days is partitioned into year, quarter, month, week and day
//! buckets under configurable fiscal-year and week-numbering rules. When a selection
//! lands inside a bucket instead of on its boundary, the bucket is split into fractional
//! periods so the selection can be addressed exactly, and merged back afterwards.

mod calendar;
mod consts;
mod granularity;
mod orchestrator;
mod prelude;
mod range;
mod settings;
mod splitter;
mod timeline;
mod types;

#[cfg(test)]
mod test_utils;

pub use calendar::{Calendar, CalendarFactory};
pub use consts::*;
pub use granularity::{BucketRules, ExtendedLabel, Granularity, TimelineLabel};
pub use orchestrator::GranularityOrchestrator;
pub use range::{DateRange, RangeError};
pub use settings::{
    CalendarSettings, TimelineSettings, WeekDaySettings, WeekStandard, WeekStandardSettings,
};
pub use splitter::{
    Selection, SelectionError, date_ratio, separate_selection, split_period, unseparate_selection,
};
pub use timeline::{Timeline, TimelineError};
pub use types::{ConfigError, DayOfMonth, MonthIndex, WeekdayIndex, days_in_month, is_leap_year};

use crate::prelude::*;
use serde::{Deserialize, Serialize};

/// Time resolution of a partition, coarsest first.
///
/// The discriminant doubles as the index into per-granularity tables, and the ordering
/// is "coarser < finer": `Year < Quarter < Month < Week < Day`.
#[repr(u8)]
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
)]
#[serde(rename_all = "lowercase")]
pub enum GranularityType {
    #[display(fmt = "year")]
    Year = 0,
    #[display(fmt = "quarter")]
    Quarter = 1,
    #[default]
    #[display(fmt = "month")]
    Month = 2,
    #[display(fmt = "week")]
    Week = 3,
    #[display(fmt = "day")]
    Day = 4,
}

impl GranularityType {
    pub const ALL: [Self; 5] = [Self::Year, Self::Quarter, Self::Month, Self::Week, Self::Day];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// True when `self` is the same as or coarser than `other`
    pub fn is_coarser_or_same(self, other: Self) -> bool {
        self <= other
    }
}

/// One token of a bucket identifier, e.g. `"Jan"` or `2020`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From)]
#[serde(untagged)]
pub enum BucketKey {
    #[display(fmt = "{_0}")]
    Number(i32),
    #[display(fmt = "{_0}")]
    Text(String),
}

impl From<&str> for BucketKey {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

/// Week number and the year the week is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[display(fmt = "W{number} {year}")]
pub struct WeekOfYear {
    pub number: u32,
    pub year:   i32,
}

impl WeekOfYear {
    pub const fn new(number: u32, year: i32) -> Self {
        Self { number, year }
    }
}

/// One bucket of a partitioned range, or a fraction of one after a split.
///
/// `end_date` is exclusive. `index` orders periods: whole periods carry their position
/// in the original list, split-off parts carry `index + fraction` of the part before them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatePeriod {
    pub identifier_array: Vec<BucketKey>,
    pub start_date:       NaiveDate,
    pub end_date:         NaiveDate,
    pub week:             WeekOfYear,
    /// Fiscal year of `start_date`
    pub year:             i32,
    pub fraction:         f64,
    pub index:            f64,
}

impl DatePeriod {
    /// Opens a whole period on `date`
    pub fn open(
        identifier_array: Vec<BucketKey>,
        date: NaiveDate,
        week: WeekOfYear,
        year: i32,
        position: usize,
    ) -> Self {
        // period lists hold at most one entry per day, far below f64's exact integers
        #[allow(clippy::cast_precision_loss)]
        let index = position as f64;
        Self {
            identifier_array,
            start_date: date,
            end_date: date,
            week,
            year,
            fraction: 1.0,
            index,
        }
    }

    pub fn range(&self) -> DateRange {
        DateRange::from_ordered(self.start_date, self.end_date)
    }

    /// Length in days
    pub fn days(&self) -> i64 {
        self.range().days()
    }

    /// True when this period is only part of its bucket
    pub fn is_fractional(&self) -> bool {
        self.fraction < 1.0 - FRACTION_EPSILON
    }

    /// Cuts this period at `new_date`, keeping the head and returning the tail.
    /// The tail takes `new_fraction` of the bucket away from this period.
    pub fn split_off(&mut self, new_fraction: f64, new_date: NaiveDate) -> Self {
        self.fraction -= new_fraction;
        let tail = Self {
            identifier_array: self.identifier_array.clone(),
            start_date: new_date,
            end_date: self.end_date,
            week: self.week,
            year: self.year,
            fraction: new_fraction,
            index: self.index + self.fraction,
        };
        self.end_date = new_date;
        tail
    }

    /// Glues the following `tail` back onto this period
    pub fn absorb(&mut self, tail: Self) {
        self.end_date = tail.end_date;
        self.fraction += tail.fraction;
        if (1.0 - self.fraction).abs() < FRACTION_EPSILON {
            self.fraction = 1.0;
        }
    }
}
