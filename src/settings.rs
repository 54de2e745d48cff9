//! Host-supplied configuration.
//!
//! The host's settings panel hands over plain primitives; they are validated on the way
//! in by the newtypes in [`crate::types`] and grouped here the way the host groups them.

use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::{DayOfMonth, GranularityType, MonthIndex, WeekdayIndex};

/// Start of the fiscal year.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CalendarSettings {
    /// First month of the fiscal year
    pub month:                       MonthIndex,
    /// First day of that month
    pub day:                         DayOfMonth,
    /// Label fiscal years by the calendar year in which they end
    pub treat_as_end_of_fiscal_year: bool,
}

impl CalendarSettings {
    pub const fn new(month: MonthIndex, day: DayOfMonth) -> Self {
        Self {
            month,
            day,
            treat_as_end_of_fiscal_year: false,
        }
    }

    /// Clamps `day` to the longest length of `month`, as the settings panel does before
    /// handing the values to a [`crate::Calendar`].
    #[must_use]
    pub fn with_clamped_day(self) -> Self {
        Self {
            day: self.day.clamp_to_month(self.month),
            ..self
        }
    }

    /// True when the fiscal year is the Gregorian year
    pub fn starts_on_january_first(&self) -> bool {
        self.month == MonthIndex::JANUARY && self.day == DayOfMonth::FIRST
    }
}

/// First day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeekDaySettings {
    /// When false, weeks start on whatever weekday the fiscal year starts on
    pub day_selection: bool,
    pub day:           WeekdayIndex,
}

impl Default for WeekDaySettings {
    fn default() -> Self {
        Self {
            day_selection: true,
            day: WeekdayIndex::SUNDAY,
        }
    }
}

impl WeekDaySettings {
    pub const fn new(day: WeekdayIndex) -> Self {
        Self {
            day_selection: true,
            day,
        }
    }

    /// Weeks anchored to the fiscal year start instead of a fixed weekday
    pub const fn disabled() -> Self {
        Self {
            day_selection: false,
            day: WeekdayIndex::SUNDAY,
        }
    }
}

/// How week numbers and week years are determined.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum WeekStandard {
    /// Weeks follow the configured fiscal year and first day of week
    #[default]
    #[display(fmt = "NotSet")]
    NotSet,
    /// ISO 8601 weeks: Monday start, week 1 holds the year's first Thursday
    #[serde(rename = "ISO8601")]
    #[display(fmt = "ISO8601")]
    Iso8601,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WeekStandardSettings {
    pub standard: WeekStandard,
}

impl WeekStandardSettings {
    pub const fn new(standard: WeekStandard) -> Self {
        Self { standard }
    }
}

/// Everything the host configures, as one document.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineSettings {
    pub calendar:      CalendarSettings,
    pub week_day:      WeekDaySettings,
    pub week_standard: WeekStandardSettings,
    /// Granularity shown when the timeline is first built
    pub granularity:   GranularityType,
}

impl TimelineSettings {
    /// Loads settings from the host's JSON document. Missing sections take their
    /// defaults; out-of-range primitives are rejected.
    ///
    /// # Errors
    /// Returns the `serde_json` error when the document is malformed or a primitive
    /// fails validation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(Self {
            calendar: settings.calendar.with_clamped_day(),
            ..settings
        })
    }
}
