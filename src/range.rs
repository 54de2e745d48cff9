use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{RANGE_SEPARATOR, prelude::*};

/// A half-open range of calendar days: `start` is included, `end` is not.
/// The start date must be less than or equal to the end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display(fmt = "{start}/{end}")]
pub struct DateRange {
    start: NaiveDate,
    end:   NaiveDate,
}

/// Error type for date range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Start date is after end date.
    #[error("Invalid date range: start ({start}) is after end ({end})")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// Error parsing a date component.
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Invalid range format.
    #[error("Invalid range format: {0}")]
    InvalidFormat(String),
}

impl DateRange {
    /// Creates a new date range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start > end {
            return Err(RangeError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates a range from bounds the caller already knows to be ordered.
    pub(crate) fn from_ordered(start: NaiveDate, end: NaiveDate) -> Self {
        debug_assert!(start <= end, "unordered range {start}/{end}");
        Self {
            start: start.min(end),
            end:   end.max(start),
        }
    }

    /// Creates the range covering `first..=last`, i.e. ending one day after `last`.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if first > last.
    pub fn from_inclusive(first: NaiveDate, last: NaiveDate) -> Result<Self, RangeError> {
        let end = last.succ_opt().unwrap_or(last);
        Self::new(first, end)
    }

    /// Derives the covering range of a flat collection of row dates.
    /// Returns `None` when there are no dates.
    pub fn from_dates<I>(dates: I) -> Option<Self>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let (min, max) = dates.into_iter().fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((d.min(lo), d.max(hi))),
        })?;
        Self::from_inclusive(min, max).ok()
    }

    /// Parses a persisted selection range.
    ///
    /// Malformed input yields `None`, which callers treat as "no prior selection".
    pub fn parse_persisted(s: &str) -> Option<Self> {
        match s.parse() {
            Ok(range) => Some(range),
            Err(err) => {
                log::warn!("ignoring persisted selection {s:?}: {err}");
                None
            }
        }
    }

    /// Returns the first day of the range
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the exclusive end of the range
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days covered by the range
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Checks if the range contains a given day
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Restricts this range to `bounds`. Returns `None` when the two do not overlap.
    pub fn clamp_to(&self, bounds: &Self) -> Option<Self> {
        let start = self.start.max(bounds.start);
        let end = self.end.min(bounds.end);
        Self::new(start, end).ok().filter(|r| !r.is_empty() || self.is_empty())
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, RangeError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| RangeError::InvalidDate(s.to_owned()))
}

impl FromStr for DateRange {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(RangeError::InvalidFormat(format!(
                "No range separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (start_str, end_str) = trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    RangeError::InvalidFormat(format!(
                        "Separator '{RANGE_SEPARATOR}' not found despite count == 1"
                    ))
                })?;

                let start = parse_date(start_str.trim())?;
                let end = parse_date(end_str.trim())?;

                Self::new(start, end)
            },
            _ => Err(RangeError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
