//! Partitioning of a day sequence into buckets of one resolution.
//!
//! A [`Granularity`] owns the ordered period list for its [`GranularityType`]. The list
//! is built by feeding every day of the data range in ascending order
//! ([`Granularity::reset_date_periods`], [`Granularity::add_date`]*,
//! [`Granularity::set_new_end_date`]); afterwards it only changes through splits and
//! merges made for the active selection.
//!
//! What differs between resolutions (bucket key, label identity, label text) lives
//! behind [`BucketRules`], one implementation per resolution, looked up by type.

mod day;
mod label;
mod month;
mod quarter;
mod week;
mod year;

pub use label::{ExtendedLabel, TimelineLabel};

use crate::prelude::*;
use crate::splitter::{self, SelectionError};
use crate::{BucketKey, Calendar, DatePeriod, GranularityType};

/// Resolution-specific behaviour of a granularity.
pub trait BucketRules: Sync {
    fn kind(&self) -> GranularityType;

    /// Identifier of the bucket `date` falls into
    fn split_date(&self, calendar: &Calendar, date: NaiveDate) -> Vec<BucketKey>;

    /// True when `a` and `b` fall under the same label at this resolution
    fn same_label(&self, calendar: &Calendar, a: &DatePeriod, b: &DatePeriod) -> bool;

    fn generate_label(&self, calendar: &Calendar, period: &DatePeriod) -> TimelineLabel;
}

static RULES: [&dyn BucketRules; 5] = [
    &year::YearRules,
    &quarter::QuarterRules,
    &month::MonthRules,
    &week::WeekRules,
    &day::DayRules,
];

/// Rules for `kind`
pub fn rules(kind: GranularityType) -> &'static dyn BucketRules {
    RULES[kind.index()]
}

#[derive(Debug, Clone, PartialEq)]
pub struct Granularity {
    kind:           GranularityType,
    date_periods:   Vec<DatePeriod>,
    extended_label: ExtendedLabel,
}

impl Granularity {
    pub fn new(kind: GranularityType) -> Self {
        Self {
            kind,
            date_periods: Vec::new(),
            extended_label: ExtendedLabel::default(),
        }
    }

    pub const fn kind(&self) -> GranularityType {
        self.kind
    }

    pub fn date_periods(&self) -> &[DatePeriod] {
        &self.date_periods
    }

    /// Mutable access for the selection splitter
    pub fn date_periods_mut(&mut self) -> &mut Vec<DatePeriod> {
        &mut self.date_periods
    }

    pub const fn extended_label(&self) -> &ExtendedLabel {
        &self.extended_label
    }

    pub fn set_extended_label(&mut self, extended_label: ExtendedLabel) {
        self.extended_label = extended_label;
    }

    pub fn split_date(&self, calendar: &Calendar, date: NaiveDate) -> Vec<BucketKey> {
        rules(self.kind).split_date(calendar, date)
    }

    pub fn same_label(&self, calendar: &Calendar, a: &DatePeriod, b: &DatePeriod) -> bool {
        rules(self.kind).same_label(calendar, a, b)
    }

    pub fn generate_label(&self, calendar: &Calendar, period: &DatePeriod) -> TimelineLabel {
        rules(self.kind).generate_label(calendar, period)
    }

    pub fn reset_date_periods(&mut self) {
        self.date_periods.clear();
    }

    /// Adds the next day of the range. Days must arrive in ascending order, one per day.
    ///
    /// A day with the same bucket key as the last period extends it; any other day
    /// closes the last period and opens a new one.
    pub fn add_date(&mut self, calendar: &Calendar, date: NaiveDate) {
        let identifier_array = self.split_date(calendar, date);
        let extends_last = self
            .date_periods
            .last()
            .is_some_and(|last| last.identifier_array == identifier_array);

        if let Some(last) = self.date_periods.last_mut() {
            last.end_date = date;
        }

        if !extends_last {
            let position = self.date_periods.len();
            self.date_periods.push(DatePeriod::open(
                identifier_array,
                date,
                calendar.determine_week(date),
                calendar.determine_year(date),
                position,
            ));
        }
    }

    /// Sets the exclusive end of the final period, once the whole range has been fed.
    pub fn set_new_end_date(&mut self, date: NaiveDate) {
        if let Some(last) = self.date_periods.last_mut() {
            last.end_date = date;
        }
    }

    /// Splits period `index` at `new_date`; see [`splitter::split_period`].
    ///
    /// # Errors
    /// Returns `SelectionError::IndexOutOfRange` when `index` is past the list.
    pub fn split_period(
        &mut self,
        index: usize,
        new_fraction: f64,
        new_date: NaiveDate,
    ) -> Result<(), SelectionError> {
        splitter::split_period(&mut self.date_periods, index, new_fraction, new_date)
    }

    /// Labels this granularity's periods at the `labeling` resolution, one label per run
    /// of periods that share a label there.
    pub fn create_labels(
        &self,
        calendar: &Calendar,
        labeling: GranularityType,
    ) -> Vec<TimelineLabel> {
        let labeling = rules(labeling);
        let mut labels = Vec::new();
        let mut last_labeled: Option<&DatePeriod> = None;

        for period in &self.date_periods {
            if last_labeled.is_none_or(|last| !labeling.same_label(calendar, period, last)) {
                last_labeled = Some(period);
                labels.push(labeling.generate_label(calendar, period));
            }
        }
        labels
    }
}
