use crate::prelude::*;
use crate::{Calendar, DateRange, ExtendedLabel, Granularity, GranularityType, RangeError};

/// Builds all five granularities over one range of days.
///
/// Every day of the range is fed to every granularity in order; the day after the
/// range closes the last period of each.
#[derive(Debug, Clone)]
pub struct GranularityOrchestrator {
    range:         DateRange,
    dates:         Vec<NaiveDate>,
    calendar:      Option<Calendar>,
    granularities: [Granularity; 5],
}

impl GranularityOrchestrator {
    /// Prepares the days `start..=end`.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` if start > end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        Ok(Self::from_range(DateRange::from_inclusive(start, end)?))
    }

    /// Prepares the days of a half-open range
    pub fn from_range(range: DateRange) -> Self {
        let dates: Vec<NaiveDate> = range
            .start()
            .iter_days()
            .take_while(|date| *date < range.end())
            .collect();
        log::debug!("orchestrating {} days over {range}", dates.len());

        Self {
            range,
            dates,
            calendar: None,
            granularities: GranularityType::ALL.map(Granularity::new),
        }
    }

    /// Range of days covered, ending at the sentinel
    pub const fn range(&self) -> DateRange {
        self.range
    }

    /// Every day of the range, ascending
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Exclusive end of the last period of every granularity
    pub const fn sentinel(&self) -> NaiveDate {
        self.range.end()
    }

    /// Calendar the granularities were last built with
    pub const fn calendar(&self) -> Option<&Calendar> {
        self.calendar.as_ref()
    }

    /// Rebuilds every granularity under `calendar`, dropping splits and labels.
    pub fn create_granularities(&mut self, calendar: Calendar) {
        for granularity in &mut self.granularities {
            granularity.reset_date_periods();
            for &date in &self.dates {
                granularity.add_date(&calendar, date);
            }
            granularity.set_new_end_date(self.range.end());
            granularity.set_extended_label(ExtendedLabel::default());

            log::debug!(
                "built {} granularity: {} periods",
                granularity.kind(),
                granularity.date_periods().len()
            );
        }
        self.calendar = Some(calendar);
    }

    /// Builds, for every granularity, the label rows of itself and every coarser
    /// granularity. Does nothing before [`Self::create_granularities`].
    pub fn create_labels(&mut self) {
        let Some(calendar) = &self.calendar else {
            return;
        };

        for granularity in &mut self.granularities {
            let mut extended_label = ExtendedLabel::default();
            for labeling in GranularityType::ALL {
                if labeling.is_coarser_or_same(granularity.kind()) {
                    let labels = granularity.create_labels(calendar, labeling);
                    extended_label.set_labels(labeling, labels);
                }
            }
            granularity.set_extended_label(extended_label);
        }
    }

    pub fn granularity(&self, kind: GranularityType) -> &Granularity {
        &self.granularities[kind.index()]
    }

    pub fn granularity_mut(&mut self, kind: GranularityType) -> &mut Granularity {
        &mut self.granularities[kind.index()]
    }
}
