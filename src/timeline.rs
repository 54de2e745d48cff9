//! The timeline controller.
//!
//! A [`Timeline`] owns the built granularities for one dataset and keeps the active
//! selection consistent with them. Every selection change follows the same cycle: the
//! previous split is merged back, then the new range is split out of the active
//! granularity. Settings changes rebuild only when the calendar actually changes.

use crate::prelude::*;
use crate::splitter::{separate_selection, unseparate_selection};
use crate::{
    CalendarFactory, DatePeriod, DateRange, ExtendedLabel, Granularity, GranularityOrchestrator,
    GranularityType, RangeError, Selection, SelectionError, TimelineSettings,
};

/// Error type for timeline operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimelineError {
    /// No row dates to derive the data range from.
    #[error("Cannot build a timeline without any dates")]
    EmptyDataset,

    #[error(transparent)]
    Range(#[from] RangeError),

    #[error(transparent)]
    Selection(#[from] SelectionError),
}

#[derive(Debug, Clone)]
pub struct Timeline {
    settings:     TimelineSettings,
    orchestrator: GranularityOrchestrator,
    selection:    Selection,
}

impl Timeline {
    /// Builds a timeline over the span of `dates`, with everything selected.
    ///
    /// # Errors
    /// Returns `TimelineError::EmptyDataset` when `dates` is empty.
    pub fn new<I>(dates: I, settings: TimelineSettings) -> Result<Self, TimelineError>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let range = DateRange::from_dates(dates).ok_or(TimelineError::EmptyDataset)?;
        Self::with_range(range, settings)
    }

    /// Builds a timeline over the days of `range`, with everything selected.
    ///
    /// # Errors
    /// Returns `TimelineError::EmptyDataset` when `range` holds no days.
    pub fn with_range(range: DateRange, settings: TimelineSettings) -> Result<Self, TimelineError> {
        if range.is_empty() {
            return Err(TimelineError::EmptyDataset);
        }
        let settings = TimelineSettings {
            calendar: settings.calendar.with_clamped_day(),
            ..settings
        };
        let mut timeline = Self {
            settings,
            orchestrator: GranularityOrchestrator::from_range(range),
            selection: Selection::default(),
        };
        timeline.rebuild();
        timeline.selection = Selection::all(timeline.periods());
        Ok(timeline)
    }

    pub const fn settings(&self) -> &TimelineSettings {
        &self.settings
    }

    pub const fn orchestrator(&self) -> &GranularityOrchestrator {
        &self.orchestrator
    }

    /// Range of days the data covers
    pub const fn data_range(&self) -> DateRange {
        self.orchestrator.range()
    }

    pub const fn granularity_type(&self) -> GranularityType {
        self.settings.granularity
    }

    /// The active granularity
    pub fn granularity(&self) -> &Granularity {
        self.orchestrator.granularity(self.settings.granularity)
    }

    /// Periods of the active granularity, split around the selection
    pub fn periods(&self) -> &[DatePeriod] {
        self.granularity().date_periods()
    }

    pub fn extended_label(&self) -> &ExtendedLabel {
        self.granularity().extended_label()
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Exact dates currently selected
    pub fn selected_range(&self) -> Option<DateRange> {
        self.selection.selected_range(self.periods())
    }

    /// Applies new host settings. The granularities are rebuilt only when the calendar
    /// settings changed; a granularity change alone just switches the active one. The
    /// selected dates survive either way. Returns whether a rebuild happened.
    ///
    /// # Errors
    /// Returns `TimelineError::Selection` if the selection could not be moved over.
    pub fn apply_settings(&mut self, settings: TimelineSettings) -> Result<bool, TimelineError> {
        let settings = TimelineSettings {
            calendar: settings.calendar.with_clamped_day(),
            ..settings
        };
        let changed = self.orchestrator.calendar().is_none_or(|calendar| {
            calendar.is_changed(&settings.calendar, &settings.week_day, &settings.week_standard)
        });

        if !changed {
            self.set_granularity(settings.granularity)?;
            self.settings = settings;
            return Ok(false);
        }

        let selected = self.selected_range();
        self.settings = settings;
        self.rebuild();
        self.reselect(selected)?;
        Ok(true)
    }

    /// Switches the active granularity, keeping the selected dates.
    ///
    /// # Errors
    /// Returns `TimelineError::Selection` if the selection could not be moved over.
    pub fn set_granularity(&mut self, kind: GranularityType) -> Result<(), TimelineError> {
        if kind == self.settings.granularity {
            return Ok(());
        }
        log::debug!("switching granularity {} -> {kind}", self.settings.granularity);

        let selected = self.selected_range();
        self.unsplit()?;
        self.settings.granularity = kind;
        self.reselect(selected)
    }

    /// Selects `[start, end)`.
    ///
    /// # Errors
    /// - `TimelineError::Range` if start > end.
    /// - `TimelineError::Selection` for an empty range, or if the active periods could
    ///   not be split.
    pub fn select(&mut self, start: NaiveDate, end: NaiveDate) -> Result<Selection, TimelineError> {
        self.select_range(DateRange::new(start, end)?)
    }

    /// Selects `range`, splitting the periods at its bounds. Parts outside the data are
    /// dropped.
    ///
    /// # Errors
    /// Returns `TimelineError::Selection` for an empty range, or if the active periods
    /// could not be split.
    pub fn select_range(&mut self, range: DateRange) -> Result<Selection, TimelineError> {
        if range.is_empty() {
            return Err(SelectionError::InvalidSelection {
                start: range.start(),
                end:   range.end(),
            }
            .into());
        }
        let range = match range.clamp_to(&self.data_range()) {
            Some(clamped) if clamped != range => {
                log::warn!("selection {range} clamped to the data as {clamped}");
                clamped
            },
            Some(clamped) => clamped,
            // no overlap: the splitter pins it to the first or last period
            None => range,
        };

        self.unsplit()?;
        let kind = self.settings.granularity;
        let periods = self.orchestrator.granularity_mut(kind).date_periods_mut();
        separate_selection(periods, &mut self.selection, range.start(), range.end())?;
        log::debug!("selected {range} as {kind} periods {}", self.selection);
        Ok(self.selection)
    }

    /// Restores a selection persisted by the host as `"YYYY-MM-DD/YYYY-MM-DD"`. A
    /// malformed or empty value selects the whole data range.
    ///
    /// # Errors
    /// Returns `TimelineError::Selection` if the active periods could not be split.
    pub fn restore_selection(&mut self, persisted: &str) -> Result<Selection, TimelineError> {
        let range = DateRange::parse_persisted(persisted)
            .filter(|range| !range.is_empty())
            .unwrap_or_else(|| self.data_range());
        self.select_range(range)
    }

    /// Selects the whole data range.
    ///
    /// # Errors
    /// Returns `TimelineError::Selection` if the active periods could not be merged.
    pub fn clear_selection(&mut self) -> Result<Selection, TimelineError> {
        self.select_range(self.data_range())
    }

    fn rebuild(&mut self) {
        let calendar = CalendarFactory::from_settings(&self.settings);
        self.orchestrator.create_granularities(calendar);
        self.orchestrator.create_labels();
    }

    fn unsplit(&mut self) -> Result<(), SelectionError> {
        let kind = self.settings.granularity;
        let periods = self.orchestrator.granularity_mut(kind).date_periods_mut();
        let merged = unseparate_selection(periods)?;
        if merged > 0 {
            log::trace!("merged {merged} split periods of {kind}");
        }
        Ok(())
    }

    fn reselect(&mut self, selected: Option<DateRange>) -> Result<(), TimelineError> {
        let range = selected.unwrap_or_else(|| self.data_range());
        self.select_range(range).map(|_| ())
    }
}
