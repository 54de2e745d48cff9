//! Reconciles a selected date range with the active period list.
//!
//! A selection rarely lines up with bucket boundaries. Rather than rounding it, the
//! periods it cuts through are split into fractional periods at the selection bounds, so
//! the selection can be expressed as a run of whole array positions. The split is
//! undone with [`unseparate_selection`] before the next selection or rebuild.

use serde::{Deserialize, Serialize};

use crate::prelude::*;
use crate::{DatePeriod, DateRange};

/// Selected run of periods as inclusive positions in the period list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "camelCase")]
#[display(fmt = "{start_index}..={end_index}")]
pub struct Selection {
    pub start_index: usize,
    pub end_index:   usize,
}

/// Error type for selection splitting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// The period list has no entries to select from.
    #[error("Cannot select from an empty period list")]
    EmptyPeriods,

    /// Selection is empty or starts after its end.
    #[error("Invalid selection: start ({start}) is not before end ({end})")]
    InvalidSelection { start: NaiveDate, end: NaiveDate },

    /// A period index past the end of the list.
    #[error("Period index {index} out of range for {len} periods")]
    IndexOutOfRange { index: usize, len: usize },

    /// A previous selection is still split.
    #[error("Period {index} is still split; unseparate the previous selection first")]
    PendingSplit { index: usize },

    /// A fractional period is not followed by the rest of its bucket.
    #[error("Fractional period {index} has no matching part to merge with")]
    UnpairedSplit { index: usize },
}

impl Selection {
    pub const fn new(start_index: usize, end_index: usize) -> Self {
        Self {
            start_index,
            end_index,
        }
    }

    /// Selects every period of `periods`
    pub fn all(periods: &[DatePeriod]) -> Self {
        Self::new(0, periods.len().saturating_sub(1))
    }

    /// Dates covered by the selection, from the start of its first period to the end
    /// of its last. `None` when the positions are inverted or past the list.
    pub fn selected_range(&self, periods: &[DatePeriod]) -> Option<DateRange> {
        if self.start_index > self.end_index {
            return None;
        }
        let first = periods.get(self.start_index)?;
        let last = periods.get(self.end_index)?;
        DateRange::new(first.start_date, last.end_date).ok()
    }
}

/// Splits `periods[index]` at `new_date`. The inserted tail takes `new_fraction` of the
/// bucket and the position right after the head.
///
/// # Errors
/// Returns `SelectionError::IndexOutOfRange` when `index` is past the list.
pub fn split_period(
    periods: &mut Vec<DatePeriod>,
    index: usize,
    new_fraction: f64,
    new_date: NaiveDate,
) -> Result<(), SelectionError> {
    let len = periods.len();
    let period = periods
        .get_mut(index)
        .ok_or(SelectionError::IndexOutOfRange { index, len })?;

    let tail = period.split_off(new_fraction, new_date);
    log::trace!(
        "split period {index} at {new_date}: head {:.4}, tail {:.4}",
        period.fraction,
        tail.fraction
    );
    periods.insert(index + 1, tail);
    Ok(())
}

/// Share of `period` lying before `date` (`from_start`) or after it, in `0.0..=1.0` for
/// dates inside the period. A zero-length period has ratio 0.
// day counts stay far below f64's exact integers
#[allow(clippy::cast_precision_loss)]
pub fn date_ratio(period: &DatePeriod, date: NaiveDate, from_start: bool) -> f64 {
    let total = period.days();
    if total == 0 {
        return 0.0;
    }
    let part = if from_start {
        (date - period.start_date).num_days()
    } else {
        (period.end_date - date).num_days()
    };
    part as f64 / total as f64
}

fn is_partial(ratio: f64) -> bool {
    ratio > 0.0 && ratio < 1.0
}

/// Splits the periods cut by `[start, end)` and points `selection` at the periods
/// inside it.
///
/// A selection reaching past the data is clamped to the first or last period.
///
/// # Errors
/// - `SelectionError::EmptyPeriods` for an empty list.
/// - `SelectionError::InvalidSelection` unless start < end.
/// - `SelectionError::PendingSplit` while a previous selection is still split.
pub fn separate_selection(
    periods: &mut Vec<DatePeriod>,
    selection: &mut Selection,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), SelectionError> {
    let (Some(first), Some(last)) = (periods.first(), periods.last()) else {
        return Err(SelectionError::EmptyPeriods);
    };
    if start >= end {
        return Err(SelectionError::InvalidSelection { start, end });
    }
    if let Some(index) = periods.iter().position(DatePeriod::is_fractional) {
        return Err(SelectionError::PendingSplit { index });
    }
    if start < first.start_date || end > last.end_date {
        log::warn!(
            "selection {start}/{end} reaches outside the data {}/{}",
            first.start_date,
            last.end_date
        );
    }

    let last_index = periods.len() - 1;
    let mut start_index = periods.iter().position(|p| p.end_date > start).unwrap_or(0);
    let mut end_index = periods
        .iter()
        .position(|p| p.end_date >= end)
        .unwrap_or(last_index);

    let end_period = &periods[end_index];
    let end_ratio = date_ratio(end_period, end, false);
    if is_partial(end_ratio) {
        let new_fraction = end_period.fraction * end_ratio;
        split_period(periods, end_index, new_fraction, end)?;
    }

    // ratios are scaled by the current fraction so they stay in bucket units when the
    // end split above already cut this period
    let start_period = &periods[start_index];
    let start_ratio = date_ratio(start_period, start, true);
    if is_partial(start_ratio) {
        let new_fraction = start_period.fraction * (1.0 - start_ratio);
        split_period(periods, start_index, new_fraction, start)?;
        start_index += 1;
        end_index += 1;
    }

    *selection = Selection::new(start_index, end_index);
    Ok(())
}

/// Merges every fractional period back into the rest of its bucket, restoring the list
/// as it was before [`separate_selection`]. Returns the number of merges.
///
/// # Errors
/// - `SelectionError::EmptyPeriods` for an empty list.
/// - `SelectionError::UnpairedSplit` when a fractional period is not followed by a
///   part of the same bucket.
pub fn unseparate_selection(periods: &mut Vec<DatePeriod>) -> Result<usize, SelectionError> {
    if periods.is_empty() {
        return Err(SelectionError::EmptyPeriods);
    }

    let mut merged = 0;
    while let Some(index) = periods.iter().position(DatePeriod::is_fractional) {
        let paired = periods
            .get(index + 1)
            .is_some_and(|next| next.identifier_array == periods[index].identifier_array);
        if !paired {
            return Err(SelectionError::UnpairedSplit { index });
        }

        let tail = periods.remove(index + 1);
        periods[index].absorb(tail);
        log::trace!("merged period {index}: fraction {:.4}", periods[index].fraction);
        merged += 1;
    }
    Ok(merged)
}
