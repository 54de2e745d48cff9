use super::{BucketRules, TimelineLabel};
use crate::prelude::*;
use crate::{BucketKey, Calendar, DatePeriod, GranularityType, SHORT_MONTH_NAMES};

pub(super) fn short_month_name(date: NaiveDate) -> &'static str {
    SHORT_MONTH_NAMES[date.month0() as usize]
}

/// Gregorian months, keyed `[short month, fiscal year]`. A fiscal year starting
/// mid-month splits that month in two.
pub(super) struct MonthRules;

impl BucketRules for MonthRules {
    fn kind(&self) -> GranularityType {
        GranularityType::Month
    }

    fn split_date(&self, calendar: &Calendar, date: NaiveDate) -> Vec<BucketKey> {
        vec![short_month_name(date).into(), calendar.determine_year(date).into()]
    }

    fn same_label(&self, _calendar: &Calendar, a: &DatePeriod, b: &DatePeriod) -> bool {
        a.year == b.year && short_month_name(a.start_date) == short_month_name(b.start_date)
    }

    fn generate_label(&self, calendar: &Calendar, period: &DatePeriod) -> TimelineLabel {
        let month = short_month_name(period.start_date);
        let title = format!("{month} {}", calendar.label_year(period.year));
        TimelineLabel::new(title, month, period.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_granularity, date, standard_calendar};

    #[test]
    fn test_mid_month_fiscal_start_splits_month() {
        let calendar = standard_calendar(3, 15, 0);
        let months = build_granularity(
            GranularityType::Month,
            &calendar,
            date(2020, 4, 1),
            date(2020, 5, 31),
        );
        let periods = months.date_periods();

        assert_eq!(periods.len(), 3);
        assert_eq!(
            periods[0].identifier_array,
            vec![BucketKey::from("Apr"), BucketKey::from(2019)],
        );
        assert_eq!(periods[0].end_date, date(2020, 4, 15));
        assert_eq!(
            periods[1].identifier_array,
            vec![BucketKey::from("Apr"), BucketKey::from(2020)],
        );
        assert_eq!(
            periods[2].identifier_array,
            vec![BucketKey::from("May"), BucketKey::from(2020)],
        );
    }

    #[test]
    fn test_label() {
        let calendar = standard_calendar(0, 1, 0);
        let months = build_granularity(
            GranularityType::Month,
            &calendar,
            date(2020, 1, 1),
            date(2020, 2, 29),
        );
        let label = MonthRules.generate_label(&calendar, &months.date_periods()[1]);

        assert_eq!(label.text, "Feb");
        assert_eq!(label.title, "Feb 2020");
        assert_eq!(label.id, 1.0);
    }

    #[test]
    fn test_same_label_for_days() {
        let calendar = standard_calendar(0, 1, 0);
        let days = build_granularity(
            GranularityType::Day,
            &calendar,
            date(2020, 1, 30),
            date(2020, 2, 2),
        );
        let periods = days.date_periods();

        assert!(MonthRules.same_label(&calendar, &periods[0], &periods[1]));
        assert!(!MonthRules.same_label(&calendar, &periods[1], &periods[2]));

        let labels = days.create_labels(&calendar, GranularityType::Month);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].id, 2.0);
    }
}
