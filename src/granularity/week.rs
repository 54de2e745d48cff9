use super::{BucketRules, TimelineLabel};
use crate::prelude::*;
use crate::{BucketKey, Calendar, DatePeriod, GranularityType};

/// Weeks, keyed `[week number, week year]` as the calendar numbers them.
pub(super) struct WeekRules;

impl BucketRules for WeekRules {
    fn kind(&self) -> GranularityType {
        GranularityType::Week
    }

    fn split_date(&self, calendar: &Calendar, date: NaiveDate) -> Vec<BucketKey> {
        let week = calendar.determine_week(date);
        let number = i32::try_from(week.number).unwrap_or(i32::MAX);
        vec![number.into(), week.year.into()]
    }

    fn same_label(&self, _calendar: &Calendar, a: &DatePeriod, b: &DatePeriod) -> bool {
        a.week == b.week
    }

    fn generate_label(&self, calendar: &Calendar, period: &DatePeriod) -> TimelineLabel {
        let text = format!("W{}", period.week.number);
        let title = format!("{text} - {}", calendar.label_year(period.week.year));
        TimelineLabel::new(title, text, period.index)
    }
}
