use super::month::short_month_name;
use super::{BucketRules, TimelineLabel};
use crate::prelude::*;
use crate::{BucketKey, Calendar, DatePeriod, GranularityType};

pub(super) struct DayRules;

impl BucketRules for DayRules {
    fn kind(&self) -> GranularityType {
        GranularityType::Day
    }

    fn split_date(&self, calendar: &Calendar, date: NaiveDate) -> Vec<BucketKey> {
        let day = i32::try_from(date.day()).unwrap_or(i32::MAX);
        vec![
            short_month_name(date).into(),
            day.into(),
            calendar.determine_year(date).into(),
        ]
    }

    fn same_label(&self, _calendar: &Calendar, a: &DatePeriod, b: &DatePeriod) -> bool {
        a.start_date == b.start_date
    }

    fn generate_label(&self, _calendar: &Calendar, period: &DatePeriod) -> TimelineLabel {
        let date = period.start_date;
        let title = format!("{} {} {}", short_month_name(date), date.day(), date.year());
        TimelineLabel::new(title, date.day().to_string(), period.index)
    }
}
