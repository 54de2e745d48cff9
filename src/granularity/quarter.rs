use super::{BucketRules, TimelineLabel};
use crate::prelude::*;
use crate::{BucketKey, Calendar, DatePeriod, GranularityType};

/// Fiscal quarters, keyed `["Q1".."Q4", fiscal year]`.
pub(super) struct QuarterRules;

impl BucketRules for QuarterRules {
    fn kind(&self) -> GranularityType {
        GranularityType::Quarter
    }

    fn split_date(&self, calendar: &Calendar, date: NaiveDate) -> Vec<BucketKey> {
        let (year, _) = calendar.quarter_index(date);
        vec![calendar.quarter_name(date).into(), year.into()]
    }

    fn same_label(&self, calendar: &Calendar, a: &DatePeriod, b: &DatePeriod) -> bool {
        a.year == b.year
            && calendar.quarter_name(a.start_date) == calendar.quarter_name(b.start_date)
    }

    fn generate_label(&self, calendar: &Calendar, period: &DatePeriod) -> TimelineLabel {
        let quarter = calendar.quarter_name(period.start_date);
        let title = format!("{quarter} {}", calendar.label_year(period.year));
        TimelineLabel::new(title, quarter, period.index)
    }
}
