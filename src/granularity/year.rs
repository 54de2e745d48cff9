use super::{BucketRules, TimelineLabel};
use crate::prelude::*;
use crate::{BucketKey, Calendar, DatePeriod, GranularityType};

/// One bucket per fiscal year.
pub(super) struct YearRules;

impl BucketRules for YearRules {
    fn kind(&self) -> GranularityType {
        GranularityType::Year
    }

    fn split_date(&self, calendar: &Calendar, date: NaiveDate) -> Vec<BucketKey> {
        vec![calendar.determine_year(date).into()]
    }

    fn same_label(&self, _calendar: &Calendar, a: &DatePeriod, b: &DatePeriod) -> bool {
        a.year == b.year
    }

    fn generate_label(&self, calendar: &Calendar, period: &DatePeriod) -> TimelineLabel {
        let year = calendar.label_year(period.year).to_string();
        TimelineLabel::new(year.clone(), year, period.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{build_granularity, date, standard_calendar};

    #[test]
    fn test_years_follow_fiscal_start() {
        let calendar = standard_calendar(6, 1, 0);
        let years = build_granularity(
            GranularityType::Year,
            &calendar,
            date(2019, 1, 1),
            date(2020, 12, 31),
        );
        let periods = years.date_periods();

        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].identifier_array, vec![BucketKey::Number(2018)]);
        assert_eq!(periods[1].start_date, date(2019, 7, 1));
        assert_eq!(periods[1].end_date, date(2020, 7, 1));
        assert_eq!(periods[2].identifier_array, vec![BucketKey::Number(2020)]);
    }

    #[test]
    fn test_label_uses_fiscal_year_end_flag() {
        let mut settings = crate::CalendarSettings::new(
            crate::MonthIndex::new(6).unwrap(),
            crate::DayOfMonth::FIRST,
        );
        settings.treat_as_end_of_fiscal_year = true;
        let calendar = Calendar::new(&settings, &crate::WeekDaySettings::default());
        let years = build_granularity(
            GranularityType::Year,
            &calendar,
            date(2020, 8, 1),
            date(2020, 8, 31),
        );

        let label = YearRules.generate_label(&calendar, &years.date_periods()[0]);
        assert_eq!(label.text, "2021");
        assert_eq!(label.title, "2021");
    }
}
