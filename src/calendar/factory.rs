use super::Calendar;
use crate::{
    CalendarSettings, TimelineSettings, WeekDaySettings, WeekStandard, WeekStandardSettings,
};

/// Picks the calendar variant for a week standard.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarFactory;

impl CalendarFactory {
    pub fn create(
        week_standard: &WeekStandardSettings,
        calendar: &CalendarSettings,
        week_day: &WeekDaySettings,
    ) -> Calendar {
        match week_standard.standard {
            WeekStandard::NotSet => Calendar::new(calendar, week_day),
            WeekStandard::Iso8601 => Calendar::iso8601(calendar, week_day),
        }
    }

    pub fn from_settings(settings: &TimelineSettings) -> Calendar {
        Self::create(&settings.week_standard, &settings.calendar, &settings.week_day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_create_selects_variant() {
        let calendar = CalendarSettings::default();
        let week_day = WeekDaySettings::default();

        let standard =
            CalendarFactory::create(&WeekStandardSettings::default(), &calendar, &week_day);
        assert_eq!(standard.week_standard(), WeekStandard::NotSet);
        assert_eq!(standard.date_of_first_week(2021), date(2021, 1, 1));

        let iso = CalendarFactory::create(
            &WeekStandardSettings::new(WeekStandard::Iso8601),
            &calendar,
            &week_day,
        );
        assert_eq!(iso.week_standard(), WeekStandard::Iso8601);
        assert_eq!(iso.date_of_first_week(2021), date(2021, 1, 4));
    }

    #[test]
    fn test_from_settings() {
        let json = r#"{ "weekStandard": { "standard": "ISO8601" } }"#;
        let settings = TimelineSettings::from_json(json).unwrap();
        let calendar = CalendarFactory::from_settings(&settings);

        assert_eq!(calendar.week_standard(), WeekStandard::Iso8601);
        assert!(
            !calendar.is_changed(&settings.calendar, &settings.week_day, &settings.week_standard),
        );
    }
}
