/// Number of days in a week
pub const DAYS_PER_WEEK: i64 = 7;

/// Number of months in a year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Number of quarters in a year
pub const QUARTERS_PER_YEAR: u32 = 4;

/// Largest valid zero-based month index (December)
pub const MAX_MONTH_INDEX: u8 = 11;

/// Largest valid day of month
pub const MAX_DAY_OF_MONTH: u8 = 31;

/// Largest valid weekday index (Saturday, weeks counted from Sunday)
pub const MAX_WEEKDAY_INDEX: u8 = 6;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Zero-based month index of February
pub const FEBRUARY: u8 = 1;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month, indexed by zero-based month.
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 12] = [
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Month offsets of each quarter relative to the first month of the fiscal year
pub const QUARTER_MONTH_OFFSETS: [u32; 4] = [0, 3, 6, 9];

/// Short English month names, indexed by zero-based month
pub const SHORT_MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Last weekday (counted from Monday) on which Jan 1 may fall and still belong to
/// ISO week 1 of its own year: Thursday
pub const ISO_FIRST_WEEK_LAST_WEEKDAY: u32 = 3;

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Tolerance used when deciding whether a period fraction is whole
pub const FRACTION_EPSILON: f64 = 1e-9;

/// Range separator (ISO 8601 extended format)
pub const RANGE_SEPARATOR: char = '/';
