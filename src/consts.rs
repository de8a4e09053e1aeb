/// Canonical separator of slashed dates (`YYYY/MM/DD`)
pub const DATE_SEPARATOR: char = '/';
/// Canonical separator of ISO dates (`YYYY-MM-DD`)
pub const ISO_DATE_SEPARATOR: char = '-';
/// Canonical separator of times (`hh:mm:ss`)
pub const TIME_SEPARATOR: char = ':';

/// Characters accepted in place of the separator while typing a slashed date
pub const DATE_INPUT_SEPARATORS: [char; 3] = ['-', '.', ' '];
/// Characters accepted in place of the separator while typing an ISO date
pub const ISO_DATE_INPUT_SEPARATORS: [char; 3] = ['/', '.', ' '];
/// Characters accepted in place of the separator while typing a time
pub const TIME_INPUT_SEPARATORS: [char; 2] = ['.', ' '];

/// Widest segment the engine accepts; keeps every segment value inside `u32`
pub const MAX_SEGMENT_LENGTH: usize = 9;

/// Maximum valid year (inclusive)
pub const MAX_YEAR: u32 = 9999;
/// Year used when a date is completed without one
pub const DEFAULT_YEAR: u32 = 2000;
/// Digits in a year segment
pub const YEAR_LENGTH: usize = 4;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;
/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;

/// First day of month
pub const MIN_DAY: u8 = 1;
/// Upper bound of a day before its year and month are known
pub const MAX_DAY: u8 = 31;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
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

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Last valid hour of a 24 hour clock
pub const MAX_HOUR: u32 = 23;
/// Last valid minute or second
pub const MAX_MINUTE: u32 = 59;
/// Digits in every time segment
pub const TIME_SEGMENT_LENGTH: usize = 2;
