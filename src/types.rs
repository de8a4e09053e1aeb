use crate::MaskError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_DAY, MAX_MONTH, MAX_SEGMENT_LENGTH,
};
use crate::prelude::*;
use std::fmt;
use std::sync::Arc;

/// Upper bound of a segment computed from the whole value being edited,
/// e.g. the number of days in the month typed so far.
#[derive(Clone)]
pub struct ComputeMax(Arc<dyn Fn(&str) -> u32 + Send + Sync>);

impl ComputeMax {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> u32 + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Days in the month held by the `month` segment of the year held by the
    /// `year` segment. Each pair is `(segment index, segment length)`.
    ///
    /// Until the month is complete the bound is 31. Once the month is known
    /// but the year is not, February allows 29 days.
    pub fn days_in_month(separator: char, year: (usize, usize), month: (usize, usize)) -> Self {
        Self::new(move |value| {
            let parts: Vec<&str> = value.split(separator).collect();
            let complete = |(index, length): (usize, usize)| {
                parts
                    .get(index)
                    .filter(|part| part.len() == length)
                    .and_then(|part| parse_digits(part))
            };

            let Some(month) = complete(month)
                .and_then(|m| u8::try_from(m).ok())
                .filter(|m| (1..=MAX_MONTH).contains(m))
            else {
                return u32::from(MAX_DAY);
            };
            let days = match complete(year).and_then(|y| u16::try_from(y).ok()) {
                Some(year) => days_in_month(year, month),
                None if month == FEBRUARY => FEBRUARY_DAYS_LEAP,
                None => DAYS_IN_MONTH[month as usize],
            };
            u32::from(days)
        })
    }

    #[inline]
    pub fn eval(&self, value: &str) -> u32 {
        (self.0)(value)
    }
}

impl fmt::Debug for ComputeMax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ComputeMax(..)")
    }
}

/// Inclusive upper bound of a segment.
#[derive(Debug, Clone, From)]
pub enum MaxValue {
    Fixed(u32),
    Computed(ComputeMax),
}

impl MaxValue {
    /// Resolves the bound against the full value being edited.
    pub fn resolve(&self, value: &str) -> u32 {
        match self {
            Self::Fixed(max) => *max,
            Self::Computed(max) => max.eval(value),
        }
    }
}

/// Description of one numeric field of a mask, before it is placed.
#[derive(Debug, Clone)]
pub struct SegmentSpec {
    pub min: u32,
    pub max: MaxValue,
    pub length: usize,
    /// Used when auto-completing; falls back to `min`.
    pub default: Option<u32>,
}

impl SegmentSpec {
    pub fn new(min: u32, max: MaxValue, length: usize) -> Self {
        Self {
            min,
            max,
            length,
            default: None,
        }
    }

    /// Segment bounded by a constant.
    pub fn fixed(min: u32, max: u32, length: usize) -> Self {
        Self::new(min, MaxValue::Fixed(max), length)
    }

    /// Segment bounded by a function of the whole value.
    pub fn computed(min: u32, max: ComputeMax, length: usize) -> Self {
        Self::new(min, MaxValue::Computed(max), length)
    }

    #[must_use]
    pub const fn with_default(mut self, default: u32) -> Self {
        self.default = Some(default);
        self
    }

    /// Checks the spec of the segment at `index`.
    ///
    /// # Errors
    /// Returns a `MaskError` when the length is outside `1..=MAX_SEGMENT_LENGTH`,
    /// the bounds are inverted or wider than the segment, or the default does
    /// not fit the segment.
    pub fn validate(&self, index: usize) -> Result<(), MaskError> {
        if self.length == 0 {
            return Err(MaskError::ZeroLengthSegment { index });
        }
        if self.length > MAX_SEGMENT_LENGTH {
            return Err(MaskError::SegmentTooLong {
                index,
                length: self.length,
            });
        }

        let widest = widest(self.length);
        let max = match self.max {
            MaxValue::Fixed(max) => max,
            MaxValue::Computed(_) => widest,
        };
        if self.min > max || max > widest {
            return Err(MaskError::InvalidBounds {
                index,
                min: self.min,
                max,
            });
        }

        match self.default {
            Some(default) if default > widest => Err(MaskError::InvalidDefault { index, default }),
            _ => Ok(()),
        }
    }
}

/// A segment placed at its character offsets inside the masked value.
#[derive(Debug, Clone)]
pub struct Segment {
    spec:  SegmentSpec,
    start: usize,
}

impl Segment {
    pub(crate) const fn place(spec: SegmentSpec, start: usize) -> Self {
        Self { spec, start }
    }

    /// Offset of the first digit
    #[inline]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Offset one past the last digit
    #[inline]
    pub const fn end(&self) -> usize {
        self.start + self.spec.length
    }

    #[inline]
    pub const fn length(&self) -> usize {
        self.spec.length
    }

    #[inline]
    pub const fn min(&self) -> u32 {
        self.spec.min
    }

    /// Upper bound for `value`, never below `min` nor wider than the segment.
    pub fn max(&self, value: &str) -> u32 {
        self.spec
            .max
            .resolve(value)
            .clamp(self.spec.min, widest(self.spec.length))
    }

    pub fn default_value(&self) -> u32 {
        self.spec.default.unwrap_or(self.spec.min)
    }

    pub fn contains(&self, number: u32, value: &str) -> bool {
        number >= self.min() && number <= self.max(value)
    }

    pub fn clamp(&self, number: u32, value: &str) -> u32 {
        number.clamp(self.min(), self.max(value))
    }

    /// Whether the digits typed so far can still be completed into range.
    pub(crate) fn can_complete(&self, partial: &str, value: &str) -> bool {
        let Some(typed) = parse_digits(partial) else {
            return false;
        };
        let missing = pow10(self.length().saturating_sub(partial.len()));
        let lowest = typed * missing;
        let highest = lowest + (missing - 1);
        lowest <= self.max(value) && highest >= self.min()
    }

    /// Zero-padded to the segment width.
    pub(crate) fn pad(&self, number: u32) -> String {
        format!("{number:0width$}", width = self.length())
    }

    /// Completes a partially typed segment with the leading digits of the
    /// padded default, so `"24"` in a year defaulting to 2000 becomes `"2024"`.
    pub(crate) fn pad_with_default(&self, partial: &str) -> String {
        let typed = partial.chars().count();
        if typed >= self.length() {
            return partial.to_owned();
        }
        let default = self.pad(self.default_value());
        let mut padded = default[..self.length() - typed].to_owned();
        padded.push_str(partial);
        padded
    }
}

/// Parses a non-empty run of ASCII digits.
pub(crate) fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

pub(crate) const fn pow10(exp: usize) -> u32 {
    let mut n = 1;
    let mut i = 0;
    while i < exp {
        n *= 10;
        i += 1;
    }
    n
}

/// Largest number that fits `length` digits
const fn widest(length: usize) -> u32 {
    pow10(length) - 1
}

// Calendar helpers

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_max() -> ComputeMax {
        ComputeMax::days_in_month('/', (0, 4), (1, 2))
    }

    #[test]
    fn test_segment_spec_validate_ok() {
        assert!(SegmentSpec::fixed(0, 23, 2).validate(0).is_ok());
        assert!(SegmentSpec::computed(1, day_max(), 2).validate(2).is_ok());
        assert!(SegmentSpec::fixed(0, 9999, 4).with_default(2000).validate(0).is_ok());
    }

    #[test]
    fn test_segment_spec_validate_zero_length() {
        let result = SegmentSpec::fixed(0, 0, 0).validate(3);
        assert!(matches!(result, Err(MaskError::ZeroLengthSegment { index: 3 })));
    }

    #[test]
    fn test_segment_spec_validate_too_long() {
        let result = SegmentSpec::fixed(0, 1, 10).validate(0);
        assert!(matches!(
            result,
            Err(MaskError::SegmentTooLong {
                index: 0,
                length: 10
            })
        ));
    }

    #[test]
    fn test_segment_spec_validate_bounds() {
        // inverted
        let result = SegmentSpec::fixed(5, 4, 2).validate(1);
        assert!(matches!(
            result,
            Err(MaskError::InvalidBounds {
                index: 1,
                min: 5,
                max: 4
            })
        ));

        // max does not fit two digits
        let result = SegmentSpec::fixed(0, 100, 2).validate(0);
        assert!(matches!(result, Err(MaskError::InvalidBounds { .. })));

        // min does not fit two digits, even with a computed max
        let result = SegmentSpec::computed(100, day_max(), 2).validate(0);
        assert!(matches!(result, Err(MaskError::InvalidBounds { .. })));
    }

    #[test]
    fn test_segment_spec_validate_default() {
        let result = SegmentSpec::fixed(0, 59, 2).with_default(100).validate(1);
        assert!(matches!(
            result,
            Err(MaskError::InvalidDefault {
                index: 1,
                default: 100
            })
        ));
    }

    #[test]
    fn test_segment_offsets() {
        let segment = Segment::place(SegmentSpec::fixed(1, 12, 2), 5);
        assert_eq!(segment.start(), 5);
        assert_eq!(segment.end(), 7);
        assert_eq!(segment.length(), 2);
        assert_eq!(segment.default_value(), 1);
    }

    #[test]
    fn test_segment_pad() {
        let segment = Segment::place(SegmentSpec::fixed(0, 9999, 4).with_default(2000), 0);
        assert_eq!(segment.pad(7), "0007");
        assert_eq!(segment.pad_with_default("24"), "2024");
        assert_eq!(segment.pad_with_default("2"), "2002");
        assert_eq!(segment.pad_with_default(""), "2000");
        assert_eq!(segment.pad_with_default("1999"), "1999");

        let month = Segment::place(SegmentSpec::fixed(1, 12, 2), 5);
        assert_eq!(month.pad_with_default("1"), "01");
        assert_eq!(month.pad_with_default(""), "01");
    }

    #[test]
    fn test_segment_can_complete() {
        let hour = Segment::place(SegmentSpec::fixed(0, 23, 2), 0);
        assert!(hour.can_complete("2", ""));
        assert!(hour.can_complete("0", ""));
        assert!(!hour.can_complete("3", ""));
        assert!(!hour.can_complete("x", ""));

        let month = Segment::place(SegmentSpec::fixed(1, 12, 2), 5);
        assert!(month.can_complete("0", ""));
        assert!(month.can_complete("1", ""));
        assert!(!month.can_complete("2", ""));
    }

    #[test]
    fn test_segment_max_is_clamped() {
        let segment = Segment::place(SegmentSpec::computed(5, ComputeMax::new(|_| 3), 2), 0);
        assert_eq!(segment.max(""), 5);

        let segment = Segment::place(SegmentSpec::computed(0, ComputeMax::new(|_| 500), 2), 0);
        assert_eq!(segment.max(""), 99);
    }

    #[test]
    fn test_days_in_month_max() {
        let max = day_max();
        assert_eq!(max.eval(""), 31);
        assert_eq!(max.eval("2025"), 31);
        assert_eq!(max.eval("2025/0"), 31);
        assert_eq!(max.eval("2025/02"), 28);
        assert_eq!(max.eval("2024/02/"), 29);
        assert_eq!(max.eval("2025/04/3"), 30);
        assert_eq!(max.eval("20/02"), 29, "unknown year allows a leap day");
        assert_eq!(max.eval("2025/13"), 31, "invalid month falls back");
    }

    #[test]
    fn test_parse_digits() {
        assert_eq!(parse_digits("007"), Some(7));
        assert_eq!(parse_digits(""), None);
        assert_eq!(parse_digits("+7"), None);
        assert_eq!(parse_digits("1a"), None);
    }

    #[test]
    fn test_is_leap_year_cases() {
        struct TestCase {
            year: u16,
            is_leap: bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year: 2024,
                is_leap: true,
                description: "divisible by 4",
            },
            TestCase {
                year: 2025,
                is_leap: false,
                description: "not divisible by 4",
            },
            TestCase {
                year: 1900,
                is_leap: false,
                description: "century not divisible by 400",
            },
            TestCase {
                year: 2000,
                is_leap: true,
                description: "divisible by 400",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description,
            );
        }
    }

    #[test]
    fn test_days_in_month_february() {
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28, "Century year not divisible by 400");
        assert_eq!(days_in_month(2000, 2), 29, "Century year divisible by 400");
    }

    #[test]
    fn test_days_in_month_30_day_months() {
        for month in [4, 6, 9, 11] {
            assert_eq!(days_in_month(2024, month), 30, "Month {month} should have 30 days");
        }
    }
}
