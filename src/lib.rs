mod adapter;
mod config;
mod consts;
mod edit;
mod prelude;
mod types;

pub use adapter::{EventOutcome, InputEvent, MaskedInput, Selection};
pub use config::{DateFormat, DateGranularity, InputPolicy, MaskConfig, MaxConfig, SegmentConfig, TimeFormat};
pub use consts::*;
pub use edit::{EditResult, on_backspace, on_digit_or_separator_key, on_enter, on_paste, paste};
pub use types::{ComputeMax, MaxValue, Segment, SegmentSpec, days_in_month, is_leap_year};

use serde::Deserialize;
use std::fmt;
use types::parse_digits;

/// Errors raised while building a mask.
///
/// Edited values never produce errors; malformed input is trimmed or
/// clamped instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MaskError {
    /// A mask without segments.
    #[error("A mask needs at least one segment")]
    EmptySegments,

    /// A segment with no digits.
    #[error("Segment {index} has zero length")]
    ZeroLengthSegment { index: usize },

    /// A segment whose values would not fit in `u32`.
    #[error("Segment {index} is {length} digits long (at most {max} allowed)", max = MAX_SEGMENT_LENGTH)]
    SegmentTooLong { index: usize, length: usize },

    /// Inverted bounds, or bounds wider than the segment.
    #[error("Segment {index} has invalid bounds {min}..={max}")]
    InvalidBounds { index: usize, min: u32, max: u32 },

    /// A default value wider than the segment.
    #[error("Segment {index} default {default} does not fit the segment")]
    InvalidDefault { index: usize, default: u32 },

    /// The canonical separator must be a single byte.
    #[error("Separator {0:?} is not ASCII")]
    NonAsciiSeparator(char),

    /// Digits cannot separate segments.
    #[error("Digit {0:?} cannot be used as a separator")]
    DigitSeparator(char),

    /// A computed bound referring to a segment that does not exist.
    #[error("Segment {index} refers to missing segment {reference}")]
    UnknownSegmentReference { index: usize, reference: usize },
}

/// A mask of fixed-width numeric segments joined by a separator, e.g.
/// `YYYY/MM/DD` or `hh:mm`.
///
/// Values handled by the mask are prefixes of a fully padded value such as
/// `"2024/0"`. Every operation is a pure function of its arguments.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "MaskConfig")]
pub struct MaskFormat {
    separator:        char,
    input_separators: Vec<char>,
    segments:         Vec<Segment>,
    // segment index for every character offset, `None` on separator slots
    positions:        Vec<Option<usize>>,
}

impl MaskFormat {
    /// Builds a mask from its segments.
    ///
    /// `input_separators` are accepted while typing in place of `separator`,
    /// which is always accepted as well.
    ///
    /// # Errors
    /// Returns a `MaskError` when there are no segments, a segment is
    /// malformed, or a separator is a digit or not ASCII.
    pub fn new(
        separator: char,
        input_separators: impl IntoIterator<Item = char>,
        segments: impl IntoIterator<Item = SegmentSpec>,
    ) -> Result<Self, MaskError> {
        if !separator.is_ascii() {
            return Err(MaskError::NonAsciiSeparator(separator));
        }
        let input_separators: Vec<char> = input_separators.into_iter().collect();
        if let Some(digit) = std::iter::once(separator)
            .chain(input_separators.iter().copied())
            .find(char::is_ascii_digit)
        {
            return Err(MaskError::DigitSeparator(digit));
        }

        let segments: Vec<SegmentSpec> = segments.into_iter().collect();
        if segments.is_empty() {
            return Err(MaskError::EmptySegments);
        }
        for (index, spec) in segments.iter().enumerate() {
            spec.validate(index)?;
        }

        Ok(Self::assemble(separator, input_separators, segments))
    }

    /// Places already validated segments and builds the position map.
    pub(crate) fn assemble(
        separator: char,
        input_separators: impl IntoIterator<Item = char>,
        specs: Vec<SegmentSpec>,
    ) -> Self {
        let mut accepted = vec![separator];
        for c in input_separators {
            if !accepted.contains(&c) {
                accepted.push(c);
            }
        }

        let count = specs.len();
        let mut segments = Vec::with_capacity(count);
        let mut positions = Vec::new();
        let mut start = 0;
        for (index, spec) in specs.into_iter().enumerate() {
            let segment = Segment::place(spec, start);
            positions.extend(std::iter::repeat_n(Some(index), segment.length()));
            start = segment.end();
            if index + 1 < count {
                positions.push(None);
                start += 1;
            }
            segments.push(segment);
        }

        Self {
            separator,
            input_separators: accepted,
            segments,
            positions,
        }
    }

    /// The canonical separator written into values
    #[inline]
    pub const fn separator(&self) -> char {
        self.separator
    }

    /// Every separator accepted on input, the canonical one first
    pub fn input_separators(&self) -> &[char] {
        &self.input_separators
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment owning the character offset, `None` on separators and past the end
    pub fn segment_at(&self, position: usize) -> Option<&Segment> {
        self.positions
            .get(position)
            .copied()
            .flatten()
            .map(|index| &self.segments[index])
    }

    /// Length of a complete value, separators included.
    #[inline]
    pub fn max_length(&self) -> usize {
        self.positions.len()
    }

    /// Whether `c` is the canonical separator or one of its alternates.
    pub fn is_separator(&self, c: char) -> bool {
        self.input_separators.contains(&c)
    }

    /// Whether the offset falls on a separator slot.
    pub fn is_cursor_at_separator(&self, position: usize) -> bool {
        position > 0 && position < self.max_length() && self.positions[position].is_none()
    }

    /// Whether the offset is the first digit of a segment.
    pub fn is_segment_start(&self, position: usize) -> bool {
        position == 0 || self.is_cursor_at_separator(position - 1)
    }

    /// Whether `value` is an acceptable prefix of a complete value.
    ///
    /// Every segment but the last must be complete and in range. The last
    /// one may be empty, or partially typed as long as it can still be
    /// completed into range.
    pub fn is_valid(&self, value: &str) -> bool {
        let parts: Vec<&str> = value.split(self.separator).collect();
        if parts.len() > self.segments.len() {
            return false;
        }

        let last = parts.len() - 1;
        parts
            .iter()
            .zip(&self.segments)
            .enumerate()
            .all(|(index, (part, segment))| {
                if part.is_empty() {
                    // only a trailing separator may leave a segment empty
                    return index == last;
                }
                if !part.bytes().all(|b| b.is_ascii_digit()) || part.len() > segment.length() {
                    return false;
                }
                if part.len() < segment.length() {
                    return index == last && segment.can_complete(part, value);
                }
                parse_digits(part).is_some_and(|number| segment.contains(number, value))
            })
    }

    /// Appends the separator if the result stays valid.
    pub fn try_append_separator(&self, value: &str) -> String {
        let mut appended = String::with_capacity(value.len() + 1);
        appended.push_str(value);
        appended.push(self.separator);
        if self.is_valid(&appended) {
            appended
        } else {
            value.to_owned()
        }
    }

    /// Longest valid prefix of `value`, followed by a separator when the
    /// last segment is complete.
    pub fn get_valid_value(&self, value: &str) -> String {
        // nothing longer than the mask can be valid
        let mut candidate: String = value.chars().take(self.max_length()).collect();
        loop {
            if self.is_valid(&candidate) {
                return self.try_append_separator(&candidate);
            }
            if candidate.pop().is_none() {
                return String::new();
            }
        }
    }

    /// Clamps every complete segment into its bounds.
    ///
    /// Segments are corrected left to right, so a day is checked against the
    /// month as corrected.
    pub fn correct_min_max_values(&self, value: &str) -> String {
        let mut corrected = value.to_owned();
        for segment in &self.segments {
            let Some(number) = corrected
                .get(segment.start()..segment.end())
                .and_then(parse_digits)
            else {
                continue;
            };
            let clamped = segment.clamp(number, &corrected);
            if clamped != number {
                corrected.replace_range(segment.start()..segment.end(), &segment.pad(clamped));
            }
        }
        corrected
    }

    /// Completes a partial value: the trailing segment is padded with the
    /// leading digits of its default, missing segments take their defaults,
    /// and the result is clamped.
    ///
    /// Complete valid values are returned unchanged.
    pub fn auto_complete(&self, value: &str) -> String {
        let parts: Vec<&str> = value.split(self.separator).collect();
        let last = parts.len() - 1;

        let mut completed = String::with_capacity(self.max_length());
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                completed.push(self.separator);
            }
            match parts.get(index) {
                Some(part) if index < last => completed.push_str(part),
                Some(part) => completed.push_str(&segment.pad_with_default(part)),
                None => completed.push_str(&segment.pad(segment.default_value())),
            }
        }
        self.correct_min_max_values(&completed)
    }
}

impl fmt::Display for MaskFormat {
    /// Placeholder of the mask, one `#` per digit.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                write!(f, "{}", self.separator)?;
            }
            write!(f, "{:#<width$}", "", width = segment.length())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> MaskFormat {
        MaskFormat::date(DateFormat::Slashed, DateGranularity::Day)
    }

    fn time() -> MaskFormat {
        MaskFormat::time(TimeFormat::HoursMinutes)
    }

    #[test]
    fn test_new_rejects_empty_segments() {
        let result = MaskFormat::new('/', [], []);
        assert!(matches!(result, Err(MaskError::EmptySegments)));
    }

    #[test]
    fn test_new_rejects_bad_separators() {
        let result = MaskFormat::new('→', [], [SegmentSpec::fixed(0, 9, 1)]);
        assert!(matches!(result, Err(MaskError::NonAsciiSeparator('→'))));

        let result = MaskFormat::new(':', ['5'], [SegmentSpec::fixed(0, 9, 1)]);
        assert!(matches!(result, Err(MaskError::DigitSeparator('5'))));
    }

    #[test]
    fn test_new_reports_segment_index() {
        let result = MaskFormat::new(
            ':',
            [],
            [SegmentSpec::fixed(0, 23, 2), SegmentSpec::fixed(0, 59, 0)],
        );
        assert!(matches!(result, Err(MaskError::ZeroLengthSegment { index: 1 })));
    }

    #[test]
    fn test_error_messages() {
        let err = MaskError::SegmentTooLong {
            index: 2,
            length: 12,
        };
        assert_eq!(err.to_string(), "Segment 2 is 12 digits long (at most 9 allowed)");
        assert_eq!(MaskError::EmptySegments.to_string(), "A mask needs at least one segment");
    }

    #[test]
    fn test_positions() {
        let mask = date();
        assert_eq!(mask.max_length(), 10);
        assert_eq!(mask.segment_at(0).map(Segment::start), Some(0));
        assert_eq!(mask.segment_at(3).map(Segment::start), Some(0));
        assert!(mask.segment_at(4).is_none());
        assert_eq!(mask.segment_at(6).map(Segment::start), Some(5));
        assert_eq!(mask.segment_at(9).map(Segment::end), Some(10));
        assert!(mask.segment_at(10).is_none());
    }

    #[test]
    fn test_cursor_queries() {
        let mask = date();
        assert!(!mask.is_cursor_at_separator(0));
        assert!(mask.is_cursor_at_separator(4));
        assert!(mask.is_cursor_at_separator(7));
        assert!(!mask.is_cursor_at_separator(8));
        assert!(!mask.is_cursor_at_separator(10));

        assert!(mask.is_segment_start(0));
        assert!(mask.is_segment_start(5));
        assert!(mask.is_segment_start(8));
        assert!(!mask.is_segment_start(4));
        assert!(!mask.is_segment_start(6));
    }

    #[test]
    fn test_is_separator() {
        let mask = date();
        for c in ['/', '-', '.', ' '] {
            assert!(mask.is_separator(c), "{c:?} should be a separator");
        }
        assert!(!mask.is_separator(':'));
        assert!(!mask.is_separator('1'));
        assert_eq!(mask.input_separators()[0], '/');
    }

    #[test]
    fn test_is_valid_prefixes() {
        let mask = date();
        assert!(mask.is_valid(""));
        assert!(mask.is_valid("2"));
        assert!(mask.is_valid("2025"));
        assert!(mask.is_valid("2025/"));
        assert!(mask.is_valid("2025/0"));
        assert!(mask.is_valid("2025/1"));
        assert!(mask.is_valid("2025/12/"));
        assert!(mask.is_valid("2025/02/2"));
        assert!(mask.is_valid("2025/02/28"));
    }

    #[test]
    fn test_is_valid_rejects() {
        let mask = date();
        assert!(!mask.is_valid("/"));
        assert!(!mask.is_valid("//"));
        assert!(!mask.is_valid("202/"), "incomplete inner segment");
        assert!(!mask.is_valid("20255"), "too many digits");
        assert!(!mask.is_valid("2025/13"));
        assert!(!mask.is_valid("2025/00"));
        assert!(!mask.is_valid("2025/2"), "month cannot reach 20");
        assert!(!mask.is_valid("2025/02/29"), "not a leap year");
        assert!(!mask.is_valid("2025/02/3"));
        assert!(!mask.is_valid("2025/01/01/"));
        assert!(!mask.is_valid("2025/a"));
        assert!(!mask.is_valid("2025/+1"));
    }

    #[test]
    fn test_is_valid_leap_day() {
        let mask = date();
        assert!(mask.is_valid("2024/02/29"));
        assert!(mask.is_valid("2000/02/29"));
        assert!(!mask.is_valid("1900/02/29"));
    }

    #[test]
    fn test_is_valid_time() {
        let mask = time();
        assert!(mask.is_valid("2"));
        assert!(!mask.is_valid("3"));
        assert!(mask.is_valid("23:5"));
        assert!(!mask.is_valid("24"));
        assert!(!mask.is_valid("23:6"));
        assert!(mask.is_valid("23:59"));
    }

    #[test]
    fn test_get_valid_value() {
        let mask = date();
        assert_eq!(mask.get_valid_value("2025/13"), "2025/1");
        assert_eq!(mask.get_valid_value("2025"), "2025/");
        assert_eq!(mask.get_valid_value("2025/"), "2025/");
        assert_eq!(mask.get_valid_value("2025/02/30"), "2025/02/");
        assert_eq!(mask.get_valid_value("2025/02/28"), "2025/02/28");
        assert_eq!(mask.get_valid_value("2025/02/281"), "2025/02/28");
        assert_eq!(mask.get_valid_value("x"), "");
        assert_eq!(mask.get_valid_value(""), "");

        let time = time();
        assert_eq!(time.get_valid_value("99"), "");
        assert_eq!(time.get_valid_value("2"), "2");
        assert_eq!(time.get_valid_value("12"), "12:");
    }

    #[test]
    fn test_get_valid_value_long_input() {
        let mask = date();
        assert_eq!(mask.get_valid_value(&"1".repeat(100_000)), "1111/");
        assert_eq!(mask.get_valid_value(&format!("2024/02/29{}", "é".repeat(50_000))), "2024/02/29");
    }

    #[test]
    fn test_correct_min_max_values() {
        let mask = date();
        assert_eq!(mask.correct_min_max_values("2025/13/01"), "2025/12/01");
        assert_eq!(mask.correct_min_max_values("2025/00"), "2025/01");
        assert_eq!(mask.correct_min_max_values("2025/02/31"), "2025/02/28");
        assert_eq!(mask.correct_min_max_values("2024/02/31"), "2024/02/29");
        assert_eq!(mask.correct_min_max_values("2025/1"), "2025/1");
        // the day is clamped against the corrected month
        assert_eq!(mask.correct_min_max_values("2025/14/31"), "2025/12/31");

        let time = time();
        assert_eq!(time.correct_min_max_values("25:61"), "23:59");
    }

    #[test]
    fn test_auto_complete() {
        let mask = date();
        assert_eq!(mask.auto_complete("2025"), "2025/01/01");
        assert_eq!(mask.auto_complete(""), "2000/01/01");
        assert_eq!(mask.auto_complete("2024/1"), "2024/01/01");
        assert_eq!(mask.auto_complete("24"), "2024/01/01");
        assert_eq!(mask.auto_complete("2024/02/"), "2024/02/01");
        assert_eq!(mask.auto_complete("2024/0"), "2024/01/01");
        assert_eq!(mask.auto_complete("2024/02/29"), "2024/02/29");
    }

    #[test]
    fn test_auto_complete_time() {
        let mask = time();
        assert_eq!(mask.auto_complete("9"), "09:00");
        assert_eq!(mask.auto_complete("12:"), "12:00");
        assert_eq!(mask.auto_complete("12:3"), "12:03");
    }

    #[test]
    fn test_display_placeholder() {
        assert_eq!(date().to_string(), "####/##/##");
        assert_eq!(MaskFormat::time(TimeFormat::HoursMinutesSeconds).to_string(), "##:##:##");
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MaskFormat>();
    }
}
