//! Declarative mask descriptions, input policies and the built-in date and
//! time masks.

use crate::consts::{
    DATE_INPUT_SEPARATORS, DATE_SEPARATOR, DEFAULT_YEAR, ISO_DATE_INPUT_SEPARATORS,
    ISO_DATE_SEPARATOR, JANUARY, MAX_HOUR, MAX_MINUTE, MAX_MONTH, MAX_YEAR, MIN_DAY,
    TIME_INPUT_SEPARATORS, TIME_SEGMENT_LENGTH, TIME_SEPARATOR, YEAR_LENGTH,
};
use crate::types::{ComputeMax, MaxValue, SegmentSpec};
use crate::{MaskError, MaskFormat};
use serde::{Deserialize, Serialize};

/// How an input reacts to values it cannot accept as typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct InputPolicy {
    /// Clamp out-of-range segments instead of rejecting the edit.
    pub autofix:               bool,
    /// Complete partial values with segment defaults when focus leaves.
    pub auto_complete_on_blur: bool,
}

impl Default for InputPolicy {
    fn default() -> Self {
        Self {
            autofix:               false,
            auto_complete_on_blur: true,
        }
    }
}

/// Upper bound of a configured segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaxConfig {
    Fixed(u32),
    /// Days in the month of the referenced year and month segments.
    DaysInMonth { year: usize, month: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SegmentConfig {
    pub min:     u32,
    pub max:     MaxConfig,
    pub length:  usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<u32>,
}

/// Serialisable description of a mask.
///
/// ```json
/// {
///   "separator": ":",
///   "input_separators": ["."],
///   "segments": [
///     { "min": 0, "max": { "fixed": 23 }, "length": 2 },
///     { "min": 0, "max": { "fixed": 59 }, "length": 2 }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaskConfig {
    pub separator:        char,
    #[serde(default)]
    pub input_separators: Vec<char>,
    pub segments:         Vec<SegmentConfig>,
}

impl TryFrom<MaskConfig> for MaskFormat {
    type Error = MaskError;

    fn try_from(config: MaskConfig) -> Result<Self, Self::Error> {
        let length_of = |index: usize, reference: usize| {
            config
                .segments
                .get(reference)
                .map(|segment| (reference, segment.length))
                .ok_or(MaskError::UnknownSegmentReference { index, reference })
        };

        let specs = config
            .segments
            .iter()
            .enumerate()
            .map(|(index, segment)| -> Result<SegmentSpec, MaskError> {
                let max = match segment.max {
                    MaxConfig::Fixed(max) => MaxValue::from(max),
                    MaxConfig::DaysInMonth { year, month } => MaxValue::from(ComputeMax::days_in_month(
                        config.separator,
                        length_of(index, year)?,
                        length_of(index, month)?,
                    )),
                };
                let spec = SegmentSpec::new(segment.min, max, segment.length);
                Ok(match segment.default {
                    Some(default) => spec.with_default(default),
                    None => spec,
                })
            })
            .collect::<Result<Vec<_>, MaskError>>()?;

        Self::new(config.separator, config.input_separators, specs)
    }
}

/// Order and separators of a date mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateFormat {
    /// `YYYY/MM/DD`
    #[default]
    Slashed,
    /// `YYYY-MM-DD`
    Iso,
}

impl DateFormat {
    pub const fn separator(self) -> char {
        match self {
            Self::Slashed => DATE_SEPARATOR,
            Self::Iso => ISO_DATE_SEPARATOR,
        }
    }

    pub const fn input_separators(self) -> &'static [char] {
        match self {
            Self::Slashed => &DATE_INPUT_SEPARATORS,
            Self::Iso => &ISO_DATE_INPUT_SEPARATORS,
        }
    }
}

/// Smallest unit of a date mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateGranularity {
    #[default]
    Day,
    Month,
}

/// Segments of a time mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// `hh:mm:ss`
    #[default]
    HoursMinutesSeconds,
    /// `hh:mm`
    HoursMinutes,
    /// `hh`
    Hours,
}

impl TimeFormat {
    const fn segment_count(self) -> usize {
        match self {
            Self::HoursMinutesSeconds => 3,
            Self::HoursMinutes => 2,
            Self::Hours => 1,
        }
    }
}

impl MaskFormat {
    /// Date mask: year `0..=9999` defaulting to 2000, month `1..=12` and,
    /// for day granularity, a day bounded by the month entered.
    pub fn date(format: DateFormat, granularity: DateGranularity) -> Self {
        let separator = format.separator();
        let mut segments = vec![
            SegmentSpec::fixed(0, MAX_YEAR, YEAR_LENGTH).with_default(DEFAULT_YEAR),
            SegmentSpec::fixed(u32::from(JANUARY), u32::from(MAX_MONTH), 2),
        ];
        if granularity == DateGranularity::Day {
            let max = ComputeMax::days_in_month(separator, (0, YEAR_LENGTH), (1, 2));
            segments.push(SegmentSpec::computed(u32::from(MIN_DAY), max, 2));
        }
        debug_assert!(segments.iter().enumerate().all(|(i, s)| s.validate(i).is_ok()));

        Self::assemble(separator, format.input_separators().iter().copied(), segments)
    }

    /// Time mask on a 24 hour clock.
    pub fn time(format: TimeFormat) -> Self {
        let segments: Vec<SegmentSpec> = [MAX_HOUR, MAX_MINUTE, MAX_MINUTE]
            .into_iter()
            .take(format.segment_count())
            .map(|max| SegmentSpec::fixed(0, max, TIME_SEGMENT_LENGTH))
            .collect();
        debug_assert!(segments.iter().enumerate().all(|(i, s)| s.validate(i).is_ok()));

        Self::assemble(TIME_SEPARATOR, TIME_INPUT_SEPARATORS, segments)
    }
}
