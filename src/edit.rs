//! Cursor-aware edit handlers.
//!
//! Each handler maps the current value, the selection and one input event to
//! a new value and cursor position. Cursor positions are character offsets.

use crate::MaskFormat;
use crate::prelude::*;
use crate::types::{parse_digits, pow10};
use log::trace;
use serde::{Deserialize, Serialize};

/// Value and cursor position after an edit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize)]
#[display(fmt = "{value:?}@{position}")]
pub struct EditResult {
    pub value:    String,
    pub position: usize,
}

impl EditResult {
    pub fn new(value: impl Into<String>, position: usize) -> Self {
        Self {
            value: value.into(),
            position,
        }
    }
}

/// Handles a digit or separator key.
///
/// A selection is cleared first as by [`on_backspace`]. Other keys leave the
/// value untouched.
pub fn on_digit_or_separator_key(
    format: &MaskFormat,
    value: &str,
    key: char,
    cursor_start: usize,
    cursor_end: usize,
) -> EditResult {
    let (value, start, end) = normalize(format, value, cursor_start, cursor_end);
    if !key.is_ascii_digit() && !format.is_separator(key) {
        return EditResult::new(value, start);
    }

    let cleared = if start == end {
        EditResult::new(value, start)
    } else {
        delete_range(format, &value, start, end)
    };
    process_key(format, &cleared.value, key, cleared.position)
}

/// Handles backspace, for a collapsed cursor or a selection.
pub fn on_backspace(
    format: &MaskFormat,
    value: &str,
    cursor_start: usize,
    cursor_end: usize,
) -> EditResult {
    let (value, start, end) = normalize(format, value, cursor_start, cursor_end);
    if start == end {
        delete_before(format, &value, start)
    } else {
        delete_range(format, &value, start, end)
    }
}

/// Completes the value, leaving the cursor at its end.
pub fn on_enter(format: &MaskFormat, value: &str) -> EditResult {
    if value.is_empty() {
        return EditResult::default();
    }
    let value = format.auto_complete(value);
    let position = value.len();
    EditResult::new(value, position)
}

/// Pastes `text` at the selection and returns the new value.
pub fn on_paste(
    format: &MaskFormat,
    text: &str,
    value: &str,
    cursor_start: usize,
    cursor_end: usize,
) -> String {
    paste(format, text, value, cursor_start, cursor_end).value
}

/// Pastes `text` at the selection, reporting the final cursor as well.
///
/// The pasted characters are typed one by one from the selection start until
/// the cursor reaches the end of the mask. A selection reaching the end of
/// the value is removed first.
pub fn paste(
    format: &MaskFormat,
    text: &str,
    value: &str,
    cursor_start: usize,
    cursor_end: usize,
) -> EditResult {
    let (mut value, start, end) = normalize(format, value, cursor_start, cursor_end);
    if end == value.len() {
        value.truncate(start);
    }

    let mut current = EditResult::new(value, start);
    for key in text.chars() {
        if current.position >= format.max_length() {
            break;
        }
        current = process_key(format, &current.value, key, current.position);
    }

    let at_end = current.position == current.value.len();
    let value = format.try_append_separator(&current.value);
    let position = if at_end { value.len() } else { current.position };
    EditResult::new(value, position)
}

/// Applies one key at a collapsed cursor.
pub(crate) fn process_key(format: &MaskFormat, value: &str, key: char, position: usize) -> EditResult {
    if format.is_separator(key) {
        separator_key(format, value, position)
    } else if let Some(digit) = key.to_digit(10) {
        digit_key(format, value, key, digit, position)
    } else {
        EditResult::new(value, position)
    }
}

fn separator_key(format: &MaskFormat, value: &str, position: usize) -> EditResult {
    if format.is_cursor_at_separator(position) {
        return step_over_separator(format, value.to_owned(), position);
    }
    let Some(segment) = format.segment_at(position) else {
        return EditResult::new(value, position);
    };
    if position == segment.start() {
        return EditResult::new(value, position);
    }

    // complete the segment from the digits typed before the cursor
    let typed = &value[segment.start()..position];
    let mut completed = String::with_capacity(format.max_length());
    completed.push_str(&value[..segment.start()]);
    completed.push_str(&segment.pad_with_default(typed));
    completed.push_str(value.get(segment.end()..).unwrap_or_default());
    trace!("separator completes segment {typed:?} into {completed:?}");

    let completed = format.correct_min_max_values(&completed);
    step_over_separator(format, completed, segment.end())
}

/// Moves the cursor past the separator slot at `position`, writing the
/// separator when the value ends there.
fn step_over_separator(format: &MaskFormat, value: String, position: usize) -> EditResult {
    if position < value.len() {
        return EditResult::new(value, position + 1);
    }
    let value = format.try_append_separator(&value);
    let position = value.len();
    EditResult::new(value, position)
}

fn digit_key(format: &MaskFormat, value: &str, key: char, digit: u32, position: usize) -> EditResult {
    let mut value = value.to_owned();
    let mut position = position;
    if position >= format.max_length() {
        return EditResult::new(value, position);
    }
    if format.is_cursor_at_separator(position) {
        if position == value.len() {
            value.push(format.separator());
        }
        position += 1;
    }
    let Some(segment) = format.segment_at(position) else {
        return EditResult::new(value, position);
    };

    // digits overwrite, the mask keeps its width
    if position < value.len() {
        value.replace_range(position..=position, key.encode_utf8(&mut [0; 4]));
    } else {
        value.push(key);
    }

    let segment_end = segment.end().min(value.len());
    let at_start = position == segment.start();
    let leading = digit * pow10(segment.length() - 1);
    if at_start && leading > segment.max(&value) {
        // the digit cannot lead, it is the whole segment
        let whole = segment.pad(segment.clamp(digit, &value));
        trace!("digit {digit} fills segment as {whole:?}");
        value.replace_range(segment.start()..segment_end, &whole);
        return EditResult::new(value, segment.end());
    }

    if let Some(number) = value.get(segment.start()..segment.end()).and_then(parse_digits) {
        let max = segment.max(&value);
        let fixed = if number > max {
            Some(max)
        } else if number < segment.min() && !at_start {
            Some(segment.min())
        } else {
            None
        };
        if let Some(fixed) = fixed {
            trace!("segment value {number} corrected to {fixed}");
            value.replace_range(segment.start()..segment.end(), &segment.pad(fixed));
        }
    }
    EditResult::new(value, position + 1)
}

fn delete_before(format: &MaskFormat, value: &str, position: usize) -> EditResult {
    if position == 0 {
        return EditResult::new(value, position);
    }

    if position == value.len() {
        // at the end the value shrinks, a trailing separator goes with its digit
        let cut = if format.is_cursor_at_separator(position - 1) { 2 } else { 1 };
        let kept = position.saturating_sub(cut);
        return EditResult::new(format.correct_min_max_values(&value[..kept]), kept);
    }

    let target = if format.is_cursor_at_separator(position - 1) {
        position.saturating_sub(2)
    } else {
        position - 1
    };
    let mut zeroed = value.to_owned();
    zeroed.replace_range(target..=target, "0");
    EditResult::new(format.correct_min_max_values(&zeroed), target)
}

fn delete_range(format: &MaskFormat, value: &str, start: usize, end: usize) -> EditResult {
    if end >= value.len() {
        return EditResult::new(format.correct_min_max_values(&value[..start]), start);
    }

    let zeroed: String = value
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if (start..end).contains(&i) && !format.is_cursor_at_separator(i) {
                '0'
            } else {
                c
            }
        })
        .collect();
    EditResult::new(format.correct_min_max_values(&zeroed), start)
}

/// Orders the selection and keeps it inside the value. Values that are not
/// plain ASCII did not come from the mask and are reduced to their valid
/// prefix first.
fn normalize(format: &MaskFormat, value: &str, start: usize, end: usize) -> (String, usize, usize) {
    let value = if value.is_ascii() {
        value.to_owned()
    } else {
        format.get_valid_value(value)
    };
    let len = value.len();
    (value, start.min(end).min(len), start.max(end).min(len))
}
