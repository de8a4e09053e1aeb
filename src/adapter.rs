//! Event adapter for text inputs.
//!
//! [`MaskedInput`] keeps the value and selection of one input and feeds
//! UI-agnostic [`InputEvent`]s through the edit handlers. Binding it to a
//! concrete toolkit only means translating that toolkit's events.

use crate::edit::{self, EditResult};
use crate::{InputPolicy, MaskFormat};
use log::{trace, warn};
use std::sync::Arc;

/// Selected character range, normalised so that `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    pub start: usize,
    pub end:   usize,
}

impl Selection {
    #[inline]
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end:   a.max(b),
        }
    }

    #[inline]
    pub const fn collapsed(position: usize) -> Self {
        Self {
            start: position,
            end:   position,
        }
    }

    #[inline]
    pub const fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Input events, already stripped of any toolkit specifics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A printable key.
    Key(char),
    Backspace,
    Enter,
    Paste(String),
    /// The text was replaced wholesale, e.g. by an input method.
    Change(String),
    /// Focus left the input.
    Blur,
}

/// What an event did to the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventOutcome {
    /// Value or selection changed.
    Changed,
    /// The event was handled but nothing changed, or the edit was rejected.
    Unchanged,
    /// The event is not for this input, e.g. a letter key.
    Ignored,
}

/// State of one masked text input.
#[derive(Debug, Clone)]
pub struct MaskedInput {
    format:    Arc<MaskFormat>,
    policy:    InputPolicy,
    value:     String,
    selection: Selection,
    // invalid external values are reported once per input
    warned:    bool,
}

impl MaskedInput {
    pub fn new(format: Arc<MaskFormat>, policy: InputPolicy) -> Self {
        Self {
            format,
            policy,
            value: String::new(),
            selection: Selection::default(),
            warned: false,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: &str) -> Self {
        self.set_value(value);
        self
    }

    pub fn format(&self) -> &MaskFormat {
        &self.format
    }

    pub const fn policy(&self) -> InputPolicy {
        self.policy
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Replaces the value from outside, e.g. from the application model.
    ///
    /// An invalid value is reduced to its longest valid prefix. The first
    /// time this happens a warning is logged.
    pub fn set_value(&mut self, value: &str) {
        let accepted = if self.format.is_valid(value) {
            value.to_owned()
        } else {
            let corrected = self.format.get_valid_value(value);
            if !self.warned {
                warn!(
                    "invalid value {value:?} for mask {}, showing {corrected:?} instead",
                    self.format
                );
                self.warned = true;
            }
            corrected
        };
        self.selection = Selection::collapsed(accepted.len());
        self.value = accepted;
    }

    /// Moves the selection, keeping it inside the value.
    pub fn set_selection(&mut self, start: usize, end: usize) {
        let len = self.value.len();
        self.selection = Selection::new(start.min(len), end.min(len));
    }

    pub fn handle(&mut self, event: &InputEvent) -> EventOutcome {
        let Selection { start, end } = self.selection;
        match event {
            InputEvent::Key(key) => {
                if !key.is_ascii_digit() && !self.format.is_separator(*key) {
                    return EventOutcome::Ignored;
                }
                let result = edit::on_digit_or_separator_key(&self.format, &self.value, *key, start, end);
                self.accept(result, true)
            }
            InputEvent::Backspace => {
                let result = edit::on_backspace(&self.format, &self.value, start, end);
                self.accept(result, false)
            }
            InputEvent::Enter => {
                let result = edit::on_enter(&self.format, &self.value);
                self.commit(result)
            }
            InputEvent::Paste(text) => {
                let result = edit::paste(&self.format, text, &self.value, start, end);
                self.accept(result, false)
            }
            InputEvent::Change(text) => {
                let fixed = if self.policy.autofix {
                    self.format.correct_min_max_values(text)
                } else {
                    text.clone()
                };
                let value = self.format.get_valid_value(&fixed);
                let position = value.len();
                self.commit(EditResult::new(value, position))
            }
            InputEvent::Blur => {
                if !self.policy.auto_complete_on_blur || self.value.is_empty() {
                    return EventOutcome::Unchanged;
                }
                let value = self.format.auto_complete(&self.value);
                let position = value.len();
                self.commit(EditResult::new(value, position))
            }
        }
    }

    /// Applies the policy to an edit. With `advance`, a cursor left at the
    /// end of a complete segment moves past the separator.
    fn accept(&mut self, result: EditResult, advance: bool) -> EventOutcome {
        let EditResult { mut value, mut position } = result;
        if !self.format.is_valid(&value) {
            if !self.policy.autofix {
                trace!("rejected edit {value:?}");
                return EventOutcome::Unchanged;
            }
            value = self
                .format
                .get_valid_value(&self.format.correct_min_max_values(&value));
            position = position.min(value.len());
        }
        if advance && position == value.len() {
            value = self.format.try_append_separator(&value);
            position = value.len();
        }
        self.commit(EditResult::new(value, position))
    }

    fn commit(&mut self, result: EditResult) -> EventOutcome {
        let selection = Selection::collapsed(result.position);
        if result.value == self.value && selection == self.selection {
            return EventOutcome::Unchanged;
        }
        self.value = result.value;
        self.selection = selection;
        EventOutcome::Changed
    }
}
