use chrono::NaiveDate;

use super::format::DateFormat;
use super::format::Mask;
use super::format::digits_of;
use super::format::format_date;
use super::format::mask_for;

/// A fixed-width numeric text field shaped by a [`Mask`].
///
/// Only digits are stored; separators and `_` placeholders come from the mask when rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskedInput {
    mask: Mask,
    digits: String,
}

impl MaskedInput {
    pub fn new(format: DateFormat) -> Self {
        Self {
            mask: mask_for(format),
            digits: String::new(),
        }
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.digits.len() >= self.mask.digit_slots()
    }

    /// The text as shown: digits laid into the mask, `_` for missing ones.
    pub fn text(&self) -> String {
        self.mask.render(&self.digits)
    }

    /// Character column where the next digit goes.
    pub fn caret(&self) -> usize {
        let mut filled = 0;
        for (col, slot) in self.mask.pattern.chars().enumerate() {
            if slot != '0' {
                continue;
            }
            if filled == self.digits.len() {
                return col;
            }
            filled += 1;
        }
        self.mask.len()
    }

    /// Appends a digit; returns `false` for non-digits or when the field is full.
    pub fn push(&mut self, c: char) -> bool {
        if !c.is_ascii_digit() || self.is_full() {
            return false;
        }
        self.digits.push(c);
        true
    }

    pub fn pop(&mut self) -> bool {
        self.digits.pop().is_some()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    /// Replaces the content from pasted text, keeping at most one mask's worth of digits.
    pub fn set_text(&mut self, text: &str) {
        self.digits = digits_of(text);
        self.digits.truncate(self.mask.digit_slots());
    }

    /// Mirrors an externally set value.
    pub fn set_date(&mut self, date: Option<NaiveDate>, format: DateFormat) {
        self.set_text(&format_date(date, format));
    }
}
