//! Typed-date formats, input masks, and the ISO form dates are exchanged in.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;
use chrono::NaiveDate;
use chrono::NaiveDateTime;

use crate::error::PickerError;

const ISO_FORMAT: &str = "%Y-%m-%dT00:00:00";
const MASK_DIGITS: usize = 8;

/// Order in which day, month and year appear in a typed date.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldOrder {
    DayMonthYear,
    MonthDayYear,
    YearMonthDay,
}

/// The six supported typed-date layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DateFormat {
    /// `DD/MM/YYYY`
    DdMmYyyy,
    /// `MM/DD/YYYY`
    #[default]
    MmDdYyyy,
    /// `YYYY/MM/DD`
    YyyyMmDd,
    /// `DD-MM-YYYY`
    DdMmYyyyDash,
    /// `MM-DD-YYYY`
    MmDdYyyyDash,
    /// `YYYY-MM-DD`
    YyyyMmDdDash,
}

impl DateFormat {
    pub const ALL: [DateFormat; 6] = [
        DateFormat::DdMmYyyy,
        DateFormat::MmDdYyyy,
        DateFormat::YyyyMmDd,
        DateFormat::DdMmYyyyDash,
        DateFormat::MmDdYyyyDash,
        DateFormat::YyyyMmDdDash,
    ];

    pub fn pattern(self) -> &'static str {
        match self {
            DateFormat::DdMmYyyy => "DD/MM/YYYY",
            DateFormat::MmDdYyyy => "MM/DD/YYYY",
            DateFormat::YyyyMmDd => "YYYY/MM/DD",
            DateFormat::DdMmYyyyDash => "DD-MM-YYYY",
            DateFormat::MmDdYyyyDash => "MM-DD-YYYY",
            DateFormat::YyyyMmDdDash => "YYYY-MM-DD",
        }
    }

    pub fn separator(self) -> char {
        match self {
            DateFormat::DdMmYyyy | DateFormat::MmDdYyyy | DateFormat::YyyyMmDd => '/',
            _ => '-',
        }
    }

    pub fn order(self) -> FieldOrder {
        match self {
            DateFormat::DdMmYyyy | DateFormat::DdMmYyyyDash => FieldOrder::DayMonthYear,
            DateFormat::MmDdYyyy | DateFormat::MmDdYyyyDash => FieldOrder::MonthDayYear,
            DateFormat::YyyyMmDd | DateFormat::YyyyMmDdDash => FieldOrder::YearMonthDay,
        }
    }

    pub fn is_year_first(self) -> bool {
        self.order() == FieldOrder::YearMonthDay
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pattern())
    }
}

impl FromStr for DateFormat {
    type Err = PickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        DateFormat::ALL
            .into_iter()
            .find(|f| f.pattern().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| PickerError::UnknownDateFormat(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for DateFormat {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.pattern())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DateFormat {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Fixed-width numeric mask derived from a [`DateFormat`].
///
/// `pattern` uses `0` for digit slots, e.g. `00/00/0000` or `0000-00-00`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub pattern: String,
    pub separator_positions: Vec<usize>,
    placeholder: String,
}

impl Mask {
    /// Total width of the mask in characters.
    pub fn len(&self) -> usize {
        self.pattern.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Number of digit slots.
    pub fn digit_slots(&self) -> usize {
        self.len() - self.separator_positions.len()
    }

    /// Hint shown in an empty field, e.g. `mm/dd/yyyy`.
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Lays `digits` into the mask; unfilled slots render as `_`.
    ///
    /// Non-digit characters in `digits` are ignored and extra digits are dropped.
    pub fn render(&self, digits: &str) -> String {
        let mut digits = digits.chars().filter(char::is_ascii_digit);
        self.pattern
            .chars()
            .map(|slot| {
                if slot == '0' {
                    digits.next().unwrap_or('_')
                } else {
                    slot
                }
            })
            .collect()
    }
}

/// Derives the input mask for `format`.
pub fn mask_for(format: DateFormat) -> Mask {
    let sep = format.separator();
    let pattern = if format.is_year_first() {
        format!("0000{sep}00{sep}00")
    } else {
        format!("00{sep}00{sep}0000")
    };
    let separator_positions = pattern
        .char_indices()
        .filter(|(_, c)| *c == sep)
        .map(|(i, _)| i)
        .collect();
    Mask {
        pattern,
        separator_positions,
        placeholder: format.pattern().to_lowercase(),
    }
}

pub(crate) fn digits_of(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Parses a typed date. Returns `None` unless `text` holds exactly eight digits that name a real
/// calendar date in `format`'s field order.
pub fn parse_date(text: &str, format: DateFormat) -> Option<NaiveDate> {
    let digits = digits_of(text);
    if digits.len() != MASK_DIGITS {
        return None;
    }

    let field = |range: std::ops::Range<usize>| digits[range].parse::<u32>().ok();
    let (day, month, year) = match format.order() {
        FieldOrder::DayMonthYear => (field(0..2)?, field(2..4)?, field(4..8)?),
        FieldOrder::MonthDayYear => (field(2..4)?, field(0..2)?, field(4..8)?),
        FieldOrder::YearMonthDay => (field(6..8)?, field(4..6)?, field(0..4)?),
    };

    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return None;
    }

    // from_ymd_opt rejects days past the end of the month; read back to be sure nothing rolled.
    let date = NaiveDate::from_ymd_opt(year as i32, month, day)?;
    (date.month() == month && date.day() == day).then_some(date)
}

/// Formats `date` for display in `format`; `None` renders as an empty string.
pub fn format_date(date: Option<NaiveDate>, format: DateFormat) -> String {
    let Some(date) = date else {
        return String::new();
    };
    let sep = format.separator();
    let (y, m, d) = (date.year(), date.month(), date.day());
    match format.order() {
        FieldOrder::DayMonthYear => format!("{d:02}{sep}{m:02}{sep}{y:04}"),
        FieldOrder::MonthDayYear => format!("{m:02}{sep}{d:02}{sep}{y:04}"),
        FieldOrder::YearMonthDay => format!("{y:04}{sep}{m:02}{sep}{d:02}"),
    }
}

/// Serializes a date as local midnight, `YYYY-MM-DDT00:00:00`.
pub fn to_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

/// Reads `YYYY-MM-DDTHH:MM:SS` (time ignored) or a bare `YYYY-MM-DD`.
pub fn from_iso(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(text, "%Y-%m-%d"))
        .ok()
}
