//! Date-range value and the transitions that mutate it.

use chrono::NaiveDate;

use super::calendar::CalendarMonth;
use super::format::DateFormat;
use super::format::digits_of;
use super::format::from_iso;
use super::format::mask_for;
use super::format::parse_date;

/// A start/end pair. When both are set, `start <= end`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DateRange {
    #[cfg_attr(
        feature = "serde",
        serde(rename = "startDate", default, with = "iso_opt")
    )]
    pub start: Option<NaiveDate>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "endDate", default, with = "iso_opt")
    )]
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub const EMPTY: DateRange = DateRange {
        start: None,
        end: None,
    };

    /// Builds a range, ordering the endpoints if needed.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        match (start, end) {
            (Some(s), Some(e)) if e < s => Self {
                start: Some(e),
                end: Some(s),
            },
            _ => Self { start, end },
        }
    }

    /// Builds a range from ISO strings (`YYYY-MM-DD`, optionally with a `T00:00:00` time).
    /// Unparseable sides are left empty.
    pub fn from_iso(start: Option<&str>, end: Option<&str>) -> Self {
        let parse = |s: Option<&str>| s.and_then(from_iso);
        Self::new(parse(start), parse(end))
    }

    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    pub fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// `true` when `date` lies within a complete range, endpoints included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start, self.end) {
            (Some(s), Some(e)) => s <= date && date <= e,
            _ => false,
        }
    }

    pub fn get(&self, side: RangeSide) -> Option<NaiveDate> {
        match side {
            RangeSide::Start => self.start,
            RangeSide::End => self.end,
        }
    }

    fn with(self, side: RangeSide, date: Option<NaiveDate>) -> Self {
        match side {
            RangeSide::Start => Self {
                start: date,
                ..self
            },
            RangeSide::End => Self { end: date, ..self },
        }
    }
}

#[cfg(feature = "serde")]
mod iso_opt {
    use chrono::NaiveDate;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    use crate::date::format::from_iso;
    use crate::date::format::to_iso;

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => s.serialize_str(&to_iso(*d)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        match raw {
            None => Ok(None),
            Some(text) => from_iso(&text)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{text}'"))),
        }
    }
}

/// Which input of the pair a typed value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RangeSide {
    Start,
    End,
}

/// Inclusive limits on selectable dates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateBounds {
    pub min: Option<NaiveDate>,
    pub max: Option<NaiveDate>,
}

impl DateBounds {
    pub const UNBOUNDED: DateBounds = DateBounds {
        min: None,
        max: None,
    };

    pub fn new(min: Option<NaiveDate>, max: Option<NaiveDate>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.min.is_none_or(|min| date >= min) && self.max.is_none_or(|max| date <= max)
    }
}

/// Result of feeding masked text into one side of the range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypedOutcome {
    pub range: DateRange,
    /// The start date was accepted; the view should move focus to the end input.
    pub focus_next: bool,
    /// A date was accepted; the calendar may jump to its month.
    pub navigate_to: Option<NaiveDate>,
}

impl TypedOutcome {
    fn unchanged(range: DateRange) -> Self {
        Self {
            range,
            focus_next: false,
            navigate_to: None,
        }
    }
}

/// Applies masked text typed into `side`.
///
/// - no digits at all: that side is cleared, the other kept;
/// - a full-length entry: parsed and, if valid and within `bounds`, stored;
/// - anything else leaves `range` as is.
///
/// A typed start later than the current end clears the end. A typed end earlier than the start
/// is ignored.
pub fn accept_typed(
    raw: &str,
    side: RangeSide,
    range: DateRange,
    format: DateFormat,
    bounds: DateBounds,
) -> TypedOutcome {
    let digits = digits_of(raw);
    if digits.is_empty() {
        return TypedOutcome::unchanged(range.with(side, None));
    }

    if raw.chars().count() < mask_for(format).len() {
        return TypedOutcome::unchanged(range);
    }

    let Some(date) = parse_date(raw, format) else {
        return TypedOutcome::unchanged(range);
    };
    if !bounds.contains(date) {
        tracing::trace!(%date, "typed date outside bounds");
        return TypedOutcome::unchanged(range);
    }

    let next = match side {
        RangeSide::Start => match range.end {
            Some(end) if date > end => DateRange {
                start: Some(date),
                end: None,
            },
            _ => range.with(RangeSide::Start, Some(date)),
        },
        RangeSide::End => match range.start {
            Some(start) if date < start => return TypedOutcome::unchanged(range),
            _ => range.with(RangeSide::End, Some(date)),
        },
    };

    tracing::debug!(?side, %date, "typed date accepted");
    TypedOutcome {
        range: next,
        focus_next: side == RangeSide::Start,
        navigate_to: Some(date),
    }
}

/// Result of clicking a calendar day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DaySelection {
    pub range: DateRange,
    /// The click completed the range; the calendar should close.
    pub close: bool,
}

/// Runs the click state machine for `day` of `month`.
///
/// Returns `None` for days the month does not have and days outside `bounds`.
pub fn select_day(
    day: u32,
    range: DateRange,
    month: CalendarMonth,
    bounds: DateBounds,
) -> Option<DaySelection> {
    let date = month.date(day)?;
    if !bounds.contains(date) {
        return None;
    }

    let next = match (range.start, range.end) {
        (Some(start), None) if date < start => DateRange {
            start: Some(date),
            end: Some(start),
        },
        (Some(start), None) => DateRange {
            start: Some(start),
            end: Some(date),
        },
        _ => DateRange {
            start: Some(date),
            end: None,
        },
    };

    tracing::debug!(%date, complete = next.is_complete(), "calendar day selected");
    Some(DaySelection {
        range: next,
        close: next.is_complete(),
    })
}

/// Whether `day` falls in the hover preview: with only a start set, the inclusive span between
/// the start and the hovered day, in either direction.
pub fn is_hover_preview(
    day: u32,
    hovered: Option<u32>,
    range: DateRange,
    month: CalendarMonth,
) -> bool {
    let (Some(start), None) = (range.start, range.end) else {
        return false;
    };
    let (Some(hovered), Some(current)) = (hovered.and_then(|d| month.date(d)), month.date(day))
    else {
        return false;
    };
    let (lo, hi) = if hovered >= start {
        (start, hovered)
    } else {
        (hovered, start)
    };
    lo <= current && current <= hi
}

/// Hover preview for every day of `month`; index 0 is day 1.
pub fn hover_preview(hovered: Option<u32>, range: DateRange, month: CalendarMonth) -> Vec<bool> {
    (1..=month.days_in_month())
        .map(|day| is_hover_preview(day, hovered, range, month))
        .collect()
}

/// How a single day cell should be drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DayMarks {
    pub start: bool,
    pub end: bool,
    /// Strictly between start and end.
    pub in_range: bool,
    pub disabled: bool,
    pub preview: bool,
}

pub fn day_marks(
    day: u32,
    range: DateRange,
    month: CalendarMonth,
    bounds: DateBounds,
    hovered: Option<u32>,
) -> DayMarks {
    let Some(date) = month.date(day) else {
        return DayMarks {
            disabled: true,
            ..DayMarks::default()
        };
    };
    DayMarks {
        start: range.start == Some(date),
        end: range.end == Some(date),
        in_range: matches!((range.start, range.end), (Some(s), Some(e)) if s < date && date < e),
        disabled: !bounds.contains(date),
        preview: is_hover_preview(day, hovered, range, month),
    }
}
