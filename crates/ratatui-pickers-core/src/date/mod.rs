//! Date-range selection engine.
//!
//! Everything here is plain data and pure functions: typed text goes through [`accept_typed`],
//! calendar clicks through [`select_day`], and the caller keeps the resulting [`DateRange`].
//! [`DateRangePicker`] is a terminal front end built on top of them.

pub mod calendar;
pub mod format;
pub mod masked;
pub mod picker;
pub mod range;

pub use calendar::CalendarMonth;
pub use calendar::CalendarView;
pub use calendar::YEAR_GRID_LEN;
pub use calendar::calendar_grid;
pub use calendar::try_weekday_labels;
pub use calendar::weekday_labels;
pub use calendar::year_grid;
pub use format::DateFormat;
pub use format::FieldOrder;
pub use format::Mask;
pub use format::format_date;
pub use format::from_iso;
pub use format::mask_for;
pub use format::parse_date;
pub use format::to_iso;
pub use masked::MaskedInput;
pub use picker::DateRangeAction;
pub use picker::DateRangePicker;
pub use picker::DateRangePickerOptions;
pub use picker::PickerFocus;
pub use range::DateBounds;
pub use range::DateRange;
pub use range::DayMarks;
pub use range::DaySelection;
pub use range::RangeSide;
pub use range::TypedOutcome;
pub use range::accept_typed;
pub use range::day_marks;
pub use range::hover_preview;
pub use range::is_hover_preview;
pub use range::select_day;
