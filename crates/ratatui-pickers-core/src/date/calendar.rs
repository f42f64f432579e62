//! Month and year grids for the calendar popover.

use std::fmt;

use chrono::Datelike;
use chrono::Locale;
use chrono::NaiveDate;
use chrono::TimeZone;
use chrono::Utc;

use crate::error::PickerError;

/// Number of cells in the year picker.
pub const YEAR_GRID_LEN: usize = 16;
const YEARS_BEFORE_CENTER: i32 = 7;

const FALLBACK_LOCALE: Locale = Locale::en_US;

/// Which grid the picker is showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CalendarView {
    #[default]
    Days,
    Years,
}

/// A calendar month (`month` is 1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month: u32,
}

impl CalendarMonth {
    /// Returns `None` when `month` is outside `1..=12` or the year is outside chrono's range.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1)?;
        Some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(self) -> i32 {
        self.year
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn first_day(self) -> NaiveDate {
        // Constructors validate the (year, month) pair.
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// The date for `day` of this month, `None` if the month has no such day.
    pub fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    pub fn days_in_month(self) -> u32 {
        let (y, m) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(y, m, 1)
            .and_then(|next| next.pred_opt())
            .map(|last| last.day())
            .unwrap_or(31)
    }

    /// Blank cells before day 1, with Sunday as the first column.
    pub fn first_weekday_offset(self) -> u32 {
        self.first_day().weekday().num_days_from_sunday()
    }

    pub fn prev(self) -> Self {
        if self.month == 1 {
            Self::new(self.year - 1, 12).unwrap_or(self)
        } else {
            Self {
                month: self.month - 1,
                ..self
            }
        }
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self::new(self.year + 1, 1).unwrap_or(self)
        } else {
            Self {
                month: self.month + 1,
                ..self
            }
        }
    }

    /// Same month in `year`; stays put if `year` is out of range.
    pub fn with_year(self, year: i32) -> Self {
        Self::new(year, self.month).unwrap_or(self)
    }

    /// Localized header, e.g. `April 2026`.
    pub fn title(self, locale: &str) -> String {
        let locale = resolve_locale(locale).unwrap_or(FALLBACK_LOCALE);
        midnight_utc(self.first_day())
            .format_localized("%B %Y", locale)
            .to_string()
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Day cells for `month`: leading `None`s up to the first weekday, then every day in order.
pub fn calendar_grid(month: CalendarMonth) -> Vec<Option<u32>> {
    let offset = month.first_weekday_offset() as usize;
    let days = month.days_in_month();
    let mut cells = Vec::with_capacity(offset + days as usize);
    cells.resize(offset, None);
    cells.extend((1..=days).map(Some));
    cells
}

/// Sixteen consecutive years starting seven before `center`.
pub fn year_grid(center: i32) -> [i32; YEAR_GRID_LEN] {
    let start = center - YEARS_BEFORE_CENTER;
    std::array::from_fn(|i| start + i as i32)
}

/// Abbreviated weekday names, Sunday first, for `locale` (`en-US` and `en_US` both work).
///
/// Unknown locales fall back to `en_US`.
pub fn weekday_labels(locale: &str) -> [String; 7] {
    match try_weekday_labels(locale) {
        Ok(labels) => labels,
        Err(err) => {
            tracing::warn!(%err, "falling back to en_US weekday labels");
            labels_for(FALLBACK_LOCALE)
        }
    }
}

pub fn try_weekday_labels(locale: &str) -> Result<[String; 7], PickerError> {
    resolve_locale(locale).map(labels_for)
}

fn labels_for(locale: Locale) -> [String; 7] {
    // 2024-01-07 was a Sunday.
    let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap_or(NaiveDate::MIN);
    std::array::from_fn(|i| {
        let day = sunday + chrono::Days::new(i as u64);
        midnight_utc(day).format_localized("%a", locale).to_string()
    })
}

pub(crate) fn resolve_locale(tag: &str) -> Result<Locale, PickerError> {
    let normalized = tag.trim().replace('-', "_");
    Locale::try_from(normalized.as_str()).map_err(|_| PickerError::UnknownLocale(tag.to_string()))
}

fn midnight_utc(date: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}
