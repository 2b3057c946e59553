//! Calendar dates with variable precision and the "present" sentinel

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use schemars::{json_schema, JsonSchema, Schema, SchemaGenerator};
use serde::{Serialize, Serializer};
use thiserror::Error;

use crate::locale::Locale;

/// Pattern accepted by [`Date::parse`], exported in the JSON schema
pub const DATE_PATTERN: &str = r"^([0-9]{4}(-[0-9]{2}(-[0-9]{2})?)?|[Pp][Rr][Ee][Ss][Ee][Nn][Tt])$";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("'{value}' is not a date (expected YYYY-MM-DD, YYYY-MM, YYYY or \"present\")")]
    Format { value: String },

    #[error("'{value}' is not a valid calendar date")]
    OutOfRange { value: String },
}

/// A date as written in the input
///
/// Precision is kept: `2020` stays a year, `2020-05` stays a month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Date {
    Year(i32),
    YearMonth { year: i32, month: u32 },
    Exact(NaiveDate),
    /// Ongoing; later than any calendar date
    Present,
}

impl Date {
    /// Parse `YYYY-MM-DD`, `YYYY-MM`, `YYYY` or `present` (any case)
    pub fn parse(input: &str) -> Result<Self, DateError> {
        let value = input.trim();
        if value.eq_ignore_ascii_case("present") {
            return Ok(Date::Present);
        }

        let format_err = || DateError::Format {
            value: value.to_string(),
        };
        let range_err = || DateError::OutOfRange {
            value: value.to_string(),
        };

        let parts: Vec<&str> = value.split('-').collect();
        let digits = |s: &str, len: usize| s.len() == len && s.bytes().all(|b| b.is_ascii_digit());

        match parts.as_slice() {
            [y] if digits(y, 4) => Ok(Date::Year(y.parse().map_err(|_| format_err())?)),
            [y, m] if digits(y, 4) && digits(m, 2) => {
                let year = y.parse().map_err(|_| format_err())?;
                let month: u32 = m.parse().map_err(|_| format_err())?;
                if !(1..=12).contains(&month) {
                    return Err(range_err());
                }
                Ok(Date::YearMonth { year, month })
            }
            [y, m, d] if digits(y, 4) && digits(m, 2) && digits(d, 2) => {
                let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| range_err())?;
                Ok(Date::Exact(date))
            }
            _ => Err(format_err()),
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Date::Present)
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Date::Year(y) | Date::YearMonth { year: y, .. } => Some(*y),
            Date::Exact(d) => Some(d.year()),
            Date::Present => None,
        }
    }

    pub fn month(&self) -> Option<u32> {
        match self {
            Date::YearMonth { month, .. } => Some(*month),
            Date::Exact(d) => Some(d.month()),
            _ => None,
        }
    }

    pub fn day(&self) -> Option<u32> {
        match self {
            Date::Exact(d) => Some(d.day()),
            _ => None,
        }
    }

    /// Replace `Present` with a concrete day
    pub fn resolve(self, today: NaiveDate) -> Date {
        match self {
            Date::Present => Date::Exact(today),
            other => other,
        }
    }

    /// Strictly earlier than `other` at the precision both dates share
    ///
    /// `2020-05` does not precede `2020` and `2020` does not precede `2020-05`;
    /// only a difference visible in the common components counts.
    pub fn precedes(&self, other: &Date) -> bool {
        match (self, other) {
            (Date::Present, _) => false,
            (_, Date::Present) => true,
            _ => {
                let precision = self.precision().min(other.precision());
                self.truncated_key(precision) < other.truncated_key(precision)
            }
        }
    }

    /// Format with the locale's date style (`present` becomes the localized word)
    pub fn format(&self, locale: &Locale) -> String {
        match self {
            Date::Present => locale.present.clone(),
            _ => locale.format_components(
                self.year().unwrap_or_default(),
                self.month(),
                self.day(),
            ),
        }
    }

    fn precision(&self) -> u8 {
        match self {
            Date::Year(_) => 0,
            Date::YearMonth { .. } => 1,
            Date::Exact(_) => 2,
            Date::Present => 3,
        }
    }

    fn truncated_key(&self, precision: u8) -> (i32, u32, u32) {
        let year = self.year().unwrap_or(i32::MAX);
        let month = if precision >= 1 { self.month().unwrap_or(0) } else { 0 };
        let day = if precision >= 2 { self.day().unwrap_or(0) } else { 0 };
        (year, month, day)
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Date::Present, Date::Present) => Ordering::Equal,
            (Date::Present, _) => Ordering::Greater,
            (_, Date::Present) => Ordering::Less,
            _ => self
                .truncated_key(2)
                .cmp(&other.truncated_key(2))
                .then(self.precision().cmp(&other.precision())),
        }
    }
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Date::Year(y) => write!(f, "{:04}", y),
            Date::YearMonth { year, month } => write!(f, "{:04}-{:02}", year, month),
            Date::Exact(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Date::Present => f.write_str("present"),
        }
    }
}

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Date::Exact(date)
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl JsonSchema for Date {
    fn schema_name() -> Cow<'static, str> {
        "Date".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": ["string", "integer"],
            "pattern": DATE_PATTERN,
            "description": "YYYY-MM-DD, YYYY-MM, YYYY or \"present\""
        })
    }
}

/// Whole years and remaining months between two dates
///
/// When either side only carries a year the result has no month component.
/// Spans shorter than a month round up to one month.
pub fn time_span(start: Date, end: Date, today: NaiveDate) -> (u32, u32) {
    let start = start.resolve(today);
    let end = end.resolve(today);

    let (Some(sy), Some(ey)) = (start.year(), end.year()) else {
        return (0, 0);
    };

    if start.month().is_none() || end.month().is_none() {
        let years = (ey - sy).max(0) as u32;
        return (years.max(1), 0);
    }

    let sm = start.month().unwrap_or(1) as i64;
    let em = end.month().unwrap_or(1) as i64;
    let total = ((ey as i64) * 12 + em) - ((sy as i64) * 12 + sm);
    let total = total.max(1) as u32;
    (total / 12, total % 12)
}
