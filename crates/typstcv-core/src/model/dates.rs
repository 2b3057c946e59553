//! Date fields shared by dated entries and the strings derived from them

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::Serialize;

use crate::locale::Locale;
use crate::model::error::ValidationIssue;
use crate::model::fields::{Fields, Issues};
use crate::types::{time_span, Date};

/// Locale and reference day used while building entries
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationContext {
    pub locale: Locale,
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn new(locale: Locale, today: NaiveDate) -> Self {
        Self { locale, today }
    }
}

/// `start_date` / `end_date` / `date` as written
#[derive(Debug, Clone, Default, PartialEq, Serialize, JsonSchema)]
pub struct EntryDates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Date>,
    /// Omitted with a start date means ongoing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Date>,
    /// A single date or free text such as "Fall 2023"; excludes start/end
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Display form of an entry's dates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateString {
    #[default]
    None,
    /// Built from typed dates; safe to embed after escaping
    Formatted(String),
    /// The user's `date` text, which may contain inline markup
    FreeText(String),
}

impl DateString {
    pub fn as_str(&self) -> &str {
        match self {
            DateString::None => "",
            DateString::Formatted(s) | DateString::FreeText(s) => s,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, DateString::None)
    }
}

impl EntryDates {
    pub(crate) fn read(fields: &Fields<'_>, issues: &mut Issues) -> Self {
        let dates = Self {
            start_date: fields.date("start_date", issues),
            end_date: fields.date("end_date", issues),
            date: fields.text("date", issues),
        };

        if dates.date.is_some() && (fields.has("start_date") || fields.has("end_date")) {
            issues.push(ValidationIssue::field(
                fields.path().key("date"),
                format!("\"{}\"", dates.date.as_deref().unwrap_or_default()),
                "date cannot be combined with start_date or end_date",
            ));
        }

        if let (Some(start), Some(end)) = (dates.start_date, dates.end_date) {
            if end.precedes(&start) {
                issues.push(ValidationIssue::field(
                    fields.path().key("end_date"),
                    format!("\"{}\"", end),
                    format!("end_date must not be before start_date ({})", start),
                ));
            }
        }

        dates
    }

    pub fn is_empty(&self) -> bool {
        self.start_date.is_none() && self.end_date.is_none() && self.date.is_none()
    }

    /// End date with ongoing entries resolved to `Present`
    pub fn effective_end(&self) -> Option<Date> {
        match (self.start_date, self.end_date) {
            (_, Some(end)) => Some(end),
            (Some(_), None) => Some(Date::Present),
            (None, None) => None,
        }
    }

    pub fn date_string(&self, ctx: &ValidationContext) -> DateString {
        let locale = &ctx.locale;

        if let Some(text) = &self.date {
            return match Date::parse(text) {
                Ok(date) => DateString::Formatted(date.format(locale)),
                Err(_) => DateString::FreeText(text.clone()),
            };
        }

        match (self.start_date, self.effective_end()) {
            (Some(start), Some(end)) => {
                let start_text = start.format(locale);
                let end_text = end.format(locale);
                if start_text == end_text {
                    DateString::Formatted(start_text)
                } else {
                    DateString::Formatted(format!("{} {} {}", start_text, locale.to, end_text))
                }
            }
            (None, Some(end)) => DateString::Formatted(end.format(locale)),
            _ => DateString::None,
        }
    }

    /// "2 years 3 months"; empty without a start date
    pub fn time_span_string(&self, ctx: &ValidationContext) -> String {
        match (self.start_date, self.effective_end()) {
            (Some(start), Some(end)) if self.date.is_none() => {
                let (years, months) = time_span(start, end, ctx.today);
                ctx.locale.format_time_span(years, months)
            }
            _ => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::error::FieldPath;
    use serde_yaml::Mapping;

    fn ctx() -> ValidationContext {
        ValidationContext::new(
            Locale::default(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    fn read(yaml: &str) -> (EntryDates, Issues) {
        let map: Mapping = serde_yaml::from_str(yaml).unwrap();
        let fields = Fields::new(&map, FieldPath::from_keys(&["e"]));
        let mut issues = Vec::new();
        let dates = EntryDates::read(&fields, &mut issues);
        (dates, issues)
    }

    #[test]
    fn test_range_string() {
        let (dates, issues) = read("start_date: 2020-01\nend_date: 2022-03\n");
        assert!(issues.is_empty());
        assert_eq!(
            dates.date_string(&ctx()),
            DateString::Formatted("Jan 2020 – Mar 2022".to_string())
        );
        assert_eq!(dates.time_span_string(&ctx()), "2 years 2 months");
    }

    #[test]
    fn test_missing_end_is_present() {
        let (dates, _) = read("start_date: 2023-06\n");
        assert!(dates.date_string(&ctx()).as_str().ends_with("present"));
        assert_eq!(dates.time_span_string(&ctx()), "1 year");
    }

    #[test]
    fn test_identical_dates_collapse() {
        let (dates, _) = read("start_date: 2021-05\nend_date: 2021-05\n");
        assert_eq!(dates.date_string(&ctx()).as_str(), "May 2021");
    }

    #[test]
    fn test_free_text_date_is_verbatim() {
        let (dates, issues) = read("date: Fall *2023*\n");
        assert!(issues.is_empty());
        assert_eq!(
            dates.date_string(&ctx()),
            DateString::FreeText("Fall *2023*".to_string())
        );
        assert_eq!(dates.time_span_string(&ctx()), "");
    }

    #[test]
    fn test_parsable_date_field_is_formatted() {
        let (dates, _) = read("date: 2019\n");
        assert_eq!(dates.date_string(&ctx()), DateString::Formatted("2019".to_string()));
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let (_, issues) = read("start_date: 2022-01\nend_date: 2021-12\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path().to_string(), "e.end_date");
    }

    #[test]
    fn test_date_and_range_are_exclusive() {
        let (_, issues) = read("date: 2020\nstart_date: 2019\n");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path().to_string(), "e.date");
    }

    #[test]
    fn test_no_dates() {
        let (dates, _) = read("{}");
        assert!(dates.is_empty());
        assert!(dates.date_string(&ctx()).is_none());
    }
}
