//! Localized words and date formatting rules
//!
//! A [`Locale`] is part of the input document (`locale:` block). Every field has
//! an English default, so an empty or missing block is valid.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Date style used when the input does not set one
pub const DEFAULT_DATE_STYLE: &str = "MONTH_ABBREVIATION YEAR";

/// Placeholders understood by [`Locale::date_style`], longest first so that
/// `MONTH` never shadows `MONTH_NAME`.
const DATE_STYLE_PLACEHOLDERS: [&str; 6] = [
    "MONTH_ABBREVIATION",
    "MONTH_IN_TWO_DIGITS",
    "MONTH_NAME",
    "MONTH",
    "YEAR",
    "DAY",
];

/// Localized strings (the `locale:` block of the input)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct Locale {
    /// Word used for ongoing entries ("present")
    pub present: String,
    /// Separator between the start and end of a date range
    pub to: String,
    pub month: String,
    pub months: String,
    pub year: String,
    pub years: String,
    /// Twelve month abbreviations, January first
    pub abbreviations_for_months: Vec<String>,
    /// Twelve full month names, January first
    pub full_names_of_months: Vec<String>,
    /// Date pattern, e.g. `MONTH_ABBREVIATION YEAR` or `YEAR-MONTH_IN_TWO_DIGITS`
    pub date_style: String,
    /// Prefix of the "last updated" line
    pub last_updated: String,
    /// Word for "page" in page numbering
    pub page: String,
}

impl Default for Locale {
    fn default() -> Self {
        Self {
            present: "present".to_string(),
            to: "–".to_string(),
            month: "month".to_string(),
            months: "months".to_string(),
            year: "year".to_string(),
            years: "years".to_string(),
            abbreviations_for_months: [
                "Jan", "Feb", "Mar", "Apr", "May", "June", "July", "Aug", "Sept", "Oct", "Nov",
                "Dec",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            full_names_of_months: [
                "January",
                "February",
                "March",
                "April",
                "May",
                "June",
                "July",
                "August",
                "September",
                "October",
                "November",
                "December",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            date_style: DEFAULT_DATE_STYLE.to_string(),
            last_updated: "Last updated in".to_string(),
            page: "Page".to_string(),
        }
    }
}

impl Locale {
    /// Check invariants serde cannot express
    ///
    /// Returns `(field, constraint)` pairs, empty when the locale is usable.
    pub fn problems(&self) -> Vec<(&'static str, String)> {
        let mut problems = Vec::new();
        if self.abbreviations_for_months.len() != 12 {
            problems.push((
                "abbreviations_for_months",
                format!(
                    "must list exactly 12 months, got {}",
                    self.abbreviations_for_months.len()
                ),
            ));
        }
        if self.full_names_of_months.len() != 12 {
            problems.push((
                "full_names_of_months",
                format!(
                    "must list exactly 12 months, got {}",
                    self.full_names_of_months.len()
                ),
            ));
        }
        if !DATE_STYLE_PLACEHOLDERS
            .iter()
            .any(|p| self.date_style.contains(p))
        {
            problems.push((
                "date_style",
                format!(
                    "must contain at least one of {}",
                    DATE_STYLE_PLACEHOLDERS.join(", ")
                ),
            ));
        }
        problems
    }

    /// Abbreviated month name (1-based month)
    pub fn month_abbreviation(&self, month: u32) -> &str {
        month_lookup(&self.abbreviations_for_months, month)
    }

    /// Full month name (1-based month)
    pub fn month_name(&self, month: u32) -> &str {
        month_lookup(&self.full_names_of_months, month)
    }

    /// Apply [`Locale::date_style`] to the given components
    ///
    /// Missing month or day components drop the corresponding placeholders and
    /// collapse the whitespace left behind.
    pub fn format_components(&self, year: i32, month: Option<u32>, day: Option<u32>) -> String {
        let Some(month) = month else {
            return year.to_string();
        };

        let mut out = String::with_capacity(self.date_style.len());
        let mut rest = self.date_style.as_str();
        while let Some(c) = rest.chars().next() {
            let Some(placeholder) = DATE_STYLE_PLACEHOLDERS
                .iter()
                .find(|p| rest.starts_with(**p))
            else {
                out.push(c);
                rest = &rest[c.len_utf8()..];
                continue;
            };
            match *placeholder {
                "MONTH_ABBREVIATION" => out.push_str(self.month_abbreviation(month)),
                "MONTH_IN_TWO_DIGITS" => out.push_str(&format!("{:02}", month)),
                "MONTH_NAME" => out.push_str(self.month_name(month)),
                "MONTH" => out.push_str(&month.to_string()),
                "YEAR" => out.push_str(&year.to_string()),
                _ => out.push_str(&day.map(|d| d.to_string()).unwrap_or_default()),
            }
            rest = &rest[placeholder.len()..];
        }

        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Human readable span, e.g. "2 years 3 months"
    pub fn format_time_span(&self, years: u32, months: u32) -> String {
        let mut parts = Vec::new();
        if years > 0 {
            let word = if years == 1 { &self.year } else { &self.years };
            parts.push(format!("{} {}", years, word));
        }
        if months > 0 {
            let word = if months == 1 { &self.month } else { &self.months };
            parts.push(format!("{} {}", months, word));
        }
        parts.join(" ")
    }
}

fn month_lookup(names: &[String], month: u32) -> &str {
    month
        .checked_sub(1)
        .and_then(|i| names.get(i as usize))
        .map(|s| s.as_str())
        .unwrap_or("")
}
