//! The six entry variants and structural matching of raw entries
//!
//! Entries carry no type tag. A raw mapping is matched against each variant's
//! signature keys in a fixed order; a bare string is a text entry. When more
//! than one signature fits, the first variant that validates wins.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::Serialize;
use serde_yaml::Value;

use crate::model::dates::{DateString, EntryDates, ValidationContext};
use crate::model::error::{describe, FieldPath, ValidationIssue};
use crate::model::fields::{Fields, Issues};
use crate::types::Link;

static DOI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^10\.\d{4,9}/\S+$").expect("BUG: invalid DOI_RE regex literal")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntryKind {
    Education,
    Experience,
    Publication,
    Normal,
    OneLine,
    Text,
}

/// Order in which mapping signatures are tried
const MATCH_ORDER: [EntryKind; 5] = [
    EntryKind::Experience,
    EntryKind::Education,
    EntryKind::Publication,
    EntryKind::OneLine,
    EntryKind::Normal,
];

const DATED_FIELDS: [&str; 3] = ["start_date", "end_date", "date"];

impl EntryKind {
    pub const ALL: [EntryKind; 6] = [
        EntryKind::Education,
        EntryKind::Experience,
        EntryKind::Publication,
        EntryKind::Normal,
        EntryKind::OneLine,
        EntryKind::Text,
    ];

    /// Name used in `entry_type` and as the template name
    pub fn name(&self) -> &'static str {
        match self {
            EntryKind::Education => "EducationEntry",
            EntryKind::Experience => "ExperienceEntry",
            EntryKind::Publication => "PublicationEntry",
            EntryKind::Normal => "NormalEntry",
            EntryKind::OneLine => "OneLineEntry",
            EntryKind::Text => "TextEntry",
        }
    }

    /// Accepts `ExperienceEntry` and `experience_entry`
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().to_ascii_lowercase() == normalized)
    }

    /// Every field the variant accepts
    pub fn allowed_fields(&self) -> &'static [&'static str] {
        match self {
            EntryKind::Education => &[
                "institution",
                "area",
                "degree",
                "start_date",
                "end_date",
                "date",
                "location",
                "summary",
                "highlights",
            ],
            EntryKind::Experience => &[
                "company",
                "position",
                "start_date",
                "end_date",
                "date",
                "location",
                "summary",
                "highlights",
            ],
            EntryKind::Publication => &["title", "authors", "doi", "url", "journal", "date", "summary"],
            EntryKind::Normal => &[
                "name",
                "start_date",
                "end_date",
                "date",
                "location",
                "summary",
                "highlights",
            ],
            EntryKind::OneLine => &["label", "details"],
            EntryKind::Text => &[],
        }
    }

    /// Groups of keys; each group needs at least one present key
    fn signature(&self) -> &'static [&'static [&'static str]] {
        match self {
            EntryKind::Education => &[&["institution"], &["area", "degree"]],
            EntryKind::Experience => &[&["company"], &["position"]],
            EntryKind::Publication => &[&["title"], &["authors"]],
            EntryKind::Normal => &[&["name"]],
            EntryKind::OneLine => &[&["label"], &["details"]],
            EntryKind::Text => &[],
        }
    }

    fn missing_signature_keys(&self, fields: &Fields<'_>) -> Vec<String> {
        self.signature()
            .iter()
            .filter(|group| !group.iter().any(|k| fields.has(k)))
            .map(|group| group.join(" or "))
            .collect()
    }

    fn touches(&self, fields: &Fields<'_>) -> bool {
        self.signature()
            .iter()
            .any(|group| group.iter().any(|k| fields.has(k)))
    }

    pub fn has_dates(&self) -> bool {
        self.allowed_fields().iter().any(|f| DATED_FIELDS.contains(f))
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strings derived from an entry's dates at construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatePresentation {
    pub date_string: DateString,
    pub time_span_string: String,
}

impl DatePresentation {
    fn compute(dates: &EntryDates, ctx: &ValidationContext) -> Self {
        Self {
            date_string: dates.date_string(ctx),
            time_span_string: dates.time_span_string(ctx),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct EducationEntry {
    pub institution: String,
    /// Field of study
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    /// e.g. BS, PhD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(flatten)]
    pub dates: EntryDates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(skip)]
    pub presentation: DatePresentation,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct ExperienceEntry {
    pub company: String,
    pub position: String,
    #[serde(flatten)]
    pub dates: EntryDates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(skip)]
    pub presentation: DatePresentation,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct PublicationEntry {
    pub title: String,
    pub authors: Vec<String>,
    /// Bare DOI such as `10.1109/5.771073`; excludes `url`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<Link>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub journal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip)]
    pub presentation: PublicationPresentation,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublicationPresentation {
    pub date_string: DateString,
    /// `https://doi.org/<doi>` when a DOI is given
    pub doi_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct NormalEntry {
    pub name: String,
    #[serde(flatten)]
    pub dates: EntryDates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub highlights: Vec<String>,
    #[serde(skip)]
    pub presentation: DatePresentation,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[schemars(deny_unknown_fields)]
pub struct OneLineEntry {
    pub label: String,
    pub details: String,
}

/// A validated entry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    Education(EducationEntry),
    Experience(ExperienceEntry),
    Publication(PublicationEntry),
    Normal(NormalEntry),
    OneLine(OneLineEntry),
    Text(String),
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        match self {
            Entry::Education(_) => EntryKind::Education,
            Entry::Experience(_) => EntryKind::Experience,
            Entry::Publication(_) => EntryKind::Publication,
            Entry::Normal(_) => EntryKind::Normal,
            Entry::OneLine(_) => EntryKind::OneLine,
            Entry::Text(_) => EntryKind::Text,
        }
    }

    pub fn date_string(&self) -> &DateString {
        static NONE: DateString = DateString::None;
        match self {
            Entry::Education(e) => &e.presentation.date_string,
            Entry::Experience(e) => &e.presentation.date_string,
            Entry::Normal(e) => &e.presentation.date_string,
            Entry::Publication(e) => &e.presentation.date_string,
            Entry::OneLine(_) | Entry::Text(_) => &NONE,
        }
    }

    pub fn time_span_string(&self) -> &str {
        match self {
            Entry::Education(e) => &e.presentation.time_span_string,
            Entry::Experience(e) => &e.presentation.time_span_string,
            Entry::Normal(e) => &e.presentation.time_span_string,
            _ => "",
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            Entry::Education(e) => e.location.as_deref(),
            Entry::Experience(e) => e.location.as_deref(),
            Entry::Normal(e) => e.location.as_deref(),
            _ => None,
        }
    }
}

/// Whether a raw value carries the structural signature of `kind`
pub fn has_signature(kind: EntryKind, value: &Value) -> bool {
    match (kind, value) {
        (EntryKind::Text, Value::String(_)) => true,
        (EntryKind::Text, _) => false,
        (_, Value::Mapping(map)) => {
            let fields = Fields::new(map, FieldPath::root());
            kind.missing_signature_keys(&fields).is_empty()
        }
        _ => false,
    }
}

/// Variants whose signature fits `value`, in matching order
pub fn signature_matches(value: &Value) -> Vec<EntryKind> {
    match value {
        Value::String(_) => vec![EntryKind::Text],
        Value::Mapping(_) => MATCH_ORDER
            .into_iter()
            .filter(|kind| has_signature(*kind, value))
            .collect(),
        _ => Vec::new(),
    }
}

/// Infer the variant of a raw entry and build it
pub fn match_entry(
    value: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
) -> Result<Entry, Issues> {
    let map = match value {
        Value::String(_) => return validate_entry_as(EntryKind::Text, value, path, ctx),
        Value::Mapping(map) => map,
        other => {
            return Err(vec![ValidationIssue::structural(
                path.clone(),
                EntryKind::ALL.iter().map(|k| k.name().to_string()).collect(),
                format!("expected an entry mapping or a text string, got {}", describe(other)),
            )])
        }
    };

    let fields = Fields::new(map, path.clone());
    let matching: Vec<EntryKind> = MATCH_ORDER
        .into_iter()
        .filter(|kind| kind.missing_signature_keys(&fields).is_empty())
        .collect();

    match matching.as_slice() {
        [] => {
            let near: Vec<EntryKind> = MATCH_ORDER
                .into_iter()
                .filter(|kind| kind.touches(&fields))
                .collect();
            let hints: Vec<String> = near
                .iter()
                .map(|kind| {
                    format!(
                        "{} is missing {}",
                        kind,
                        kind.missing_signature_keys(&fields).join(", ")
                    )
                })
                .collect();
            let candidates = if near.is_empty() {
                MATCH_ORDER.iter().map(|k| k.name().to_string()).collect()
            } else {
                near.iter().map(|k| k.name().to_string()).collect()
            };
            let mut reason = "does not match any entry type".to_string();
            if !hints.is_empty() {
                reason.push_str(&format!(" ({})", hints.join("; ")));
            }
            Err(vec![ValidationIssue::structural(path.clone(), candidates, reason)])
        }
        [kind] => validate_entry_as(*kind, value, path, ctx),
        several => {
            for kind in several {
                if let Ok(entry) = validate_entry_as(*kind, value, path, ctx) {
                    log::debug!("{}: ambiguous entry resolved as {}", path, kind);
                    return Ok(entry);
                }
            }
            Err(vec![ValidationIssue::structural(
                path.clone(),
                several.iter().map(|k| k.name().to_string()).collect(),
                "has the keys of several entry types but is valid as none of them",
            )])
        }
    }
}

/// Build `value` as the given variant, collecting every field problem
pub fn validate_entry_as(
    kind: EntryKind,
    value: &Value,
    path: &FieldPath,
    ctx: &ValidationContext,
) -> Result<Entry, Issues> {
    if kind == EntryKind::Text {
        return match value {
            Value::String(text) => Ok(Entry::Text(text.clone())),
            other => Err(vec![ValidationIssue::field(
                path.clone(),
                describe(other),
                "a TextEntry is a plain string",
            )]),
        };
    }

    let Some(map) = value.as_mapping() else {
        return Err(vec![ValidationIssue::field(
            path.clone(),
            describe(value),
            format!("a {} is a mapping", kind),
        )]);
    };

    let fields = Fields::new(map, path.clone());
    let mut issues = Vec::new();
    fields.reject_unknown(kind.allowed_fields(), &mut issues);

    let entry = match kind {
        EntryKind::Education => read_education(&fields, ctx, &mut issues),
        EntryKind::Experience => read_experience(&fields, ctx, &mut issues),
        EntryKind::Publication => read_publication(&fields, ctx, &mut issues),
        EntryKind::Normal => read_normal(&fields, ctx, &mut issues),
        EntryKind::OneLine => read_one_line(&fields, &mut issues),
        EntryKind::Text => None,
    };

    match entry {
        Some(entry) if issues.is_empty() => Ok(entry),
        _ => Err(issues),
    }
}

fn read_education(fields: &Fields<'_>, ctx: &ValidationContext, issues: &mut Issues) -> Option<Entry> {
    let institution = fields.required_text("institution", issues);
    let area = fields.text("area", issues);
    let degree = fields.text("degree", issues);
    if !fields.has("area") && !fields.has("degree") {
        issues.push(ValidationIssue::field(
            fields.path().key("area"),
            "nothing",
            "an EducationEntry needs an area or a degree",
        ));
    }
    let dates = EntryDates::read(fields, issues);
    let location = fields.text("location", issues);
    let summary = fields.text("summary", issues);
    let highlights = fields.text_list("highlights", issues);

    let presentation = DatePresentation::compute(&dates, ctx);
    Some(Entry::Education(EducationEntry {
        institution: institution?,
        area,
        degree,
        dates,
        location,
        summary,
        highlights,
        presentation,
    }))
}

fn read_experience(fields: &Fields<'_>, ctx: &ValidationContext, issues: &mut Issues) -> Option<Entry> {
    let company = fields.required_text("company", issues);
    let position = fields.required_text("position", issues);
    let dates = EntryDates::read(fields, issues);
    let location = fields.text("location", issues);
    let summary = fields.text("summary", issues);
    let highlights = fields.text_list("highlights", issues);

    let presentation = DatePresentation::compute(&dates, ctx);
    Some(Entry::Experience(ExperienceEntry {
        company: company?,
        position: position?,
        dates,
        location,
        summary,
        highlights,
        presentation,
    }))
}

fn read_publication(fields: &Fields<'_>, ctx: &ValidationContext, issues: &mut Issues) -> Option<Entry> {
    let title = fields.required_text("title", issues);
    let authors = fields.text_list("authors", issues);
    let authors_is_list = fields.get("authors").is_none_or(|v| v.is_sequence());
    if authors.is_empty() && authors_is_list {
        issues.push(ValidationIssue::field(
            fields.path().key("authors"),
            describe(fields.get("authors").unwrap_or(&Value::Null)),
            "a publication needs at least one author",
        ));
    }
    let doi = fields.text("doi", issues);
    if let Some(doi) = &doi {
        if !DOI_RE.is_match(doi) {
            issues.push(ValidationIssue::field(
                fields.path().key("doi"),
                format!("\"{}\"", doi),
                "expected a DOI such as 10.1109/5.771073",
            ));
        }
    }
    let url = fields.link("url", Link::url, issues);
    if fields.has("doi") && fields.has("url") {
        issues.push(ValidationIssue::field(
            fields.path().key("url"),
            describe(fields.get("url").unwrap_or(&Value::Null)),
            "url cannot be combined with doi",
        ));
    }
    let journal = fields.text("journal", issues);
    let date = fields.text("date", issues);
    let summary = fields.text("summary", issues);

    let date_string = EntryDates {
        date: date.clone(),
        ..EntryDates::default()
    }
    .date_string(ctx);
    let presentation = PublicationPresentation {
        date_string,
        doi_url: doi.as_ref().map(|d| format!("https://doi.org/{}", d)),
    };

    Some(Entry::Publication(PublicationEntry {
        title: title?,
        authors,
        doi,
        url,
        journal,
        date,
        summary,
        presentation,
    }))
}

fn read_normal(fields: &Fields<'_>, ctx: &ValidationContext, issues: &mut Issues) -> Option<Entry> {
    let name = fields.required_text("name", issues);
    let dates = EntryDates::read(fields, issues);
    let location = fields.text("location", issues);
    let summary = fields.text("summary", issues);
    let highlights = fields.text_list("highlights", issues);

    let presentation = DatePresentation::compute(&dates, ctx);
    Some(Entry::Normal(NormalEntry {
        name: name?,
        dates,
        location,
        summary,
        highlights,
        presentation,
    }))
}

fn read_one_line(fields: &Fields<'_>, issues: &mut Issues) -> Option<Entry> {
    let label = fields.required_text("label", issues);
    let details = fields.required_text("details", issues);
    Some(Entry::OneLine(OneLineEntry {
        label: label?,
        details: details?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use chrono::NaiveDate;

    fn ctx() -> ValidationContext {
        ValidationContext::new(
            Locale::default(),
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )
    }

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn path() -> FieldPath {
        FieldPath::from_keys(&["cv", "sections", "s"]).index(0)
    }

    #[test]
    fn test_structural_matching() {
        let cases = [
            ("company: Acme\nposition: Engineer\n", EntryKind::Experience),
            ("institution: MIT\ndegree: BS\n", EntryKind::Education),
            ("institution: MIT\narea: Physics\n", EntryKind::Education),
            ("title: Paper\nauthors: [A, B]\n", EntryKind::Publication),
            ("label: Languages\ndetails: Rust, C\n", EntryKind::OneLine),
            ("name: Side project\n", EntryKind::Normal),
            ("Just some text\n", EntryKind::Text),
        ];
        for (input, expected) in cases {
            let entry = match_entry(&yaml(input), &path(), &ctx()).unwrap();
            assert_eq!(entry.kind(), expected, "{input}");
        }
    }

    #[test]
    fn test_no_match_lists_near_candidates() {
        let issues = match_entry(&yaml("company: Acme\n"), &path(), &ctx()).unwrap_err();
        match &issues[0] {
            ValidationIssue::Structural {
                candidates, reason, ..
            } => {
                assert_eq!(candidates, &vec!["ExperienceEntry".to_string()]);
                assert!(reason.contains("missing position"));
            }
            other => panic!("expected structural issue, got {other:?}"),
        }
    }

    #[test]
    fn test_no_match_without_any_known_key_lists_all_mapping_variants() {
        let issues = match_entry(&yaml("foo: bar\n"), &path(), &ctx()).unwrap_err();
        match &issues[0] {
            ValidationIssue::Structural { candidates, .. } => assert_eq!(candidates.len(), 5),
            other => panic!("expected structural issue, got {other:?}"),
        }
    }

    #[test]
    fn test_ambiguous_without_valid_variant() {
        let input = yaml("company: Acme\nposition: Dev\nname: Extra\n");
        let issues = match_entry(&input, &path(), &ctx()).unwrap_err();
        match &issues[0] {
            ValidationIssue::Structural { candidates, .. } => {
                assert_eq!(candidates, &vec!["ExperienceEntry".to_string(), "NormalEntry".to_string()]);
            }
            other => panic!("expected structural issue, got {other:?}"),
        }
    }

    #[test]
    fn test_non_mapping_non_string() {
        let issues = match_entry(&yaml("42"), &path(), &ctx()).unwrap_err();
        assert!(issues[0].is_structural());
    }

    #[test]
    fn test_field_errors_are_all_reported() {
        let input = yaml("company: Acme\nposition: Dev\nstart_date: soon\nhighlights: nope\nfoo: 1\n");
        let issues = match_entry(&input, &path(), &ctx()).unwrap_err();
        let paths: Vec<String> = issues.iter().map(|i| i.path().to_string()).collect();
        assert!(paths.contains(&"cv.sections.s[0].start_date".to_string()));
        assert!(paths.contains(&"cv.sections.s[0].highlights".to_string()));
        assert!(paths.contains(&"cv.sections.s[0].foo".to_string()));
    }

    #[test]
    fn test_ongoing_experience_ends_with_present() {
        let entry = match_entry(
            &yaml("company: Acme\nposition: Dev\nstart_date: 2022-02\n"),
            &path(),
            &ctx(),
        )
        .unwrap();
        assert_eq!(entry.date_string().as_str(), "Feb 2022 – present");
        assert_eq!(entry.time_span_string(), "2 years 4 months");
    }

    #[test]
    fn test_reversed_dates_fail() {
        let input = yaml("company: Acme\nposition: Dev\nstart_date: 2022-02\nend_date: 2020-01\n");
        assert!(match_entry(&input, &path(), &ctx()).is_err());
    }

    #[test]
    fn test_publication_doi() {
        let entry = match_entry(
            &yaml("title: T\nauthors: [Jane]\ndoi: 10.1109/5.771073\ndate: 2021-04\n"),
            &path(),
            &ctx(),
        )
        .unwrap();
        let Entry::Publication(publication) = entry else {
            panic!("expected publication");
        };
        assert_eq!(
            publication.presentation.doi_url.as_deref(),
            Some("https://doi.org/10.1109/5.771073")
        );
        assert_eq!(publication.presentation.date_string.as_str(), "Apr 2021");
    }

    #[test]
    fn test_publication_doi_and_url_are_exclusive() {
        let input = yaml("title: T\nauthors: [Jane]\ndoi: 10.1109/5.771073\nurl: https://example.com\n");
        let issues = match_entry(&input, &path(), &ctx()).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path().to_string(), "cv.sections.s[0].url");
    }

    #[test]
    fn test_publication_needs_authors() {
        let input = yaml("title: T\nauthors: []\n");
        assert!(match_entry(&input, &path(), &ctx()).is_err());
    }

    #[test]
    fn test_reserialized_entry_validates_to_same_value() {
        let inputs = [
            "company: Acme\nposition: Dev\nstart_date: 2020-01\nend_date: 2021\nlocation: Berlin\nhighlights: [a, b]\n",
            "institution: MIT\narea: CS\ndegree: PhD\ndate: Fall 2019\n",
            "title: T\nauthors: [A]\nurl: https://example.com/paper\njournal: J\ndate: 2020\n",
            "label: L\ndetails: D\n",
            "name: N\nsummary: S\n",
            "plain text",
        ];
        for input in inputs {
            let first = match_entry(&yaml(input), &path(), &ctx()).unwrap();
            let reserialized = serde_yaml::to_value(&first).unwrap();
            let second = validate_entry_as(first.kind(), &reserialized, &path(), &ctx()).unwrap();
            assert_eq!(first, second, "{input}");
        }
    }

    #[test]
    fn test_kind_from_name() {
        assert_eq!(EntryKind::from_name("ExperienceEntry"), Some(EntryKind::Experience));
        assert_eq!(EntryKind::from_name("one_line_entry"), Some(EntryKind::OneLine));
        assert_eq!(EntryKind::from_name("Bullet"), None);
    }

    #[test]
    fn test_has_signature() {
        assert!(has_signature(EntryKind::Text, &yaml("hello")));
        assert!(has_signature(EntryKind::OneLine, &yaml("label: a\ndetails: b\n")));
        assert!(!has_signature(EntryKind::OneLine, &yaml("name: a\n")));
    }
}
