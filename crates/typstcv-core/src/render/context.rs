//! Template contexts: the model converted to target-ready TOML values
//!
//! Every string placed in a context is already safe for the output format.
//! Templates only arrange values; they never escape.

use toml::map::Map;
use toml::Value;

use crate::design::{DesignConfig, OptionKind, OptionValue, ThemeSchema};
use crate::format::OutputFormat;
use crate::model::dates::DateString;
use crate::model::document::Cv;
use crate::model::entry::{
    EducationEntry, Entry, ExperienceEntry, NormalEntry, OneLineEntry, PublicationEntry,
};
use crate::model::error::FieldPath;
use crate::model::input::InputDocument;
use crate::model::section::Section;
use crate::render::error::RenderError;
use crate::render::markup::TextConverter;
use crate::types::length::format_number;

/// Builds the `cv`, `design`, `section` and `entry` values for one format
pub(crate) struct ContextBuilder<'a> {
    input: &'a InputDocument,
    schema: &'a ThemeSchema,
    converter: TextConverter,
}

fn string(text: impl Into<String>) -> Value {
    Value::String(text.into())
}

fn strings<I, S>(items: I) -> Value
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Array(items.into_iter().map(|s| string(s)).collect())
}

impl<'a> ContextBuilder<'a> {
    pub(crate) fn new(input: &'a InputDocument, schema: &'a ThemeSchema, format: OutputFormat) -> Self {
        Self {
            input,
            schema,
            converter: TextConverter::new(format, &input.settings.bold_keywords),
        }
    }

    fn format(&self) -> OutputFormat {
        self.converter.format()
    }

    fn markup(&self, text: &str, path: &FieldPath) -> Result<String, RenderError> {
        self.converter
            .markup(text)
            .map_err(|source| RenderError::Markup {
                path: path.to_string(),
                source,
            })
    }

    fn optional_markup(&self, text: Option<&str>, path: &FieldPath) -> Result<Value, RenderError> {
        Ok(string(match text {
            Some(text) => self.markup(text, path)?,
            None => String::new(),
        }))
    }

    fn markup_list(&self, items: &[String], path: &FieldPath) -> Result<Value, RenderError> {
        let converted = items
            .iter()
            .enumerate()
            .map(|(i, item)| self.markup(item, &path.index(i)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(strings(converted))
    }

    /// Keys shared by every template
    pub(crate) fn document(&self) -> Result<Map<String, Value>, RenderError> {
        let mut root = Map::new();
        root.insert("cv".to_string(), self.cv(&self.input.cv)?);
        root.insert("design".to_string(), self.design(&self.input.design));
        root.insert("locale".to_string(), self.locale());

        let today = self.input.today;
        let locale = &self.input.locale;
        let formatted = locale.format_components(
            chrono::Datelike::year(&today),
            Some(chrono::Datelike::month(&today)),
            None,
        );
        root.insert("today".to_string(), string(self.converter.plain(&formatted)));
        root.insert(
            "today_iso".to_string(),
            string(today.format("%Y-%m-%d").to_string()),
        );
        root.insert("theme".to_string(), string(self.input.design.theme()));
        Ok(root)
    }

    fn cv(&self, cv: &Cv) -> Result<Value, RenderError> {
        let path = FieldPath::from_keys(&["cv"]);
        let mut table = Map::new();
        table.insert(
            "name".to_string(),
            self.optional_markup(cv.name.as_deref(), &path.key("name"))?,
        );
        table.insert(
            "location".to_string(),
            self.optional_markup(cv.location.as_deref(), &path.key("location"))?,
        );
        table.insert(
            "photo".to_string(),
            string(
                cv.photo
                    .as_deref()
                    .map(|p| self.converter.literal(p))
                    .unwrap_or_default(),
            ),
        );

        let count = cv.connections().len();
        let mut connections = Vec::with_capacity(count);
        for (i, connection) in cv.connections().iter().enumerate() {
            let mut item = Map::new();
            item.insert("kind".to_string(), string(connection.kind.name()));
            item.insert(
                "href".to_string(),
                string(
                    connection
                        .href
                        .as_deref()
                        .map(|h| self.converter.href(h))
                        .unwrap_or_default(),
                ),
            );
            let display = match connection.href {
                // Location is free text, every other label comes from a link
                None => self.markup(&connection.display, &path.key("location"))?,
                Some(_) => self.converter.plain(&connection.display),
            };
            item.insert("display".to_string(), string(display));
            item.insert("last".to_string(), Value::Boolean(i + 1 == count));
            connections.push(Value::Table(item));
        }
        table.insert("connections".to_string(), Value::Array(connections));
        Ok(Value::Table(table))
    }

    /// `design.<group>.<option>`, plus `<option>_is.<choice>` flags for choices
    fn design(&self, design: &DesignConfig) -> Value {
        let mut groups: Map<String, Value> = Map::new();
        for (group, name, value) in design.iter() {
            let kind = self.schema.option(group, name).map(|spec| spec.kind);
            let Value::Table(table) = groups
                .entry(group.to_string())
                .or_insert(Value::Table(Map::new()))
            else {
                continue;
            };

            let converted = match value {
                OptionValue::Length(length) => string(length.to_string()),
                OptionValue::Color(color) => string(color.to_string()),
                OptionValue::Bool(b) => Value::Boolean(*b),
                OptionValue::Number(n) => string(format_number(*n)),
                // Choices are identifiers from a closed list
                OptionValue::Text(text) if kind == Some(OptionKind::Choice) => {
                    let mut flags = Map::new();
                    flags.insert(text.clone(), Value::Boolean(true));
                    table.insert(format!("{name}_is"), Value::Table(flags));
                    string(text.clone())
                }
                OptionValue::Text(text) => string(self.converter.literal(text)),
                OptionValue::List(items) => {
                    strings(items.iter().map(|item| self.converter.literal(item)))
                }
            };
            table.insert(name.to_string(), converted);
        }
        Value::Table(groups)
    }

    fn locale(&self) -> Value {
        let locale = &self.input.locale;
        let plain = |text: &str| string(self.converter.plain(text));
        let mut table = Map::new();
        table.insert("present".to_string(), plain(&locale.present));
        table.insert("to".to_string(), plain(&locale.to));
        table.insert("month".to_string(), plain(&locale.month));
        table.insert("months".to_string(), plain(&locale.months));
        table.insert("year".to_string(), plain(&locale.year));
        table.insert("years".to_string(), plain(&locale.years));
        table.insert("last_updated".to_string(), plain(&locale.last_updated));
        table.insert("page".to_string(), plain(&locale.page));
        Value::Table(table)
    }

    pub(crate) fn section(&self, section: &Section) -> Value {
        let show_time_spans = self
            .input
            .design
            .list("entries.show_time_spans_in")
            .iter()
            .any(|s| *s == section.key || *s == section.title);

        let mut table = Map::new();
        table.insert("key".to_string(), string(self.converter.plain(&section.key)));
        table.insert("title".to_string(), string(self.converter.plain(&section.title)));
        table.insert("entry_type".to_string(), string(section.entry_kind.name()));
        table.insert(
            "link_text".to_string(),
            string(
                section
                    .link_text
                    .as_deref()
                    .map(|t| self.converter.plain(t))
                    .unwrap_or_default(),
            ),
        );
        table.insert("show_time_spans".to_string(), Value::Boolean(show_time_spans));
        Value::Table(table)
    }

    pub(crate) fn entry(
        &self,
        entry: &Entry,
        section: &Section,
        index: usize,
    ) -> Result<Value, RenderError> {
        let path = FieldPath::from_keys(&["cv", "sections", &section.key]).index(index);
        let mut table = match entry {
            Entry::Education(e) => self.education(e, &path)?,
            Entry::Experience(e) => self.experience(e, &path)?,
            Entry::Publication(e) => self.publication(e, section, &path)?,
            Entry::Normal(e) => self.normal(e, &path)?,
            Entry::OneLine(e) => self.one_line(e, &path)?,
            Entry::Text(text) => {
                let mut table = Map::new();
                table.insert("text".to_string(), string(self.markup(text, &path)?));
                table
            }
        };
        self.dates(entry, &path, &mut table)?;
        Ok(Value::Table(table))
    }

    /// `date_string`, `time_span_string` and `date_and_location_string`
    fn dates(
        &self,
        entry: &Entry,
        path: &FieldPath,
        table: &mut Map<String, Value>,
    ) -> Result<(), RenderError> {
        let date = match entry.date_string() {
            DateString::None => String::new(),
            DateString::Formatted(text) => self.converter.plain(text),
            DateString::FreeText(text) => self.markup(text, &path.key("date"))?,
        };
        let location = match entry.location() {
            Some(location) => self.markup(location, &path.key("location"))?,
            None => String::new(),
        };
        let separator = match self.format() {
            OutputFormat::Typst => " \\ ",
            OutputFormat::Markdown => ", ",
        };
        let date_and_location = [location.as_str(), date.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(separator);

        table.insert("date_string".to_string(), string(date));
        table.insert(
            "time_span_string".to_string(),
            string(self.converter.plain(entry.time_span_string())),
        );
        table.insert(
            "date_and_location_string".to_string(),
            string(date_and_location),
        );
        Ok(())
    }

    /// `location`, `summary` and `highlights` of dated entries
    fn details(
        &self,
        location: Option<&str>,
        summary: Option<&str>,
        highlights: &[String],
        path: &FieldPath,
        table: &mut Map<String, Value>,
    ) -> Result<(), RenderError> {
        table.insert(
            "location".to_string(),
            self.optional_markup(location, &path.key("location"))?,
        );
        table.insert(
            "summary".to_string(),
            self.optional_markup(summary, &path.key("summary"))?,
        );
        table.insert(
            "highlights".to_string(),
            self.markup_list(highlights, &path.key("highlights"))?,
        );
        Ok(())
    }

    fn education(&self, e: &EducationEntry, path: &FieldPath) -> Result<Map<String, Value>, RenderError> {
        let mut table = Map::new();
        table.insert(
            "institution".to_string(),
            string(self.markup(&e.institution, &path.key("institution"))?),
        );
        table.insert(
            "area".to_string(),
            self.optional_markup(e.area.as_deref(), &path.key("area"))?,
        );
        table.insert(
            "degree".to_string(),
            self.optional_markup(e.degree.as_deref(), &path.key("degree"))?,
        );
        self.details(
            e.location.as_deref(),
            e.summary.as_deref(),
            &e.highlights,
            path,
            &mut table,
        )?;
        Ok(table)
    }

    fn experience(&self, e: &ExperienceEntry, path: &FieldPath) -> Result<Map<String, Value>, RenderError> {
        let mut table = Map::new();
        table.insert(
            "company".to_string(),
            string(self.markup(&e.company, &path.key("company"))?),
        );
        table.insert(
            "position".to_string(),
            string(self.markup(&e.position, &path.key("position"))?),
        );
        self.details(
            e.location.as_deref(),
            e.summary.as_deref(),
            &e.highlights,
            path,
            &mut table,
        )?;
        Ok(table)
    }

    fn normal(&self, e: &NormalEntry, path: &FieldPath) -> Result<Map<String, Value>, RenderError> {
        let mut table = Map::new();
        table.insert("name".to_string(), string(self.markup(&e.name, &path.key("name"))?));
        self.details(
            e.location.as_deref(),
            e.summary.as_deref(),
            &e.highlights,
            path,
            &mut table,
        )?;
        Ok(table)
    }

    fn one_line(&self, e: &OneLineEntry, path: &FieldPath) -> Result<Map<String, Value>, RenderError> {
        let mut table = Map::new();
        table.insert("label".to_string(), string(self.markup(&e.label, &path.key("label"))?));
        table.insert(
            "details".to_string(),
            string(self.markup(&e.details, &path.key("details"))?),
        );
        Ok(table)
    }

    fn publication(
        &self,
        e: &PublicationEntry,
        section: &Section,
        path: &FieldPath,
    ) -> Result<Map<String, Value>, RenderError> {
        let mut table = Map::new();
        table.insert("title".to_string(), string(self.markup(&e.title, &path.key("title"))?));

        let authors = e
            .authors
            .iter()
            .enumerate()
            .map(|(i, author)| self.markup(author, &path.key("authors").index(i)))
            .collect::<Result<Vec<_>, _>>()?;
        table.insert("authors_joined".to_string(), string(authors.join(", ")));
        table.insert("authors".to_string(), strings(authors));

        table.insert(
            "journal".to_string(),
            self.optional_markup(e.journal.as_deref(), &path.key("journal"))?,
        );
        table.insert(
            "summary".to_string(),
            self.optional_markup(e.summary.as_deref(), &path.key("summary"))?,
        );
        table.insert(
            "doi".to_string(),
            string(
                e.doi
                    .as_deref()
                    .map(|d| self.converter.plain(d))
                    .unwrap_or_default(),
            ),
        );

        let (href, default_label) = match (&e.presentation.doi_url, &e.url) {
            (Some(doi_url), _) => (Some(doi_url.clone()), e.doi.clone().unwrap_or_default()),
            (None, Some(url)) => (Some(url.href()), url.display()),
            (None, None) => (None, String::new()),
        };
        let label = section.link_text.clone().unwrap_or(default_label);
        table.insert(
            "doi_url".to_string(),
            string(
                e.presentation
                    .doi_url
                    .as_deref()
                    .map(|u| self.converter.href(u))
                    .unwrap_or_default(),
            ),
        );
        table.insert(
            "url".to_string(),
            string(href.as_deref().map(|u| self.converter.href(u)).unwrap_or_default()),
        );
        table.insert(
            "url_display".to_string(),
            string(if href.is_some() {
                self.converter.plain(&label)
            } else {
                String::new()
            }),
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::builtin::builtin_schema;
    use crate::model::input::parse_input;
    use crate::theme::ThemeRegistry;
    use chrono::NaiveDate;

    fn input(yaml: &str) -> InputDocument {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        parse_input(yaml, &ThemeRegistry::builtin(), today).unwrap()
    }

    fn lookup<'v>(value: &'v Value, key: &str) -> &'v Value {
        key.split('.')
            .fold(value, |v, part| v.get(part).unwrap_or_else(|| panic!("missing {key}")))
    }

    #[test]
    fn test_design_values_are_target_ready() {
        let doc = input("cv:\n  name: Jane\ndesign:\n  theme: classic\n  text:\n    font_family: 'Source \"Sans\"'\n");
        let schema = builtin_schema("classic").unwrap();
        let builder = ContextBuilder::new(&doc, &schema, OutputFormat::Typst);
        let root = Value::Table(builder.document().unwrap());

        assert_eq!(lookup(&root, "design.page.top_margin").as_str(), Some("2cm"));
        assert_eq!(
            lookup(&root, "design.text.font_family").as_str(),
            Some(r#"Source \"Sans\""#)
        );
        assert_eq!(
            lookup(&root, "design.text.alignment_is.justified").as_bool(),
            Some(true)
        );
        assert_eq!(lookup(&root, "today").as_str(), Some("June 2024"));
        assert_eq!(lookup(&root, "today_iso").as_str(), Some("2024-06-01"));
        assert_eq!(lookup(&root, "theme").as_str(), Some("classic"));
    }

    #[test]
    fn test_connections_are_ordered_and_marked() {
        let doc = input(
            "cv:\n  name: Jane\n  location: Berlin\n  email: jane@example.com\n  social_networks:\n    - network: GitHub\n      username: jane\n",
        );
        let schema = builtin_schema("classic").unwrap();
        let builder = ContextBuilder::new(&doc, &schema, OutputFormat::Markdown);
        let root = Value::Table(builder.document().unwrap());
        let connections = lookup(&root, "cv.connections").as_array().unwrap();

        let kinds: Vec<&str> = connections
            .iter()
            .map(|c| c.get("kind").and_then(Value::as_str).unwrap())
            .collect();
        assert_eq!(kinds, vec!["Location", "Email", "GitHub"]);
        assert_eq!(connections[0].get("href").and_then(Value::as_str), Some(""));
        assert_eq!(
            connections[1].get("href").and_then(Value::as_str),
            Some("mailto:jane@example.com")
        );
        assert_eq!(connections[2].get("last").and_then(Value::as_bool), Some(true));
        assert_eq!(connections[1].get("last").and_then(Value::as_bool), Some(false));
    }

    #[test]
    fn test_entry_fields_are_converted() {
        let doc = input(
            "cv:\n  sections:\n    experience:\n      - company: 'R&D #1'\n        position: Engineer\n        start_date: 2022-02\n        location: Berlin\n        highlights:\n          - '**Led** migration'\n",
        );
        let schema = builtin_schema("classic").unwrap();
        let builder = ContextBuilder::new(&doc, &schema, OutputFormat::Typst);
        let section = &doc.cv.sections[0];
        let entry = builder.entry(&section.entries[0], section, 0).unwrap();

        assert_eq!(lookup(&entry, "company").as_str(), Some(r"R&D \#1"));
        assert_eq!(
            lookup(&entry, "highlights").as_array().unwrap()[0].as_str(),
            Some("#strong[Led] migration")
        );
        assert_eq!(lookup(&entry, "date_string").as_str(), Some("Feb 2022 – present"));
        assert_eq!(
            lookup(&entry, "date_and_location_string").as_str(),
            Some(r"Berlin \ Feb 2022 – present")
        );
        assert_eq!(lookup(&entry, "summary").as_str(), Some(""));
    }

    #[test]
    fn test_markup_error_names_the_field() {
        let doc = input("cv:\n  sections:\n    notes:\n      - 'fine'\n      - 'broken **bold'\n");
        let schema = builtin_schema("classic").unwrap();
        let builder = ContextBuilder::new(&doc, &schema, OutputFormat::Typst);
        let section = &doc.cv.sections[0];
        let err = builder.entry(&section.entries[1], section, 1).unwrap_err();
        match err {
            RenderError::Markup { path, .. } => assert_eq!(path, "cv.sections.notes[1]"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_time_spans_follow_design_list() {
        let doc = input(
            "cv:\n  sections:\n    experience:\n      - company: A\n        position: B\n        start_date: 2022-02\n    education:\n      - institution: U\n        start_date: 2018-09\n        end_date: 2022-06\ndesign:\n  entries:\n    show_time_spans_in: [experience]\n",
        );
        let schema = builtin_schema("classic").unwrap();
        let builder = ContextBuilder::new(&doc, &schema, OutputFormat::Markdown);
        let experience = builder.section(&doc.cv.sections[0]);
        let education = builder.section(&doc.cv.sections[1]);
        assert_eq!(lookup(&experience, "show_time_spans").as_bool(), Some(true));
        assert_eq!(lookup(&education, "show_time_spans").as_bool(), Some(false));
        assert_eq!(lookup(&experience, "title").as_str(), Some("Experience"));
    }
}
