//! Rendering: validated input + theme templates -> Typst or Markdown source
//!
//! All templates a render needs are resolved before the first one runs, so a
//! missing or malformed template never produces partial output.

mod context;
pub mod error;
pub mod markup;

use chrono::NaiveDate;
use toml::map::Map;
use toml::Value;

use crate::format::OutputFormat;
use crate::model::input::{parse_input, InputDocument};
use crate::template::{TemplateContext, TemplateEngine};
use crate::theme::{load_templates, TemplateName, TemplateSet, ThemeRegistry};

use context::ContextBuilder;

pub use error::{MarkupError, RenderError};
pub use markup::TextConverter;

/// Generated source for one output format
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    pub format: OutputFormat,
    pub text: String,
}

pub struct Renderer<'r> {
    registry: &'r ThemeRegistry,
    engine: TemplateEngine,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r ThemeRegistry) -> Self {
        Self {
            registry,
            engine: TemplateEngine::new(),
        }
    }

    /// Render one format
    pub fn render(&self, input: &InputDocument, format: OutputFormat) -> Result<String, RenderError> {
        let templates = self.templates(input, format)?;
        self.render_with(input, &templates)
    }

    /// Render several formats, resolving every template set up front
    pub fn render_all(
        &self,
        input: &InputDocument,
        formats: &[OutputFormat],
    ) -> Result<Vec<RenderedDocument>, RenderError> {
        let sets = formats
            .iter()
            .map(|format| self.templates(input, *format))
            .collect::<Result<Vec<_>, _>>()?;

        sets.iter()
            .map(|templates| {
                Ok(RenderedDocument {
                    format: templates.format(),
                    text: self.render_with(input, templates)?,
                })
            })
            .collect()
    }

    fn templates(&self, input: &InputDocument, format: OutputFormat) -> Result<TemplateSet, RenderError> {
        let theme = self.registry.get(input.design.theme())?;
        Ok(load_templates(theme, format, &input.cv.entry_kinds())?)
    }

    fn render_with(&self, input: &InputDocument, templates: &TemplateSet) -> Result<String, RenderError> {
        let theme = self.registry.get(templates.theme())?;
        let builder = ContextBuilder::new(input, &theme.schema, templates.format());
        let mut root = builder.document()?;
        let mut output = String::new();

        output.push_str(&self.apply(templates, TemplateName::Preamble, &root)?);
        output.push_str(&self.apply(templates, TemplateName::Header, &root)?);

        for section in &input.cv.sections {
            root.insert("section".to_string(), builder.section(section));
            output.push_str(&self.apply(templates, TemplateName::SectionBeginning, &root)?);

            for (index, entry) in section.entries.iter().enumerate() {
                root.insert("entry".to_string(), builder.entry(entry, section, index)?);
                output.push_str(&self.apply(templates, TemplateName::Entry(entry.kind()), &root)?);
            }
            root.remove("entry");

            output.push_str(&self.apply(templates, TemplateName::SectionEnding, &root)?);
        }

        log::info!(
            "rendered {} section(s) as {} with theme '{}'",
            input.cv.sections.len(),
            templates.format(),
            templates.theme()
        );
        Ok(output)
    }

    fn apply(
        &self,
        templates: &TemplateSet,
        name: TemplateName,
        data: &Map<String, Value>,
    ) -> Result<String, RenderError> {
        let template = templates.require(name)?;
        let context = TemplateContext::new(Value::Table(data.clone()));
        self.engine
            .render(&template.text, &context)
            .map_err(|source| RenderError::Template {
                theme: templates.theme().to_string(),
                template: name.to_string(),
                source,
            })
    }
}

/// Parse, validate and render YAML input in one step
pub fn render_yaml(
    yaml: &str,
    registry: &ThemeRegistry,
    today: NaiveDate,
    formats: &[OutputFormat],
) -> crate::Result<Vec<RenderedDocument>> {
    let input = parse_input(yaml, registry, today)?;
    Ok(Renderer::new(registry).render_all(&input, formats)?)
}
