//! Template resolution for a theme and output format
//!
//! Resolution order:
//! 1. A custom theme's directory (`<themes-dir>/<id>/<Name>.tmp.typ`)
//! 2. The built-in template set
//!
//! Custom Typst templates never fall back: the frame templates and the
//! template of every entry type the document uses must exist. Markdown
//! templates fall back per file.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::format::OutputFormat;
use crate::model::EntryKind;
use crate::template::TemplateEngine;
use crate::theme::builtin_templates::builtin_template;
use crate::theme::error::ThemeError;
use crate::theme::registry::Theme;

/// Logical template name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateName {
    Preamble,
    Header,
    SectionBeginning,
    SectionEnding,
    Entry(EntryKind),
}

impl TemplateName {
    /// Templates every document needs
    pub const FRAME: [TemplateName; 4] = [
        TemplateName::Preamble,
        TemplateName::Header,
        TemplateName::SectionBeginning,
        TemplateName::SectionEnding,
    ];

    pub fn all() -> Vec<TemplateName> {
        Self::FRAME
            .into_iter()
            .chain(EntryKind::ALL.into_iter().map(TemplateName::Entry))
            .collect()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateName::Preamble => "Preamble",
            TemplateName::Header => "Header",
            TemplateName::SectionBeginning => "SectionBeginning",
            TemplateName::SectionEnding => "SectionEnding",
            TemplateName::Entry(kind) => kind.name(),
        }
    }

    /// e.g. `ExperienceEntry.tmp.typ`
    pub fn file_name(&self, format: OutputFormat) -> String {
        format!("{}{}", self.as_str(), format.template_suffix())
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateOrigin {
    Builtin,
    File(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: TemplateName,
    pub text: String,
    pub origin: TemplateOrigin,
}

/// Templates of one theme in one format, all syntax-checked
#[derive(Debug, Clone)]
pub struct TemplateSet {
    theme: String,
    format: OutputFormat,
    templates: BTreeMap<TemplateName, Template>,
}

impl TemplateSet {
    pub fn theme(&self) -> &str {
        &self.theme
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn get(&self, name: TemplateName) -> Option<&Template> {
        self.templates.get(&name)
    }

    /// Template that must exist, as a theme error otherwise
    pub fn require(&self, name: TemplateName) -> Result<&Template, ThemeError> {
        self.get(name).ok_or_else(|| ThemeError::MissingTemplate {
            theme: self.theme.clone(),
            template: name.to_string(),
            path: name.file_name(self.format),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = TemplateName> + '_ {
        self.templates.keys().copied()
    }
}

/// Load and check the templates `theme` needs to render `entry_kinds` as `format`
pub fn load_templates(
    theme: &Theme,
    format: OutputFormat,
    entry_kinds: &[EntryKind],
) -> Result<TemplateSet, ThemeError> {
    let mut templates = BTreeMap::new();

    for name in TemplateName::all() {
        let required = match name {
            TemplateName::Entry(kind) => entry_kinds.contains(&kind),
            _ => true,
        };
        let template = match theme.dir() {
            None => Some(builtin(name, format)),
            Some(dir) => load_custom(theme.id(), dir, name, format, required)?,
        };
        if let Some(template) = template {
            templates.insert(name, template);
        }
    }

    let engine = TemplateEngine::new();
    for template in templates.values() {
        engine
            .validate(&template.text)
            .map_err(|e| ThemeError::MalformedTemplate {
                theme: theme.id().to_string(),
                template: template.name.to_string(),
                message: e.to_string(),
            })?;
    }

    log::debug!(
        "loaded {} {} template(s) for theme '{}'",
        templates.len(),
        format,
        theme.id()
    );
    Ok(TemplateSet {
        theme: theme.id().to_string(),
        format,
        templates,
    })
}

fn builtin(name: TemplateName, format: OutputFormat) -> Template {
    Template {
        name,
        text: builtin_template(format, name).to_string(),
        origin: TemplateOrigin::Builtin,
    }
}

fn load_custom(
    theme: &str,
    dir: &Path,
    name: TemplateName,
    format: OutputFormat,
    required: bool,
) -> Result<Option<Template>, ThemeError> {
    let path = dir.join(name.file_name(format));
    if path.is_file() {
        let text = std::fs::read_to_string(&path).map_err(|e| ThemeError::io(&path, e))?;
        return Ok(Some(Template {
            name,
            text,
            origin: TemplateOrigin::File(path),
        }));
    }

    match format {
        OutputFormat::Markdown => {
            log::debug!("theme '{}': using built-in {}", theme, name.file_name(format));
            Ok(Some(builtin(name, format)))
        }
        OutputFormat::Typst if required => Err(ThemeError::MissingTemplate {
            theme: theme.to_string(),
            template: name.to_string(),
            path: path.display().to_string(),
        }),
        OutputFormat::Typst => Ok(None),
    }
}
