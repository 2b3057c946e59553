//! Known themes: built-ins plus custom theme directories
//!
//! Custom themes are discovered at most once per registry, the first time a
//! theme is looked up. The result (or the failure) is cached behind a
//! `OnceLock`, so a registry can be shared between threads.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use walkdir::WalkDir;

use crate::design::builtin::{builtin_schemas, default_schema, DEFAULT_THEME};
use crate::design::schema::ThemeSchema;
use crate::format::OutputFormat;
use crate::theme::error::ThemeError;
use crate::theme::extension::{parse_extension, EXTENSION_FILE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeSource {
    Builtin,
    /// Directory holding the theme's templates
    Custom(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub schema: ThemeSchema,
    pub source: ThemeSource,
}

impl Theme {
    pub fn id(&self) -> &str {
        &self.schema.id
    }

    pub fn dir(&self) -> Option<&Path> {
        match &self.source {
            ThemeSource::Builtin => None,
            ThemeSource::Custom(dir) => Some(dir),
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self.source, ThemeSource::Custom(_))
    }
}

#[derive(Debug)]
pub struct ThemeRegistry {
    builtins: Vec<Theme>,
    themes_dir: Option<PathBuf>,
    discovered: OnceLock<Result<Vec<Theme>, ThemeError>>,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ThemeRegistry {
    /// Built-in themes only
    pub fn builtin() -> Self {
        let builtins = builtin_schemas()
            .into_iter()
            .map(|schema| Theme {
                schema,
                source: ThemeSource::Builtin,
            })
            .collect();
        Self {
            builtins,
            themes_dir: None,
            discovered: OnceLock::new(),
        }
    }

    /// Built-in themes plus the theme directories found in `dir`
    pub fn with_themes_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            themes_dir: Some(dir.into()),
            ..Self::builtin()
        }
    }

    pub fn themes_dir(&self) -> Option<&Path> {
        self.themes_dir.as_deref()
    }

    /// Custom themes, discovering them on first use
    pub fn custom_themes(&self) -> Result<&[Theme], ThemeError> {
        let Some(dir) = &self.themes_dir else {
            return Ok(&[]);
        };
        self.discovered
            .get_or_init(|| discover(dir))
            .as_ref()
            .map(Vec::as_slice)
            .map_err(|e| e.clone())
    }

    /// Every theme; a custom theme replaces a built-in with the same id
    pub fn themes(&self) -> Result<Vec<&Theme>, ThemeError> {
        let custom = self.custom_themes()?;
        let mut themes: Vec<&Theme> = self
            .builtins
            .iter()
            .filter(|b| !custom.iter().any(|c| c.id() == b.id()))
            .collect();
        themes.extend(custom.iter());
        Ok(themes)
    }

    pub fn ids(&self) -> Result<Vec<String>, ThemeError> {
        Ok(self.themes()?.iter().map(|t| t.id().to_string()).collect())
    }

    pub fn get(&self, id: &str) -> Result<&Theme, ThemeError> {
        let custom = self.custom_themes()?;
        if let Some(theme) = custom.iter().find(|t| t.id() == id) {
            return Ok(theme);
        }
        if let Some(theme) = self.builtins.iter().find(|t| t.id() == id) {
            return Ok(theme);
        }
        Err(ThemeError::UnknownTheme {
            theme: id.to_string(),
            known: self.ids()?,
        })
    }

    pub fn default_theme(&self) -> Result<&Theme, ThemeError> {
        self.get(DEFAULT_THEME)
    }
}

/// Scan the direct subdirectories of `dir` for theme directories
fn discover(dir: &Path) -> Result<Vec<Theme>, ThemeError> {
    if !dir.is_dir() {
        log::debug!("themes directory {} does not exist", dir.display());
        return Ok(Vec::new());
    }

    let mut themes = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ThemeError::io(dir, e))?;
        if !entry.file_type().is_dir() {
            continue;
        }
        let Some(id) = entry.file_name().to_str() else {
            log::warn!("skipping theme directory with a non UTF-8 name: {}", entry.path().display());
            continue;
        };
        if id.starts_with('.') || !is_theme_dir(entry.path())? {
            continue;
        }

        let extension = entry.path().join(EXTENSION_FILE);
        let schema = if extension.is_file() {
            let source = std::fs::read_to_string(&extension).map_err(|e| ThemeError::io(&extension, e))?;
            parse_extension(id, &source, &extension)?
        } else {
            ThemeSchema::derive(
                &default_schema(),
                id,
                format!("Custom theme in {}", entry.path().display()),
            )
        };

        log::info!("discovered custom theme '{}' in {}", id, entry.path().display());
        themes.push(Theme {
            schema,
            source: ThemeSource::Custom(entry.path().to_path_buf()),
        });
    }
    Ok(themes)
}

/// Holds `theme.toml` or at least one Typst template
fn is_theme_dir(dir: &Path) -> Result<bool, ThemeError> {
    if dir.join(EXTENSION_FILE).is_file() {
        return Ok(true);
    }
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| ThemeError::io(dir, e))?;
        let is_template = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(OutputFormat::Typst.template_suffix()));
        if entry.file_type().is_file() && is_template {
            return Ok(true);
        }
    }
    Ok(false)
}
