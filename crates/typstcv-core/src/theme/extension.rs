//! `theme.toml`: option schema of a custom theme
//!
//! ```toml
//! extends = "classic"
//! description = "My theme"
//!
//! [defaults.page]
//! top_margin = "1cm"
//!
//! [options.colors.accent]
//! kind = "color"
//! default = "rgb(200, 0, 0)"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::design::builtin::{builtin_schema, BUILTIN_THEMES, DEFAULT_THEME};
use crate::design::option::{OptionKind, OptionSpec, OptionValue};
use crate::design::schema::ThemeSchema;
use crate::theme::error::ThemeError;

pub const EXTENSION_FILE: &str = "theme.toml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExtensionFile {
    extends: Option<String>,
    description: Option<String>,
    /// group -> option -> new default
    #[serde(default)]
    defaults: BTreeMap<String, BTreeMap<String, toml::Value>>,
    /// group -> option -> declaration
    #[serde(default)]
    options: BTreeMap<String, BTreeMap<String, OptionDecl>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionDecl {
    kind: OptionKind,
    default: toml::Value,
    #[serde(default)]
    positive: bool,
    #[serde(default)]
    choices: Vec<String>,
    description: Option<String>,
}

/// Build the schema of custom theme `id` from the contents of its `theme.toml`
pub fn parse_extension(id: &str, source: &str, path: &Path) -> Result<ThemeSchema, ThemeError> {
    let invalid = |message: String| ThemeError::InvalidExtension {
        path: path.display().to_string(),
        message,
    };

    let file: ExtensionFile = toml::from_str(source).map_err(|e| invalid(e.to_string()))?;

    let base_id = file.extends.as_deref().unwrap_or(DEFAULT_THEME);
    let base = builtin_schema(base_id).ok_or_else(|| {
        invalid(format!(
            "extends unknown theme '{}'; built-in themes: {}",
            base_id,
            BUILTIN_THEMES.join(", ")
        ))
    })?;
    let description = file
        .description
        .unwrap_or_else(|| format!("Custom theme based on {}", base_id));
    let mut schema = ThemeSchema::derive(&base, id, description);

    for (group, options) in file.options {
        for (name, decl) in options {
            let spec = declare(&group, &name, decl).map_err(&invalid)?;
            schema.insert(spec);
        }
    }

    for (group, values) in file.defaults {
        for (name, raw) in values {
            let key = format!("{}.{}", group, name);
            let spec = schema
                .option(&group, &name)
                .ok_or_else(|| invalid(format!("defaults.{}: no such option", key)))?;
            let value = parse_default(spec, &raw).map_err(|e| invalid(format!("defaults.{}: {}", key, e)))?;
            schema.set_default(&group, &name, value);
        }
    }

    log::debug!(
        "theme '{}': {} option(s) from {}",
        id,
        schema.options().len(),
        path.display()
    );
    Ok(schema)
}

fn declare(group: &str, name: &str, decl: OptionDecl) -> Result<OptionSpec, String> {
    let key = format!("options.{}.{}", group, name);
    if decl.kind == OptionKind::Choice && decl.choices.is_empty() {
        return Err(format!("{}: a choice needs a non-empty choices list", key));
    }
    if decl.kind != OptionKind::Choice && !decl.choices.is_empty() {
        return Err(format!("{}: choices only apply to kind = \"choice\"", key));
    }
    if decl.positive && !matches!(decl.kind, OptionKind::Length | OptionKind::Number) {
        return Err(format!("{}: positive only applies to lengths and numbers", key));
    }

    let mut spec = OptionSpec {
        group: group.to_string(),
        name: name.to_string(),
        kind: decl.kind,
        default: OptionValue::Bool(false),
        positive: decl.positive,
        choices: decl.choices,
        description: decl.description,
    };
    spec.default = parse_default(&spec, &decl.default).map_err(|e| format!("{}: {}", key, e))?;
    Ok(spec)
}

fn parse_default(spec: &OptionSpec, raw: &toml::Value) -> Result<OptionValue, String> {
    let raw = serde_yaml::to_value(raw).map_err(|e| e.to_string())?;
    spec.parse_value(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Color, Length};

    fn parse(source: &str) -> Result<ThemeSchema, ThemeError> {
        parse_extension("mine", source, Path::new("themes/mine/theme.toml"))
    }

    #[test]
    fn test_empty_file_copies_classic() {
        let schema = parse("").unwrap();
        assert_eq!(schema.id, "mine");
        assert_eq!(
            schema.options().len(),
            builtin_schema("classic").unwrap().options().len()
        );
    }

    #[test]
    fn test_new_option_and_default_override() {
        let schema = parse(
            r#"
extends = "sb2nov"

[defaults.page]
top_margin = "1cm"

[options.colors.accent]
kind = "color"
default = "rgb(200, 0, 0)"

[options.header.tagline_size]
kind = "length"
default = "9pt"
positive = true
"#,
        )
        .unwrap();
        assert_eq!(
            schema.option("page", "top_margin").unwrap().default,
            OptionValue::Length(Length::cm(1.0))
        );
        assert_eq!(
            schema.option("colors", "accent").unwrap().default,
            OptionValue::Color(Color::rgb(200, 0, 0))
        );
        assert!(schema.option("header", "tagline_size").unwrap().positive);
        assert!(schema.option("entries", "degree_column_width").is_some());
    }

    #[test]
    fn test_bad_default_is_rejected() {
        let err = parse("[options.page.gutter]\nkind = \"length\"\ndefault = \"wide\"\n").unwrap_err();
        assert!(matches!(err, ThemeError::InvalidExtension { .. }));
        assert!(err.to_string().contains("options.page.gutter"));
    }

    #[test]
    fn test_unknown_base_and_unknown_keys() {
        assert!(parse("extends = \"fancy\"\n").is_err());
        assert!(parse("colour = \"red\"\n").is_err());
        assert!(parse("[defaults.page]\nnope = 1\n").is_err());
    }

    #[test]
    fn test_choice_declaration() {
        assert!(parse("[options.text.case]\nkind = \"choice\"\ndefault = \"a\"\n").is_err());
        let schema =
            parse("[options.text.case]\nkind = \"choice\"\ndefault = \"a\"\nchoices = [\"a\", \"b\"]\n")
                .unwrap();
        assert_eq!(schema.option("text", "case").unwrap().choices, vec!["a", "b"]);
    }
}
