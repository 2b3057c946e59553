//! Resolution of the `design:` block against a theme schema

use std::collections::BTreeMap;

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::design::builtin::DEFAULT_THEME;
use crate::design::option::OptionValue;
use crate::design::schema::ThemeSchema;
use crate::model::error::{describe, FieldPath, ValidationError, ValidationIssue};
use crate::model::fields::Fields;
use crate::theme::{ThemeError, ThemeRegistry};
use crate::types::Length;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DesignError {
    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error("invalid design block\n{0}")]
    Invalid(ValidationError),
}

/// Resolved design options: theme defaults overlaid with user values
#[derive(Debug, Clone, PartialEq)]
pub struct DesignConfig {
    theme: String,
    /// Keyed by `group.option`
    values: BTreeMap<String, OptionValue>,
}

impl DesignConfig {
    /// Resolve `raw` (the `design:` value, if any)
    ///
    /// Theme lookup may trigger custom theme discovery, so custom option
    /// schemas are known before any option is checked.
    pub fn resolve(raw: Option<&Value>, registry: &ThemeRegistry) -> Result<Self, DesignError> {
        let path = FieldPath::from_keys(&["design"]);
        let empty = Mapping::new();
        let map = match raw {
            None | Some(Value::Null) => &empty,
            Some(Value::Mapping(map)) => map,
            Some(other) => {
                return Err(DesignError::Invalid(ValidationError::new(vec![
                    ValidationIssue::field(path, describe(other), "expected a mapping"),
                ])))
            }
        };

        let fields = Fields::new(map, path.clone());
        let mut issues = Vec::new();
        let theme_id = fields
            .text("theme", &mut issues)
            .unwrap_or_else(|| DEFAULT_THEME.to_string());
        ValidationError::check(std::mem::take(&mut issues)).map_err(DesignError::Invalid)?;

        let theme = registry.get(&theme_id)?;
        let schema = &theme.schema;

        let mut allowed = vec!["theme"];
        allowed.extend(schema.groups());
        fields.reject_unknown(&allowed, &mut issues);

        let mut values: BTreeMap<String, OptionValue> = schema
            .options()
            .iter()
            .map(|o| (o.key(), o.default.clone()))
            .collect();

        for group in schema.groups() {
            let Some(group_map) = fields.mapping(group, &mut issues) else {
                continue;
            };
            let group_fields = Fields::new(group_map, path.key(group));
            let names: Vec<&str> = schema.group_options(group).map(|o| o.name.as_str()).collect();
            group_fields.reject_unknown(&names, &mut issues);

            for name in group_fields.keys() {
                let (Some(spec), Some(raw)) = (schema.option(group, name), group_fields.get(name))
                else {
                    continue;
                };
                match spec.parse_value(raw) {
                    Ok(value) => {
                        values.insert(spec.key(), value);
                    }
                    Err(constraint) => issues.push(ValidationIssue::field(
                        path.key(group).key(name),
                        describe(raw),
                        constraint,
                    )),
                }
            }
        }

        ValidationError::check(issues).map_err(DesignError::Invalid)?;
        log::debug!(
            "design: theme '{}', {} option(s) resolved",
            theme_id,
            values.len()
        );
        Ok(Self {
            theme: theme_id,
            values,
        })
    }

    /// Defaults of `schema` with no overrides
    pub fn defaults(schema: &ThemeSchema) -> Self {
        Self {
            theme: schema.id.clone(),
            values: schema
                .options()
                .iter()
                .map(|o| (o.key(), o.default.clone()))
                .collect(),
        }
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Value of `group.option`
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn length(&self, key: &str) -> Option<Length> {
        self.get(key).and_then(OptionValue::as_length)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(OptionValue::as_bool)
    }

    pub fn list(&self, key: &str) -> &[String] {
        self.get(key).and_then(OptionValue::as_list).unwrap_or_default()
    }

    /// `(group, option, value)` in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &OptionValue)> {
        self.values.iter().filter_map(|(key, value)| {
            key.split_once('.')
                .map(|(group, name)| (group, name, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::design::builtin::builtin_schema;

    fn resolve(yaml: &str) -> Result<DesignConfig, DesignError> {
        let value: Value = serde_yaml::from_str(yaml).unwrap();
        DesignConfig::resolve(Some(&value), &ThemeRegistry::builtin())
    }

    #[test]
    fn test_missing_block_is_classic_defaults() {
        let config = DesignConfig::resolve(None, &ThemeRegistry::builtin()).unwrap();
        assert_eq!(config.theme(), "classic");
        assert_eq!(
            config,
            DesignConfig::defaults(&builtin_schema("classic").unwrap())
        );
    }

    #[test]
    fn test_classic_margins_default() {
        let config = resolve("theme: classic\n").unwrap();
        for side in ["top", "bottom", "left", "right"] {
            assert_eq!(
                config.length(&format!("page.{side}_margin")),
                Some(Length::cm(2.0))
            );
        }
    }

    #[test]
    fn test_overrides_win() {
        let config = resolve("theme: classic\npage:\n  top_margin: 1cm\nlinks:\n  underline: true\n").unwrap();
        assert_eq!(config.length("page.top_margin"), Some(Length::cm(1.0)));
        assert_eq!(config.length("page.bottom_margin"), Some(Length::cm(2.0)));
        assert_eq!(config.flag("links.underline"), Some(true));
    }

    #[test]
    fn test_unknown_theme() {
        let err = resolve("theme: fancy\n").unwrap_err();
        assert!(matches!(
            err,
            DesignError::Theme(ThemeError::UnknownTheme { .. })
        ));
    }

    #[test]
    fn test_every_bad_option_is_reported_with_its_path() {
        let err = resolve(
            "theme: classic\npage:\n  top_margin: -1cm\n  left_margin: wide\n  gutter: 1cm\nfonts: {}\n",
        )
        .unwrap_err();
        let DesignError::Invalid(validation) = err else {
            panic!("expected validation error");
        };
        assert!(validation.at("design.page.top_margin").is_some());
        assert!(validation.at("design.page.left_margin").is_some());
        assert!(validation.at("design.page.gutter").is_some());
        assert!(validation.at("design.fonts").is_some());
    }

    #[test]
    fn test_theme_specific_option_only_on_its_theme() {
        assert!(resolve("theme: moderncv\nheader:\n  name_italic: false\n").is_ok());
        assert!(resolve("theme: classic\nheader:\n  name_italic: false\n").is_err());
    }
}
