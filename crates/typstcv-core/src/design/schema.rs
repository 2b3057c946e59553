//! Option schema of one theme

use std::collections::BTreeMap;

use crate::design::option::{OptionSpec, OptionValue};

/// Every option a theme understands, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeSchema {
    pub id: String,
    pub description: String,
    options: Vec<OptionSpec>,
}

impl ThemeSchema {
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    /// Copy of `base` under a new id
    pub fn derive(base: &ThemeSchema, id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            options: base.options.clone(),
        }
    }

    /// Add an option, replacing one with the same key
    pub fn with(mut self, spec: OptionSpec) -> Self {
        self.insert(spec);
        self
    }

    pub fn insert(&mut self, spec: OptionSpec) {
        match self
            .options
            .iter_mut()
            .find(|o| o.group == spec.group && o.name == spec.name)
        {
            Some(existing) => *existing = spec,
            None => self.options.push(spec),
        }
    }

    /// Change the default of an existing option
    ///
    /// Returns `false` when the option does not exist.
    pub fn set_default(&mut self, group: &str, name: &str, value: OptionValue) -> bool {
        match self
            .options
            .iter_mut()
            .find(|o| o.group == group && o.name == name)
        {
            Some(option) => {
                option.default = value;
                true
            }
            None => false,
        }
    }

    /// Builder form of [`ThemeSchema::set_default`] for definitions known to be valid
    pub(crate) fn default_of(mut self, group: &str, name: &str, value: OptionValue) -> Self {
        let found = self.set_default(group, name, value);
        debug_assert!(found, "no option {}.{} to override", group, name);
        self
    }

    pub fn option(&self, group: &str, name: &str) -> Option<&OptionSpec> {
        self.options
            .iter()
            .find(|o| o.group == group && o.name == name)
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Group names in first-seen order
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for option in &self.options {
            if !groups.contains(&option.group.as_str()) {
                groups.push(&option.group);
            }
        }
        groups
    }

    pub fn group_options(&self, group: &str) -> impl Iterator<Item = &OptionSpec> {
        let group = group.to_string();
        self.options.iter().filter(move |o| o.group == group)
    }

    /// JSON Schema of a `design:` block selecting this theme
    pub fn to_json_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        properties.insert(
            "theme".to_string(),
            serde_json::json!({ "const": self.id, "description": self.description }),
        );

        let mut groups: BTreeMap<&str, serde_json::Map<String, serde_json::Value>> =
            BTreeMap::new();
        for option in &self.options {
            groups
                .entry(option.group.as_str())
                .or_default()
                .insert(option.name.clone(), option.json_schema());
        }
        for (group, options) in groups {
            properties.insert(
                group.to_string(),
                serde_json::json!({
                    "type": "object",
                    "properties": options,
                    "additionalProperties": false,
                }),
            );
        }

        serde_json::json!({
            "title": format!("{} theme", self.id),
            "type": "object",
            "properties": properties,
            "required": ["theme"],
            "additionalProperties": false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Length;

    fn schema() -> ThemeSchema {
        ThemeSchema::new("demo", "Demo theme")
            .with(OptionSpec::new("page", "top_margin", OptionValue::Length(Length::cm(2.0))).positive())
            .with(OptionSpec::new("links", "underline", OptionValue::Bool(false)))
            .with(OptionSpec::new("page", "show_page_numbering", OptionValue::Bool(true)))
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        assert_eq!(schema().groups(), vec!["page", "links"]);
        assert_eq!(schema().group_options("page").count(), 2);
    }

    #[test]
    fn test_insert_replaces_same_key() {
        let schema = schema().with(OptionSpec::new("links", "underline", OptionValue::Bool(true)));
        assert_eq!(schema.options().len(), 3);
        assert_eq!(
            schema.option("links", "underline").unwrap().default,
            OptionValue::Bool(true)
        );
    }

    #[test]
    fn test_derive_and_override_default() {
        let mut derived = ThemeSchema::derive(&schema(), "other", "Other");
        assert!(derived.set_default("page", "top_margin", OptionValue::Length(Length::cm(1.0))));
        assert!(!derived.set_default("page", "nope", OptionValue::Bool(true)));
        assert_eq!(derived.id, "other");
        assert_eq!(
            schema().option("page", "top_margin").unwrap().default,
            OptionValue::Length(Length::cm(2.0))
        );
    }

    #[test]
    fn test_json_schema_shape() {
        let json = schema().to_json_schema();
        assert_eq!(json["properties"]["theme"]["const"], "demo");
        assert_eq!(
            json["properties"]["page"]["properties"]["top_margin"]["default"],
            "2cm"
        );
        assert_eq!(json["properties"]["links"]["additionalProperties"], false);
    }
}
