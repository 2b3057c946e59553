//! Design options: declared kind, default and value parsing

use std::fmt;

use serde::Deserialize;
use serde_yaml::Value;

use crate::model::error::describe;
use crate::types::{Color, Length};

/// Value type of a design option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionKind {
    Length,
    Color,
    Bool,
    Number,
    String,
    Choice,
    StringList,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Length => "length",
            OptionKind::Color => "color",
            OptionKind::Bool => "bool",
            OptionKind::Number => "number",
            OptionKind::String => "string",
            OptionKind::Choice => "choice",
            OptionKind::StringList => "string_list",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Length(Length),
    Color(Color),
    Bool(bool),
    Number(f64),
    /// Strings and choices
    Text(String),
    List(Vec<String>),
}

impl OptionValue {
    pub fn as_length(&self) -> Option<Length> {
        match self {
            OptionValue::Length(length) => Some(*length),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            OptionValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Plain JSON form, used for schema defaults
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            OptionValue::Length(length) => serde_json::Value::String(length.to_string()),
            OptionValue::Color(color) => serde_json::Value::String(color.to_string()),
            OptionValue::Bool(b) => serde_json::Value::Bool(*b),
            OptionValue::Number(n) => serde_json::json!(n),
            OptionValue::Text(text) => serde_json::Value::String(text.clone()),
            OptionValue::List(items) => serde_json::json!(items),
        }
    }
}

/// One option of a theme, addressed as `group.name`
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
    pub group: String,
    pub name: String,
    pub kind: OptionKind,
    pub default: OptionValue,
    /// Lengths and numbers must be greater than zero
    pub positive: bool,
    /// Allowed values of a choice
    pub choices: Vec<String>,
    pub description: Option<String>,
}

impl OptionSpec {
    pub fn new(group: &str, name: &str, default: OptionValue) -> Self {
        let kind = match &default {
            OptionValue::Length(_) => OptionKind::Length,
            OptionValue::Color(_) => OptionKind::Color,
            OptionValue::Bool(_) => OptionKind::Bool,
            OptionValue::Number(_) => OptionKind::Number,
            OptionValue::Text(_) => OptionKind::String,
            OptionValue::List(_) => OptionKind::StringList,
        };
        Self {
            group: group.to_string(),
            name: name.to_string(),
            kind,
            default,
            positive: false,
            choices: Vec::new(),
            description: None,
        }
    }

    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    pub fn choice(mut self, choices: &[&str]) -> Self {
        self.kind = OptionKind::Choice;
        self.choices = choices.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// `group.name`
    pub fn key(&self) -> String {
        format!("{}.{}", self.group, self.name)
    }

    /// Parse a user value; the error is the violated constraint
    pub fn parse_value(&self, raw: &Value) -> Result<OptionValue, String> {
        let value = match (self.kind, raw) {
            (OptionKind::Length, Value::String(text)) => {
                OptionValue::Length(Length::parse(text).map_err(|e| e.to_string())?)
            }
            (OptionKind::Color, Value::String(text)) => {
                OptionValue::Color(Color::parse(text).map_err(|e| e.to_string())?)
            }
            (OptionKind::Bool, Value::Bool(b)) => OptionValue::Bool(*b),
            (OptionKind::Number, Value::Number(n)) => match n.as_f64() {
                Some(n) if n.is_finite() => OptionValue::Number(n),
                _ => return Err("expected a finite number".to_string()),
            },
            (OptionKind::String, Value::String(text)) => OptionValue::Text(text.clone()),
            (OptionKind::String, Value::Number(n)) => OptionValue::Text(n.to_string()),
            (OptionKind::Choice, Value::String(text)) => {
                if !self.choices.contains(text) {
                    return Err(format!("expected one of {}", self.choices.join(", ")));
                }
                OptionValue::Text(text.clone())
            }
            (OptionKind::StringList, Value::Sequence(items)) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(text) => list.push(text.clone()),
                        other => {
                            return Err(format!(
                                "expected a list of strings, found {}",
                                describe(other)
                            ))
                        }
                    }
                }
                OptionValue::List(list)
            }
            (kind, _) => return Err(format!("expected a {}", kind_noun(kind))),
        };

        if self.positive && !is_positive(&value) {
            return Err("must be greater than zero".to_string());
        }
        Ok(value)
    }

    /// JSON Schema fragment for this option
    pub fn json_schema(&self) -> serde_json::Value {
        let mut schema = match self.kind {
            OptionKind::Length => serde_json::json!({
                "type": "string",
                "pattern": crate::types::length::LENGTH_PATTERN,
            }),
            OptionKind::Color => serde_json::json!({ "type": "string" }),
            OptionKind::Bool => serde_json::json!({ "type": "boolean" }),
            OptionKind::Number if self.positive => {
                serde_json::json!({ "type": "number", "exclusiveMinimum": 0 })
            }
            OptionKind::Number => serde_json::json!({ "type": "number" }),
            OptionKind::String => serde_json::json!({ "type": "string" }),
            OptionKind::Choice => serde_json::json!({ "enum": self.choices }),
            OptionKind::StringList => {
                serde_json::json!({ "type": "array", "items": { "type": "string" } })
            }
        };
        if let Some(object) = schema.as_object_mut() {
            object.insert("default".to_string(), self.default.to_json());
            if let Some(description) = &self.description {
                object.insert(
                    "description".to_string(),
                    serde_json::Value::String(description.clone()),
                );
            }
        }
        schema
    }
}

fn is_positive(value: &OptionValue) -> bool {
    match value {
        OptionValue::Length(length) => length.is_positive(),
        OptionValue::Number(n) => *n > 0.0,
        _ => true,
    }
}

fn kind_noun(kind: OptionKind) -> &'static str {
    match kind {
        OptionKind::Length => "length such as 2cm or 10pt",
        OptionKind::Color => "color such as #004f90 or rgb(0, 79, 144)",
        OptionKind::Bool => "boolean",
        OptionKind::Number => "number",
        OptionKind::String => "string",
        OptionKind::Choice => "string choice",
        OptionKind::StringList => "list of strings",
    }
}
