//! Typed reads from a raw YAML mapping
//!
//! Every read records its own issue and returns `None` (or an empty list) on
//! failure, so one pass over a mapping reports all of its bad fields.

use serde_yaml::{Mapping, Value};

use crate::model::error::{describe, FieldPath, ValidationIssue};
use crate::types::{Date, Link, LinkError};

pub(crate) type Issues = Vec<ValidationIssue>;

pub(crate) struct Fields<'a> {
    map: &'a Mapping,
    path: FieldPath,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Mapping, path: FieldPath) -> Self {
        Self { map, path }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Present and not `null`
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// String keys in input order
    pub fn keys(&self) -> Vec<&'a str> {
        self.map.keys().filter_map(Value::as_str).collect()
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        match self.map.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    /// A scalar read as text; numbers are accepted (`date: 2020`)
    pub fn text(&self, key: &str, issues: &mut Issues) -> Option<String> {
        let value = self.get(key)?;
        match scalar_text(value) {
            Some(text) => Some(text),
            None => {
                issues.push(ValidationIssue::field(
                    self.path.key(key),
                    describe(value),
                    "expected a string",
                ));
                None
            }
        }
    }

    pub fn required_text(&self, key: &str, issues: &mut Issues) -> Option<String> {
        if !self.has(key) {
            issues.push(ValidationIssue::field(
                self.path.key(key),
                "nothing",
                "this field is required",
            ));
            return None;
        }
        let text = self.text(key, issues)?;
        if text.trim().is_empty() {
            issues.push(ValidationIssue::field(
                self.path.key(key),
                "\"\"",
                "must not be empty",
            ));
            return None;
        }
        Some(text)
    }

    pub fn date(&self, key: &str, issues: &mut Issues) -> Option<Date> {
        let text = self.text(key, issues)?;
        match Date::parse(&text) {
            Ok(date) => Some(date),
            Err(e) => {
                issues.push(ValidationIssue::field(
                    self.path.key(key),
                    format!("\"{}\"", text),
                    e.to_string(),
                ));
                None
            }
        }
    }

    pub fn link(
        &self,
        key: &str,
        parse: fn(&str) -> Result<Link, LinkError>,
        issues: &mut Issues,
    ) -> Option<Link> {
        let text = self.text(key, issues)?;
        match parse(&text) {
            Ok(link) => Some(link),
            Err(e) => {
                issues.push(ValidationIssue::field(
                    self.path.key(key),
                    format!("\"{}\"", text),
                    e.to_string(),
                ));
                None
            }
        }
    }

    /// A list of scalars; a single scalar is not promoted to a list
    pub fn text_list(&self, key: &str, issues: &mut Issues) -> Vec<String> {
        let Some(value) = self.get(key) else {
            return Vec::new();
        };
        let Some(items) = value.as_sequence() else {
            issues.push(ValidationIssue::field(
                self.path.key(key),
                describe(value),
                "expected a list of strings",
            ));
            return Vec::new();
        };

        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match scalar_text(item) {
                Some(text) => out.push(text),
                None => issues.push(ValidationIssue::field(
                    self.path.key(key).index(i),
                    describe(item),
                    "expected a string",
                )),
            }
        }
        out
    }

    pub fn mapping(&self, key: &str, issues: &mut Issues) -> Option<&'a Mapping> {
        let value = self.get(key)?;
        match value.as_mapping() {
            Some(map) => Some(map),
            None => {
                issues.push(ValidationIssue::field(
                    self.path.key(key),
                    describe(value),
                    "expected a mapping",
                ));
                None
            }
        }
    }

    pub fn sequence(&self, key: &str, issues: &mut Issues) -> Option<&'a [Value]> {
        let value = self.get(key)?;
        match value.as_sequence() {
            Some(items) => Some(items.as_slice()),
            None => {
                issues.push(ValidationIssue::field(
                    self.path.key(key),
                    describe(value),
                    "expected a list",
                ));
                None
            }
        }
    }

    /// Report keys outside `allowed`, and keys that are not strings
    pub fn reject_unknown(&self, allowed: &[&str], issues: &mut Issues) {
        for key in self.map.keys() {
            match key.as_str() {
                Some(name) if allowed.contains(&name) => {}
                Some(name) => issues.push(ValidationIssue::field(
                    self.path.key(name),
                    describe(&self.map[key]),
                    format!("unknown field; allowed fields are {}", allowed.join(", ")),
                )),
                None => issues.push(ValidationIssue::field(
                    self.path.clone(),
                    describe(key),
                    "keys must be strings",
                )),
            }
        }
    }

    /// Names of present keys outside `allowed`
    pub fn unknown_keys(&self, allowed: &[&str]) -> Vec<&'a str> {
        self.keys()
            .into_iter()
            .filter(|k| !allowed.contains(k))
            .collect()
    }
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
