//! Validation errors with paths into the input document

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value in the input, e.g. `cv.sections.experience[0].start_date`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<PathSegment>);

impl FieldPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_keys(keys: &[&str]) -> Self {
        Self(
            keys.iter()
                .map(|k| PathSegment::Key(k.to_string()))
                .collect(),
        )
    }

    pub fn key(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Key(key.into()));
        Self(segments)
    }

    pub fn index(&self, index: usize) -> Self {
        let mut segments = self.0.clone();
        segments.push(PathSegment::Index(index));
        Self(segments)
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => write!(f, "{}", key)?,
                PathSegment::Key(key) => write!(f, ".{}", key)?,
                PathSegment::Index(index) => write!(f, "[{}]", index)?,
            }
        }
        Ok(())
    }
}

/// One problem found while validating the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    /// The value does not have the shape of any candidate type
    Structural {
        path: FieldPath,
        candidates: Vec<String>,
        reason: String,
    },
    /// A single value violates its type, range or format
    Field {
        path: FieldPath,
        received: String,
        constraint: String,
    },
}

impl ValidationIssue {
    pub fn field(path: FieldPath, received: impl Into<String>, constraint: impl Into<String>) -> Self {
        ValidationIssue::Field {
            path,
            received: received.into(),
            constraint: constraint.into(),
        }
    }

    pub fn structural(path: FieldPath, candidates: Vec<String>, reason: impl Into<String>) -> Self {
        ValidationIssue::Structural {
            path,
            candidates,
            reason: reason.into(),
        }
    }

    pub fn path(&self) -> &FieldPath {
        match self {
            ValidationIssue::Structural { path, .. } | ValidationIssue::Field { path, .. } => path,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(self, ValidationIssue::Structural { .. })
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Structural {
                path,
                candidates,
                reason,
            } => {
                write!(f, "{}: {}", path, reason)?;
                if !candidates.is_empty() {
                    write!(f, " (candidates: {})", candidates.join(", "))?;
                }
                Ok(())
            }
            ValidationIssue::Field {
                path,
                received,
                constraint,
            } => write!(f, "{}: {} (received: {})", path, constraint, received),
        }
    }
}

/// Every problem found in one validation pass
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("VALIDATION_FAILED: {} problem(s)\n{}", .issues.len(), render_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    pub fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    /// `Ok(())` when nothing was collected
    pub fn check(issues: Vec<ValidationIssue>) -> Result<(), ValidationError> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self::new(issues))
        }
    }

    /// Issue at exactly this path, if any
    pub fn at(&self, path: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|i| i.path().to_string() == path)
    }
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Short description of a YAML value for error messages
pub(crate) fn describe(value: &serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > 60 => {
            let head: String = s.chars().take(57).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Sequence(items) => format!("a list of {} item(s)", items.len()),
        Value::Mapping(map) => {
            let keys: Vec<String> = map
                .keys()
                .filter_map(|k| k.as_str().map(str::to_string))
                .collect();
            format!("a mapping with keys [{}]", keys.join(", "))
        }
        Value::Tagged(tagged) => format!("{} value", tagged.tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let path = FieldPath::root()
            .key("cv")
            .key("sections")
            .key("experience")
            .index(0)
            .key("start_date");
        assert_eq!(path.to_string(), "cv.sections.experience[0].start_date");
        assert_eq!(FieldPath::root().to_string(), "<root>");
    }

    #[test]
    fn test_error_lists_every_issue() {
        let err = ValidationError::new(vec![
            ValidationIssue::field(FieldPath::from_keys(&["cv", "email"]), "\"x\"", "not an email"),
            ValidationIssue::structural(
                FieldPath::from_keys(&["cv", "sections", "a"]).index(1),
                vec!["ExperienceEntry".into()],
                "mixed entry types",
            ),
        ]);
        let text = err.to_string();
        assert!(text.starts_with("VALIDATION_FAILED: 2 problem(s)"));
        assert!(text.contains("cv.email: not an email (received: \"x\")"));
        assert!(text.contains("cv.sections.a[1]: mixed entry types (candidates: ExperienceEntry)"));
        assert!(err.at("cv.email").is_some());
    }

    #[test]
    fn test_describe_truncates_long_strings() {
        let long = serde_yaml::Value::String("x".repeat(100));
        assert_eq!(describe(&long).chars().count(), 62);
    }
}
