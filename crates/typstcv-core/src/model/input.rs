//! The input document: `cv`, `design`, `locale` and `settings`
//!
//! Content and design are validated independently; both sets of problems
//! are reported together.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_yaml::Value;
use thiserror::Error;

use crate::design::{DesignConfig, DesignError};
use crate::locale::Locale;
use crate::model::dates::ValidationContext;
use crate::model::document::Cv;
use crate::model::error::{describe, FieldPath, ValidationError, ValidationIssue};
use crate::model::fields::{Fields, Issues};
use crate::model::settings::Settings;
use crate::theme::ThemeRegistry;

const TOP_LEVEL_KEYS: [&str; 4] = ["cv", "design", "locale", "settings"];

/// A fully validated input
#[derive(Debug, Clone, PartialEq)]
pub struct InputDocument {
    pub cv: Cv,
    pub design: DesignConfig,
    pub locale: Locale,
    pub settings: Settings,
    /// `settings.today` when given, the caller's date otherwise
    pub today: NaiveDate,
}

#[derive(Debug, Error)]
pub enum InputError {
    #[error("INPUT_PARSE_ERROR: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("{}", describe_invalid(.document, .design))]
    Invalid {
        document: Option<ValidationError>,
        design: Option<DesignError>,
    },
}

fn describe_invalid(document: &Option<ValidationError>, design: &Option<DesignError>) -> String {
    let mut parts = Vec::new();
    if let Some(document) = document {
        parts.push(document.to_string());
    }
    if let Some(design) = design {
        parts.push(design.to_string());
    }
    parts.join("\n")
}

impl InputError {
    /// Every validation issue of the content and design blocks
    pub fn issues(&self) -> Vec<&ValidationIssue> {
        match self {
            InputError::Yaml(_) => Vec::new(),
            InputError::Invalid { document, design } => {
                let mut issues: Vec<&ValidationIssue> = document
                    .iter()
                    .flat_map(|e| e.issues.iter())
                    .collect();
                if let Some(DesignError::Invalid(validation)) = design {
                    issues.extend(validation.issues.iter());
                }
                issues
            }
        }
    }
}

/// Parse and validate YAML input text
pub fn parse_input(
    yaml: &str,
    registry: &ThemeRegistry,
    today: NaiveDate,
) -> Result<InputDocument, InputError> {
    let value: Value = serde_yaml::from_str(yaml)?;
    validate_input(&value, registry, today)
}

/// Validate an already parsed input value
pub fn validate_input(
    value: &Value,
    registry: &ThemeRegistry,
    today: NaiveDate,
) -> Result<InputDocument, InputError> {
    let root = FieldPath::root();
    let Some(map) = value.as_mapping() else {
        return Err(InputError::Invalid {
            document: Some(ValidationError::new(vec![ValidationIssue::field(
                root,
                describe(value),
                "expected a mapping with a cv key",
            )])),
            design: None,
        });
    };

    let fields = Fields::new(map, root.clone());
    let mut issues = Vec::new();
    fields.reject_unknown(&TOP_LEVEL_KEYS, &mut issues);

    let locale: Locale = read_block(&fields, "locale", &mut issues);
    for (field, constraint) in locale.problems() {
        issues.push(ValidationIssue::field(
            root.key("locale").key(field),
            "invalid value",
            constraint,
        ));
    }
    let settings: Settings = read_block(&fields, "settings", &mut issues);
    let today = settings.today.unwrap_or(today);

    let ctx = ValidationContext::new(locale.clone(), today);
    let cv = match fields.get("cv") {
        Some(raw) => Cv::read(raw, &root.key("cv"), &ctx, &mut issues),
        None => {
            issues.push(ValidationIssue::field(
                root.key("cv"),
                "nothing",
                "this field is required",
            ));
            None
        }
    };

    // Resolving the design discovers custom themes before their options are checked
    let design = DesignConfig::resolve(fields.get("design"), registry);

    match (cv, design) {
        (Some(cv), Ok(design)) if issues.is_empty() => {
            log::debug!(
                "input: {} section(s), theme '{}'",
                cv.sections.len(),
                design.theme()
            );
            Ok(InputDocument {
                cv,
                design,
                locale,
                settings,
                today,
            })
        }
        (_, design) => Err(InputError::Invalid {
            document: ValidationError::check(issues).err(),
            design: design.err(),
        }),
    }
}

/// Deserialize an optional serde-typed block; failures become issues
fn read_block<T: DeserializeOwned + Default>(
    fields: &Fields<'_>,
    key: &str,
    issues: &mut Issues,
) -> T {
    let Some(raw) = fields.get(key) else {
        return T::default();
    };
    match serde_yaml::from_value(raw.clone()) {
        Ok(block) => block,
        Err(e) => {
            issues.push(ValidationIssue::field(
                fields.path().key(key),
                describe(raw),
                e.to_string(),
            ));
            T::default()
        }
    }
}
