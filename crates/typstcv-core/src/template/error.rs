//! Template error types

use std::fmt;

/// Template rendering errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// Key not found in the context
    UndefinedKey { key: String, line: usize },

    /// Malformed tag or block structure
    MalformedSyntax { message: String, line: usize },

    /// Array used in a plain placeholder
    ArrayInNonEachContext { key: String },

    /// Table used in a plain placeholder (must use nested keys)
    TableInPlaceholder { key: String },

    /// `{{ key | name }}` with a filter the engine does not know
    UnknownFilter { name: String, line: usize },

    /// A known filter rejected its input or arguments
    FilterFailed {
        filter: String,
        message: String,
        line: usize,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::UndefinedKey { key, line } => {
                write!(f, "Undefined key '{}' at line {}", key, line)
            }
            TemplateError::MalformedSyntax { message, line } => {
                write!(f, "Malformed syntax at line {}: {}", line, message)
            }
            TemplateError::ArrayInNonEachContext { key } => {
                write!(
                    f,
                    "Array '{}' used outside of {{{{each}}}} context. Use {{{{each {} |item|}}}} ... {{{{/each}}}}",
                    key, key
                )
            }
            TemplateError::TableInPlaceholder { key } => {
                write!(
                    f,
                    "Table '{}' cannot be used directly in placeholder. Use nested keys like {}.field",
                    key, key
                )
            }
            TemplateError::UnknownFilter { name, line } => {
                write!(
                    f,
                    "Unknown filter '{}' at line {} (known: {})",
                    name,
                    line,
                    crate::template::engine::FILTER_NAMES.join(", ")
                )
            }
            TemplateError::FilterFailed {
                filter,
                message,
                line,
            } => {
                write!(f, "Filter '{}' failed at line {}: {}", filter, line, message)
            }
        }
    }
}

impl std::error::Error for TemplateError {}
