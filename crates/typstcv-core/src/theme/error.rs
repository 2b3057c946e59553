use thiserror::Error;

/// Theme resolution and template loading failures
///
/// Messages are strings so a discovery failure can be cached and handed out
/// to every caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ThemeError {
    #[error("THEME_NOT_FOUND: unknown theme '{theme}'; known themes: {}", .known.join(", "))]
    UnknownTheme { theme: String, known: Vec<String> },

    #[error("TEMPLATE_MISSING: theme '{theme}' has no {template} template (expected {path})")]
    MissingTemplate {
        theme: String,
        template: String,
        path: String,
    },

    #[error("TEMPLATE_INVALID: {template} template of theme '{theme}': {message}")]
    MalformedTemplate {
        theme: String,
        template: String,
        message: String,
    },

    #[error("THEME_EXTENSION_INVALID: {path}: {message}")]
    InvalidExtension { path: String, message: String },

    #[error("THEME_IO: {path}: {message}")]
    Io { path: String, message: String },
}

impl ThemeError {
    pub(crate) fn io(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        ThemeError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
