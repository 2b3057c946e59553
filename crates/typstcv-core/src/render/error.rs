use thiserror::Error;

use crate::template::TemplateError;
use crate::theme::ThemeError;

/// Inline markup that cannot be translated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at character {position}")]
pub struct MarkupError {
    pub message: String,
    /// 1-based character offset in the source text
    pub position: usize,
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("MARKUP_INVALID: {path}: {source}")]
    Markup {
        path: String,
        #[source]
        source: MarkupError,
    },

    #[error("TEMPLATE_FAILED: {template} of theme '{theme}': {source}")]
    Template {
        theme: String,
        template: String,
        #[source]
        source: TemplateError,
    },

    #[error(transparent)]
    Theme(#[from] ThemeError),
}
