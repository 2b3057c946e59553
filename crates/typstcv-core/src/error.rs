use thiserror::Error;

use crate::design::DesignError;
use crate::model::{InputError, ValidationError};
use crate::render::RenderError;
use crate::theme::ThemeError;

/// Any failure of the core, for callers that do not need to tell them apart
#[derive(Error, Debug)]
pub enum TypstcvError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Design(#[from] DesignError),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl TypstcvError {
    /// Validation issues carried by this error, if any
    pub fn issues(&self) -> Vec<&crate::model::ValidationIssue> {
        match self {
            TypstcvError::Input(err) => err.issues(),
            TypstcvError::Validation(err) => err.issues.iter().collect(),
            TypstcvError::Design(DesignError::Invalid(err)) => err.issues.iter().collect(),
            _ => Vec::new(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TypstcvError>;
