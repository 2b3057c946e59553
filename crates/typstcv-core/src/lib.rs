//! Core of typstcv: validates a YAML CV description and renders it to Typst
//! and Markdown source through theme templates.
//!
//! The pipeline is
//! [`parse_input`] → [`InputDocument`] → [`Renderer::render`],
//! with a [`ThemeRegistry`] threaded through both steps so custom themes are
//! discovered before the design block is checked.

// Core modules
pub mod design;
pub mod error;
pub mod format;
pub mod locale;
pub mod model;
pub mod render;
pub mod schema;
pub mod template;
pub mod theme;
pub mod types;

// Re-export commonly used types
pub use design::{DesignConfig, DesignError};
pub use error::{Result, TypstcvError};
pub use format::OutputFormat;
pub use locale::Locale;
pub use model::{parse_input, validate_input, InputDocument, InputError, ValidationError};
pub use render::{render_yaml, RenderError, RenderedDocument, Renderer};
pub use schema::input_schema;
pub use theme::{ThemeError, ThemeRegistry};
