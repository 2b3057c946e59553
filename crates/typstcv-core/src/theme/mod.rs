//! Themes: registry of known themes and template loading

pub mod builtin_templates;
pub mod error;
pub mod extension;
pub mod loader;
pub mod registry;

pub use error::ThemeError;
pub use extension::EXTENSION_FILE;
pub use loader::{load_templates, Template, TemplateName, TemplateOrigin, TemplateSet};
pub use registry::{Theme, ThemeRegistry, ThemeSource};
