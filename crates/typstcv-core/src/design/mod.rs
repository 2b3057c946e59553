//! Design configuration: per-theme option schemas and their resolution

pub mod builtin;
pub mod config;
pub mod option;
pub mod schema;

pub use builtin::{builtin_schema, BUILTIN_THEMES, DEFAULT_THEME};
pub use config::{DesignConfig, DesignError};
pub use option::{OptionKind, OptionSpec, OptionValue};
pub use schema::ThemeSchema;
