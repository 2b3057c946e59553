//! Template module - text substitution engine used by every theme
//!
//! Templates are plain target-format files (`.tmp.typ`, `.tmp.md`) with
//! `{{ }}` tags. The engine never looks at the surrounding text; making the
//! substituted values safe for the target format is the renderer's job.
//!
//! ## Syntax
//!
//! - Placeholders: `{{key}}`, `{{ nested.key }}`
//! - Filters: `{{ design.page.left_margin | divide 2 }}` (see [`engine`] for the list)
//! - Loops: `{{each items |item|}} ... {{/each}}`
//! - Conditionals: `{{if key}} ... {{else}} ... {{/if}}`
//! - Escapes: `\{{literal}}`

pub mod engine;
pub mod error;

pub use engine::{render, TemplateContext, TemplateEngine};
pub use error::TemplateError;
