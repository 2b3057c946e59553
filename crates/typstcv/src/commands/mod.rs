//! CLI command implementations

pub mod new;
pub mod render;
pub mod schema;
pub mod themes;

use std::path::PathBuf;

use typstcv_core::ThemeRegistry;

/// Registry over `themes_dir`, or over the current directory when not given
pub(crate) fn registry(themes_dir: Option<PathBuf>) -> ThemeRegistry {
    ThemeRegistry::with_themes_dir(themes_dir.unwrap_or_else(|| PathBuf::from(".")))
}
