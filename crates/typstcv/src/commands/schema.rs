//! Schema command - JSON Schema of the input for editor autocompletion

use std::fs;
use std::path::PathBuf;

use anyhow::{Result, anyhow};
use colored::Colorize;
use typstcv_core::input_schema;

use crate::output::print_json;

pub fn run(themes_dir: Option<PathBuf>, output: Option<PathBuf>, verbose: bool) -> Result<()> {
    let registry = super::registry(themes_dir);
    let schema = input_schema(&registry)?;
    let text = serde_json::to_string_pretty(&schema)?;

    match output {
        Some(path) => {
            fs::write(&path, format!("{text}\n"))
                .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;
            if verbose {
                println!("{} {} theme(s) in schema", "→".cyan(), registry.ids()?.len());
            }
            println!("{} Wrote schema to {}", "✓".green().bold(), path.display());
        }
        None => print_json(&text)?,
    }
    Ok(())
}
