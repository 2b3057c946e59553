//! Themes command - list the themes an input can select

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use crate::output::{print_json, print_text};

#[derive(Debug, Serialize)]
struct ThemeInfo {
    id: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
}

pub fn run(themes_dir: Option<PathBuf>, json: bool, verbose: bool) -> Result<()> {
    let registry = super::registry(themes_dir);
    if verbose {
        if let Some(dir) = registry.themes_dir() {
            println!("{} Looking for custom themes in {}", "→".cyan(), dir.display());
        }
    }

    let themes: Vec<ThemeInfo> = registry
        .themes()?
        .into_iter()
        .map(|theme| ThemeInfo {
            id: theme.id().to_string(),
            description: theme.schema.description.clone(),
            path: theme.dir().map(|dir| dir.display().to_string()),
        })
        .collect();

    if json {
        print_json(&serde_json::to_string_pretty(&themes)?)?;
        return Ok(());
    }

    let width = themes.iter().map(|t| t.id.len()).max().unwrap_or(0);
    for theme in &themes {
        let id = format!("{:width$}", theme.id);
        let line = match &theme.path {
            None => format!("{}  {}", id.bold(), theme.description),
            Some(path) => format!(
                "{}  {} {}",
                id.bold(),
                theme.description,
                format!("({path})").dimmed()
            ),
        };
        print_text(&line)?;
    }
    Ok(())
}
