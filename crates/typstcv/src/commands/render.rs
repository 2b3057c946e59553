//! Render command - YAML input to `<Name>_CV.typ` and `<Name>_CV.md`

use std::fs;
use std::path::Path;

use anyhow::{Result, anyhow, bail};
use chrono::Local;
use colored::Colorize;
use typstcv_core::model::RenderSettings;
use typstcv_core::{OutputFormat, Renderer, ThemeRegistry, parse_input};

use crate::cli::RenderArgs;
use crate::output::{file_stem, write_atomically};

/// Validate the input, render every requested format, then write the files
///
/// Nothing is written unless every format rendered successfully.
pub fn run(args: RenderArgs, verbose: bool) -> Result<()> {
    let yaml = fs::read_to_string(&args.input)
        .map_err(|e| anyhow!("Failed to read {}: {}", args.input.display(), e))?;

    let base_dir = args
        .input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let themes_dir = args.themes_dir.clone().unwrap_or_else(|| base_dir.to_path_buf());
    let registry = ThemeRegistry::with_themes_dir(themes_dir);
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());

    if verbose {
        println!("{} Validating {}", "→".cyan(), args.input.display());
    }
    let input = parse_input(&yaml, &registry, today)?;

    let formats = selected_formats(&input.settings.render, &args);
    if formats.is_empty() {
        bail!("Nothing to render: both Typst and Markdown output are disabled");
    }

    if verbose {
        let names: Vec<String> = formats.iter().map(ToString::to_string).collect();
        println!(
            "{} Rendering {} with theme '{}'",
            "→".cyan(),
            names.join(" and "),
            input.design.theme()
        );
    }
    let documents = Renderer::new(&registry).render_all(&input, &formats)?;

    let stem = file_stem(input.cv.name.as_deref());
    let files: Vec<(String, String)> = documents
        .into_iter()
        .map(|doc| (format!("{}.{}", stem, doc.format.extension()), doc.text))
        .collect();

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| base_dir.join(&input.settings.render.output_folder));
    for path in write_atomically(&output_dir, &files)? {
        println!("{} Generated {}", "✓".green().bold(), path.display());
    }

    Ok(())
}

/// Formats enabled by both the input's settings and the command line
fn selected_formats(settings: &RenderSettings, args: &RenderArgs) -> Vec<OutputFormat> {
    OutputFormat::ALL
        .into_iter()
        .filter(|format| match format {
            OutputFormat::Typst => settings.typst && !args.no_typst,
            OutputFormat::Markdown => settings.markdown && !args.no_markdown,
        })
        .collect()
}
