//! New command - write a sample input file

use std::env;
use std::fs;

use anyhow::{Result, bail};
use colored::Colorize;

use crate::output::file_stem;

const SAMPLE: &str = r#"# Rendered with `typstcv render {file}`
cv:
  name: {name}
  location: Your City, Country
  email: you@example.com
  website: https://example.com
  social_networks:
    - network: GitHub
      username: your-handle
  sections:
    summary:
      - A short summary. Inline markup such as **bold**, *italic*, `code` and [links](https://example.com) works in every text field.
    experience:
      - company: Example Corp
        position: Software Engineer
        location: Remote
        start_date: 2022-01
        highlights:
          - Something you built and its impact
          - Another result worth mentioning
    education:
      - institution: Example University
        area: Computer Science
        degree: BSc
        start_date: 2017-09
        end_date: 2021-06
    projects:
      - name: A side project
        date: 2023
        summary: What it does and why it matters
    skills:
      - label: Languages
        details: Rust, Python, SQL
design:
  theme: {theme}
"#;

/// Create `<Name>_CV.yaml` in the current directory
///
/// # Arguments
///
/// * `name` - Full name written to `cv.name`; also names the file
/// * `theme` - Theme of the design block; must be known
/// * `force` - Overwrite an existing file
pub fn run(name: String, theme: String, force: bool, verbose: bool) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Name must not be empty");
    }

    let current_dir = env::current_dir()?;
    let registry = super::registry(Some(current_dir.clone()));
    registry.get(&theme)?;

    let file_name = format!("{}.yaml", file_stem(Some(&name)));
    let path = current_dir.join(&file_name);
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    if verbose {
        println!("{} Writing sample input with theme '{}'", "→".cyan(), theme);
    }
    fs::write(&path, sample(&name, &theme, &file_name))?;

    println!("{} Created {}", "✓".green().bold(), path.display());
    println!("\n{} Next steps:", "→".cyan());
    println!("  1. Edit {}", file_name);
    println!("  2. typstcv render {}", file_name);

    Ok(())
}

fn sample(name: &str, theme: &str, file_name: &str) -> String {
    // A JSON string is a valid double-quoted YAML scalar
    let quote = |s: &str| serde_json::Value::String(s.to_string()).to_string();
    SAMPLE
        .replace("{file}", file_name)
        .replace("{name}", &quote(name.trim()))
        .replace("{theme}", &quote(theme))
}
