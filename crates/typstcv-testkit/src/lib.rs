//! Test utilities for typstcv
//!
//! Shared across the workspace: scratch directories under `.tmp/`, sample
//! input documents and custom theme fixtures.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A complete input exercising every entry type
pub const SAMPLE_CV: &str = r#"cv:
  name: Jane Doe
  location: Berlin, Germany
  email: jane@example.com
  phone: "+49 30 1234567"
  website: https://janedoe.dev
  social_networks:
    - network: GitHub
      username: janedoe
    - network: LinkedIn
      username: jane-doe
  sections:
    summary:
      - Backend engineer working on **distributed systems** in Rust.
    experience:
      - company: Acme Corp
        position: Senior Engineer
        location: Berlin
        start_date: 2022-02
        highlights:
          - Led the storage migration
          - Cut p99 latency by 40%
      - company: Initech
        position: Engineer
        start_date: 2019-09
        end_date: 2022-01
    education:
      - institution: TU Berlin
        area: Computer Science
        degree: MSc
        start_date: 2017-10
        end_date: 2019-08
    publications:
      - title: Consistent Hashing in Practice
        authors:
          - Jane Doe
          - John Smith
        doi: 10.1000/xyz123
        journal: Journal of Systems
        date: 2021-05
    projects:
      - name: typstcv
        date: 2024
        summary: CV generator with `Typst` output
    skills:
      - label: Languages
        details: Rust, Go, SQL
design:
  theme: classic
settings:
  today: 2024-06-01
"#;

/// An ongoing position and nothing else
pub const ONGOING_CV: &str = r#"cv:
  name: John Smith
  sections:
    experience:
      - company: Acme Corp
        position: Engineer
        start_date: 2023-01
settings:
  today: 2024-06-01
"#;

/// Creates a temporary directory within `.tmp/` at the current directory
///
/// The directory is removed when the returned `TempDir` is dropped.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or `.tmp/` cannot
/// be created.
///
/// # Examples
///
/// ```rust
/// use typstcv_testkit::temp_dir_in_workspace;
///
/// let temp = temp_dir_in_workspace();
/// std::fs::write(temp.path().join("cv.yaml"), "cv: {}\n").unwrap();
/// ```
pub fn temp_dir_in_workspace() -> TempDir {
    try_temp_dir_in_workspace().expect("Failed to create temporary directory in .tmp/")
}

/// Non-panicking variant of [`temp_dir_in_workspace`]
pub fn try_temp_dir_in_workspace() -> std::io::Result<TempDir> {
    let tmp_base = std::env::current_dir()?.join(".tmp");
    std::fs::create_dir_all(&tmp_base)?;
    TempDir::new_in(&tmp_base)
}

/// Write `contents` to `dir/name` and return the path
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

/// Create `<themes_dir>/<id>/` holding the given template files
///
/// `files` are `(file name, contents)` pairs such as
/// `("Header.tmp.typ", "= {{cv.name}}")`. Pass a `theme.toml` pair to give
/// the theme its own options.
pub fn write_custom_theme(themes_dir: &Path, id: &str, files: &[(&str, &str)]) -> PathBuf {
    let dir = themes_dir.join(id);
    std::fs::create_dir_all(&dir).expect("Failed to create theme directory");
    for (name, contents) in files {
        write_file(&dir, name, contents);
    }
    dir
}

/// Minimal Typst frame templates of a custom theme, without entry templates
pub fn frame_templates() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Preamble.tmp.typ", "// {{theme}}\n"),
        ("Header.tmp.typ", "= {{cv.name}}\n"),
        ("SectionBeginning.tmp.typ", "== {{section.title}}\n"),
        ("SectionEnding.tmp.typ", "// end\n"),
    ]
}
