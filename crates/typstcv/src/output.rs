use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Result, anyhow};
use tempfile::TempDir;

pub fn print_json(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

pub fn print_text(s: &str) -> io::Result<()> {
    let mut out = io::stdout().lock();
    writeln!(out, "{s}")
}

/// `Jane Doe` -> `Jane_Doe_CV`; characters unsafe in file names are dropped
pub fn file_stem(name: Option<&str>) -> String {
    let name: String = name
        .unwrap_or_default()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();
    let name = name.trim_matches('.');
    if name.is_empty() {
        "CV".to_string()
    } else {
        format!("{name}_CV")
    }
}

/// Write `files` into `dir` all at once
///
/// Every file is first written to a temporary directory inside `dir`, then
/// renamed into place. Replaced outputs are parked next to the staged files
/// until every rename has succeeded; when one fails, the files already moved
/// are put back, so a failure midway never leaves a mix of old and new
/// outputs behind.
pub fn write_atomically(dir: &Path, files: &[(String, String)]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .map_err(|e| anyhow!("Failed to create output directory {}: {}", dir.display(), e))?;

    let staging = TempDir::new_in(dir)
        .map_err(|e| anyhow!("Failed to create temporary directory in {}: {}", dir.display(), e))?;
    let previous_dir = staging.path().join(".previous");
    fs::create_dir(&previous_dir)
        .map_err(|e| anyhow!("Failed to create {}: {}", previous_dir.display(), e))?;
    for (name, contents) in files {
        fs::write(staging.path().join(name), contents)
            .map_err(|e| anyhow!("Failed to write {}: {}", name, e))?;
    }

    let mut placed: Vec<(PathBuf, Option<PathBuf>)> = Vec::with_capacity(files.len());
    for (name, _) in files {
        let target = dir.join(name);
        match place(&staging.path().join(name), &target, &previous_dir.join(name)) {
            Ok(previous) => {
                log::debug!("wrote {}", target.display());
                placed.push((target, previous));
            }
            Err(e) => {
                roll_back(&placed);
                return Err(anyhow!("Failed to move {} into place: {}", target.display(), e));
            }
        }
    }
    Ok(placed.into_iter().map(|(target, _)| target).collect())
}

/// Move `staged` to `target`, parking an existing file at `park`
fn place(staged: &Path, target: &Path, park: &Path) -> io::Result<Option<PathBuf>> {
    let previous = if target.is_file() {
        fs::rename(target, park)?;
        Some(park.to_path_buf())
    } else {
        None
    };
    if let Err(e) = fs::rename(staged, target) {
        if let Some(previous) = &previous {
            if let Err(restore) = fs::rename(previous, target) {
                log::warn!("could not restore {}: {}", target.display(), restore);
            }
        }
        return Err(e);
    }
    Ok(previous)
}

fn roll_back(placed: &[(PathBuf, Option<PathBuf>)]) {
    for (target, previous) in placed.iter().rev() {
        let restored = match previous {
            Some(previous) => fs::rename(previous, target),
            None => fs::remove_file(target),
        };
        if let Err(e) = restored {
            log::warn!("could not restore {}: {}", target.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use typstcv_testkit::temp_dir_in_workspace;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem(Some("Jane Doe")), "Jane_Doe_CV");
        assert_eq!(file_stem(Some("  José  García-López ")), "José_García-López_CV");
        assert_eq!(file_stem(Some("../etc/passwd")), "etcpasswd_CV");
        assert_eq!(file_stem(Some("")), "CV");
        assert_eq!(file_stem(None), "CV");
    }

    #[test]
    fn test_write_atomically_replaces_files_and_cleans_up() {
        let temp = temp_dir_in_workspace();
        let dir = temp.path().join("out");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("A_CV.typ"), "old").unwrap();
        fs::write(dir.join("notes.txt"), "keep").unwrap();

        let written = write_atomically(
            &dir,
            &[
                ("A_CV.typ".to_string(), "new typst".to_string()),
                ("A_CV.md".to_string(), "new markdown".to_string()),
            ],
        )
        .unwrap();

        assert_eq!(written, vec![dir.join("A_CV.typ"), dir.join("A_CV.md")]);
        assert_eq!(fs::read_to_string(dir.join("A_CV.typ")).unwrap(), "new typst");
        assert_eq!(fs::read_to_string(dir.join("notes.txt")).unwrap(), "keep");

        let mut names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["A_CV.md", "A_CV.typ", "notes.txt"]);
    }

    #[test]
    fn test_write_atomically_restores_outputs_when_a_rename_fails() {
        let temp = temp_dir_in_workspace();
        let dir = temp.path().join("out");
        fs::create_dir_all(dir.join("A_CV.md")).unwrap();
        fs::write(dir.join("A_CV.typ"), "old").unwrap();

        let result = write_atomically(
            &dir,
            &[
                ("B_CV.typ".to_string(), "new".to_string()),
                ("A_CV.typ".to_string(), "new typst".to_string()),
                ("A_CV.md".to_string(), "new markdown".to_string()),
            ],
        );

        assert!(result.is_err());
        assert_eq!(fs::read_to_string(dir.join("A_CV.typ")).unwrap(), "old");
        assert!(dir.join("A_CV.md").is_dir());

        let mut names: Vec<String> = fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["A_CV.md", "A_CV.typ"]);
    }
}
