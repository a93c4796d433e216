//! Working-directory listing for the polling loop.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// List the regular-file names in `dir`, sorted lexicographically.
///
/// Directories and other non-file entries are skipped so a stray directory
/// whose name matches a control suffix can never crash the loop. Names that
/// are not valid UTF-8 are skipped as well; they cannot match any control
/// suffix.
pub fn list_entries(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("read dir {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("read dir entry in {}", dir.display()))?;
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;
        if !file_type.is_file() {
            continue;
        }
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_files_sorted() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(temp.path().join("b.txt"), "").expect("write");
        fs::write(temp.path().join("a.txt"), "").expect("write");
        fs::write(temp.path().join("c.txt"), "").expect("write");

        let names = list_entries(temp.path()).expect("list");
        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn skips_directories() {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::create_dir(temp.path().join("sub.gitlab_ci_step_script")).expect("mkdir");
        fs::write(temp.path().join("a.txt"), "").expect("write");

        let names = list_entries(temp.path()).expect("list");
        assert_eq!(names, vec!["a.txt"]);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = list_entries(&temp.path().join("missing")).unwrap_err();
        assert!(err.to_string().contains("read dir"));
    }
}
