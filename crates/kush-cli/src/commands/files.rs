//! Source file collection.

use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = "kush";

/// Collect all .kush source files from the given paths (files or directories).
///
/// Files named explicitly are kept whatever their extension. Directory
/// entries are visited in name order so output is stable.
pub fn collect_kush_files(paths: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path_str in paths {
        let path = Path::new(path_str);
        if path.is_file() {
            files.push(path.to_path_buf());
        } else if path.is_dir() {
            collect_kush_in_dir(path, &mut files)?;
        } else {
            anyhow::bail!("no such file or directory: {}", path_str);
        }
    }

    files.dedup();
    Ok(files)
}

/// Recursively collect .kush files in a directory.
fn collect_kush_in_dir(dir: &Path, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let mut entries = std::fs::read_dir(dir)?.collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            // Skip hidden dirs and build output
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if name_str.starts_with('.') || name_str == "target" {
                continue;
            }
            collect_kush_in_dir(&path, files)?;
        } else if is_source(&path) {
            files.push(path);
        }
    }
    Ok(())
}

fn is_source(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(SOURCE_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_collects_recursively_and_skips_hidden() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::create_dir_all(root.join(".cache")).unwrap();
        fs::write(root.join("src/b.kush"), "").unwrap();
        fs::write(root.join("src/a.kush"), "").unwrap();
        fs::write(root.join("src/nested/c.kush"), "").unwrap();
        fs::write(root.join("src/notes.txt"), "").unwrap();
        fs::write(root.join(".cache/d.kush"), "").unwrap();

        let files = collect_kush_files(&[root.display().to_string()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, vec!["src/a.kush", "src/b.kush", "src/nested/c.kush"]);
    }

    #[test]
    fn test_explicit_file_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.txt");
        fs::write(&path, "").unwrap();
        let files = collect_kush_files(&[path.display().to_string()]).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn test_missing_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(collect_kush_files(&[missing.display().to_string()]).is_err());
    }
}
