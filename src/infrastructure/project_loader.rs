use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

const NIB_EXTENSIONS: &[&str] = &["storyboard", "xib"];
const SKIPPED_DIRECTORIES: &[&str] = &[".git", "build", "DerivedData", "Pods"];

pub struct ProjectLoader;

impl ProjectLoader {
    /// Every `.storyboard` and `.xib` under `root`, canonicalized, sorted and
    /// deduplicated. Entries that cannot be read (including symlink loops)
    /// are skipped with a warning.
    /// A single file path is returned as-is when it has a nib extension.
    pub fn nib_files(root: &Path) -> Result<Vec<PathBuf>> {
        if !root.exists() {
            bail!("{} does not exist", root.display());
        }
        if root.is_file() {
            return Ok(if Self::is_nib(root) { vec![root.to_path_buf()] } else { Vec::new() });
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| !Self::is_skipped(entry))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(%err, "skipping unreadable project entry");
                    continue;
                }
            };
            if entry.file_type().is_file() && Self::is_nib(entry.path()) {
                // Symlinked directories would otherwise yield the same document twice.
                let path = entry.path().canonicalize().unwrap_or_else(|_| entry.path().to_path_buf());
                files.push(path);
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    fn is_nib(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| NIB_EXTENSIONS.contains(&ext))
            .unwrap_or(false)
    }

    fn is_skipped(entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && entry
                .file_name()
                .to_str()
                .map(|name| SKIPPED_DIRECTORIES.contains(&name))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_collects_nibs_recursively() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("App/Base.lproj")).unwrap();
        fs::write(dir.path().join("App/Base.lproj/Main.storyboard"), "<document/>").unwrap();
        fs::write(dir.path().join("App/Cell.xib"), "<document/>").unwrap();
        fs::write(dir.path().join("App/AppDelegate.swift"), "").unwrap();

        let files = ProjectLoader::nib_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Main.storyboard", "Cell.xib"]);
    }

    #[test]
    fn test_skips_build_directories() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("Pods/Lib")).unwrap();
        fs::write(dir.path().join("Pods/Lib/Vendor.xib"), "<document/>").unwrap();
        fs::write(dir.path().join("Launch.storyboard"), "<document/>").unwrap();

        let files = ProjectLoader::nib_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("Launch.storyboard").canonicalize().unwrap()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_loops_and_aliases_are_tolerated() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("App")).unwrap();
        fs::write(dir.path().join("App/Main.storyboard"), "<document/>").unwrap();
        symlink(dir.path().join("App"), dir.path().join("Alias")).unwrap();
        symlink(dir.path(), dir.path().join("App/loop")).unwrap();

        let files = ProjectLoader::nib_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("App/Main.storyboard").canonicalize().unwrap()]);
    }

    #[test]
    fn test_single_file() {
        let dir = tempdir().unwrap();
        let nib = dir.path().join("View.xib");
        fs::write(&nib, "<document/>").unwrap();
        assert_eq!(ProjectLoader::nib_files(&nib).unwrap(), vec![nib]);

        let source = dir.path().join("View.swift");
        fs::write(&source, "").unwrap();
        assert!(ProjectLoader::nib_files(&source).unwrap().is_empty());
        assert!(ProjectLoader::nib_files(&dir.path().join("missing")).is_err());
    }
}
