use crate::config::get_builtin_denylist;
use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A file discovered under the checkout root. The relative path is
/// forward-slash normalized and is the one string used both for exclusion
/// matching and for the `FILE:` header in the artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFile {
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub size: u64,
}

/// Outcome of one walk: the candidate files in traversal order, plus the
/// relative paths of denylisted directories that were pruned without being
/// entered. The pruned list feeds the structural exclusion tally.
#[derive(Debug, Default)]
pub struct WalkResult {
    pub candidates: Vec<CandidateFile>,
    pub pruned_dirs: Vec<String>,
}

/// Walks the checkout tree depth-first, lexicographic among siblings.
/// Denylisted directories are pruned without being entered and symlinks
/// are never followed. A missing or unreadable root is fatal; errors
/// below the root are logged and skipped. Each call walks from scratch,
/// so the sequence is restartable and deterministic.
pub fn walk_repository(root: &Path) -> Result<WalkResult> {
    if !root.is_dir() {
        return Err(AppError::Walk {
            path: root.to_path_buf(),
            message: "root is not a directory".to_string(),
        });
    }
    // Surface an unreadable root as a fatal error up front; walkdir would
    // otherwise report it as an ordinary entry error mid-iteration.
    fs::read_dir(root).map_err(|e| AppError::Walk {
        path: root.to_path_buf(),
        message: e.to_string(),
    })?;

    log::info!("Walking checkout directory: {}", root.display());

    let mut result = WalkResult::default();
    let pruned = &mut result.pruned_dirs;
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() > 0 && is_denylisted_dir(entry) {
                if let Ok(rel) = entry.path().strip_prefix(root) {
                    pruned.push(normalize_relative(rel));
                }
                return false;
            }
            true
        });

    for entry_result in walker {
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Error walking directory: {}", e);
                continue;
            }
        };
        // Regular files only; symlinked files show up as symlinks here
        // because the walker does not follow links.
        if !entry.file_type().is_file() {
            continue;
        }
        let relative_path = match entry.path().strip_prefix(root) {
            Ok(rel) => normalize_relative(rel),
            Err(_) => {
                log::warn!("Could not relativize path: {}", entry.path().display());
                continue;
            }
        };
        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(e) => {
                log::warn!("Could not stat {}: {}", entry.path().display(), e);
                0
            }
        };
        log::trace!("Walked file: {} ({} bytes)", relative_path, size);
        result.candidates.push(CandidateFile {
            relative_path,
            absolute_path: entry.into_path(),
            size,
        });
    }

    log::debug!(
        "Walk complete: {} candidate files, {} pruned directories under {}",
        result.candidates.len(),
        result.pruned_dirs.len(),
        root.display()
    );
    Ok(result)
}

fn is_denylisted_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if get_builtin_denylist().contains_dir(&name) {
        log::trace!("Pruning denylisted directory: {}", entry.path().display());
        true
    } else {
        false
    }
}

fn normalize_relative(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        File::create(path).unwrap().write_all(content).unwrap();
    }

    fn relative_paths(root: &Path) -> Vec<String> {
        walk_repository(root)
            .unwrap()
            .candidates
            .into_iter()
            .map(|c| c.relative_path)
            .collect()
    }

    #[test]
    fn traversal_is_depth_first_lexicographic() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "b.txt", b"b");
        write_file(dir.path(), "a.txt", b"a");
        write_file(dir.path(), "A/c.txt", b"c");

        assert_eq!(relative_paths(dir.path()), vec!["A/c.txt", "a.txt", "b.txt"]);
    }

    #[test]
    fn walk_is_restartable_and_deterministic() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "src/main.rs", b"fn main() {}");
        write_file(dir.path(), "README.md", b"hi");
        write_file(dir.path(), "src/lib.rs", b"");

        let first = walk_repository(dir.path()).unwrap();
        let second = walk_repository(dir.path()).unwrap();
        assert_eq!(first.candidates, second.candidates);
    }

    #[test]
    fn denylisted_directories_are_pruned_and_recorded() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "keep.txt", b"keep");
        write_file(dir.path(), "node_modules/dep/index.js", b"dep");
        write_file(dir.path(), ".git/HEAD", b"ref: refs/heads/main");

        let result = walk_repository(dir.path()).unwrap();
        let paths: Vec<_> = result
            .candidates
            .iter()
            .map(|c| c.relative_path.as_str())
            .collect();
        assert_eq!(paths, vec!["keep.txt"]);
        assert_eq!(result.pruned_dirs, vec![".git", "node_modules"]);
    }

    #[test]
    fn sizes_come_from_metadata() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "four.txt", b"1234");

        let result = walk_repository(dir.path()).unwrap();
        assert_eq!(result.candidates.len(), 1);
        assert_eq!(result.candidates[0].size, 4);
        assert!(result.candidates[0].absolute_path.ends_with("four.txt"));
    }

    #[test]
    fn missing_root_is_fatal() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = walk_repository(&missing).unwrap_err();
        match err {
            AppError::Walk { path, .. } => assert_eq!(path, missing),
            other => panic!("expected Walk error, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_not_followed() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "real/inner.txt", b"inner");
        write_file(dir.path(), "top.txt", b"top");
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link")).unwrap();
        std::os::unix::fs::symlink(dir.path().join("top.txt"), dir.path().join("alias.txt"))
            .unwrap();

        assert_eq!(
            relative_paths(dir.path()),
            vec!["real/inner.txt", "top.txt"]
        );
    }
}
