use crate::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Where the repository tree comes from: a URL handed to the external git
/// client, or a checkout that already exists on disk.
#[derive(Debug, Clone, PartialEq)]
pub enum RepoSource {
    Remote(String),
    LocalDir(PathBuf),
}

impl RepoSource {
    /// An existing directory is treated as a local checkout; anything else
    /// is assumed to be a clone URL.
    pub fn detect(arg: &str) -> Self {
        let path = Path::new(arg);
        if path.is_dir() {
            RepoSource::LocalDir(path.to_path_buf())
        } else {
            RepoSource::Remote(arg.to_string())
        }
    }
}

/// A usable checkout directory. For remote sources the backing temp dir is
/// owned here, so the tree stays on disk exactly as long as the run needs it.
#[derive(Debug)]
pub struct Checkout {
    root: PathBuf,
    repo_name: String,
    _temp_dir: Option<TempDir>,
}

impl Checkout {
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Display name for the artifact preamble: the URL tail for clones,
    /// the directory name for local checkouts.
    pub fn repo_name(&self) -> &str {
        &self.repo_name
    }
}

/// Obtains a local checkout for the given source. Remote sources are
/// shallow-cloned through the external `git` client into a temp directory;
/// every clone failure mode (missing tool, bad URL, network) surfaces as a
/// fatal `Acquisition` error before any output is produced.
pub fn acquire(source: &RepoSource) -> Result<Checkout> {
    match source {
        RepoSource::Remote(url) => {
            let temp_dir = TempDir::new()?;
            let target = temp_dir.path().to_path_buf();
            log::info!("Cloning {} into {}", url, target.display());

            let output = Command::new("git")
                .arg("clone")
                .arg("--depth=1")
                .arg(url)
                .arg(&target)
                .output()
                .map_err(|e| AppError::Acquisition {
                    url: url.clone(),
                    message: format!("failed to launch git: {}", e),
                })?;

            if !output.status.success() {
                let stderr = String::from_utf8_lossy(&output.stderr);
                log::error!("git clone failed for {}: {}", url, stderr.trim());
                return Err(AppError::Acquisition {
                    url: url.clone(),
                    message: format!("git clone exited with {}: {}", output.status, stderr.trim()),
                });
            }

            log::info!("Clone complete: {}", url);
            Ok(Checkout {
                root: target,
                repo_name: repo_name_from_url(url),
                _temp_dir: Some(temp_dir),
            })
        }
        RepoSource::LocalDir(path) => {
            let root = fs::canonicalize(path).map_err(|e| AppError::Acquisition {
                url: path.display().to_string(),
                message: format!("checkout directory is not usable: {}", e),
            })?;
            let repo_name = root
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "repository".to_string());
            log::debug!("Using local checkout {} ({})", root.display(), repo_name);
            Ok(Checkout {
                root,
                repo_name,
                _temp_dir: None,
            })
        }
    }
}

fn repo_name_from_url(url: &str) -> String {
    let trimmed = url.trim_end_matches('/');
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);
    match trimmed.rsplit(['/', ':']).next() {
        Some(tail) if !tail.is_empty() => tail.to_string(),
        _ => "repository".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn detect_prefers_existing_directory() {
        let dir = tempdir().unwrap();
        let arg = dir.path().to_string_lossy().into_owned();
        assert_eq!(
            RepoSource::detect(&arg),
            RepoSource::LocalDir(dir.path().to_path_buf())
        );
        assert_eq!(
            RepoSource::detect("https://example.com/user/repo.git"),
            RepoSource::Remote("https://example.com/user/repo.git".to_string())
        );
    }

    #[test]
    fn repo_name_derivation_from_urls() {
        assert_eq!(repo_name_from_url("https://github.com/user/proj.git"), "proj");
        assert_eq!(repo_name_from_url("https://github.com/user/proj"), "proj");
        assert_eq!(repo_name_from_url("https://github.com/user/proj/"), "proj");
        assert_eq!(repo_name_from_url("git@github.com:user/proj.git"), "proj");
        assert_eq!(repo_name_from_url("proj"), "proj");
    }

    #[test]
    fn acquire_local_resolves_root_and_name() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("myrepo");
        fs::create_dir(&nested).unwrap();

        let checkout =
            acquire(&RepoSource::LocalDir(nested.clone())).unwrap();
        assert_eq!(checkout.repo_name(), "myrepo");
        assert!(checkout.root().is_dir());
    }

    #[test]
    fn acquire_missing_local_dir_is_an_acquisition_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("gone");
        let err = acquire(&RepoSource::LocalDir(missing)).unwrap_err();
        assert!(matches!(err, AppError::Acquisition { .. }));
    }

    #[test]
    fn acquire_unreachable_remote_is_an_acquisition_error() {
        // file:// needs no network; the path simply does not exist. A
        // missing git binary takes the launch-failure path instead, which
        // is the same error category.
        let err = acquire(&RepoSource::Remote(
            "file:///definitely/not/a/repo".to_string(),
        ))
        .unwrap_err();
        assert!(matches!(err, AppError::Acquisition { .. }));
    }
}
