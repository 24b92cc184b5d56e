use crate::error::{AppError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashSet;

pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
pub const DEFAULT_OUTPUT_FILENAME: &str = "merged_codebase.txt";

/// Immutable per-run exclusion settings. Built once from caller input;
/// the built-in structural denylist lives in embedded data, not here.
#[derive(Debug)]
pub struct MergeConfig {
    pub max_file_size: u64,
    pub exclude_patterns: Vec<Regex>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            exclude_patterns: Vec::new(),
        }
    }
}

impl MergeConfig {
    pub fn new(max_file_size: u64, exclude_patterns: &[String]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(exclude_patterns.len());
        for pattern_str in exclude_patterns {
            match Regex::new(pattern_str) {
                Ok(re) => {
                    log::trace!("Compiled exclude pattern: {}", pattern_str);
                    compiled.push(re);
                }
                Err(e) => {
                    log::error!("Invalid exclude pattern \"{}\": {}", pattern_str, e);
                    return Err(AppError::Pattern {
                        pattern: pattern_str.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(Self {
            max_file_size,
            exclude_patterns: compiled,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BuiltinDenylist {
    #[serde(default)]
    pub dirs: HashSet<String>,
    #[serde(default)]
    pub extensions: HashSet<String>,
}

impl BuiltinDenylist {
    /// Directory-name check; the walker uses this to prune whole subtrees.
    pub fn contains_dir(&self, name: &str) -> bool {
        self.dirs.contains(name)
    }

    /// Extension check, dot included ("`.png`"). Case-insensitive.
    pub fn contains_extension(&self, ext: &str) -> bool {
        self.extensions.contains(&ext.to_ascii_lowercase())
    }
}

static BUILTIN_DENYLIST: Lazy<BuiltinDenylist> = Lazy::new(|| {
    let yaml_content = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../data/builtin_denylist.yaml"
    ));
    serde_yml::from_str(yaml_content).expect("Failed to parse embedded data/builtin_denylist.yaml")
});

pub fn get_builtin_denylist() -> &'static BuiltinDenylist {
    &BUILTIN_DENYLIST
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = MergeConfig::default();
        assert_eq!(config.max_file_size, 5 * 1024 * 1024);
        assert!(config.exclude_patterns.is_empty());
    }

    #[test]
    fn new_compiles_patterns_in_order() {
        let config =
            MergeConfig::new(1024, &[r"\.md$".to_string(), "docs/".to_string()]).unwrap();
        assert_eq!(config.exclude_patterns.len(), 2);
        assert!(config.exclude_patterns[0].is_match("README.md"));
        assert!(config.exclude_patterns[1].is_match("docs/guide.txt"));
    }

    #[test]
    fn new_rejects_invalid_pattern() {
        let err = MergeConfig::new(1024, &["[unclosed".to_string()]).unwrap_err();
        match err {
            AppError::Pattern { pattern, .. } => assert_eq!(pattern, "[unclosed"),
            other => panic!("expected Pattern error, got {:?}", other),
        }
    }

    #[test]
    fn builtin_denylist_loads_from_embedded_data() {
        let denylist = get_builtin_denylist();
        assert!(denylist.contains_dir(".git"));
        assert!(denylist.contains_dir("node_modules"));
        assert!(!denylist.contains_dir("src"));
        assert!(denylist.contains_extension(".png"));
        assert!(denylist.contains_extension(".PNG"));
        assert!(!denylist.contains_extension(".rs"));
    }
}
