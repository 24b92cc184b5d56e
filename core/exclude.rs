use crate::config::{MergeConfig, get_builtin_denylist};
use crate::detect;
use crate::walk::CandidateFile;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Why a file was left out of the artifact. `DecodeError` is assigned late,
/// by the merge writer, when content that passed every up-front check turns
/// out not to decode as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExcludeReason {
    Structural,
    UserPattern,
    TooLarge,
    BinaryContent,
    DecodeError,
}

impl ExcludeReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExcludeReason::Structural => "structural",
            ExcludeReason::UserPattern => "user-pattern",
            ExcludeReason::TooLarge => "too-large",
            ExcludeReason::BinaryContent => "binary-content",
            ExcludeReason::DecodeError => "decode-error",
        }
    }
}

impl fmt::Display for ExcludeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a candidate stays out of the merge. Checks run in a
/// fixed order and the first hit wins, so the cheap path-only rules always
/// short-circuit the content sampling at the end.
pub fn evaluate(candidate: &CandidateFile, config: &MergeConfig) -> Option<ExcludeReason> {
    let rel = candidate.relative_path.as_str();
    let denylist = get_builtin_denylist();

    // Parent segments only: a file that happens to share a name with a
    // denylisted directory is still eligible.
    let mut segments: Vec<&str> = rel.split('/').collect();
    segments.pop();
    if segments.iter().any(|seg| denylist.contains_dir(seg)) {
        log::trace!("Excluding {} (denylisted directory segment)", rel);
        return Some(ExcludeReason::Structural);
    }

    if let Some(ext) = Path::new(rel).extension().and_then(|e| e.to_str()) {
        if denylist.contains_extension(&format!(".{}", ext)) {
            log::trace!("Excluding {} (denylisted extension)", rel);
            return Some(ExcludeReason::Structural);
        }
    }

    if let Some(re) = config.exclude_patterns.iter().find(|re| re.is_match(rel)) {
        log::trace!("Excluding {} (pattern \"{}\")", rel, re.as_str());
        return Some(ExcludeReason::UserPattern);
    }

    if candidate.size > config.max_file_size {
        log::trace!(
            "Excluding {} ({} bytes over the {} byte limit)",
            rel,
            candidate.size,
            config.max_file_size
        );
        return Some(ExcludeReason::TooLarge);
    }

    if detect::is_binary(&detect::read_sample(&candidate.absolute_path)) {
        log::trace!("Excluding {} (binary content)", rel);
        return Some(ExcludeReason::BinaryContent);
    }

    None
}
