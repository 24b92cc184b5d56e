use crate::acquire::{self, RepoSource};
use crate::config::MergeConfig;
use crate::error::{AppError, Result};
use crate::exclude::{self, ExcludeReason};
use crate::merge::MergeWriter;
use crate::walk;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Final accounting for one run, handed back to the front-end for display.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub repo_name: String,
    pub included: u64,
    pub excluded: BTreeMap<ExcludeReason, u64>,
    pub errors: u64,
    pub bytes_written: u64,
}

impl Summary {
    pub fn total_excluded(&self) -> u64 {
        self.excluded.values().sum()
    }
}

/// Runs the whole pipeline: acquire a checkout, walk it, filter the
/// candidates, stream the survivors into the artifact. Acquisition and
/// root-walk failures abort before the destination is even created, so a
/// fatal error never leaves a half-claimed artifact behind. Setting the
/// cancel flag stops the run at the next section boundary.
pub fn run(
    source: &RepoSource,
    config: &MergeConfig,
    output_path: &Path,
    cancel: Option<&AtomicBool>,
) -> Result<Summary> {
    let checkout = acquire::acquire(source)?;
    log::info!(
        "Merging repository '{}' into {}",
        checkout.repo_name(),
        output_path.display()
    );

    let walked = walk::walk_repository(checkout.root())?;

    let mut excluded: BTreeMap<ExcludeReason, u64> = BTreeMap::new();
    if !walked.pruned_dirs.is_empty() {
        // Each pruned subtree counts once; its contents were never listed.
        *excluded.entry(ExcludeReason::Structural).or_insert(0) +=
            walked.pruned_dirs.len() as u64;
    }

    let mut survivors = Vec::new();
    for candidate in &walked.candidates {
        if is_cancelled(cancel) {
            log::warn!("Run cancelled while filtering candidates");
            return Err(AppError::Interrupted);
        }
        match exclude::evaluate(candidate, config) {
            Some(reason) => *excluded.entry(reason).or_insert(0) += 1,
            None => survivors.push(candidate),
        }
    }
    log::debug!(
        "Filtering complete: {} of {} candidates survive",
        survivors.len(),
        walked.candidates.len()
    );

    let dest = File::create(output_path).map_err(|e| AppError::FileWrite {
        path: output_path.to_path_buf(),
        source: e,
    })?;
    let mut writer = MergeWriter::new(BufWriter::new(dest));
    writer.write_preamble(checkout.repo_name(), &output_path.display().to_string())?;

    for candidate in survivors {
        if is_cancelled(cancel) {
            log::warn!("Run cancelled; artifact ends at the last complete section");
            return Err(AppError::Interrupted);
        }
        writer.write_file(candidate)?;
    }
    let merged = writer.finish()?;

    if merged.decode_errors > 0 {
        *excluded.entry(ExcludeReason::DecodeError).or_insert(0) += merged.decode_errors;
    }

    let summary = Summary {
        repo_name: checkout.repo_name().to_string(),
        included: merged.included,
        excluded,
        errors: merged.read_errors,
        bytes_written: merged.bytes_written,
    };
    log::info!(
        "Merge complete: {} included, {} excluded, {} errors, {} bytes",
        summary.included,
        summary.total_excluded(),
        summary.errors,
        summary.bytes_written
    );
    Ok(summary)
}

fn is_cancelled(cancel: Option<&AtomicBool>) -> bool {
    cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
}
