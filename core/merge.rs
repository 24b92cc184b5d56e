use crate::error::Result;
use crate::walk::CandidateFile;
use once_cell::sync::Lazy;
use std::fs;
use std::io::Write;

static SEPARATOR: Lazy<String> = Lazy::new(|| "=".repeat(80));

/// Disposition of one candidate that reached the writer.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryStatus {
    Written { bytes: u64 },
    DecodeError,
    ReadError(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeEntry {
    pub relative_path: String,
    pub status: EntryStatus,
}

/// Bookkeeping for one run of the writer, in candidate order. Returned to
/// the orchestrator when the run finishes; content itself is never retained.
#[derive(Debug, Default)]
pub struct MergeResult {
    pub entries: Vec<MergeEntry>,
    pub included: u64,
    pub decode_errors: u64,
    pub read_errors: u64,
    pub bytes_written: u64,
}

/// Streams framed file sections into a destination. Candidates handed to
/// [`MergeWriter::write_file`] have already passed the exclusion evaluator;
/// the only checks left here are the ones that need the full content (read
/// and decode), and neither aborts the run. Destination failures do.
pub struct MergeWriter<W: Write> {
    dest: W,
    result: MergeResult,
}

impl<W: Write> MergeWriter<W> {
    pub fn new(dest: W) -> Self {
        Self {
            dest,
            result: MergeResult::default(),
        }
    }

    /// Artifact header. `generated_at` is the output filename, which the
    /// format records in its second line.
    pub fn write_preamble(&mut self, repo_name: &str, generated_at: &str) -> Result<()> {
        self.emit(&format!("# MERGED CODEBASE: {}\n", repo_name))?;
        self.emit(&format!("# Generated at: {}\n\n", generated_at))?;
        Ok(())
    }

    /// Reads one candidate and appends its framed section. A read failure
    /// or non-UTF-8 content records the file and writes nothing, so the
    /// artifact never carries partial or garbled sections. The destination
    /// is flushed after each section; an interrupted run ends on a section
    /// boundary.
    pub fn write_file(&mut self, candidate: &CandidateFile) -> Result<()> {
        let rel = candidate.relative_path.clone();

        let bytes = match fs::read(&candidate.absolute_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Could not read {}: {}", rel, e);
                self.result.read_errors += 1;
                self.result.entries.push(MergeEntry {
                    relative_path: rel,
                    status: EntryStatus::ReadError(e.to_string()),
                });
                return Ok(());
            }
        };

        let content = match String::from_utf8(bytes) {
            Ok(content) => content,
            Err(e) => {
                log::debug!("Skipping non-UTF-8 file {}: {}", rel, e);
                self.result.decode_errors += 1;
                self.result.entries.push(MergeEntry {
                    relative_path: rel,
                    status: EntryStatus::DecodeError,
                });
                return Ok(());
            }
        };

        log::trace!("Writing section for {}", rel);
        let before = self.result.bytes_written;
        self.emit(&format!("{}\n", *SEPARATOR))?;
        self.emit(&format!("FILE: {}\n", rel))?;
        self.emit(&format!("{}\n\n", *SEPARATOR))?;
        self.emit(&content)?;
        self.emit("\n\n")?;
        self.dest.flush()?;

        self.result.included += 1;
        self.result.entries.push(MergeEntry {
            relative_path: rel,
            status: EntryStatus::Written {
                bytes: self.result.bytes_written - before,
            },
        });
        Ok(())
    }

    pub fn finish(mut self) -> Result<MergeResult> {
        self.dest.flush()?;
        Ok(self.result)
    }

    fn emit(&mut self, s: &str) -> Result<()> {
        self.dest.write_all(s.as_bytes())?;
        self.result.bytes_written += s.len() as u64;
        Ok(())
    }
}
