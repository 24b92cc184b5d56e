use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Upper bound on how much of a file is inspected for binary content.
pub const SAMPLE_LEN: usize = 8 * 1024;

/// Fraction of non-printable, non-whitespace bytes above which a sample
/// is classified as binary.
const NON_PRINTABLE_THRESHOLD: f64 = 0.30;

/// Classifies a byte sample as binary. A NUL byte decides immediately;
/// otherwise the density of control bytes does. Bytes >= 0x80 are left
/// alone so multi-byte UTF-8 text is never flagged by proportion.
/// An empty sample is not binary (read failures surface later, at merge
/// time, not here).
pub fn is_binary(sample: &[u8]) -> bool {
    if sample.is_empty() {
        return false;
    }
    if sample.contains(&0) {
        return true;
    }
    let non_printable = sample
        .iter()
        .filter(|&&b| (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)) || b == 0x7f)
        .count();
    (non_printable as f64) / (sample.len() as f64) > NON_PRINTABLE_THRESHOLD
}

/// Best-effort read of the first [`SAMPLE_LEN`] bytes. Any I/O failure
/// yields an empty sample; the caller re-encounters the error when the
/// full content is read.
pub fn read_sample(path: &Path) -> Vec<u8> {
    let mut sample = Vec::with_capacity(SAMPLE_LEN.min(4096));
    match File::open(path) {
        Ok(file) => {
            if let Err(e) = file.take(SAMPLE_LEN as u64).read_to_end(&mut sample) {
                log::debug!("Could not sample {}: {}", path.display(), e);
                sample.clear();
            }
        }
        Err(e) => {
            log::debug!("Could not open {} for sampling: {}", path.display(), e);
        }
    }
    sample
}
