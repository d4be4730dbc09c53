//! Metadata quick-check: size plus microsecond-truncated mtime.

use std::fs;
use std::path::Path;

use filetime::FileTime;

use crate::CompareError;

/// Decides equality of two regular files from metadata alone.
///
/// Returns `true` iff both files have the same byte size and the same
/// modification time after truncation to whole microseconds. File content is
/// never read, so two files that match on both counts while differing in
/// bytes are reported equal; that false-negative window is the accepted cost
/// of a stat-only comparison.
pub fn files_equal(left: &Path, right: &Path) -> Result<bool, CompareError> {
    let left_meta = stat_regular_file(left)?;
    let right_meta = stat_regular_file(right)?;
    Ok(metadata_equal(&left_meta, &right_meta))
}

/// Equality predicate over already-fetched metadata.
///
/// Shared with the directory diff so classification reuses the stat results
/// captured during the scan instead of issuing another round of syscalls.
pub(crate) fn metadata_equal(left: &fs::Metadata, right: &fs::Metadata) -> bool {
    truncated_mtime_micros(left) == truncated_mtime_micros(right) && left.len() == right.len()
}

/// Modification time in whole microseconds, floor division.
///
/// Floor (not truncate-toward-zero) keeps pre-epoch timestamps on the same
/// grid as the original comparison granularity.
fn truncated_mtime_micros(metadata: &fs::Metadata) -> i128 {
    let mtime = FileTime::from_last_modification_time(metadata);
    let nanos =
        i128::from(mtime.unix_seconds()) * 1_000_000_000 + i128::from(mtime.nanoseconds());
    nanos.div_euclid(1000)
}

fn stat_regular_file(path: &Path) -> Result<fs::Metadata, CompareError> {
    // A missing operand is a kind failure, not an I/O fault: nothing at the
    // path means nothing that is a regular file.
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            return Err(CompareError::NotARegularFile {
                path: path.to_path_buf(),
            });
        }
        Err(source) => {
            return Err(CompareError::io(
                "inspect metadata for",
                path.to_path_buf(),
                source,
            ));
        }
    };
    if !metadata.is_file() {
        return Err(CompareError::NotARegularFile {
            path: path.to_path_buf(),
        });
    }
    Ok(metadata)
}
