// src/watch/scanner.rs

use std::path::Path;

use tracing::{debug, warn};

use crate::errors::{PollwatchError, Result};
use crate::fs::FileSystem;
use crate::target::Target;

/// Names of the regular files directly under `root`, in listing order.
///
/// Subdirectories are skipped, not descended into. Entries whose name is not
/// valid UTF-8 are skipped with a warning since they cannot be matched or
/// used as snapshot keys.
pub fn list_regular_files(fs: &dyn FileSystem, root: &Path) -> Result<Vec<String>> {
    let entries = fs
        .read_dir(root)
        .map_err(|e| PollwatchError::DirectoryUnreadable {
            path: root.to_path_buf(),
            reason: format!("{e:#}"),
        })?;

    let mut names = Vec::with_capacity(entries.len());
    for path in entries {
        if !fs.is_file(&path) {
            continue;
        }
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => names.push(name.to_string()),
            None => warn!(path = ?path, "skipping file with non UTF-8 name"),
        }
    }
    Ok(names)
}

/// The working set of one poll cycle: regular files of the target root that
/// pass the target's exclude-then-include rules.
pub fn scan_target(fs: &dyn FileSystem, target: &Target) -> Result<Vec<String>> {
    let all = list_regular_files(fs, target.root())?;
    let total = all.len();
    let kept = target.rules().filter(all);
    debug!(root = %target.key(), total, kept = kept.len(), "scanned target");
    Ok(kept)
}
