//! Overview file check.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Return the first candidate overview file present under `root`.
///
/// A missing overview only produces a warning; packaging carries on.
pub fn check_readme(root: &Path, candidates: &[String]) -> Option<PathBuf> {
    let found = candidates
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.exists());

    match &found {
        Some(path) => debug!(path = %path.display(), "overview file present"),
        None => warn!(
            "standard file not found: should have one of {}",
            candidates.join(", ")
        ),
    }
    found
}
