//! Build-time artifacts mined from history: the changelog and the authors
//! list.
//!
//! Both builders are no-ops when the working tree has no git metadata, and
//! both fully regenerate their output on every run.

pub mod authors;
pub mod changelog;

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::FilesConfig;
use crate::errors::GenerateError;

pub use authors::generate_authors;
pub use changelog::write_changelog;

/// Input and output locations for the builders, resolved against the
/// project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub mailmap: PathBuf,
    pub changelog: PathBuf,
    pub authors: PathBuf,
    pub authors_seed: PathBuf,
}

impl ArtifactPaths {
    pub fn resolve(root: &Path, files: &FilesConfig) -> Self {
        Self {
            mailmap: root.join(&files.mailmap),
            changelog: root.join(&files.changelog),
            authors: root.join(&files.authors),
            authors_seed: root.join(&files.authors_seed),
        }
    }
}

/// What a builder did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// No git metadata; nothing was read or written.
    Skipped,
    /// The artifact was regenerated.
    Written { path: PathBuf, lines: usize },
}

impl GenerateOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// Replace `path` with `contents` via a sibling temp file, so readers see
/// either the old file or the complete new one.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), GenerateError> {
    let write_failed = |source: std::io::Error| GenerateError::WriteFailed {
        path: path.display().to_string(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_failed)?;
    tmp.write_all(contents.as_bytes()).map_err(write_failed)?;
    tmp.flush().map_err(write_failed)?;

    // Temp files are created 0600; artifacts ship in the tarball.
    match std::fs::metadata(path) {
        Ok(existing) => tmp
            .as_file()
            .set_permissions(existing.permissions())
            .map_err(write_failed)?,
        Err(_) => {
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                tmp.as_file()
                    .set_permissions(std::fs::Permissions::from_mode(0o644))
                    .map_err(write_failed)?;
            }
        }
    }

    tmp.persist(path).map_err(|e| write_failed(e.error))?;

    debug!(path = %path.display(), bytes = contents.len(), "wrote artifact");
    Ok(())
}
