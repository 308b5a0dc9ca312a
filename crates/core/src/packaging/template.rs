//! Manifest template synthesis.
//!
//! A template that already exists belongs to the user and is never touched.
//! When none exists, a minimal one is written for the duration of the base
//! packaging run and removed afterwards, on every exit path.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::errors::PackagingError;

/// Default template content: ship the generated artifacts and the
/// version-info file, leave VCS housekeeping files out.
pub fn render_default(authors: &Path, changelog: &Path, version_info: &Path) -> String {
    format!(
        "include {}\ninclude {}\ninclude {}\nexclude .gitignore\nexclude .gitreview\n",
        authors.display(),
        changelog.display(),
        version_info.display()
    )
}

/// A template this run created. Dropping it removes the file.
#[derive(Debug)]
pub struct SynthesizedTemplate {
    path: PathBuf,
    armed: bool,
}

impl SynthesizedTemplate {
    /// Create `path` with `contents` unless it already exists.
    ///
    /// Returns `None` when a template is already present.
    pub fn ensure(path: &Path, contents: &str) -> Result<Option<Self>, PackagingError> {
        let template_io = |source: std::io::Error| PackagingError::TemplateIo {
            path: path.display().to_string(),
            source,
        };

        let mut file = match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "manifest template present, leaving it alone");
                return Ok(None);
            }
            Err(e) => return Err(template_io(e)),
        };

        // From here on the file exists and must be cleaned up even if the
        // write fails.
        let guard = Self {
            path: path.to_path_buf(),
            armed: true,
        };
        file.write_all(contents.as_bytes()).map_err(template_io)?;
        file.flush().map_err(template_io)?;

        info!(path = %path.display(), "synthesized default manifest template");
        Ok(Some(guard))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the template now, reporting failure.
    pub fn remove(mut self) -> Result<(), PackagingError> {
        self.armed = false;
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed synthesized manifest template");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PackagingError::TemplateIo {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }
}

impl Drop for SynthesizedTemplate {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove synthesized manifest template");
            }
        }
    }
}
