//! Optional documentation commands.
//!
//! The documentation generator and uploader are external collaborators
//! reached through the [`DocsGenerator`] and [`DocsUploader`] capabilities.
//! Their default implementations shell out to `sphinx-build` and a
//! configured upload program, and are only registered when a probe finds
//! them installed.

pub mod autoindex;
pub mod build;
pub mod upload;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::DocsError;
use crate::packaging::Distribution;
use crate::process::{run_inherited, tool_available};

pub use build::{BuildDocsCommand, BuildDocsReport};
pub use upload::UploadDocsCommand;

/// Inputs for one builder run.
#[derive(Debug, Clone)]
pub struct DocsBuildRequest {
    pub source_dir: PathBuf,
    /// Root of the output; each builder writes to `<build_dir>/<builder>`.
    pub build_dir: PathBuf,
    pub distribution: Distribution,
}

/// The "generate-docs" capability.
#[allow(async_fn_in_trait)]
pub trait DocsGenerator {
    async fn build(&self, builder: &str, request: &DocsBuildRequest) -> Result<(), DocsError>;
}

/// The "upload-docs" capability.
#[allow(async_fn_in_trait)]
pub trait DocsUploader {
    async fn upload(&self, html_dir: &Path) -> Result<(), DocsError>;
}

// ---------------------------------------------------------------------------
// sphinx-build
// ---------------------------------------------------------------------------

/// [`DocsGenerator`] running `sphinx-build`.
#[derive(Debug, Clone)]
pub struct SphinxBuild {
    binary: String,
    root: PathBuf,
}

impl SphinxBuild {
    pub fn new(binary: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            root: root.into(),
        }
    }

    /// Resolve the generator; `None` when it is not installed.
    pub fn probe(binary: &str, root: &Path) -> Option<Self> {
        if tool_available(binary) {
            Some(Self::new(binary, root))
        } else {
            debug!(binary, "docs generator not installed");
            None
        }
    }

    /// Arguments for one builder invocation.
    pub fn args(builder: &str, request: &DocsBuildRequest) -> Vec<String> {
        let dist = &request.distribution;
        vec![
            "-b".into(),
            builder.into(),
            "-D".into(),
            format!("project={}", dist.name),
            "-D".into(),
            format!("version={}", dist.version),
            "-D".into(),
            format!("release={}", dist.version),
            request.source_dir.display().to_string(),
            request.build_dir.join(builder).display().to_string(),
        ]
    }
}

impl DocsGenerator for SphinxBuild {
    async fn build(&self, builder: &str, request: &DocsBuildRequest) -> Result<(), DocsError> {
        info!(builder, "building documentation");
        run_inherited(&self.binary, &Self::args(builder, request), &self.root).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// External uploader
// ---------------------------------------------------------------------------

/// [`DocsUploader`] running a configured program with the html directory as
/// its final argument.
#[derive(Debug, Clone)]
pub struct ExternalUploader {
    command: Vec<String>,
    root: PathBuf,
}

impl ExternalUploader {
    pub fn new(command: Vec<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            command,
            root: root.into(),
        }
    }

    /// Resolve the uploader; `None` when unconfigured or not installed.
    pub fn probe(command: Option<&[String]>, root: &Path) -> Option<Self> {
        let command = command?;
        let program = command.first()?;
        if tool_available(program) {
            Some(Self::new(command.to_vec(), root))
        } else {
            debug!(program = %program, "docs uploader not installed");
            None
        }
    }
}

impl DocsUploader for ExternalUploader {
    async fn upload(&self, html_dir: &Path) -> Result<(), DocsError> {
        let (program, args) = self
            .command
            .split_first()
            .ok_or_else(|| DocsError::Unavailable("upload_docs command".into()))?;

        let mut args = args.to_vec();
        args.push(html_dir.display().to_string());

        info!(html_dir = %html_dir.display(), "uploading documentation");
        run_inherited(program, &args, &self.root).await?;
        Ok(())
    }
}
