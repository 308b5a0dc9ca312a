//! Source-distribution lifecycle wrapping.
//!
//! The host's packaging step is consumed through the [`PackagingCommand`]
//! trait. [`SdistCommand`] decorates any base implementation: it regenerates
//! the changelog and authors files, makes sure a manifest template exists for
//! the duration of the base run, then delegates.

pub mod readme;
pub mod sdist;
pub mod template;

use std::path::PathBuf;

use tracing::{info, instrument};

use crate::config::ProjectConfig;
use crate::errors::{PackagingError, ToolError};
use crate::process::run_inherited;

pub use sdist::{SdistCommand, SdistReport, SdistStage};
pub use template::SynthesizedTemplate;

/// Distribution metadata provided by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Distribution {
    pub name: String,
    pub version: String,
    pub packages: Vec<String>,
}

impl From<&ProjectConfig> for Distribution {
    fn from(project: &ProjectConfig) -> Self {
        Self {
            name: project.name.clone(),
            version: project.version.clone(),
            packages: project.packages.clone(),
        }
    }
}

/// Everything a packaging command gets from the host.
#[derive(Debug, Clone)]
pub struct PackagingContext {
    /// Project root; commands run here.
    pub root: PathBuf,
    /// Manifest template path the base command reads.
    pub template: PathBuf,
    pub distribution: Distribution,
}

/// The host's "build a source distribution" lifecycle stage.
#[allow(async_fn_in_trait)]
pub trait PackagingCommand {
    async fn run(&self, ctx: &PackagingContext) -> Result<(), PackagingError>;
}

/// Base packaging command backed by an external program, e.g.
/// `python setup.py sdist`.
#[derive(Debug, Clone)]
pub struct ExternalPackagingCommand {
    command: Vec<String>,
}

impl ExternalPackagingCommand {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    pub fn command_line(&self) -> String {
        self.command.join(" ")
    }
}

impl PackagingCommand for ExternalPackagingCommand {
    #[instrument(skip_all, fields(command = %self.command_line()))]
    async fn run(&self, ctx: &PackagingContext) -> Result<(), PackagingError> {
        let (program, args) = self.command.split_first().ok_or_else(|| {
            PackagingError::Tool(ToolError::BinaryNotFound("<empty sdist command>".into()))
        })?;

        info!(root = %ctx.root.display(), "running base packaging command");
        run_inherited(program, args, &ctx.root)
            .await
            .map_err(|e| match e {
                ToolError::CommandFailed { exit_code, .. } => PackagingError::BaseCommandFailed {
                    command: self.command_line(),
                    exit_code,
                },
                other => PackagingError::Tool(other),
            })
    }
}
