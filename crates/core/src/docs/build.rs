//! The `build_docs` command.

use std::path::PathBuf;

use tracing::{info, instrument};

use super::autoindex::{discover_modules, write_autoindex};
use super::{DocsBuildRequest, DocsGenerator};
use crate::config::DocsConfig;
use crate::errors::DocsError;
use crate::packaging::Distribution;

/// What a docs build did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDocsReport {
    /// Modules indexed, or `None` when the autoindex was skipped.
    pub autoindexed: Option<usize>,
    /// Builders run, in order.
    pub builders: Vec<String>,
}

/// Generates the API autoindex, then runs each configured builder.
#[derive(Debug)]
pub struct BuildDocsCommand<G> {
    generator: G,
    root: PathBuf,
    source_dir: PathBuf,
    build_dir: PathBuf,
    builders: Vec<String>,
    module_extension: String,
    autoindex: bool,
}

impl<G: DocsGenerator> BuildDocsCommand<G> {
    pub fn new(generator: G, root: impl Into<PathBuf>, config: &DocsConfig) -> Self {
        let root = root.into();
        Self {
            generator,
            source_dir: root.join(&config.source_dir),
            build_dir: root.join(&config.build_dir),
            root,
            builders: config.builders.clone(),
            module_extension: config.module_extension.clone(),
            autoindex: config.autoindex_enabled(),
        }
    }

    /// Force the autoindex on or off regardless of the environment.
    pub fn with_autoindex(mut self, enabled: bool) -> Self {
        self.autoindex = enabled;
        self
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    #[instrument(skip_all, fields(root = %self.root.display()))]
    pub async fn run(&self, distribution: &Distribution) -> Result<BuildDocsReport, DocsError> {
        let autoindexed = if self.autoindex {
            info!(root = %self.root.display(), "autodocumenting packages");
            let modules =
                discover_modules(&self.root, &distribution.packages, &self.module_extension)?;
            write_autoindex(&self.source_dir, &modules)?;
            Some(modules.len())
        } else {
            None
        };

        let request = DocsBuildRequest {
            source_dir: self.source_dir.clone(),
            build_dir: self.build_dir.clone(),
            distribution: distribution.clone(),
        };
        for builder in &self.builders {
            self.generator.build(builder, &request).await?;
        }

        Ok(BuildDocsReport {
            autoindexed,
            builders: self.builders.clone(),
        })
    }
}
