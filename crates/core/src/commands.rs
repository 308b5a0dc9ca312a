//! Command registry.
//!
//! `sdist` is always registered. The documentation commands depend on
//! optional external tools and are registered only when a probe resolves
//! them; a missing tool simply leaves the command out.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::DistConfig;
use crate::docs::upload::resolve_upload_dir;
use crate::docs::{
    BuildDocsCommand, BuildDocsReport, ExternalUploader, SphinxBuild, UploadDocsCommand,
};
use crate::errors::{DocsError, GenerateError, PackagingError};
use crate::generate::{generate_authors, write_changelog, ArtifactPaths, GenerateOutcome};
use crate::history::GitHistory;
use crate::packaging::{
    Distribution, ExternalPackagingCommand, PackagingContext, SdistCommand, SdistReport,
};
use crate::process::SystemRunner;

pub const SDIST: &str = "sdist";
pub const BUILD_DOCS: &str = "build_docs";
pub const UPLOAD_DOCS: &str = "upload_docs";

/// Commands available for one project.
#[derive(Debug)]
pub struct CommandSet {
    context: PackagingContext,
    sdist: SdistCommand<ExternalPackagingCommand, SystemRunner>,
    build_docs: Option<BuildDocsCommand<SphinxBuild>>,
    upload_docs: Option<UploadDocsCommand<ExternalUploader>>,
}

impl CommandSet {
    /// Build the registry for the project at `root`, probing for the optional
    /// documentation tools.
    pub fn probe(config: &DistConfig, root: &Path) -> Self {
        let build_docs = SphinxBuild::probe(&config.docs.sphinx_binary, root)
            .map(|generator| BuildDocsCommand::new(generator, root, &config.docs));
        let upload_docs = ExternalUploader::probe(config.upload_docs.command.as_deref(), root)
            .map(|uploader| {
                let html_dir = resolve_upload_dir(root, &config.docs, &config.upload_docs);
                UploadDocsCommand::new(uploader, html_dir)
            });

        let set = Self::with_docs(config, root, build_docs, upload_docs);
        info!(commands = ?set.names(), "registered commands");
        set
    }

    /// Build the registry with explicitly supplied documentation commands.
    pub fn with_docs(
        config: &DistConfig,
        root: &Path,
        build_docs: Option<BuildDocsCommand<SphinxBuild>>,
        upload_docs: Option<UploadDocsCommand<ExternalUploader>>,
    ) -> Self {
        let root: PathBuf = root.to_path_buf();
        let sdist = SdistCommand::new(
            ExternalPackagingCommand::new(config.sdist.command.clone()),
            GitHistory::new(SystemRunner, &root, &config.history),
            &config.files,
            config.project.version_info_path(),
        );
        let context = PackagingContext {
            root: root.clone(),
            template: root.join(&config.files.manifest_template),
            distribution: Distribution::from(&config.project),
        };

        debug!(
            build_docs = build_docs.is_some(),
            upload_docs = upload_docs.is_some(),
            "optional commands resolved"
        );
        Self {
            context,
            sdist,
            build_docs,
            upload_docs,
        }
    }

    /// Names of the registered commands.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names = vec![SDIST];
        if self.build_docs.is_some() {
            names.push(BUILD_DOCS);
        }
        if self.upload_docs.is_some() {
            names.push(UPLOAD_DOCS);
        }
        names
    }

    pub fn context(&self) -> &PackagingContext {
        &self.context
    }

    /// Artifact locations, shared with `sdist`.
    pub fn artifacts(&self) -> &ArtifactPaths {
        self.sdist.artifacts()
    }

    pub fn history(&self) -> &GitHistory<SystemRunner> {
        self.sdist.history()
    }

    pub async fn changelog(&self) -> Result<GenerateOutcome, GenerateError> {
        write_changelog(self.history(), self.artifacts()).await
    }

    pub async fn authors(&self) -> Result<GenerateOutcome, GenerateError> {
        generate_authors(self.history(), self.artifacts()).await
    }

    pub async fn sdist(&self) -> Result<SdistReport, PackagingError> {
        self.sdist.run_with_report(&self.context).await
    }

    pub async fn build_docs(&self) -> Result<BuildDocsReport, DocsError> {
        match &self.build_docs {
            Some(cmd) => cmd.run(&self.context.distribution).await,
            None => Err(DocsError::Unavailable(BUILD_DOCS.into())),
        }
    }

    pub async fn upload_docs(&self) -> Result<PathBuf, DocsError> {
        match &self.upload_docs {
            Some(cmd) => {
                cmd.run().await?;
                Ok(cmd.html_dir().to_path_buf())
            }
            None => Err(DocsError::Unavailable(UPLOAD_DOCS.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdist_always_registered() {
        let dir = tempfile::tempdir().unwrap();
        let set = CommandSet::with_docs(&DistConfig::default(), dir.path(), None, None);
        assert_eq!(set.names(), vec![SDIST]);
        assert_eq!(set.context().template, dir.path().join("MANIFEST.in"));
        assert_eq!(set.artifacts().authors, dir.path().join("AUTHORS"));
    }

    #[test]
    fn test_generation_shares_sdist_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DistConfig::default();
        config.files.authors = "CONTRIBUTORS".into();
        config.history.excluded_email = "ci@build.example.com".into();

        let set = CommandSet::with_docs(&config, dir.path(), None, None);
        assert_eq!(set.artifacts().authors, dir.path().join("CONTRIBUTORS"));
        assert_eq!(set.history().root(), dir.path());
        assert!(set.history().is_excluded("CI <ci@build.example.com>"));
        assert!(!set.history().is_excluded("Amy <amy@example.com>"));
    }

    #[test]
    fn test_probe_skips_missing_tools() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DistConfig::default();
        config.docs.sphinx_binary = "gitdist-no-such-sphinx".into();
        config.upload_docs.command = Some(vec!["gitdist-no-such-uploader".into()]);

        let set = CommandSet::probe(&config, dir.path());
        assert_eq!(set.names(), vec![SDIST]);
    }

    #[test]
    fn test_explicit_docs_commands_registered() {
        let dir = tempfile::tempdir().unwrap();
        let config = DistConfig::default();
        let build = BuildDocsCommand::new(SphinxBuild::new("sphinx-build", dir.path()), dir.path(), &config.docs);
        let upload = UploadDocsCommand::new(
            ExternalUploader::new(vec!["uploader".into()], dir.path()),
            dir.path().join("doc/build/html"),
        );

        let set = CommandSet::with_docs(&config, dir.path(), Some(build), Some(upload));
        assert_eq!(set.names(), vec![SDIST, BUILD_DOCS, UPLOAD_DOCS]);
    }

    #[tokio::test]
    async fn test_unavailable_docs_commands() {
        let dir = tempfile::tempdir().unwrap();
        let set = CommandSet::with_docs(&DistConfig::default(), dir.path(), None, None);

        assert!(matches!(set.build_docs().await, Err(DocsError::Unavailable(ref n)) if n == BUILD_DOCS));
        assert!(matches!(set.upload_docs().await, Err(DocsError::Unavailable(ref n)) if n == UPLOAD_DOCS));
    }

    #[tokio::test]
    async fn test_generation_without_git_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let set = CommandSet::with_docs(&DistConfig::default(), dir.path(), None, None);

        assert_eq!(set.changelog().await.unwrap(), GenerateOutcome::Skipped);
        assert_eq!(set.authors().await.unwrap(), GenerateOutcome::Skipped);
    }
}
