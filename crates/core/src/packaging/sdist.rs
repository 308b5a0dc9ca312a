//! The wrapped `sdist` command.
//!
//! ```text
//! Idle -> Generating -> TemplateCheck -> Delegating -> Cleanup -> Done
//! ```
//!
//! Generation failures abort before anything is delegated. Once a template
//! has been synthesized it is removed whether the base command succeeds,
//! fails, panics, or the future is dropped.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use super::readme::check_readme;
use super::template::{render_default, SynthesizedTemplate};
use super::{PackagingCommand, PackagingContext};
use crate::config::FilesConfig;
use crate::errors::PackagingError;
use crate::generate::{generate_authors, write_changelog, ArtifactPaths, GenerateOutcome};
use crate::history::GitHistory;
use crate::process::CommandRunner;

/// Lifecycle stage of one `sdist` invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SdistStage {
    Idle,
    Generating,
    TemplateCheck,
    Delegating,
    Cleanup,
    Done,
}

impl fmt::Display for SdistStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::TemplateCheck => "template-check",
            Self::Delegating => "delegating",
            Self::Cleanup => "cleanup",
            Self::Done => "done",
        };
        f.write_str(s)
    }
}

/// What a successful `sdist` run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdistReport {
    pub changelog: GenerateOutcome,
    pub authors: GenerateOutcome,
    /// The manifest template was absent and a default was used.
    pub template_synthesized: bool,
    /// The overview file found, if any.
    pub readme: Option<PathBuf>,
    /// Stages entered, in order.
    pub stages: Vec<SdistStage>,
}

/// Decorator over a base [`PackagingCommand`] that generates the changelog
/// and authors files first.
#[derive(Debug)]
pub struct SdistCommand<B, R> {
    base: B,
    history: GitHistory<R>,
    artifacts: ArtifactPaths,
    authors_name: PathBuf,
    changelog_name: PathBuf,
    readme_candidates: Vec<String>,
    version_info: PathBuf,
}

impl<B: PackagingCommand, R: CommandRunner> SdistCommand<B, R> {
    pub fn new(
        base: B,
        history: GitHistory<R>,
        files: &FilesConfig,
        version_info: impl Into<PathBuf>,
    ) -> Self {
        let artifacts = ArtifactPaths::resolve(history.root(), files);
        Self {
            base,
            history,
            artifacts,
            authors_name: files.authors.clone(),
            changelog_name: files.changelog.clone(),
            readme_candidates: files.readme_candidates.clone(),
            version_info: version_info.into(),
        }
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn root(&self) -> &Path {
        self.history.root()
    }

    /// The history reader feeding artifact generation.
    pub fn history(&self) -> &GitHistory<R> {
        &self.history
    }

    pub fn artifacts(&self) -> &ArtifactPaths {
        &self.artifacts
    }

    /// Content written when the manifest template is absent.
    pub fn default_template(&self) -> String {
        render_default(&self.authors_name, &self.changelog_name, &self.version_info)
    }

    /// Run the full lifecycle and report what happened.
    #[instrument(skip_all, fields(root = %self.root().display(), template = %ctx.template.display()))]
    pub async fn run_with_report(
        &self,
        ctx: &PackagingContext,
    ) -> Result<SdistReport, PackagingError> {
        let mut stages = vec![SdistStage::Idle];

        enter(&mut stages, SdistStage::Generating);
        let changelog = write_changelog(&self.history, &self.artifacts).await?;
        let authors = generate_authors(&self.history, &self.artifacts).await?;

        enter(&mut stages, SdistStage::TemplateCheck);
        let readme = check_readme(self.root(), &self.readme_candidates);
        let synthesized = SynthesizedTemplate::ensure(&ctx.template, &self.default_template())?;
        let template_synthesized = synthesized.is_some();

        enter(&mut stages, SdistStage::Delegating);
        let delegated = self.base.run(ctx).await;

        enter(&mut stages, SdistStage::Cleanup);
        let cleaned = match synthesized {
            Some(template) => template.remove(),
            None => Ok(()),
        };
        delegated?;
        cleaned?;

        enter(&mut stages, SdistStage::Done);
        info!(template_synthesized, "sdist complete");
        Ok(SdistReport {
            changelog,
            authors,
            template_synthesized,
            readme,
            stages,
        })
    }
}

impl<B: PackagingCommand, R: CommandRunner> PackagingCommand for SdistCommand<B, R> {
    async fn run(&self, ctx: &PackagingContext) -> Result<(), PackagingError> {
        self.run_with_report(ctx).await.map(|_| ())
    }
}

fn enter(stages: &mut Vec<SdistStage>, next: SdistStage) {
    if let Some(prev) = stages.last() {
        debug!(from = %prev, to = %next, "sdist stage");
    }
    stages.push(next);
}
