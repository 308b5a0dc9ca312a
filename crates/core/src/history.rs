//! Commit history extraction through the git CLI.
//!
//! Three independent queries feed the artifact builders: the full log with
//! per-commit stats, the unique primary authors, and co-authorship trailers
//! from commit messages. Output is treated as opaque text; only line-level
//! filtering, sorting and deduplication happen here.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::config::HistoryConfig;
use crate::errors::ToolError;
use crate::process::CommandRunner;

/// Read-only view of a project's git history.
#[derive(Debug)]
pub struct GitHistory<R> {
    runner: R,
    root: PathBuf,
    git_binary: String,
    excluded_email: String,
    co_author_marker: String,
}

impl<R: CommandRunner> GitHistory<R> {
    /// Create a history reader for the working tree at `root`.
    pub fn new(runner: R, root: impl Into<PathBuf>, config: &HistoryConfig) -> Self {
        Self {
            runner,
            root: root.into(),
            git_binary: config.git_binary.clone(),
            excluded_email: config.excluded_email.clone(),
            co_author_marker: config.co_author_marker.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Whether `identity` mentions the excluded bot address.
    pub fn is_excluded(&self, identity: &str) -> bool {
        !self.excluded_email.is_empty() && identity.contains(&self.excluded_email)
    }

    /// Whether the working tree carries git metadata. A `.git` file (linked
    /// worktree or submodule) counts as well as a directory.
    pub fn has_metadata(&self) -> bool {
        self.root.join(".git").exists()
    }

    /// Complete history with per-commit file statistics.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn full_log(&self) -> Result<String, ToolError> {
        let log = self.git(&["log", "--stat"]).await?;
        debug!(bytes = log.len(), "read full log");
        Ok(log)
    }

    /// Unique primary author identities (`Name <email>`), sorted, without the
    /// excluded bot address.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn author_list(&self) -> Result<Vec<String>, ToolError> {
        let output = self.git(&["log", "--format=%aN <%aE>"]).await?;
        let authors = parse_author_list(&output, &self.excluded_email);
        debug!(count = authors.len(), "read author list");
        Ok(authors)
    }

    /// Identities named by co-authorship trailers, sorted and deduplicated.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn co_author_annotations(&self) -> Result<Vec<String>, ToolError> {
        let output = self.git(&["log", "--format=%B"]).await?;
        let co_authors = parse_co_authors(&output, &self.co_author_marker);
        debug!(count = co_authors.len(), "read co-author annotations");
        Ok(co_authors)
    }

    async fn git(&self, args: &[&str]) -> Result<String, ToolError> {
        self.runner.run(&self.git_binary, args, &self.root).await
    }
}

/// Sort and deduplicate author lines, dropping blanks and any line that
/// mentions `excluded_email`.
pub fn parse_author_list(output: &str, excluded_email: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| excluded_email.is_empty() || !line.contains(excluded_email))
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Collect the identities from every line containing `marker` (ASCII
/// case-insensitive). Each line is cut after its first `:`.
pub fn parse_co_authors(output: &str, marker: &str) -> Vec<String> {
    let marker = marker.to_ascii_lowercase();
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.to_ascii_lowercase().contains(&marker))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter_map(|line| line.split_once(':').map(|(_, rest)| rest.trim()))
        .filter(|identity| !identity.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
