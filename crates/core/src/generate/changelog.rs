//! Changelog generation.

use tracing::{debug, info, instrument};

use super::{write_atomic, ArtifactPaths, GenerateOutcome};
use crate::errors::GenerateError;
use crate::history::GitHistory;
use crate::identity::{canonicalize, AliasMap};
use crate::process::CommandRunner;

/// Write the full `git log --stat` output, with aliased emails replaced by
/// their canonical forms, over the changelog file.
#[instrument(skip_all, fields(path = %paths.changelog.display()))]
pub async fn write_changelog<R: CommandRunner>(
    history: &GitHistory<R>,
    paths: &ArtifactPaths,
) -> Result<GenerateOutcome, GenerateError> {
    if !history.has_metadata() {
        debug!("no git metadata, skipping changelog");
        return Ok(GenerateOutcome::Skipped);
    }

    let log = history.full_log().await?;
    let aliases = AliasMap::load(&paths.mailmap)?;
    let changelog = canonicalize(&log, &aliases);

    write_atomic(&paths.changelog, &changelog)?;

    let lines = changelog.lines().count();
    info!(lines, "changelog written");
    Ok(GenerateOutcome::Written {
        path: paths.changelog.clone(),
        lines,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FilesConfig, HistoryConfig};
    use crate::testing::ScriptedRunner;

    const LOG: &str = "\
commit 2f1c
Author: J. Alias <j.alias@old.com>
Date:   Mon Jan 6 10:00:00 2025 +0000

    Add widget

 src/widget.rs | 10 ++++++++++
 1 file changed, 10 insertions(+)
";

    fn setup(with_git: bool) -> (tempfile::TempDir, ArtifactPaths) {
        let dir = tempfile::tempdir().unwrap();
        if with_git {
            std::fs::create_dir(dir.path().join(".git")).unwrap();
        }
        let paths = ArtifactPaths::resolve(dir.path(), &FilesConfig::default());
        (dir, paths)
    }

    #[tokio::test]
    async fn test_changelog_is_canonicalized() {
        let (dir, paths) = setup(true);
        std::fs::write(&paths.mailmap, "Jane <jane@example.com> <j.alias@old.com>\n").unwrap();
        let runner = ScriptedRunner::new().respond("git log --stat", LOG);
        let history = GitHistory::new(runner, dir.path(), &HistoryConfig::default());

        let outcome = write_changelog(&history, &paths).await.unwrap();
        assert!(outcome.is_written());

        let written = std::fs::read_to_string(&paths.changelog).unwrap();
        assert!(written.contains("Author: J. Alias <jane@example.com>"));
        assert!(!written.contains("j.alias@old.com"));
        assert!(written.contains("1 file changed, 10 insertions(+)"));
    }

    #[tokio::test]
    async fn test_changelog_is_idempotent() {
        let (dir, paths) = setup(true);
        let runner = ScriptedRunner::new().respond("git log --stat", LOG);
        let history = GitHistory::new(runner, dir.path(), &HistoryConfig::default());

        write_changelog(&history, &paths).await.unwrap();
        let first = std::fs::read(&paths.changelog).unwrap();
        write_changelog(&history, &paths).await.unwrap();
        let second = std::fs::read(&paths.changelog).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_changelog_overwrites_previous_content() {
        let (dir, paths) = setup(true);
        std::fs::write(&paths.changelog, "stale entries\n".repeat(50)).unwrap();
        let runner = ScriptedRunner::new().respond("git log --stat", LOG);
        let history = GitHistory::new(runner, dir.path(), &HistoryConfig::default());

        write_changelog(&history, &paths).await.unwrap();
        assert_eq!(std::fs::read_to_string(&paths.changelog).unwrap(), LOG);
    }

    #[tokio::test]
    async fn test_changelog_skipped_without_git() {
        let (dir, paths) = setup(false);
        std::fs::write(&paths.changelog, "hand written").unwrap();
        let history = GitHistory::new(ScriptedRunner::new(), dir.path(), &HistoryConfig::default());

        let outcome = write_changelog(&history, &paths).await.unwrap();
        assert_eq!(outcome, GenerateOutcome::Skipped);
        assert!(history.runner().calls().is_empty());
        assert_eq!(std::fs::read_to_string(&paths.changelog).unwrap(), "hand written");
    }

    #[tokio::test]
    async fn test_changelog_tool_failure_propagates() {
        let (dir, paths) = setup(true);
        let runner = ScriptedRunner::new().fail("git log --stat", 128);
        let history = GitHistory::new(runner, dir.path(), &HistoryConfig::default());

        let err = write_changelog(&history, &paths).await.unwrap_err();
        assert!(matches!(err, GenerateError::Tool(_)));
        assert!(!paths.changelog.exists());
    }
}
