//! AUTHORS file generation.

use std::collections::BTreeSet;

use tracing::{debug, info, instrument};

use super::{write_atomic, ArtifactPaths, GenerateOutcome};
use crate::errors::GenerateError;
use crate::history::GitHistory;
use crate::identity::{canonicalize, AliasMap};
use crate::process::CommandRunner;

/// Regenerate the authors file from primary and co-authored identities.
///
/// Every identity is canonicalized on its own, the result is deduplicated
/// and sorted, and the seed file (if any) is appended verbatim after a
/// newline.
#[instrument(skip_all, fields(path = %paths.authors.display()))]
pub async fn generate_authors<R: CommandRunner>(
    history: &GitHistory<R>,
    paths: &ArtifactPaths,
) -> Result<GenerateOutcome, GenerateError> {
    if !history.has_metadata() {
        debug!("no git metadata, skipping authors");
        return Ok(GenerateOutcome::Skipped);
    }

    let mut entries = history.author_list().await?;
    let co_authors = history.co_author_annotations().await?;
    entries.extend(co_authors.into_iter().filter(|c| !history.is_excluded(c)));

    let aliases = AliasMap::load(&paths.mailmap)?;
    let authors: BTreeSet<String> = entries
        .iter()
        .map(|entry| canonicalize(entry, &aliases))
        .collect();

    let mut contents = authors.iter().map(String::as_str).collect::<Vec<_>>().join("\n");

    if paths.authors_seed.exists() {
        let seed = std::fs::read_to_string(&paths.authors_seed).map_err(|source| {
            GenerateError::ReadFailed {
                path: paths.authors_seed.display().to_string(),
                source,
            }
        })?;
        debug!(seed = %paths.authors_seed.display(), "appending authors seed");
        contents.push('\n');
        contents.push_str(&seed);
    }

    write_atomic(&paths.authors, &contents)?;

    info!(count = authors.len(), "authors written");
    Ok(GenerateOutcome::Written {
        path: paths.authors.clone(),
        lines: authors.len(),
    })
}
