//! Mailmap-style alias file reader.
//!
//! The alias file format:
//!
//! ```text
//! # comment
//! Jane Doe <jane@example.com> <j.doe@old-employer.com>
//! <bob@example.com> <bobby@laptop.local>
//! ```
//!
//! Of every non-comment line containing a space, the two whitespace-separated
//! tokens starting with `<` are taken: the first is canonical, the second is
//! the alias. Lines with any other number of `<` tokens are skipped with a
//! warning.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::errors::IdentityError;

/// Mapping from alias email token to canonical email token.
///
/// Backed by a `BTreeMap` so iteration, and therefore replacement order, is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasMap {
    aliases: BTreeMap<String, String>,
}

impl AliasMap {
    /// Load the alias file at `path`. A missing file yields an empty map.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, IdentityError> {
        let path = path.as_ref();

        if !path.exists() {
            debug!(path = %path.display(), "no alias file, using empty map");
            return Ok(Self::default());
        }

        info!(path = %path.display(), "loading alias file");
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::InvalidData {
                IdentityError::AliasFileError {
                    path: path.display().to_string(),
                    detail: "file is not valid UTF-8".into(),
                }
            } else {
                IdentityError::IoError(e)
            }
        })?;

        let map = Self::parse(&contents);
        debug!(count = map.len(), "loaded alias mappings");
        Ok(map)
    }

    /// Parse alias file contents.
    pub fn parse(contents: &str) -> Self {
        let mut aliases = BTreeMap::new();

        for (idx, raw) in contents.lines().enumerate() {
            let line = raw.trim();
            if line.starts_with('#') || !line.contains(' ') {
                continue;
            }

            let tokens: Vec<&str> = line
                .split_whitespace()
                .filter(|t| t.starts_with('<'))
                .collect();

            match tokens.as_slice() {
                [canonical, alias] => {
                    aliases.insert((*alias).to_string(), (*canonical).to_string());
                }
                _ => {
                    warn!(
                        line_no = idx + 1,
                        tokens = tokens.len(),
                        line,
                        "skipping alias line without exactly two <email> tokens"
                    );
                }
            }
        }

        Self { aliases }
    }

    /// Canonical token for `alias`, if mapped.
    pub fn get(&self, alias: &str) -> Option<&str> {
        self.aliases.get(alias).map(String::as_str)
    }

    /// `(alias, canonical)` pairs in ascending alias order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.aliases.iter().map(|(a, c)| (a.as_str(), c.as_str()))
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl FromIterator<(String, String)> for AliasMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            aliases: iter.into_iter().collect(),
        }
    }
}
