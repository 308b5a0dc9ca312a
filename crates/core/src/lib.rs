//! gitdist core library.
//!
//! Mines git history for two build-time artifacts, a changelog and an
//! authors list, with author emails normalized through a mailmap-style alias
//! file, and wraps a source-distribution packaging command so both are
//! regenerated, and a manifest template is guaranteed, before every build.

pub mod commands;
pub mod config;
pub mod docs;
pub mod errors;
pub mod generate;
pub mod history;
pub mod identity;
pub mod packaging;
pub mod process;

#[cfg(test)]
mod testing;

// Re-exports for convenience.
pub use commands::CommandSet;
pub use config::DistConfig;
pub use history::GitHistory;
pub use identity::{canonicalize, AliasMap};
pub use packaging::{PackagingCommand, SdistCommand};
