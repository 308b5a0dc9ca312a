//! Author identity normalization.
//!
//! An alias file maps non-canonical email tokens to canonical ones; the
//! canonicalizer rewrites every aliased token found in free text. Identities
//! are never parsed further than that: names are left exactly as recorded.

pub mod alias_map;
pub mod canonical;

pub use alias_map::AliasMap;
pub use canonical::canonicalize;
