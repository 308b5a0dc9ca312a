//! Alias substitution over free text.

use super::AliasMap;

/// Replace every literal occurrence of each alias in `text` with its
/// canonical form.
///
/// Pairs are applied in ascending alias order, one full pass per pair. When
/// one canonical token contains another alias as a substring the later pass
/// rewrites it as well; mailmap tokens are `<...>`-delimited so this does not
/// occur for well-formed files.
pub fn canonicalize(text: &str, aliases: &AliasMap) -> String {
    let mut out = text.to_string();
    for (alias, canonical) in aliases.iter() {
        if out.contains(alias) {
            out = out.replace(alias, canonical);
        }
    }
    out
}
