//! Cross-module reference tokens.
//!
//! Authors link modules by writing `@module:<id>` anywhere in markdown,
//! where `<id>` is one or more ASCII letters, digits, `_` or `-`. The token
//! grammar is shared by every piece of authored content, so it must not
//! change.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefix that introduces a reference token.
pub const TOKEN_PREFIX: &str = "@module:";

/// Matches a reference token, capturing the module id.
pub(crate) static REFERENCE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"@module:([a-zA-Z0-9_-]+)").expect("valid reference token regex"));

/// Extract the distinct module ids referenced by `markdown`.
///
/// Ids are not checked for existence.
pub fn parse_references(markdown: &str) -> BTreeSet<String> {
    REFERENCE_TOKEN
        .captures_iter(markdown)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Format the token that references `module_id`.
pub fn reference_token(module_id: &str) -> String {
    format!("{TOKEN_PREFIX}{module_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_references() {
        assert!(parse_references("# Plain\n\nNothing to see.").is_empty());
        assert!(parse_references("").is_empty());
    }

    #[test]
    fn test_deduplicates_repeated_ids() {
        let md = "See @module:limits and @module:derivative, then @module:limits again.";
        let refs = parse_references(md);
        assert_eq!(
            refs.into_iter().collect::<Vec<_>>(),
            vec!["derivative".to_string(), "limits".to_string()]
        );
    }

    #[test]
    fn test_id_charset() {
        let refs = parse_references("@module:a_b-C9. @module:x!y");
        assert!(refs.contains("a_b-C9"));
        // Token stops at the first character outside the id charset.
        assert!(refs.contains("x"));
        assert_eq!(refs.len(), 2);
    }

    #[test]
    fn test_prefix_without_id_is_ignored() {
        assert!(parse_references("email me @module: later").is_empty());
    }

    #[test]
    fn test_reference_token_roundtrips_through_parser() {
        let token = reference_token("chain-rule");
        assert_eq!(token, "@module:chain-rule");
        assert!(parse_references(&token).contains("chain-rule"));
    }
}
