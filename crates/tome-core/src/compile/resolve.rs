//! Rewriting reference tokens into in-document links.

use regex::Captures;

use super::template::escape_html;
use super::types::ModuleLookup;
use crate::references::REFERENCE_TOKEN;

/// Replace each `@module:<id>` in `html` with a link to `#module-<id>`.
///
/// Tokens whose id is not in `lookup` are left exactly as written.
pub fn resolve_references(html: &str, lookup: &ModuleLookup) -> String {
    REFERENCE_TOKEN
        .replace_all(html, |caps: &Captures<'_>| {
            let id = &caps[1];
            match lookup.get(id) {
                Some(module) => format!(
                    r##"<a href="#module-{id}" class="module-reference" data-module-type="{}">{}</a>"##,
                    module.module_type,
                    escape_html(&module.title)
                ),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
