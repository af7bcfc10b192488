//! Table of contents generation.
//!
//! The outline is read from already-annotated HTML: each entry links to the
//! `id` its heading carries, so anchors and links cannot drift apart.

use once_cell::sync::Lazy;
use regex::Regex;

use super::headings::{find_headings, id_attribute};

static TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// One heading in the outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub level: u8,
    /// Anchor id, if the heading has one.
    pub id: Option<String>,
    /// Heading content with tags stripped.
    pub text: String,
}

/// Headings of `html` in document order.
pub fn toc_outline(html: &str) -> Vec<TocEntry> {
    find_headings(html)
        .into_iter()
        .map(|heading| TocEntry {
            level: heading.level,
            id: id_attribute(&html[heading.attrs.clone()]).map(str::to_string),
            text: TAG.replace_all(&html[heading.inner.clone()], "").into_owned(),
        })
        .collect()
}

/// Render the outline as nested lists inside `<nav class="table-of-contents">`.
///
/// Nesting starts at the first heading's level. Returns an empty string
/// when there are no headings.
pub fn build_toc(html: &str) -> String {
    render_toc(&toc_outline(html))
}

/// Render an outline; see [`build_toc`].
pub fn render_toc(entries: &[TocEntry]) -> String {
    let Some(first) = entries.first() else {
        return String::new();
    };

    let mut toc = String::from("<nav class=\"table-of-contents\">\n<h2>Table of Contents</h2>\n<ul>\n");
    let mut root = first.level;
    let mut current = root;

    for entry in entries {
        let level = entry.level;

        // Shallower than anything seen: close back to the root list and
        // continue at this level.
        if level < root {
            close_lists(&mut toc, &mut current, root);
            root = level;
            current = level;
        }

        while current < level {
            toc.push_str("<ul>\n");
            current += 1;
        }
        close_lists(&mut toc, &mut current, level);

        match &entry.id {
            Some(id) => toc.push_str(&format!("<li><a href=\"#{id}\">{}</a></li>\n", entry.text)),
            None => toc.push_str(&format!("<li>{}</li>\n", entry.text)),
        }
    }

    close_lists(&mut toc, &mut current, root);
    toc.push_str("</ul>\n</nav>\n");
    toc
}

fn close_lists(toc: &mut String, current: &mut u8, target: u8) {
    while *current > target {
        toc.push_str("</ul>\n");
        *current -= 1;
    }
}
