//! Heading discovery and anchor assignment.
//!
//! A heading is `<hN attrs>inner</hN>` with the closing tag on the same line
//! as the opening one, matched case-insensitively. Markdown rendering always
//! produces single-line headings; anything else is left untouched.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashSet;

static HEADING_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<h([1-6])([^>]*)>").expect("valid heading regex"));

static HEADING_CLOSE: Lazy<Vec<Regex>> = Lazy::new(|| {
    (1..=6)
        .map(|level| Regex::new(&format!("(?i)</h{level}>")).expect("valid closing tag regex"))
        .collect()
});

static ID_ATTRIBUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)(?:^|\s)id\s*=\s*"([^"]*)""#).expect("valid id regex"));

/// Location of one heading element within an HTML string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HeadingMatch {
    /// Whole element, opening `<` to closing `>`.
    pub span: Range<usize>,
    pub level: u8,
    /// Attribute text between the tag name and `>`.
    pub attrs: Range<usize>,
    /// Content between the tags.
    pub inner: Range<usize>,
}

/// Find headings in document order.
pub(crate) fn find_headings(html: &str) -> Vec<HeadingMatch> {
    let mut found = Vec::new();
    let mut pos = 0;

    while let Some(open) = HEADING_OPEN.captures_at(html, pos) {
        let (Some(tag), Some(digit), Some(attrs)) = (open.get(0), open.get(1), open.get(2)) else {
            break;
        };
        let level = digit.as_str().as_bytes()[0] - b'0';

        let rest = &html[tag.end()..];
        let line = &rest[..rest.find('\n').unwrap_or(rest.len())];

        match HEADING_CLOSE[usize::from(level - 1)].find(line) {
            Some(close) => {
                let end = tag.end() + close.end();
                found.push(HeadingMatch {
                    span: tag.start()..end,
                    level,
                    attrs: attrs.range(),
                    inner: tag.end()..tag.end() + close.start(),
                });
                pos = end;
            }
            // Unclosed on this line: look for the next opening tag.
            None => pos = tag.start() + 1,
        }
    }

    found
}

/// Value of an `id="…"` attribute in `attrs`, if present.
pub(crate) fn id_attribute(attrs: &str) -> Option<&str> {
    ID_ATTRIBUTE
        .captures(attrs)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Assigns `heading-<n>` anchors from a single counter.
///
/// The counter persists across [`annotate`](Self::annotate) calls, so
/// fragments annotated with the same instance never reuse an id. Numbers
/// whose anchor already appears as an `id` in the input are skipped.
#[derive(Debug, Default)]
pub struct HeadingAnnotator {
    next_id: usize,
    assigned: usize,
    reserved: FxHashSet<String>,
}

impl HeadingAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of anchors assigned so far.
    pub fn assigned(&self) -> usize {
        self.assigned
    }

    fn next_anchor(&mut self) -> String {
        loop {
            let anchor = format!("heading-{}", self.next_id);
            self.next_id += 1;
            if self.reserved.insert(anchor.clone()) {
                self.assigned += 1;
                return anchor;
            }
        }
    }

    /// Inject `id="heading-<n>"` into every heading lacking an `id`.
    ///
    /// Headings that already carry an id keep it and do not consume a
    /// number.
    pub fn annotate(&mut self, html: &str) -> String {
        self.reserved.extend(
            ID_ATTRIBUTE
                .captures_iter(html)
                .filter_map(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
        );

        let headings = find_headings(html);
        let mut out = String::with_capacity(html.len() + headings.len() * 20);
        let mut last = 0;

        for heading in headings {
            let attrs = &html[heading.attrs.clone()];
            if id_attribute(attrs).is_some() {
                continue;
            }

            let anchor = self.next_anchor();
            out.push_str(&html[last..heading.span.start]);
            out.push_str(&format!(
                "<h{level}{attrs} id=\"{anchor}\">{inner}</h{level}>",
                level = heading.level,
                inner = &html[heading.inner.clone()],
            ));
            last = heading.span.end;
        }

        out.push_str(&html[last..]);
        out
    }
}

/// Annotate `html` with a fresh counter starting at 0.
pub fn annotate_headings(html: &str) -> String {
    HeadingAnnotator::new().annotate(html)
}
