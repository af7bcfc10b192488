//! Markdown rendering and plain-text statistics.
//!
//! Rendering delegates to comrak with GitHub-flavored extensions and hard
//! line breaks. Reference tokens are not markdown syntax and come out as
//! literal text; they are rewritten later by the reference resolver.

use comrak::{Options, markdown_to_html};
use once_cell::sync::Lazy;
use regex::Regex;

/// Reading speed used when no other is supplied.
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

fn default_comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.tagfilter = true;
    // A single newline inside a paragraph becomes <br />.
    options.render.hardbreaks = true;
    // Authors may embed raw HTML (diagrams, tables with spans).
    options.render.unsafe_ = true;
    options
}

/// Render markdown to HTML. Any input produces some HTML.
pub fn render_markdown(markdown: &str) -> String {
    markdown_to_html(markdown, &default_comrak_options())
}

/// Strip rules applied in order; each replaces its match with `$1` or nothing.
static STRIP_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"#{1,6}\s+", ""),
        (r"\*\*(.+?)\*\*", "$1"),
        (r"\*(.+?)\*", "$1"),
        (r"__(.+?)__", "$1"),
        (r"_(.+?)_", "$1"),
        (r"`(.+?)`", "$1"),
        (r"!\[(.+?)\]\(.+?\)", "$1"),
        (r"\[(.+?)\]\(.+?\)", "$1"),
        (r">\s+", ""),
        (r"[-*+]\s+", ""),
        (r"\d+\.\s+", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid strip regex"), replacement))
    .collect()
});

/// Remove markdown formatting, keeping the readable text.
pub fn strip_markdown(markdown: &str) -> String {
    STRIP_RULES
        .iter()
        .fold(markdown.to_string(), |text, (regex, replacement)| {
            regex.replace_all(&text, *replacement).into_owned()
        })
}

/// Count words in the readable text of `markdown`.
pub fn word_count(markdown: &str) -> usize {
    strip_markdown(markdown).split_whitespace().count()
}

/// Estimated reading time in whole minutes, rounded up.
///
/// A `words_per_minute` of zero is treated as the default speed.
pub fn reading_time_minutes(markdown: &str, words_per_minute: usize) -> usize {
    let wpm = if words_per_minute == 0 {
        DEFAULT_WORDS_PER_MINUTE
    } else {
        words_per_minute
    };
    word_count(markdown).div_ceil(wpm)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_heading_and_paragraph() {
        let html = render_markdown("# Limits\n\nA limit describes behaviour.");
        assert!(html.contains("<h1>Limits</h1>"));
        assert!(html.contains("<p>A limit describes behaviour.</p>"));
    }

    #[test]
    fn test_single_newline_is_line_break() {
        let html = render_markdown("first line\nsecond line");
        assert!(html.contains("first line<br />"), "got: {html}");
    }

    #[test]
    fn test_gfm_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
    }

    #[test]
    fn test_reference_token_left_as_text() {
        let html = render_markdown("See @module:limits for details.");
        assert!(html.contains("@module:limits"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(render_markdown(""), "");
    }

    #[test]
    fn test_strip_markdown() {
        let text = strip_markdown("## Title\n\n**bold** and *italic* with `code` and [link](http://x)");
        assert_eq!(text, "Title\n\nbold and italic with code and link");
    }

    #[test]
    fn test_word_count_ignores_markup() {
        assert_eq!(word_count("# Heading\n\n- one\n- two **three**"), 4);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_reading_time_rounds_up() {
        let words = vec!["word"; 201].join(" ");
        assert_eq!(reading_time_minutes(&words, 200), 2);
        assert_eq!(reading_time_minutes("short", DEFAULT_WORDS_PER_MINUTE), 1);
        assert_eq!(reading_time_minutes("", 200), 0);
        assert_eq!(reading_time_minutes(&words, 0), 2);
    }
}
