//! Single-file commands: list references, render to HTML.

use std::fs;
use std::path::Path;

use tome_core::{parse_references, render_markdown};

/// Print the distinct module ids referenced by a markdown file, one per line.
pub fn refs(path: &Path) -> anyhow::Result<()> {
    let markdown = fs::read_to_string(path)?;
    for id in parse_references(&markdown) {
        println!("{id}");
    }
    Ok(())
}

/// Render a markdown file to an HTML fragment.
pub fn render(path: &Path, output: Option<&Path>) -> anyhow::Result<()> {
    let markdown = fs::read_to_string(path)?;
    let html = render_markdown(&markdown);
    match output {
        Some(out) => fs::write(out, html)?,
        None => print!("{html}"),
    }
    Ok(())
}
