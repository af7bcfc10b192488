//! Document assembly: sections, anchors, outline, page.

use super::headings::HeadingAnnotator;
use super::resolve::resolve_references;
use super::template::{escape_html, render_page};
use super::toc::build_toc;
use super::types::{CompiledDocument, DocumentOptions, ModuleLookup, SourceModule};

/// Wrap one module's resolved content in its `<section>`.
///
/// The section id `module-<id>` is the target of reference links.
pub fn render_section(module: &SourceModule, lookup: &ModuleLookup) -> String {
    let html = resolve_references(&module.html, lookup);
    let id = escape_html(&module.id);
    let module_type = module.module_type;
    let title = escape_html(&module.title);
    let author = escape_html(&module.author.name);

    format!(
        r#"
<section class="module" id="module-{id}" data-module-type="{module_type}">
  <div class="module-header">
    <span class="module-type">{module_type}</span>
    <h2 class="module-title">{title}</h2>
    <span class="module-author">by {author}</span>
  </div>
  <div class="module-content">
    {html}
  </div>
</section>
"#
    )
}

/// Build the full document from modules in the given order.
///
/// Heading anchors are assigned in one pass over the concatenated sections
/// and the TOC is read back from that same text.
pub fn assemble(
    modules: &[SourceModule],
    lookup: &ModuleLookup,
    options: &DocumentOptions,
) -> CompiledDocument {
    let sections: String = modules
        .iter()
        .map(|module| render_section(module, lookup))
        .collect();
    tracing::debug!("Assembled {} module sections", modules.len());

    let mut annotator = HeadingAnnotator::new();
    let content = annotator.annotate(&sections);
    let toc = build_toc(&content);
    tracing::debug!("Assigned {} heading anchors", annotator.assigned());

    CompiledDocument {
        title: options.title.clone(),
        html: render_page(&options.title, options.generated_on, &toc, &content),
        module_count: modules.len(),
        heading_count: annotator.assigned(),
    }
}
