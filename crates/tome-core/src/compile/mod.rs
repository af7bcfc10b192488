//! Compilation pipeline for modular textbooks.
//!
//! This module provides:
//! - Reference resolution (tokens → in-document links)
//! - Heading anchor assignment
//! - Table of contents generation
//! - Document assembly into a self-contained HTML page
//!
//! # Architecture
//!
//! ```text
//! [SourceModule] ──► check_for_cycles ──► resolve_references (per module)
//!                                                  │
//!                                          render_section (per module)
//!                                                  │
//!                         HeadingAnnotator (one pass, one counter)
//!                                                  │
//!                                    build_toc ──► render_page ──► CompiledDocument
//! ```
//!
//! Paginated output is produced from the finished page by `tome-render`.

mod assemble;
mod headings;
mod resolve;
mod template;
mod toc;
mod types;

pub use assemble::{assemble, render_section};
pub use headings::{HeadingAnnotator, annotate_headings};
pub use resolve::resolve_references;
pub use template::{escape_html, render_page};
pub use toc::{TocEntry, build_toc, render_toc, toc_outline};
pub use types::{
    CompileRequest, CompiledDocument, DEFAULT_TITLE, DocumentOptions, ModuleLookup, OutputFormat,
    SourceModule,
};

use crate::error::Result;
use crate::graph::check_for_cycles;

/// Compile modules, in the given order, into one HTML document.
///
/// Fails before any rendering if the modules' references contain a cycle.
/// An empty module list produces a page with no sections and no TOC.
pub fn compile_html(modules: &[SourceModule], options: &DocumentOptions) -> Result<CompiledDocument> {
    tracing::debug!("Checking {} modules for reference cycles", modules.len());
    check_for_cycles(modules)?;

    let lookup = ModuleLookup::from_modules(modules);
    tracing::debug!("Reference lookup holds {} modules", lookup.len());

    let document = assemble(modules, &lookup, options);
    tracing::info!(
        "Compiled '{}': {} modules, {} headings",
        document.title,
        document.module_count,
        document.heading_count
    );
    Ok(document)
}
