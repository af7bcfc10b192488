//! Core engine for Tome modular textbooks.
//!
//! This crate provides:
//! - The module model with append-only version history
//! - Reference token parsing and markdown rendering
//! - Reference graph and cycle detection
//! - The HTML compilation pipeline (references, anchors, TOC, page)
//! - An in-memory module library backed by a JSON file

pub mod compile;
pub mod error;
pub mod graph;
pub mod library;
pub mod markdown;
pub mod model;
pub mod references;

pub use compile::{
    CompileRequest, CompiledDocument, DEFAULT_TITLE, DocumentOptions, ModuleLookup, OutputFormat,
    SourceModule, annotate_headings, assemble, build_toc, compile_html, resolve_references,
};
pub use error::{Error, Result};
pub use graph::{DependencyGraph, GraphNode, ReferenceGraph, check_for_cycles, detect_cycle};
pub use library::ModuleLibrary;
pub use markdown::{reading_time_minutes, render_markdown, strip_markdown, word_count};
pub use model::{Author, Module, ModuleSummary, ModuleType, ModuleVersion};
pub use references::parse_references;
