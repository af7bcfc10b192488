//! Common types for the compilation pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{Author, ModuleSummary, ModuleType};

/// Title used when a compile request does not name one.
pub const DEFAULT_TITLE: &str = "Compiled Textbook";

/// Snapshot of one module as the pipeline consumes it.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceModule {
    pub id: String,
    pub title: String,
    pub module_type: ModuleType,
    pub author: Author,
    /// Rendered HTML of the latest version.
    pub html: String,
    /// Ids referenced by the latest version, dangling ones included.
    pub references: Vec<String>,
    /// Metadata of the referenced modules that exist.
    pub referenced_modules: Vec<ModuleSummary>,
}

impl SourceModule {
    pub fn summary(&self) -> ModuleSummary {
        ModuleSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            module_type: self.module_type,
        }
    }
}

/// Module id → metadata used to turn reference tokens into links.
#[derive(Debug, Clone, Default)]
pub struct ModuleLookup {
    entries: FxHashMap<String, ModuleSummary>,
}

impl ModuleLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lookup covering the compiled modules and every known module they
    /// reference, so links to uncompiled modules still carry a title.
    pub fn from_modules(modules: &[SourceModule]) -> Self {
        let mut lookup = Self::new();
        for module in modules {
            lookup.insert(module.summary());
            for referenced in &module.referenced_modules {
                lookup.insert(referenced.clone());
            }
        }
        lookup
    }

    pub fn insert(&mut self, summary: ModuleSummary) {
        self.entries.insert(summary.id.clone(), summary);
    }

    pub fn get(&self, id: &str) -> Option<&ModuleSummary> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<ModuleSummary> for ModuleLookup {
    fn from_iter<I: IntoIterator<Item = ModuleSummary>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for summary in iter {
            lookup.insert(summary);
        }
        lookup
    }
}

/// Output format of a compile call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Pdf,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Pdf => "pdf",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(Error::UnknownFormat(other.to_string())),
        }
    }
}

/// A request to compile an ordered set of modules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileRequest {
    /// Output order; not required to follow reference order.
    pub module_ids: Vec<String>,
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl CompileRequest {
    pub fn new(module_ids: Vec<String>, format: OutputFormat) -> Self {
        Self {
            module_ids,
            format,
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The requested title, or [`DEFAULT_TITLE`].
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or(DEFAULT_TITLE)
    }

    /// Document options for this request, dated today.
    pub fn document_options(&self) -> DocumentOptions {
        DocumentOptions {
            title: self.title_or_default().to_string(),
            ..DocumentOptions::default()
        }
    }
}

/// Settings of the generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    /// Page title and top-level heading.
    pub title: String,
    /// Date printed under the title.
    pub generated_on: NaiveDate,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            generated_on: Local::now().date_naive(),
        }
    }
}

/// Result of the HTML path of a compile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledDocument {
    pub title: String,
    /// Self-contained HTML page.
    pub html: String,
    pub module_count: usize,
    /// Number of heading anchors assigned.
    pub heading_count: usize,
}
