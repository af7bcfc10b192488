//! In-memory module library.
//!
//! Holds modules and their reference edges, and produces the snapshots the
//! compile pipeline consumes. A library is loaded from and saved to a JSON
//! file of the form:
//!
//! ```text
//! { "modules": [ { "id", "title", "type", "author": {..}, "versions": [..] } ] }
//! ```

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::compile::SourceModule;
use crate::error::{Error, Result};
use crate::graph::{DependencyGraph, ReferenceGraph, check_for_cycles};
use crate::model::{Author, Module, ModuleSummary, ModuleType, ModuleVersion};

#[derive(Serialize, Deserialize)]
struct LibraryFile {
    modules: Vec<Module>,
}

/// Modules keyed by id, plus the reference edge table.
#[derive(Debug, Default)]
pub struct ModuleLibrary {
    modules: FxHashMap<String, Module>,
    /// Insertion order, for stable listings.
    order: Vec<String>,
    /// Source id → referenced ids, recomputed on every content change.
    edges: FxHashMap<String, BTreeSet<String>>,
}

impl ModuleLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a library file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let library = Self::from_json(&text)?;
        tracing::info!("Loaded {} modules from {}", library.len(), path.display());
        Ok(library)
    }

    /// Parse a library from its JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let file: LibraryFile = serde_json::from_str(text)?;
        let mut library = Self::new();
        for module in file.modules {
            library.insert(module)?;
        }
        Ok(library)
    }

    /// Serialize to JSON, modules in insertion order.
    pub fn to_json(&self) -> Result<String> {
        let file = LibraryFile {
            modules: self.modules().cloned().collect(),
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Write the library file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Add a module. Ids must be unique.
    pub fn insert(&mut self, module: Module) -> Result<()> {
        if self.modules.contains_key(module.id()) {
            return Err(Error::InvalidModule(format!(
                "duplicate module id '{}'",
                module.id()
            )));
        }
        let id = module.id().to_string();
        self.edges.insert(id.clone(), module.references());
        self.order.push(id.clone());
        self.modules.insert(id, module);
        Ok(())
    }

    /// Create a module at version 1 and add it.
    pub fn create_module(
        &mut self,
        id: impl Into<String>,
        title: impl Into<String>,
        module_type: ModuleType,
        author: Author,
        markdown: impl Into<String>,
    ) -> Result<&Module> {
        let module = Module::create(id, title, module_type, author, markdown);
        let id = module.id().to_string();
        self.insert(module)?;
        self.get(&id)
    }

    pub fn get(&self, id: &str) -> Result<&Module> {
        self.modules
            .get(id)
            .ok_or_else(|| Error::ModuleNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Module> {
        self.modules
            .get_mut(id)
            .ok_or_else(|| Error::ModuleNotFound(id.to_string()))
    }

    /// Modules in insertion order.
    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.order.iter().filter_map(|id| self.modules.get(id))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Append a new version to a module and recompute its edges.
    pub fn update_content(&mut self, id: &str, markdown: impl Into<String>) -> Result<ModuleVersion> {
        let module = self.get_mut(id)?;
        let version = module.update_content(markdown).clone();
        let references = module.references();
        tracing::debug!(
            "Module {} now at version {} with {} references",
            id,
            version.number(),
            references.len()
        );
        self.edges.insert(id.to_string(), references);
        Ok(version)
    }

    /// Append a copy of an earlier version and recompute edges.
    pub fn restore_version(&mut self, id: &str, number: u32) -> Result<ModuleVersion> {
        let module = self.get_mut(id)?;
        let version = module.restore(number)?.clone();
        let references = module.references();
        self.edges.insert(id.to_string(), references);
        Ok(version)
    }

    /// Ids `id` references, dangling ones included.
    pub fn references_of(&self, id: &str) -> Result<&BTreeSet<String>> {
        self.edges
            .get(id)
            .ok_or_else(|| Error::ModuleNotFound(id.to_string()))
    }

    /// Reference graph over every module in the library.
    pub fn reference_graph(&self) -> ReferenceGraph {
        ReferenceGraph::build(
            self.modules()
                .filter_map(|m| self.edges.get(m.id()).map(|targets| (m.summary(), targets))),
        )
    }

    /// Every module reachable from `root` with its existing references.
    pub fn dependency_graph(&self, root: &str) -> Result<DependencyGraph> {
        self.reference_graph()
            .dependency_graph(root)
            .ok_or_else(|| Error::ModuleNotFound(root.to_string()))
    }

    /// Snapshot one module for compilation.
    pub fn source_module(&self, id: &str) -> Result<SourceModule> {
        let module = self.get(id)?;
        let references = self.references_of(id)?;
        let referenced_modules: Vec<ModuleSummary> = references
            .iter()
            .filter_map(|target| self.modules.get(target).map(Module::summary))
            .collect();

        Ok(SourceModule {
            id: module.id().to_string(),
            title: module.title().to_string(),
            module_type: module.module_type(),
            author: module.author().clone(),
            html: module.latest().html().to_string(),
            references: references.iter().cloned().collect(),
            referenced_modules,
        })
    }

    /// Snapshots for `ids`, in the given order.
    ///
    /// Unknown ids are skipped; if none are known the call fails.
    pub fn snapshot(&self, ids: &[String]) -> Result<Vec<SourceModule>> {
        let mut snapshots = Vec::with_capacity(ids.len());
        for id in ids {
            match self.source_module(id) {
                Ok(snapshot) => snapshots.push(snapshot),
                Err(Error::ModuleNotFound(missing)) => {
                    tracing::warn!("Skipping unknown module '{}'", missing);
                }
                Err(e) => return Err(e),
            }
        }

        if snapshots.is_empty() && !ids.is_empty() {
            return Err(Error::ModuleNotFound(ids.join(", ")));
        }
        Ok(snapshots)
    }

    /// Check every module in the library for reference cycles.
    pub fn check_cycles(&self) -> Result<()> {
        let ids: Vec<String> = self.order.clone();
        check_for_cycles(&self.snapshot(&ids)?)
    }
}
