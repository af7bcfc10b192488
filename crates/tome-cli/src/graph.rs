//! Graph command: print the dependency-graph view of one module as JSON.

use std::path::Path;

use tome_core::ModuleLibrary;

pub fn execute(library_path: &Path, module_id: &str) -> anyhow::Result<()> {
    let library = ModuleLibrary::load(library_path)?;
    let graph = library.dependency_graph(module_id)?;
    let json = serde_json::json!({ "graph": graph });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
