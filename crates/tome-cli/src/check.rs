//! Check command: load a library and look for reference cycles.

use std::path::Path;

use tome_core::ModuleLibrary;

use crate::colors;

pub fn execute(library_path: &Path) -> anyhow::Result<()> {
    let library = ModuleLibrary::load(library_path)?;

    let dangling: Vec<(String, String)> = library
        .modules()
        .flat_map(|module| {
            let id = module.id().to_string();
            module
                .references()
                .into_iter()
                .filter(|target| library.get(target).is_err())
                .map(move |target| (id.clone(), target))
                .collect::<Vec<_>>()
        })
        .collect();

    for (source, target) in &dangling {
        println!(
            "{}  ! {}{} references unknown module {}",
            colors::YELLOW,
            source,
            colors::RESET,
            target
        );
    }

    library.check_cycles()?;

    println!(
        "{}✓{} {} modules, no reference cycles ({} dangling references)",
        colors::GREEN,
        colors::RESET,
        library.len(),
        dangling.len()
    );
    Ok(())
}
