//! Stats command: per-module versions, word counts and reading time.

use std::path::Path;

use tome_core::markdown::DEFAULT_WORDS_PER_MINUTE;
use tome_core::{ModuleLibrary, reading_time_minutes, word_count};

use crate::colors;

pub fn execute(library_path: &Path) -> anyhow::Result<()> {
    let library = ModuleLibrary::load(library_path)?;

    println!(
        "\n{}Tome Stats{} - {}",
        colors::BOLD,
        colors::RESET,
        library_path.display()
    );
    println!("{}", "─".repeat(72));
    println!(
        "{}{:<20} {:<12} {:>8} {:>8} {:>8}  {}{}",
        colors::DIM,
        "ID",
        "TYPE",
        "VERSION",
        "WORDS",
        "MINUTES",
        "TITLE",
        colors::RESET
    );

    let mut total_words = 0;
    for module in library.modules() {
        let markdown = module.latest().markdown();
        let words = word_count(markdown);
        total_words += words;
        println!(
            "{:<20} {:<12} {:>8} {:>8} {:>8}  {}",
            module.id(),
            module.module_type(),
            module.latest().number(),
            words,
            reading_time_minutes(markdown, DEFAULT_WORDS_PER_MINUTE),
            module.title()
        );
    }

    println!("{}", "─".repeat(72));
    println!(
        "{}Total{} {} modules, {} words, ~{} min",
        colors::GREEN,
        colors::RESET,
        library.len(),
        total_words,
        total_words.div_ceil(DEFAULT_WORDS_PER_MINUTE)
    );
    Ok(())
}
