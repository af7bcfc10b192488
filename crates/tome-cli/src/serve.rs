//! Serve command implementation for Tome CLI.
//!
//! Starts the HTTP compile server for a library file.

use std::path::{Path, PathBuf};

use tome_render::PdfSettings;
use tome_server::ServerConfig;

use crate::colors;

/// Start the compile server.
pub async fn execute(
    library_path: &Path,
    host: &str,
    port: u16,
    browser: Option<PathBuf>,
) -> anyhow::Result<()> {
    if !library_path.exists() {
        anyhow::bail!("Library not found: {}", library_path.display());
    }

    println!(
        "\n{}Tome Server{} - Module Compiler",
        colors::BOLD,
        colors::RESET
    );
    println!("{}", "─".repeat(50));

    println!(
        "{}  ◆ Library:{} {}",
        colors::CYAN,
        colors::RESET,
        library_path.display()
    );

    let mut pdf = PdfSettings::from_env();
    if let Some(browser) = browser {
        pdf = pdf.with_browser(browser);
    }
    let config = ServerConfig {
        host: host.to_string(),
        port,
        pdf,
    };

    println!(
        "{}  ◆ Server:{} http://{}:{}",
        colors::CYAN,
        colors::RESET,
        config.host,
        config.port
    );
    println!(
        "{}  ◆ Compile:{} POST http://{}:{}/api/compile",
        colors::CYAN,
        colors::RESET,
        config.host,
        config.port
    );
    println!("{}", "─".repeat(50));
    println!("{}Press Ctrl+C to stop{}", colors::GREEN, colors::RESET);
    println!();

    tome_server::serve(library_path, config).await?;

    Ok(())
}
