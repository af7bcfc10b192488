//! Compile command implementation for Tome CLI.
//!
//! Compiles an ordered module list from a library file into HTML or PDF.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tome_core::{CompileRequest, ModuleLibrary, OutputFormat};
use tome_render::{Artifact, ChromePaginator, PdfSettings, compile};

use crate::colors;

/// Options for one compile run.
pub struct CompileArgs {
    pub library: PathBuf,
    pub modules: Vec<String>,
    pub format: OutputFormat,
    pub title: Option<String>,
    pub output: Option<PathBuf>,
    pub browser: Option<PathBuf>,
    pub timeout: Duration,
}

/// Compile modules and write the artifact.
///
/// HTML goes to stdout when no output path is given; PDF defaults to
/// `textbook.pdf`. Progress is reported on stderr.
pub async fn execute(args: CompileArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let library = ModuleLibrary::load(&args.library)?;

    let mut request = CompileRequest::new(args.modules, args.format);
    request.title = args.title;

    eprintln!(
        "\n{}Tome Compile{} - {}{}{}",
        colors::BOLD,
        colors::RESET,
        colors::CYAN,
        request.title_or_default(),
        colors::RESET
    );
    eprintln!("{}", "─".repeat(50));

    let modules = library.snapshot(&request.module_ids)?;
    for module in &modules {
        eprintln!(
            "  {}◆{} {} {}({}){}",
            colors::CYAN,
            colors::RESET,
            module.title,
            colors::DIM,
            module.module_type,
            colors::RESET
        );
    }

    let mut settings = PdfSettings::from_env().with_timeout(args.timeout);
    if let Some(browser) = args.browser {
        settings = settings.with_browser(browser);
    }
    let paginator = ChromePaginator::new(settings);

    let artifact = compile(&request, &modules, &paginator).await?;

    let destination = match (&args.output, &artifact) {
        (Some(path), _) => Some(path.clone()),
        (None, Artifact::Html(_)) => None,
        (None, Artifact::Pdf(_)) => Some(PathBuf::from("textbook.pdf")),
    };
    match &destination {
        Some(path) => write_artifact(path, &artifact)?,
        None => print!("{}", String::from_utf8_lossy(artifact.as_bytes())),
    }

    eprintln!("{}", "─".repeat(50));
    eprintln!(
        "{}Compiled{} {} modules to {} ({} bytes) in {:.2}s{}",
        colors::GREEN,
        colors::RESET,
        modules.len(),
        artifact.format(),
        artifact.len(),
        start.elapsed().as_secs_f64(),
        destination
            .map(|p| format!(" → {}", p.display()))
            .unwrap_or_default()
    );

    Ok(())
}

fn write_artifact(path: &Path, artifact: &Artifact) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, artifact.as_bytes())?;
    Ok(())
}
