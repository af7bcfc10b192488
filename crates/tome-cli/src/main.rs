//! Tome CLI - compile modular textbooks from a module library.

mod check;
mod colors;
mod compile;
mod graph;
mod markdown;
mod serve;
mod stats;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tome_core::OutputFormat;

#[derive(Parser)]
#[command(name = "tome")]
#[command(about = "Compile modular textbooks to HTML and PDF")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile modules, in the given order, into one document
    Compile {
        /// Path to the library file (.json)
        library: PathBuf,

        /// Module ids in output order
        #[arg(short, long = "module", required = true, num_args = 1..)]
        modules: Vec<String>,

        /// Output format: html or pdf
        #[arg(short, long, default_value = "html")]
        format: OutputFormat,

        /// Document title
        #[arg(short, long)]
        title: Option<String>,

        /// Output path (HTML defaults to stdout, PDF to textbook.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Browser binary for PDF output (default: $TOME_BROWSER, then PATH)
        #[arg(long)]
        browser: Option<PathBuf>,

        /// Seconds the browser may take before it is killed
        #[arg(long, default_value = "60")]
        timeout_secs: u64,
    },

    /// Check every module in a library for reference cycles
    Check {
        /// Path to the library file (.json)
        library: PathBuf,
    },

    /// Print the dependency graph reachable from a module as JSON
    Graph {
        /// Path to the library file (.json)
        library: PathBuf,

        /// Root module id
        module: String,
    },

    /// List module references in a markdown file
    Refs {
        /// Path to the markdown file
        file: PathBuf,
    },

    /// Render a markdown file to HTML
    Render {
        /// Path to the markdown file
        file: PathBuf,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show versions, word counts and reading time per module
    Stats {
        /// Path to the library file (.json)
        library: PathBuf,
    },

    /// Start the HTTP compile server
    Serve {
        /// Path to the library file (.json)
        library: PathBuf,

        /// Host address to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Browser binary for PDF output
        #[arg(long)]
        browser: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    // Helper to format Tome errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(render_err) = err.downcast_ref::<tome_render::RenderError>() {
            anyhow::anyhow!("{}", render_err.with_hint())
        } else if let Some(core_err) = err.downcast_ref::<tome_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    match cli.command {
        Commands::Compile {
            library,
            modules,
            format,
            title,
            output,
            browser,
            timeout_secs,
        } => {
            let args = compile::CompileArgs {
                library,
                modules,
                format,
                title,
                output,
                browser,
                timeout: Duration::from_secs(timeout_secs),
            };
            compile::execute(args).await.map_err(format_error)?;
        }

        Commands::Check { library } => check::execute(&library).map_err(format_error)?,

        Commands::Graph { library, module } => {
            graph::execute(&library, &module).map_err(format_error)?;
        }

        Commands::Refs { file } => markdown::refs(&file).map_err(format_error)?,

        Commands::Render { file, output } => {
            markdown::render(&file, output.as_deref()).map_err(format_error)?;
        }

        Commands::Stats { library } => stats::execute(&library).map_err(format_error)?,

        Commands::Serve {
            library,
            host,
            port,
            browser,
        } => {
            serve::execute(&library, &host, port, browser)
                .await
                .map_err(format_error)?;
        }
    }

    Ok(())
}
