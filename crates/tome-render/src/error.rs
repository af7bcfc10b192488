//! Error types for tome-render.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Errors from producing an output artifact.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No browser was configured and none was found on `PATH`.
    #[error("no headless browser found (tried {})", tried.join(", "))]
    BrowserNotFound { tried: Vec<String> },

    /// The browser process could not be started, or its workspace prepared.
    #[error("failed to launch browser {}: {source}", browser.display())]
    Launch {
        browser: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The browser did not finish before the deadline. It has been killed.
    #[error("browser did not finish within {}s", .0.as_secs())]
    Timeout(Duration),

    /// The browser exited unsuccessfully.
    #[error("browser exited with {status}: {stderr}")]
    Crashed { status: ExitStatus, stderr: String },

    /// The browser exited cleanly but produced no PDF.
    #[error("browser produced no PDF output")]
    EmptyOutput,

    /// Compilation failed before rendering.
    #[error(transparent)]
    Core(#[from] tome_core::Error),
}

impl RenderError {
    /// Recovery hint shown to users alongside the error, if one applies.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            RenderError::BrowserNotFound { .. } => Some(
                "install Chromium or Chrome, or point TOME_BROWSER at a browser binary; \
                 `--format html` needs no browser",
            ),
            RenderError::Timeout(_) => Some("raise the timeout with --timeout-secs, or split the document"),
            RenderError::Core(e) => e.hint(),
            _ => None,
        }
    }

    /// Render the error followed by its hint, if any.
    pub fn with_hint(&self) -> String {
        match self.hint() {
            Some(hint) => format!("{self}\n  hint: {hint}"),
            None => self.to_string(),
        }
    }

    /// True when the failure happened in the external rendering engine
    /// rather than in compilation.
    pub fn is_engine_failure(&self) -> bool {
        !matches!(self, RenderError::Core(_))
    }
}
