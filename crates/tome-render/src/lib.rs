//! Output formats for Tome.
//!
//! Dispatches a compile request to the HTML pipeline in `tome-core` and,
//! for paginated output, hands the finished page to a [`Paginator`].

pub mod error;
pub mod paginator;

pub use error::{RenderError, RenderResult};
pub use paginator::{BROWSER_CANDIDATES, BROWSER_ENV, ChromePaginator, Paginator, PdfSettings, print_html};

use tome_core::{CompileRequest, OutputFormat, SourceModule, compile_html};

/// A finished document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Html(String),
    Pdf(Vec<u8>),
}

impl Artifact {
    pub fn format(&self) -> OutputFormat {
        match self {
            Artifact::Html(_) => OutputFormat::Html,
            Artifact::Pdf(_) => OutputFormat::Pdf,
        }
    }

    /// MIME type for serving the artifact.
    pub fn content_type(&self) -> &'static str {
        match self {
            Artifact::Html(_) => "text/html; charset=utf-8",
            Artifact::Pdf(_) => "application/pdf",
        }
    }

    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Artifact::Html(_) => "html",
            Artifact::Pdf(_) => "pdf",
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Artifact::Html(html) => html.as_bytes(),
            Artifact::Pdf(bytes) => bytes,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Artifact::Html(html) => html.into_bytes(),
            Artifact::Pdf(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Compile `modules` (already in request order) into the requested format.
///
/// No artifact is produced unless every step succeeds: a cycle fails before
/// any rendering, and a paginator failure discards the HTML.
pub async fn compile<P: Paginator>(
    request: &CompileRequest,
    modules: &[SourceModule],
    paginator: &P,
) -> RenderResult<Artifact> {
    let document = compile_html(modules, &request.document_options())?;

    match request.format {
        OutputFormat::Html => Ok(Artifact::Html(document.html)),
        OutputFormat::Pdf => {
            tracing::debug!("Paginating '{}'", document.title);
            let pdf = paginator.paginate(&document.html).await?;
            Ok(Artifact::Pdf(pdf))
        }
    }
}
