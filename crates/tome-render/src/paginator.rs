//! Paginated output through a headless browser.
//!
//! Every call gets its own browser process and its own scratch directory.
//! The process is spawned with kill-on-drop, so a timeout or a dropped
//! future terminates it; the scratch directory is removed when the call
//! returns on any path.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use url::Url;

use crate::error::{RenderError, RenderResult};

/// Environment variable naming the browser binary.
pub const BROWSER_ENV: &str = "TOME_BROWSER";

/// Binaries tried on `PATH`, in order, when no browser is configured.
pub const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
    "microsoft-edge",
];

/// Turns a finished HTML page into PDF bytes.
///
/// Implementations must not share engine state between calls.
pub trait Paginator: Send + Sync {
    fn paginate(&self, html: &str) -> impl Future<Output = RenderResult<Vec<u8>>> + Send;
}

/// Page geometry and process limits for [`ChromePaginator`].
#[derive(Debug, Clone, PartialEq)]
pub struct PdfSettings {
    /// Explicit browser binary. Discovered on `PATH` when unset.
    pub browser: Option<PathBuf>,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    pub margin_mm: f32,
    /// Keep background colors and images in print.
    pub print_background: bool,
    /// Virtual time the page may use to settle before printing.
    pub settle_time: Duration,
    /// Hard deadline for the whole browser run.
    pub timeout: Duration,
    /// Extra flags passed to the browser, e.g. `--no-sandbox` in containers.
    pub extra_args: Vec<String>,
}

impl Default for PdfSettings {
    fn default() -> Self {
        Self {
            browser: None,
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            margin_mm: 20.0,
            print_background: true,
            settle_time: Duration::from_secs(5),
            timeout: Duration::from_secs(60),
            extra_args: Vec::new(),
        }
    }
}

impl PdfSettings {
    /// Defaults, with the browser taken from `TOME_BROWSER` if set.
    pub fn from_env() -> Self {
        let browser = std::env::var_os(BROWSER_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);
        Self {
            browser,
            ..Self::default()
        }
    }

    pub fn with_browser(mut self, browser: impl Into<PathBuf>) -> Self {
        self.browser = Some(browser.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// CSS fixing page size and margins for print.
    pub fn page_css(&self) -> String {
        let mut css = format!(
            "@page {{ size: {}mm {}mm; margin: {}mm; }}",
            self.page_width_mm, self.page_height_mm, self.margin_mm
        );
        if self.print_background {
            css.push_str(
                "\nhtml, body { -webkit-print-color-adjust: exact; print-color-adjust: exact; }",
            );
        }
        css
    }
}

/// Insert the print stylesheet into `html`, just before `</head>` when the
/// page has one.
pub fn print_html(html: &str, settings: &PdfSettings) -> String {
    let style = format!("<style>\n{}\n</style>\n", settings.page_css());
    match html.find("</head>") {
        Some(pos) => {
            let mut out = String::with_capacity(html.len() + style.len());
            out.push_str(&html[..pos]);
            out.push_str(&style);
            out.push_str(&html[pos..]);
            out
        }
        None => format!("{style}{html}"),
    }
}

/// Prints pages with a Chromium-family browser in headless mode.
#[derive(Debug, Clone, Default)]
pub struct ChromePaginator {
    settings: PdfSettings,
}

impl ChromePaginator {
    pub fn new(settings: PdfSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PdfSettings {
        &self.settings
    }

    /// The configured browser, or the first candidate found on `PATH`.
    pub fn locate_browser(&self) -> RenderResult<PathBuf> {
        if let Some(browser) = &self.settings.browser {
            return Ok(browser.clone());
        }
        BROWSER_CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| RenderError::BrowserNotFound {
                tried: BROWSER_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            })
    }

    fn browser_args(&self, pdf_path: &Path, profile_dir: &Path) -> Vec<String> {
        let mut args = vec![
            "--headless".to_string(),
            "--disable-gpu".to_string(),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--hide-scrollbars".to_string(),
            "--no-pdf-header-footer".to_string(),
            format!("--user-data-dir={}", profile_dir.display()),
            format!("--virtual-time-budget={}", self.settings.settle_time.as_millis()),
            format!("--print-to-pdf={}", pdf_path.display()),
        ];
        args.extend(self.settings.extra_args.iter().cloned());
        args
    }

    async fn print(&self, html: &str) -> RenderResult<Vec<u8>> {
        let browser = self.locate_browser()?;
        let launch_error = |source: std::io::Error| RenderError::Launch {
            browser: browser.clone(),
            source,
        };

        let workdir = tempfile::Builder::new()
            .prefix("tome-pdf-")
            .tempdir()
            .map_err(launch_error)?;
        let page_path = workdir.path().join("document.html");
        let pdf_path = workdir.path().join("document.pdf");
        let profile_dir = workdir.path().join("profile");

        tokio::fs::write(&page_path, print_html(html, &self.settings))
            .await
            .map_err(launch_error)?;
        let page_url = Url::from_file_path(&page_path).map_err(|()| {
            launch_error(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("cannot form a file URL for {}", page_path.display()),
            ))
        })?;

        tracing::debug!("Launching {} for {}", browser.display(), page_url);
        let child = Command::new(&browser)
            .args(self.browser_args(&pdf_path, &profile_dir))
            .arg(page_url.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(launch_error)?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match tokio::time::timeout(self.settings.timeout, child.wait_with_output()).await
        {
            Ok(result) => result.map_err(launch_error)?,
            Err(_) => {
                tracing::warn!(
                    "Browser exceeded {}s deadline, killed",
                    self.settings.timeout.as_secs()
                );
                return Err(RenderError::Timeout(self.settings.timeout));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(RenderError::Crashed {
                status: output.status,
                stderr,
            });
        }

        let pdf = match tokio::fs::read(&pdf_path).await {
            Ok(bytes) if bytes.starts_with(b"%PDF") => bytes,
            Ok(_) => return Err(RenderError::EmptyOutput),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RenderError::EmptyOutput);
            }
            Err(e) => return Err(launch_error(e)),
        };

        tracing::info!("Rendered PDF: {} bytes", pdf.len());
        Ok(pdf)
    }
}

impl Paginator for ChromePaginator {
    async fn paginate(&self, html: &str) -> RenderResult<Vec<u8>> {
        self.print(html).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_css_defaults() {
        let css = PdfSettings::default().page_css();
        assert!(css.starts_with("@page { size: 210mm 297mm; margin: 20mm; }"));
        assert!(css.contains("print-color-adjust: exact"));

        let plain = PdfSettings {
            print_background: false,
            ..PdfSettings::default()
        };
        assert!(!plain.page_css().contains("color-adjust"));
    }

    #[test]
    fn test_print_html_injects_before_head_close() {
        let html = "<html><head><title>x</title></head><body></body></html>";
        let out = print_html(html, &PdfSettings::default());
        let style = out.find("@page").unwrap();
        assert!(style < out.find("</head>").unwrap());
        assert!(out.ends_with("<body></body></html>"));
    }

    #[test]
    fn test_print_html_without_head() {
        let out = print_html("<p>bare</p>", &PdfSettings::default());
        assert!(out.starts_with("<style>"));
        assert!(out.ends_with("<p>bare</p>"));
    }

    #[test]
    fn test_browser_args() {
        let paginator = ChromePaginator::new(PdfSettings {
            extra_args: vec!["--no-sandbox".to_string()],
            ..PdfSettings::default()
        });
        let args = paginator.browser_args(Path::new("/tmp/out.pdf"), Path::new("/tmp/profile"));
        assert_eq!(args[0], "--headless");
        assert!(args.contains(&"--print-to-pdf=/tmp/out.pdf".to_string()));
        assert!(args.contains(&"--user-data-dir=/tmp/profile".to_string()));
        assert!(args.contains(&"--virtual-time-budget=5000".to_string()));
        assert_eq!(args.last().map(String::as_str), Some("--no-sandbox"));
    }

    #[test]
    fn test_configured_browser_wins() {
        let paginator =
            ChromePaginator::new(PdfSettings::default().with_browser("/opt/browser/chrome"));
        assert_eq!(
            paginator.locate_browser().unwrap(),
            PathBuf::from("/opt/browser/chrome")
        );
    }
}
