//! Static page template for compiled documents.

use chrono::NaiveDate;

/// Escape text for use in HTML content or a double-quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLES: &str = r#"
    * {
      margin: 0;
      padding: 0;
      box-sizing: border-box;
    }

    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
      line-height: 1.6;
      color: #333;
      max-width: 900px;
      margin: 0 auto;
      padding: 2rem;
      background: #fff;
    }

    h1, h2, h3, h4, h5, h6 {
      margin-top: 1.5rem;
      margin-bottom: 0.5rem;
      font-weight: 600;
      line-height: 1.3;
    }

    h1 { font-size: 2.5rem; border-bottom: 3px solid #2563eb; padding-bottom: 0.5rem; }
    h2 { font-size: 2rem; }
    h3 { font-size: 1.5rem; }
    h4 { font-size: 1.25rem; }

    p { margin-bottom: 1rem; }

    code {
      background: #f3f4f6;
      padding: 0.2rem 0.4rem;
      border-radius: 3px;
      font-family: 'Courier New', monospace;
      font-size: 0.9em;
    }

    pre {
      background: #1f2937;
      color: #f9fafb;
      padding: 1rem;
      border-radius: 5px;
      overflow-x: auto;
      margin-bottom: 1rem;
    }

    pre code { background: none; padding: 0; color: inherit; }

    .table-of-contents {
      background: #f9fafb;
      border: 1px solid #e5e7eb;
      border-radius: 8px;
      padding: 1.5rem;
      margin-bottom: 2rem;
    }

    .table-of-contents h2 { margin-top: 0; font-size: 1.5rem; color: #1f2937; }
    .table-of-contents ul { list-style-type: none; padding-left: 0; }
    .table-of-contents ul ul { padding-left: 1.5rem; }
    .table-of-contents li { margin: 0.5rem 0; }
    .table-of-contents a { color: #2563eb; text-decoration: none; }

    .module {
      margin-bottom: 3rem;
      padding: 2rem;
      border: 1px solid #e5e7eb;
      border-radius: 8px;
      background: #fefefe;
      page-break-inside: avoid;
    }

    .module-header {
      margin-bottom: 1.5rem;
      padding-bottom: 1rem;
      border-bottom: 2px solid #e5e7eb;
    }

    .module-type {
      display: inline-block;
      background: #2563eb;
      color: white;
      padding: 0.25rem 0.75rem;
      border-radius: 4px;
      font-size: 0.875rem;
      font-weight: 600;
      text-transform: uppercase;
      margin-bottom: 0.5rem;
    }

    .module[data-module-type="definition"] .module-type { background: #059669; }
    .module[data-module-type="example"] .module-type { background: #d97706; }
    .module[data-module-type="explanation"] .module-type { background: #7c3aed; }
    .module[data-module-type="diagram"] .module-type { background: #db2777; }
    .module[data-module-type="proof"] .module-type { background: #dc2626; }
    .module[data-module-type="problem"] .module-type { background: #0891b2; }

    .module-title { margin-top: 0.5rem; margin-bottom: 0.25rem; color: #1f2937; }
    .module-author { color: #6b7280; font-size: 0.875rem; font-style: italic; }
    .module-content { color: #374151; }

    .module-reference {
      color: #2563eb;
      text-decoration: none;
      font-weight: 500;
      padding: 0.1rem 0.3rem;
      border-radius: 3px;
      background: #eff6ff;
    }

    .module-reference[data-module-type="definition"] { background: #ecfdf5; color: #047857; }
    .module-reference[data-module-type="proof"] { background: #fef2f2; color: #b91c1c; }

    blockquote {
      border-left: 4px solid #2563eb;
      padding-left: 1rem;
      margin: 1rem 0;
      color: #4b5563;
      font-style: italic;
    }

    ul, ol { margin-bottom: 1rem; padding-left: 2rem; }
    li { margin-bottom: 0.5rem; }

    table { width: 100%; border-collapse: collapse; margin-bottom: 1rem; }
    th, td { border: 1px solid #e5e7eb; padding: 0.75rem; text-align: left; }
    th { background: #f9fafb; font-weight: 600; }

    img { max-width: 100%; height: auto; border-radius: 5px; margin: 1rem 0; }

    .document-date { color: #6b7280; margin-bottom: 2rem; }

    footer {
      margin-top: 3rem;
      padding-top: 2rem;
      border-top: 1px solid #e5e7eb;
      color: #6b7280;
      text-align: center;
    }

    @media print {
      body { max-width: 100%; padding: 0; }
      .module { page-break-inside: avoid; }
      .table-of-contents { page-break-after: always; }
    }
"#;

/// Embed the TOC and module sections into the full page.
pub fn render_page(title: &str, generated_on: NaiveDate, toc: &str, content: &str) -> String {
    let title = escape_html(title);
    let date = generated_on.format("%B %-d, %Y");
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title}</title>
  <style>{STYLES}  </style>
</head>
<body>
  <header>
    <h1>{title}</h1>
    <p class="document-date">Generated on {date}</p>
  </header>

  {toc}

  <main>
    {content}
  </main>

  <footer>
    <p>Generated by Tome</p>
  </footer>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a & b < "c" > 'd'"#), "a &amp; b &lt; &quot;c&quot; &gt; &#39;d&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_page_is_self_contained() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        let page = render_page("Calculus <I>", date, "", "<section></section>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Calculus &lt;I&gt;</title>"));
        assert!(page.contains("Generated on March 4, 2026"));
        assert!(page.contains("<style>"));
        assert!(!page.contains("<link"));
        assert!(!page.contains("<script"));
    }
}
