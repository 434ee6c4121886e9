//! The HTML5 document shell wrapped around rendered pages.

use super::html::escape_html;
use super::RenderOptions;

/// Minimal document returned when a document cannot be loaded at all.
pub const ERROR_HTML: &str = "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"UTF-8\"><title>Error</title></head><body><p>Error processing PDF</p></body></html>";

const BASE_STYLES: &str = "\
    table { border-collapse: collapse; width: 100%; margin: 1em 0; }
    th, td { border: 1px solid #ddd; padding: 8px; text-align: left; vertical-align: top; }
    pre { background: #f4f4f4; padding: 10px; border-radius: 4px; }
    .math-inline, .math-display { font-family: 'Times New Roman', serif; }
    h1, h2 { margin: 0.5em 0; }
    p { margin: 0.5em 0; }
    .bold { font-weight: bold; }
    .italic { font-style: italic; }
";

/// Wrap an `<article>` in a complete HTML5 document.
pub fn wrap_document(article: &str, title: Option<&str>, options: &RenderOptions) -> String {
    let mut html = String::with_capacity(article.len() + 1024);
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("  <meta charset=\"UTF-8\">\n");
    html.push_str(
        "  <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    if let Some(title) = title {
        html.push_str(&format!("  <title>{}</title>\n", escape_html(title)));
    }
    if let Some(ref script) = options.math_script {
        html.push_str(&format!(
            "  <script src=\"{}\" async></script>\n",
            escape_html(script)
        ));
    }
    if options.include_styles {
        html.push_str("  <style>\n");
        html.push_str(BASE_STYLES);
        html.push_str("  </style>\n");
    }
    html.push_str("</head>\n<body>\n");
    html.push_str(article);
    html.push_str("\n</body>\n</html>");
    html
}
