//! Semantic HTML rendering of classified blocks.

use crate::model::{Block, Document, Page, Span, TableBlock};

use super::shell::wrap_document;
use super::RenderOptions;

/// Escape HTML metacharacters for text and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// HTML renderer for documents.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    options: RenderOptions,
}

impl HtmlRenderer {
    /// Create a new HTML renderer with the given options.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a complete HTML5 document.
    pub fn render(&self, doc: &Document) -> String {
        let title = doc
            .title
            .clone()
            .or_else(|| self.options.resolve_title(doc.metadata.title.as_deref()));
        wrap_document(&self.render_article(&doc.pages), title.as_deref(), &self.options)
    }

    /// Render pages inside the main `<article>`.
    pub fn render_article(&self, pages: &[Page]) -> String {
        let mut html = String::from("<article role=\"main\">\n");
        for page in pages {
            self.render_page(page, &mut html);
        }
        html.push_str("</article>\n");
        html
    }

    /// Render a page's blocks.
    pub fn render_page(&self, page: &Page, out: &mut String) {
        for block in &page.blocks {
            self.render_block(block, page.number, out);
        }
    }

    /// Render a single block.
    pub fn render_block(&self, block: &Block, page: u32, out: &mut String) {
        match block {
            Block::Heading { level, spans } => {
                out.push_str(&format!("<h{0}>{1}</h{0}>\n", level, render_spans(spans)));
            }
            Block::Paragraph { spans } => {
                out.push_str(&format!("<p>{}</p>\n", render_spans(spans)));
            }
            Block::Code { text } => {
                out.push_str(&format!("<pre><code>{}</code></pre>\n", escape_html(text)));
            }
            Block::Math { text, display } => {
                let label = escape_html(&math_label(text));
                if *display {
                    out.push_str(&format!(
                        "<div class=\"math-display\" aria-label=\"Mathematical expression: {}\">{}</div>\n",
                        label, text
                    ));
                } else {
                    out.push_str(&format!(
                        "<span class=\"math-inline\" aria-label=\"Mathematical expression: {}\">{}</span>\n",
                        label, text
                    ));
                }
            }
            Block::Table(table) => render_table(table, page, out),
        }
    }
}

/// Math text without its delimiter characters.
fn math_label(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '$' | '[' | ']' | '(' | ')' | '\\'))
        .collect()
}

fn render_span(span: &Span) -> String {
    let text = escape_html(&span.text);
    let classes: Vec<&str> = [(span.bold, "bold"), (span.italic, "italic")]
        .iter()
        .filter(|(on, _)| *on)
        .map(|(_, class)| *class)
        .collect();
    if classes.is_empty() {
        text
    } else {
        format!("<span class=\"{}\">{}</span>", classes.join(" "), text)
    }
}

fn render_spans(spans: &[Span]) -> String {
    spans.iter().map(render_span).collect::<Vec<_>>().join(" ")
}

fn render_table(table: &TableBlock, page: u32, out: &mut String) {
    let columns = table.column_count();

    out.push_str(&format!(
        "<table role=\"grid\" aria-label=\"Table from page {0}\">\n<caption>Table {0}</caption>\n",
        page
    ));
    out.push_str("<thead>\n<tr>");
    for cell in &table.header {
        out.push_str(&format!("<th scope=\"col\">{}</th>", escape_html(cell)));
    }
    for _ in table.header.len()..columns {
        out.push_str("<th scope=\"col\"></th>");
    }
    out.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in &table.rows {
        out.push_str("<tr>");
        for cell in row {
            out.push_str(&format!("<td>{}</td>", escape_html(cell)));
        }
        for _ in row.len()..columns {
            out.push_str("<td></td>");
        }
        out.push_str("</tr>\n");
    }
    out.push_str("</tbody>\n</table>\n");
}
