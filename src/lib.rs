//! # pdf2html
//!
//! Reconstruct document structure from PDF text runs and render it as
//! semantic HTML5.
//!
//! A PDF page is a bag of positioned text fragments. This library groups
//! them into lines and paragraphs, finds tables from column alignment, and
//! classifies what remains as headings, code, math or body text. The result
//! is an accessible HTML document.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> pdf2html::Result<()> {
//!     let data = std::fs::read("document.pdf")?;
//!     let html = pdf2html::pdf_to_html(&data, Some("My Document"))?;
//!     std::fs::write("document.html", html)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout reconstruction**: lines, paragraphs and reading order from coordinates
//! - **Table detection**: column clustering with row and fill validation
//! - **Block classification**: headings by font size, code, math and emphasis
//! - **Fault isolation**: a failing page is skipped and reported, never fatal
//! - **Parallel processing**: uses Rayon for multi-page documents
//! - **Pluggable input**: any [`PdfSource`] can feed the pipeline
//!
//! ## Cargo features
//!
//! - `lopdf` (default): read PDF files with lopdf
//! - `async`: [`convert::convert_async`] on the tokio blocking pool

pub mod convert;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;
pub mod source;

// Re-export commonly used types
pub use convert::{ConvertOptions, ConvertResult, Converter};
pub use error::{Error, Result};
pub use model::{
    Block, CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, Document, LogSink,
    Metadata, NullSink, Page, Span, TableBlock, TextRun,
};
pub use parser::{LayoutAnalyzer, LayoutThresholds};
pub use render::{HtmlRenderer, JsonFormat, PageSelection, RenderOptions, RenderStats, ERROR_HTML};
pub use source::{MemorySource, PdfSource, SourceProvider};

#[cfg(feature = "lopdf")]
pub use convert::PdfConverter;
#[cfg(feature = "lopdf")]
pub use source::{LopdfProvider, LopdfSource};

#[cfg(feature = "lopdf")]
use std::path::Path;
use std::sync::Arc;

/// Convert PDF bytes to an HTML document.
///
/// `title` is used when the document carries no title of its own. Returns
/// an error only when the PDF backend is unavailable; any other failure
/// produces [`ERROR_HTML`].
///
/// # Example
///
/// ```no_run
/// let data = std::fs::read("document.pdf").unwrap();
/// let html = pdf2html::pdf_to_html(&data, None).unwrap();
/// assert!(html.starts_with("<!DOCTYPE html>"));
/// ```
#[cfg(feature = "lopdf")]
pub fn pdf_to_html(data: &[u8], title: Option<&str>) -> Result<String> {
    let mut options = ConvertOptions::default();
    if let Some(title) = title {
        options = options.with_title(title);
    }
    Converter::new(options).render_html(&LopdfProvider, data)
}

/// Convert a PDF file to an HTML document.
///
/// # Example
///
/// ```no_run
/// let html = pdf2html::pdf_to_html_file("document.pdf").unwrap();
/// std::fs::write("document.html", html).unwrap();
/// ```
#[cfg(feature = "lopdf")]
pub fn pdf_to_html_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let data = std::fs::read(path)?;
    pdf_to_html(&data, None)
}

/// Convert any page source to HTML with default options.
///
/// # Example
///
/// ```
/// use pdf2html::{convert_source, MemorySource, TextRun};
///
/// let source = MemorySource::new()
///     .with_page(vec![TextRun::new("Hello", 10.0, 700.0, "Helvetica", 12.0)]);
/// let result = convert_source(&source);
/// assert!(result.html.contains("<p>Hello</p>"));
/// ```
pub fn convert_source<S: PdfSource>(source: &S) -> ConvertResult {
    convert::convert_source(source)
}

/// Convert any page source to JSON blocks.
pub fn source_to_json<S: PdfSource>(source: &S, format: JsonFormat) -> Result<String> {
    let doc = Converter::default().analyze(source);
    render::to_json(&doc, format)
}

/// Builder for converting documents.
///
/// # Example
///
/// ```no_run
/// use pdf2html::{Pdf2Html, PageSelection};
///
/// let result = Pdf2Html::new()
///     .with_title("Report")
///     .with_pages(PageSelection::Range(1..=3))
///     .sequential()
///     .convert_file("document.pdf")?;
/// println!("{}", result.html);
/// # Ok::<(), pdf2html::Error>(())
/// ```
pub struct Pdf2Html {
    options: ConvertOptions,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl Pdf2Html {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            options: ConvertOptions::default(),
            sink: None,
        }
    }

    /// Set the title used when the document has none.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.options = self.options.with_title(title);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Set layout thresholds.
    pub fn with_thresholds(mut self, thresholds: LayoutThresholds) -> Self {
        self.options = self.options.with_thresholds(thresholds);
        self
    }

    /// Omit the math script from the output.
    pub fn without_math_script(mut self) -> Self {
        self.options.render = self.options.render.without_math_script();
        self
    }

    /// Deliver diagnostics to a custom sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the configured converter.
    pub fn build(self) -> Converter {
        let converter = Converter::new(self.options);
        match self.sink {
            Some(sink) => converter.with_sink(sink),
            None => converter,
        }
    }

    /// Convert a page source.
    pub fn convert_source<S: PdfSource>(self, source: &S) -> ConvertResult {
        self.build().convert(source)
    }

    /// Convert PDF bytes.
    #[cfg(feature = "lopdf")]
    pub fn convert_bytes(self, data: &[u8]) -> Result<ConvertResult> {
        self.build().convert_bytes(&LopdfProvider, data)
    }

    /// Convert a PDF file.
    #[cfg(feature = "lopdf")]
    pub fn convert_file<P: AsRef<Path>>(self, path: P) -> Result<ConvertResult> {
        let data = std::fs::read(path)?;
        self.convert_bytes(&data)
    }
}

impl Default for Pdf2Html {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemorySource {
        MemorySource::new().with_page(vec![
            TextRun::new("Overview", 10.0, 700.0, "Helvetica", 24.0),
            TextRun::new("Body text follows here", 10.0, 650.0, "Helvetica", 12.0),
            TextRun::new("and continues", 10.0, 630.0, "Helvetica", 12.0),
        ])
    }

    #[test]
    fn test_builder_with_sink() {
        let sink = Arc::new(CollectingSink::new());
        let result = Pdf2Html::new()
            .with_title("Builder")
            .sequential()
            .with_sink(sink.clone())
            .convert_source(&sample());

        assert!(result.html.contains("<title>Builder</title>"));
        assert!(sink.is_empty());
    }

    #[test]
    fn test_source_to_json() {
        let json = source_to_json(&sample(), JsonFormat::Compact).unwrap();
        assert!(json.contains("\"pages\""));
        assert!(json.contains("\"type\":\"paragraph\""));
    }

    #[test]
    fn test_without_math_script() {
        let result = Pdf2Html::new().without_math_script().convert_source(&sample());
        assert!(!result.html.contains("<script"));
    }

    #[cfg(feature = "lopdf")]
    #[test]
    fn test_pdf_to_html_non_pdf() {
        let html = pdf_to_html(b"not a pdf", Some("Title")).unwrap();
        assert_eq!(html, ERROR_HTML);
    }
}
