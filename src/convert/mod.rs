//! Document conversion: source pages in, semantic HTML out.
//!
//! A [`Converter`] pulls text runs from a [`PdfSource`] page by page, runs
//! layout analysis on each page (in parallel when enabled), merges the
//! results back in page order and renders the HTML document.
//!
//! A page whose runs cannot be read is skipped and reported as a
//! diagnostic. Only a backend that cannot be initialized at all is returned
//! as an error.
//!
//! # Example
//!
//! ```
//! use pdf2html::convert::{ConvertOptions, Converter};
//! use pdf2html::{MemorySource, TextRun};
//!
//! let source = MemorySource::new()
//!     .with_page(vec![TextRun::new("Hello world", 10.0, 700.0, "Helvetica", 12.0)]);
//!
//! let converter = Converter::new(ConvertOptions::default());
//! let result = converter.convert(&source);
//! assert!(result.html.contains("<p>Hello world</p>"));
//! ```

mod options;

#[cfg(feature = "lopdf")]
mod pdf;

pub use options::ConvertOptions;

#[cfg(feature = "lopdf")]
pub use pdf::PdfConverter;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::{Diagnostic, DiagnosticSink, Document, LogSink};
use crate::parser::{LayoutAnalyzer, PageLayout};
use crate::render::{HtmlRenderer, RenderStats, ERROR_HTML};
use crate::source::{PdfSource, SourceProvider};

/// Result of converting a document.
#[derive(Debug, Clone)]
pub struct ConvertResult {
    /// Complete HTML5 document
    pub html: String,

    /// Classified blocks per page
    pub document: Document,

    /// Conversion statistics
    pub stats: RenderStats,
}

impl ConvertResult {
    /// Skipped blocks and failed pages, in page order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.document.diagnostics
    }

    /// Whether any page failed to process.
    pub fn has_failed_pages(&self) -> bool {
        self.stats.failed_pages > 0
    }
}

/// Outcome of processing a single page.
type PageOutcome = std::result::Result<PageLayout, Diagnostic>;

/// Converts documents from a page source to HTML.
pub struct Converter {
    options: ConvertOptions,
    analyzer: LayoutAnalyzer,
    renderer: HtmlRenderer,
    sink: Arc<dyn DiagnosticSink>,
}

impl Converter {
    /// Create a converter that reports diagnostics to the log.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            analyzer: LayoutAnalyzer::with_thresholds(options.thresholds),
            renderer: HtmlRenderer::new(options.render.clone()),
            sink: Arc::new(LogSink),
            options,
        }
    }

    /// Deliver diagnostics to a custom sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The options in use.
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Analyze the selected pages of a source into a block document.
    pub fn analyze<S: PdfSource>(&self, source: &S) -> Document {
        let metadata = source.metadata().unwrap_or_else(|e| {
            log::warn!("Failed to read document metadata: {}", e);
            Default::default()
        });

        let pages = self.options.pages.pages(source.page_count());
        log::debug!(
            "Converting {} of {} pages ({})",
            pages.len(),
            source.page_count(),
            if self.options.parallel {
                "parallel"
            } else {
                "sequential"
            }
        );

        let outcomes: Vec<PageOutcome> = if self.options.parallel {
            pages
                .par_iter()
                .map(|&number| self.process_page(source, number))
                .collect()
        } else {
            pages
                .iter()
                .map(|&number| self.process_page(source, number))
                .collect()
        };

        let mut doc = Document::new();
        doc.title = self
            .options
            .render
            .resolve_title(metadata.non_empty_title());
        doc.metadata = metadata;

        for outcome in outcomes {
            match outcome {
                Ok(layout) => {
                    doc.diagnostics.extend(layout.diagnostics);
                    doc.add_page(layout.page);
                }
                Err(diagnostic) => doc.diagnostics.push(diagnostic),
            }
        }

        for diagnostic in &doc.diagnostics {
            self.sink.record(diagnostic);
        }

        doc
    }

    /// Convert the selected pages of a source to HTML.
    pub fn convert<S: PdfSource>(&self, source: &S) -> ConvertResult {
        let document = self.analyze(source);
        let html = self.renderer.render(&document);
        let stats = RenderStats::from_document(&document);

        ConvertResult {
            html,
            document,
            stats,
        }
    }

    /// Load a document with `provider` and convert it.
    ///
    /// Errors when the provider cannot be initialized or the bytes cannot
    /// be opened.
    pub fn convert_bytes<P: SourceProvider>(
        &self,
        provider: &P,
        data: &[u8],
    ) -> Result<ConvertResult> {
        initialize(provider)?;
        let source = provider.load(data)?;
        Ok(self.convert(&source))
    }

    /// Load a document with `provider` and render it to HTML.
    ///
    /// Returns [`Error::BackendUnavailable`] when the provider cannot be
    /// initialized. Any later failure, including a panic inside the reader,
    /// yields the fixed [`ERROR_HTML`] document.
    pub fn render_html<P: SourceProvider>(&self, provider: &P, data: &[u8]) -> Result<String> {
        initialize(provider)?;

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            provider.load(data).map(|source| self.convert(&source).html)
        }));

        match outcome {
            Ok(Ok(html)) => Ok(html),
            Ok(Err(e)) => {
                log::error!("Document conversion failed: {}", e);
                Ok(ERROR_HTML.to_string())
            }
            Err(_) => {
                log::error!("Document conversion panicked");
                Ok(ERROR_HTML.to_string())
            }
        }
    }

    fn process_page<S: PdfSource>(&self, source: &S, number: u32) -> PageOutcome {
        // readers can panic on malformed content streams
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            source
                .page_runs(number)
                .map(|runs| self.analyzer.analyze_page(number, runs))
        }));

        match outcome {
            Ok(Ok(layout)) => Ok(layout),
            Ok(Err(e)) => Err(Diagnostic::page_failed(number, e)),
            Err(payload) => Err(Diagnostic::page_failed(number, panic_message(&*payload))),
        }
    }
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("panic: {}", s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("panic: {}", s)
    } else {
        "panic".to_string()
    }
}

fn initialize<P: SourceProvider>(provider: &P) -> Result<()> {
    provider.initialize().map_err(|e| match e {
        Error::BackendUnavailable(_) => e,
        other => Error::BackendUnavailable(other.to_string()),
    })
}

/// Convert a source on the blocking thread pool.
#[cfg(feature = "async")]
pub async fn convert_async<S>(converter: Arc<Converter>, source: S) -> Result<ConvertResult>
where
    S: PdfSource + Send + 'static,
{
    tokio::task::spawn_blocking(move || converter.convert(&source))
        .await
        .map_err(|e| Error::Other(format!("Conversion task failed: {}", e)))
}

/// Convert a source with default options.
pub fn convert_source<S: PdfSource>(source: &S) -> ConvertResult {
    Converter::default().convert(source)
}
