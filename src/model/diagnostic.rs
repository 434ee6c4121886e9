//! Diagnostics: recorded reasons for dropping or failing a unit of content.

use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// What was dropped or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A line with no text at all
    EmptyLine,
    /// A heading whose text was blank
    EmptyHeading,
    /// A code line or block whose text was blank
    EmptyCode,
    /// A paragraph whose text was blank
    EmptyParagraph,
    /// A detected table whose cells were all blank
    EmptyTable,
    /// A page that could not be processed
    PageFailed,
}

/// A skipped block or failed page, reported without aborting the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Page number (1-indexed)
    pub page: u32,
    /// Diagnostic kind
    pub kind: DiagnosticKind,
    /// Human-readable description
    pub message: String,
}

impl Diagnostic {
    /// A blank line was dropped.
    pub fn empty_line(page: u32, text: &str) -> Self {
        Self::new(
            page,
            DiagnosticKind::EmptyLine,
            format!("Line on page {} skipped: {}", page, text),
        )
    }

    /// A blank heading was dropped.
    pub fn empty_heading(page: u32, text: &str) -> Self {
        Self::new(
            page,
            DiagnosticKind::EmptyHeading,
            format!("Header on page {} skipped: {}", page, text),
        )
    }

    /// A blank code line or block was dropped.
    pub fn empty_code(page: u32, text: &str) -> Self {
        Self::new(
            page,
            DiagnosticKind::EmptyCode,
            format!("Code block on page {} skipped: {}", page, text),
        )
    }

    /// A blank paragraph was dropped.
    pub fn empty_paragraph(page: u32, text: &str) -> Self {
        Self::new(
            page,
            DiagnosticKind::EmptyParagraph,
            format!("Paragraph on page {} skipped: {}", page, text),
        )
    }

    /// A table with only blank cells was dropped.
    pub fn empty_table(page: u32) -> Self {
        Self::new(
            page,
            DiagnosticKind::EmptyTable,
            format!("Table on page {} skipped due to empty content", page),
        )
    }

    /// A page could not be processed.
    pub fn page_failed(page: u32, reason: impl fmt::Display) -> Self {
        Self::new(
            page,
            DiagnosticKind::PageFailed,
            format!("page {} processing failed: {}", page, reason),
        )
    }

    fn new(page: u32, kind: DiagnosticKind, message: String) -> Self {
        Self {
            page,
            kind,
            message,
        }
    }

    /// Whether this diagnostic reports a failed page rather than a skipped block.
    pub fn is_page_failure(&self) -> bool {
        self.kind == DiagnosticKind::PageFailed
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Receiver for diagnostics produced during a conversion.
///
/// Diagnostics are delivered in page order once all pages are processed.
pub trait DiagnosticSink: Send + Sync {
    /// Record one diagnostic.
    fn record(&self, diagnostic: &Diagnostic);
}

/// Sink that forwards diagnostics to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn record(&self, diagnostic: &Diagnostic) {
        if diagnostic.is_page_failure() {
            log::error!("{}", diagnostic);
        } else {
            log::warn!("{}", diagnostic);
        }
    }
}

/// Sink that discards diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _diagnostic: &Diagnostic) {}
}

/// Sink that keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Create an empty collecting sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Number of recorded diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics().len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectingSink {
    fn record(&self, diagnostic: &Diagnostic) {
        match self.entries.lock() {
            Ok(mut entries) => entries.push(diagnostic.clone()),
            Err(poisoned) => poisoned.into_inner().push(diagnostic.clone()),
        }
    }
}
