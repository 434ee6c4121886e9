//! PDF file converter backed by lopdf.

use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::model::DiagnosticSink;
use crate::source::LopdfProvider;

use super::{ConvertOptions, ConvertResult, Converter};

/// Converts PDF files and byte buffers to HTML.
pub struct PdfConverter {
    converter: Converter,
    provider: LopdfProvider,
}

impl PdfConverter {
    /// Create a new PDF converter.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            converter: Converter::new(options),
            provider: LopdfProvider,
        }
    }

    /// Deliver diagnostics to a custom sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.converter = self.converter.with_sink(sink);
        self
    }

    /// Convert a PDF file.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> Result<ConvertResult> {
        let data = std::fs::read(path)?;
        self.convert_bytes(&data)
    }

    /// Convert PDF bytes.
    pub fn convert_bytes(&self, data: &[u8]) -> Result<ConvertResult> {
        self.converter.convert_bytes(&self.provider, data)
    }

    /// Render PDF bytes to HTML, falling back to the error document.
    pub fn render_html(&self, data: &[u8]) -> Result<String> {
        self.converter.render_html(&self.provider, data)
    }
}

impl Default for PdfConverter {
    fn default() -> Self {
        Self::new(ConvertOptions::default())
    }
}
