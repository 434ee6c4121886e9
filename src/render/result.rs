//! Conversion statistics.

use serde::{Deserialize, Serialize};

use crate::model::{Block, Diagnostic, DiagnosticKind, Document};

/// Counts of what a conversion produced and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Pages processed successfully
    pub page_count: u32,

    /// Pages that failed and were skipped
    pub failed_pages: u32,

    /// Number of headings
    pub heading_count: u32,

    /// Number of paragraphs
    pub paragraph_count: u32,

    /// Number of code blocks
    pub code_count: u32,

    /// Number of math expressions
    pub math_count: u32,

    /// Number of tables
    pub table_count: u32,

    /// Blocks dropped as empty
    pub skipped_count: u32,
}

impl RenderStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect statistics from a finished document.
    pub fn from_document(doc: &Document) -> Self {
        let mut stats = Self::new();
        stats.page_count = doc.page_count();
        for block in doc.blocks() {
            stats.add_block(block);
        }
        for diagnostic in &doc.diagnostics {
            stats.add_diagnostic(diagnostic);
        }
        stats
    }

    /// Count one block.
    pub fn add_block(&mut self, block: &Block) {
        match block {
            Block::Heading { .. } => self.heading_count += 1,
            Block::Paragraph { .. } => self.paragraph_count += 1,
            Block::Code { .. } => self.code_count += 1,
            Block::Math { .. } => self.math_count += 1,
            Block::Table(_) => self.table_count += 1,
        }
    }

    /// Count one diagnostic.
    pub fn add_diagnostic(&mut self, diagnostic: &Diagnostic) {
        match diagnostic.kind {
            DiagnosticKind::PageFailed => self.failed_pages += 1,
            _ => self.skipped_count += 1,
        }
    }

    /// Total number of emitted blocks.
    pub fn block_count(&self) -> u32 {
        self.heading_count
            + self.paragraph_count
            + self.code_count
            + self.math_count
            + self.table_count
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &RenderStats) {
        self.page_count += other.page_count;
        self.failed_pages += other.failed_pages;
        self.heading_count += other.heading_count;
        self.paragraph_count += other.paragraph_count;
        self.code_count += other.code_count;
        self.math_count += other.math_count;
        self.table_count += other.table_count;
        self.skipped_count += other.skipped_count;
    }
}
