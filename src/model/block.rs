//! Classified content blocks.

use serde::{Deserialize, Serialize};

use super::TextRun;

/// A structural unit of the output document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading (level 1 or 2)
    Heading {
        /// Heading level
        level: u8,
        /// Styled heading content
        spans: Vec<Span>,
    },

    /// A paragraph of styled text
    Paragraph {
        /// Styled paragraph content
        spans: Vec<Span>,
    },

    /// Preformatted code
    Code {
        /// Code text, lines separated by `\n`
        text: String,
    },

    /// A math expression, preserved verbatim
    Math {
        /// Source text including delimiters
        text: String,
        /// Display (block) math rather than inline
        display: bool,
    },

    /// A table
    Table(TableBlock),
}

impl Block {
    /// Create a heading block from styled spans.
    pub fn heading(level: u8, spans: Vec<Span>) -> Self {
        Block::Heading {
            level: level.clamp(1, 2),
            spans,
        }
    }

    /// Create a paragraph block from styled spans.
    pub fn paragraph(spans: Vec<Span>) -> Self {
        Block::Paragraph { spans }
    }

    /// Create a code block.
    pub fn code(text: impl Into<String>) -> Self {
        Block::Code { text: text.into() }
    }

    /// Create a math block.
    pub fn math(text: impl Into<String>, display: bool) -> Self {
        Block::Math {
            text: text.into(),
            display,
        }
    }

    /// Get plain text content of the block.
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { spans, .. } | Block::Paragraph { spans } => join_spans(spans),
            Block::Code { text } | Block::Math { text, .. } => text.clone(),
            Block::Table(table) => table.plain_text(),
        }
    }

    /// Short name of the block kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph { .. } => "paragraph",
            Block::Code { .. } => "code",
            Block::Math { .. } => "math",
            Block::Table(_) => "table",
        }
    }
}

fn join_spans(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A run of text with single-level emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    /// The text content
    pub text: String,
    /// Bold face
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    /// Italic or oblique face
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
}

impl Span {
    /// Create an unstyled span.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    /// Create a span carrying the emphasis implied by a run's font.
    pub fn from_run(run: &TextRun) -> Self {
        Self {
            text: run.text.clone(),
            bold: run.is_bold(),
            italic: run.is_italic(),
        }
    }

    /// Whether any emphasis applies.
    pub fn is_styled(&self) -> bool {
        self.bold || self.italic
    }
}

/// A table reconstructed from column-aligned lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableBlock {
    /// Header cells (the first detected row)
    pub header: Vec<String>,
    /// Body rows
    pub rows: Vec<Vec<String>>,
}

impl TableBlock {
    /// Create a table from a header row and body rows.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { header, rows }
    }

    /// Widest row, header included.
    pub fn column_count(&self) -> usize {
        self.rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.header.len()))
            .max()
            .unwrap_or(0)
    }

    /// Number of rows, header included.
    pub fn row_count(&self) -> usize {
        self.rows.len() + 1
    }

    /// Whether every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.header
            .iter()
            .chain(self.rows.iter().flatten())
            .all(|cell| cell.trim().is_empty())
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_level_clamped() {
        match Block::heading(5, vec![Span::plain("Title")]) {
            Block::Heading { level, .. } => assert_eq!(level, 2),
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_span_from_run() {
        let run = TextRun::new("word", 0.0, 0.0, "Times-BoldItalic", 12.0);
        let span = Span::from_run(&run);
        assert!(span.bold);
        assert!(span.italic);
        assert!(span.is_styled());
    }

    #[test]
    fn test_table_dimensions() {
        let table = TableBlock::new(
            vec!["Name".into(), "Age".into(), "City".into()],
            vec![vec!["Alice".into(), "30".into()]],
        );
        assert_eq!(table.column_count(), 3);
        assert_eq!(table.row_count(), 2);
        assert!(!table.is_blank());
        assert_eq!(table.plain_text(), "Name\tAge\tCity\nAlice\t30");
    }

    #[test]
    fn test_block_json_tag() {
        let json = serde_json::to_string(&Block::math("$x$", false)).unwrap();
        assert!(json.contains("\"type\":\"math\""));
        assert!(json.contains("\"display\":false"));
    }
}
