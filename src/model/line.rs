//! Per-page layout structures: lines, paragraphs and column clusters.
//!
//! These live only while a single page is analyzed and are discarded once
//! the page's blocks have been produced.

use super::TextRun;

/// Text runs sharing a vertical band, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Rounded y of the run that seeded this line
    pub y: f32,
    /// Runs in this line, sorted by x once assembly is complete
    pub items: Vec<TextRun>,
}

impl Line {
    /// Start a new line seeded by `run`.
    pub fn new(y: f32, run: TextRun) -> Self {
        Self {
            y,
            items: vec![run],
        }
    }

    /// Build a line from runs that are already grouped.
    pub fn from_items(y: f32, items: Vec<TextRun>) -> Self {
        Self { y, items }
    }

    /// Run texts concatenated without separators.
    pub fn text(&self) -> String {
        self.items.iter().map(|r| r.text.as_str()).collect()
    }

    /// Run texts joined by single spaces.
    pub fn spaced_text(&self) -> String {
        self.items
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Largest glyph height on the line.
    pub fn max_height(&self) -> f32 {
        self.items.iter().map(|r| r.height).fold(0.0, f32::max)
    }

    /// Font name of the first run.
    pub fn font_name(&self) -> &str {
        self.items.first().map(|r| r.font_name.as_str()).unwrap_or("")
    }

    /// Check if the line is predominantly bold.
    pub fn is_bold(&self) -> bool {
        let bold_chars: usize = self
            .items
            .iter()
            .filter(|r| r.is_bold())
            .map(|r| r.text.chars().count())
            .sum();
        let total_chars: usize = self.items.iter().map(|r| r.text.chars().count()).sum();
        total_chars > 0 && bold_chars as f32 / total_chars as f32 > 0.5
    }

    /// Check if every letter on the line is uppercase.
    pub fn is_uppercase(&self) -> bool {
        let text = self.text();
        let mut letters = text.chars().filter(|c| c.is_alphabetic()).peekable();
        letters.peek().is_some() && letters.all(|c| c.is_uppercase())
    }
}

/// Consecutive lines separated by sub-threshold vertical gaps.
#[derive(Debug, Clone, Copy)]
pub struct Paragraph<'a> {
    /// Index of the first line within the page's line sequence
    pub start: usize,
    /// The lines of this paragraph
    pub lines: &'a [Line],
}

impl<'a> Paragraph<'a> {
    /// Create a paragraph over a slice of the page's lines.
    pub fn new(start: usize, lines: &'a [Line]) -> Self {
        Self { start, lines }
    }

    /// Page-level index of the paragraph's `offset`-th line.
    pub fn line_index(&self, offset: usize) -> usize {
        self.start + offset
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the paragraph has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Runs of one line that share an x position within tolerance.
#[derive(Debug, Clone)]
pub struct ColumnCluster<'a> {
    /// Member runs sorted by x
    pub items: Vec<&'a TextRun>,
}

impl<'a> ColumnCluster<'a> {
    /// Create a cluster, sorting its members by x.
    pub fn new(mut items: Vec<&'a TextRun>) -> Self {
        items.sort_by(|a, b| a.x.total_cmp(&b.x));
        Self { items }
    }

    /// Leftmost x of the cluster.
    pub fn x(&self) -> f32 {
        self.items.first().map(|r| r.x).unwrap_or(0.0)
    }

    /// Member texts concatenated without separators.
    pub fn text(&self) -> String {
        self.items.iter().map(|r| r.text.as_str()).collect()
    }

    /// Member texts joined by single spaces, as shown in a table cell.
    pub fn cell_text(&self) -> String {
        self.items
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
