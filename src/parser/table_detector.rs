//! Table detection over a page's paragraph sequence.
//!
//! A table is a contiguous run of paragraphs whose lines all split into two
//! or more x-aligned column clusters. The run is validated for consistent
//! column counts and cell fill before it is accepted.

use regex::Regex;

use crate::model::{ColumnCluster, Line, Paragraph, TableBlock};

use super::columns::cluster_columns;
use super::LayoutThresholds;

/// A validated table spanning a range of paragraphs.
#[derive(Debug, Clone)]
pub struct DetectedTable<'a> {
    /// Index of the first paragraph in the table
    pub start: usize,
    /// Index of the last paragraph in the table (inclusive)
    pub end: usize,
    /// One entry per row, each a list of column clusters
    pub rows: Vec<Vec<ColumnCluster<'a>>>,
}

impl DetectedTable<'_> {
    /// Widest row.
    pub fn max_columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Whether every cell is blank.
    pub fn is_blank(&self) -> bool {
        self.rows
            .iter()
            .flatten()
            .all(|cell| cell.text().trim().is_empty())
    }

    /// Convert to a table block, first row as header.
    pub fn to_block(&self) -> TableBlock {
        let mut rows = self
            .rows
            .iter()
            .map(|row| row.iter().map(ColumnCluster::cell_text).collect::<Vec<_>>());
        let header = rows.next().unwrap_or_default();
        TableBlock::new(header, rows.collect())
    }
}

/// Detects tables among paragraphs.
pub struct TableDetector {
    thresholds: LayoutThresholds,
    blacklist: Vec<Regex>,
}

impl TableDetector {
    /// Create a new table detector with default thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(LayoutThresholds::default())
    }

    /// Create a new table detector with custom thresholds.
    pub fn with_thresholds(thresholds: LayoutThresholds) -> Self {
        let blacklist = [r"^\d+\.", r"^•", r"^-"]
            .iter()
            .map(|p| Regex::new(p).unwrap())
            .collect();
        Self {
            thresholds,
            blacklist,
        }
    }

    /// Find all tables in a page's paragraphs.
    ///
    /// Each start index grows its range greedily and keeps the longest
    /// prefix that validates. After a table the scan resumes right behind
    /// it; otherwise it moves on by one paragraph.
    pub fn detect<'a>(&self, paragraphs: &[Paragraph<'a>], tolerance: f32) -> Vec<DetectedTable<'a>> {
        let mut tables = Vec::new();
        let mut i = 0;

        while i < paragraphs.len() {
            let mut rows: Vec<Vec<ColumnCluster<'a>>> = Vec::new();
            let mut best: Option<(usize, usize)> = None;

            for (j, paragraph) in paragraphs.iter().enumerate().skip(i) {
                let Some(paragraph_rows) = self.paragraph_rows(paragraph, tolerance) else {
                    break;
                };
                rows.extend(paragraph_rows);
                if rows.len() >= self.thresholds.table_min_rows && self.validate(&rows) {
                    best = Some((j, rows.len()));
                }
            }

            match best {
                Some((end, row_count)) => {
                    rows.truncate(row_count);
                    log::debug!(
                        "TableDetector: table over paragraphs {}..={} with {} rows",
                        i,
                        end,
                        rows.len()
                    );
                    tables.push(DetectedTable {
                        start: i,
                        end,
                        rows,
                    });
                    i = end + 1;
                }
                None => i += 1,
            }
        }

        tables
    }

    /// Rows contributed by a paragraph, or `None` if any of its lines does
    /// not look like a table row.
    fn paragraph_rows<'a>(
        &self,
        paragraph: &Paragraph<'a>,
        tolerance: f32,
    ) -> Option<Vec<Vec<ColumnCluster<'a>>>> {
        let lines: &'a [Line] = paragraph.lines;
        if lines.is_empty() {
            return None;
        }
        lines.iter().map(|line| self.row_clusters(line, tolerance)).collect()
    }

    fn row_clusters<'a>(&self, line: &'a Line, tolerance: f32) -> Option<Vec<ColumnCluster<'a>>> {
        if line.items.len() < 2 {
            return None;
        }
        let text = line.text();
        let text = text.trim();
        if self.blacklist.iter().any(|re| re.is_match(text)) {
            return None;
        }
        let clusters = cluster_columns(&line.items, tolerance);
        (clusters.len() >= 2).then_some(clusters)
    }

    fn validate(&self, rows: &[Vec<ColumnCluster<'_>>]) -> bool {
        let max_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let min_cols = rows.iter().map(Vec::len).min().unwrap_or(0);
        if max_cols - min_cols > self.thresholds.table_max_column_variance {
            return false;
        }

        let total = rows.iter().map(Vec::len).sum::<usize>();
        if total == 0 {
            return false;
        }
        let filled = rows
            .iter()
            .flatten()
            .filter(|cell| !cell.text().trim().is_empty())
            .count();
        filled as f32 / total as f32 >= self.thresholds.table_min_fill
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}
