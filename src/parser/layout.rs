//! Layout analysis: from raw text runs to classified page blocks.
//!
//! Runs are grouped into lines by y-proximity, lines into paragraphs by
//! vertical gap, then tables are detected over the paragraph sequence and
//! every remaining paragraph is classified line by line.

use crate::model::{Block, Diagnostic, Line, Page, Paragraph, TextRun};

use super::classifier::{BlockClassifier, PageStats};
use super::table_detector::TableDetector;
use super::tolerance::{estimate_x_tolerance, median_height};
use super::LayoutThresholds;

/// Blocks and diagnostics produced for one page.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    /// The page with its blocks in reading order
    pub page: Page,
    /// Content skipped on this page
    pub diagnostics: Vec<Diagnostic>,
}

/// Group runs into lines, top to bottom, each line ordered left to right.
///
/// A run joins the first existing line whose y is within `y_tolerance` of
/// the run's rounded y; otherwise it seeds a new line at that rounded y.
pub fn group_into_lines(runs: Vec<TextRun>, y_tolerance: f32) -> Vec<Line> {
    let mut lines: Vec<Line> = Vec::new();

    for run in runs {
        let y = run.y.round();
        match lines.iter_mut().find(|l| (l.y - y).abs() < y_tolerance) {
            Some(line) => line.items.push(run),
            None => lines.push(Line::new(y, run)),
        }
    }

    lines.sort_by(|a, b| b.y.total_cmp(&a.y));
    for line in &mut lines {
        line.items.sort_by(|a, b| a.x.total_cmp(&b.x));
    }
    lines
}

/// Split lines into paragraphs wherever the vertical gap exceeds `gap`.
pub fn group_into_paragraphs(lines: &[Line], gap: f32) -> Vec<Paragraph<'_>> {
    let mut paragraphs = Vec::new();
    let mut start = 0;

    for i in 1..lines.len() {
        if (lines[i - 1].y - lines[i].y).abs() > gap {
            paragraphs.push(Paragraph::new(start, &lines[start..i]));
            start = i;
        }
    }
    if start < lines.len() {
        paragraphs.push(Paragraph::new(start, &lines[start..]));
    }

    paragraphs
}

/// Analyzes the text runs of a page.
pub struct LayoutAnalyzer {
    thresholds: LayoutThresholds,
    tables: TableDetector,
    classifier: BlockClassifier,
}

impl LayoutAnalyzer {
    /// Create a layout analyzer with default thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(LayoutThresholds::default())
    }

    /// Create a layout analyzer with custom thresholds.
    pub fn with_thresholds(thresholds: LayoutThresholds) -> Self {
        Self {
            thresholds,
            tables: TableDetector::with_thresholds(thresholds),
            classifier: BlockClassifier::with_thresholds(thresholds),
        }
    }

    /// The thresholds in use.
    pub fn thresholds(&self) -> &LayoutThresholds {
        &self.thresholds
    }

    /// Turn one page's runs into blocks.
    ///
    /// Runs without a usable position are dropped before analysis.
    pub fn analyze_page(&self, number: u32, runs: Vec<TextRun>) -> PageLayout {
        let total = runs.len();
        let runs: Vec<TextRun> = runs.into_iter().filter_map(TextRun::normalized).collect();
        if runs.len() < total {
            log::debug!(
                "Page {}: dropped {} malformed runs",
                number,
                total - runs.len()
            );
        }

        let stats = PageStats {
            median_height: median_height(&runs),
            x_tolerance: estimate_x_tolerance(&runs, &self.thresholds),
        };

        let lines = group_into_lines(runs, self.thresholds.line_y_tolerance);
        let paragraphs = group_into_paragraphs(&lines, self.thresholds.paragraph_gap);
        let tables = self.tables.detect(&paragraphs, stats.x_tolerance);

        log::debug!(
            "Page {}: {} lines, {} paragraphs, {} tables, tolerance {:.1}",
            number,
            lines.len(),
            paragraphs.len(),
            tables.len(),
            stats.x_tolerance
        );

        let mut layout = PageLayout {
            page: Page::new(number),
            diagnostics: Vec::new(),
        };
        let mut tables = tables.into_iter().peekable();
        let mut p = 0;

        while p < paragraphs.len() {
            if let Some(table) = tables.next_if(|t| t.start == p) {
                if table.is_blank() {
                    layout.diagnostics.push(Diagnostic::empty_table(number));
                } else {
                    layout.page.blocks.push(Block::Table(table.to_block()));
                }
                p = table.end + 1;
                continue;
            }

            self.classifier.classify_paragraph(
                number,
                &paragraphs[p],
                &lines,
                &stats,
                &mut layout.page.blocks,
                &mut layout.diagnostics,
            );
            p += 1;
        }

        layout
    }
}

impl Default for LayoutAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, x: f32, y: f32) -> TextRun {
        TextRun::new(text, x, y, "Helvetica", 10.0)
    }

    #[test]
    fn test_group_into_lines() {
        let runs = vec![
            run("world", 60.0, 100.2),
            run("Lower", 10.0, 80.0),
            run("Hello", 10.0, 99.6),
        ];
        let lines = group_into_lines(runs, 5.0);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].y, 100.0);
        assert_eq!(lines[0].text(), "Helloworld");
        assert_eq!(lines[1].text(), "Lower");
    }

    #[test]
    fn test_line_y_is_seed() {
        let runs = vec![run("a", 0.0, 100.0), run("b", 10.0, 104.0), run("c", 20.0, 108.0)];
        let lines = group_into_lines(runs, 5.0);
        // 108 is 8 away from the seed, so it starts its own line
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].y, 108.0);
        assert_eq!(lines[1].text(), "ab");
    }

    #[test]
    fn test_group_into_paragraphs() {
        let lines = group_into_lines(
            vec![
                run("a", 0.0, 100.0),
                run("b", 0.0, 90.0),
                run("c", 0.0, 60.0),
            ],
            5.0,
        );
        let paragraphs = group_into_paragraphs(&lines, 10.0);

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].len(), 2);
        assert_eq!(paragraphs[1].start, 2);
        assert!(group_into_paragraphs(&[], 10.0).is_empty());
    }

    #[test]
    fn test_analyze_reading_order() {
        let runs = vec![
            run("Third", 10.0, 100.0),
            run("First", 10.0, 300.0),
            run("Second", 10.0, 200.0),
        ];
        let layout = LayoutAnalyzer::new().analyze_page(1, runs);

        let texts: Vec<String> = layout.page.blocks.iter().map(Block::plain_text).collect();
        assert_eq!(texts, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn test_analyze_table_first() {
        // small gaps elsewhere keep the tolerance well below the column gap
        let mut runs: Vec<TextRun> = (0..6).map(|i| run("w", 10.0 + 5.0 * i as f32, 300.0)).collect();
        runs.extend([
            run("Name", 10.0, 100.0),
            run("Age", 200.0, 100.0),
            run("Alice", 10.0, 90.0),
            run("30", 200.0, 90.0),
        ]);
        let layout = LayoutAnalyzer::new().analyze_page(1, runs);

        let table = layout
            .page
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .unwrap();
        assert_eq!(table.header, vec!["Name", "Age"]);
        assert_eq!(table.rows, vec![vec!["Alice", "30"]]);
    }

    #[test]
    fn test_line_y_tolerance_threshold_splits_lines() {
        let runs = || vec![run("upper", 10.0, 103.0), run("lower", 80.0, 100.0)];
        let thresholds = LayoutThresholds::new().with_paragraph_gap(2.0);

        let merged = LayoutAnalyzer::with_thresholds(thresholds).analyze_page(1, runs());
        assert_eq!(merged.page.blocks.len(), 1);

        let strict = LayoutAnalyzer::with_thresholds(thresholds.with_line_y_tolerance(1.0));
        let split = strict.analyze_page(1, runs());
        let texts: Vec<String> = split.page.blocks.iter().map(Block::plain_text).collect();
        assert_eq!(texts, vec!["upper", "lower"]);
    }

    #[test]
    fn test_malformed_runs_dropped() {
        let runs = vec![run("ok", 10.0, 100.0), run("bad", f32::NAN, 100.0)];
        let layout = LayoutAnalyzer::new().analyze_page(1, runs);
        assert_eq!(layout.page.blocks.len(), 1);
        assert_eq!(layout.page.blocks[0].plain_text(), "ok");
    }
}
