//! Block classification for non-table paragraphs.
//!
//! Each line is tested against an ordered list of rules; the first rule
//! that fires decides the line's kind. Rules only look at the line, its
//! neighbours in the page's line sequence and page-level statistics.

use regex::Regex;

use crate::model::{Block, Diagnostic, Line, Paragraph, Span};

use super::LayoutThresholds;

/// Statistics shared by every rule on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageStats {
    /// Median positive glyph height, if any run carries a height
    pub median_height: Option<f32>,
    /// Column clustering tolerance
    pub x_tolerance: f32,
}

/// Classification outcome for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// No text at all; dropped
    Empty,
    /// Math expression
    Math {
        /// Display rather than inline
        display: bool,
    },
    /// Heading of the given level
    Heading(u8),
    /// Preformatted code
    Code,
    /// Plain paragraph
    Paragraph,
}

/// A line together with its position among the page's lines.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    /// All lines on the page
    pub lines: &'a [Line],
    /// Index of the line under test
    pub index: usize,
    /// Page statistics
    pub stats: &'a PageStats,
}

impl<'a> LineContext<'a> {
    /// Create a context for `lines[index]`.
    pub fn new(lines: &'a [Line], index: usize, stats: &'a PageStats) -> Self {
        Self {
            lines,
            index,
            stats,
        }
    }

    /// The line under test.
    pub fn line(&self) -> &'a Line {
        &self.lines[self.index]
    }

    /// Vertical distance to the previous line on the page.
    pub fn gap_before(&self) -> Option<f32> {
        let prev = self.index.checked_sub(1).and_then(|i| self.lines.get(i))?;
        Some((prev.y - self.line().y).abs())
    }

    /// Vertical distance to the next line on the page.
    pub fn gap_after(&self) -> Option<f32> {
        let next = self.lines.get(self.index + 1)?;
        Some((next.y - self.line().y).abs())
    }
}

type LineRule = fn(&BlockClassifier, &LineContext<'_>) -> Option<LineKind>;

/// Ordered rule list; a line that matches none is a paragraph.
const LINE_RULES: &[(&str, LineRule)] = &[
    ("empty", empty_rule),
    ("math", math_rule),
    ("heading", heading_rule),
    ("code", code_rule),
];

fn empty_rule(_: &BlockClassifier, ctx: &LineContext<'_>) -> Option<LineKind> {
    let text = ctx.line().text();
    (text.trim().is_empty() && !has_marker(&text)).then_some(LineKind::Empty)
}

fn math_rule(classifier: &BlockClassifier, ctx: &LineContext<'_>) -> Option<LineKind> {
    let text = ctx.line().text();
    classifier.is_math(&text).then(|| LineKind::Math {
        display: classifier.is_display_math(&text),
    })
}

fn heading_rule(classifier: &BlockClassifier, ctx: &LineContext<'_>) -> Option<LineKind> {
    match classifier.heading_level(ctx) {
        0 => None,
        level => Some(LineKind::Heading(level)),
    }
}

fn code_rule(classifier: &BlockClassifier, ctx: &LineContext<'_>) -> Option<LineKind> {
    classifier.is_code_line(ctx.line()).then_some(LineKind::Code)
}

/// Whitespace, bullet or dash characters keep an otherwise blank line alive.
fn has_marker(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_whitespace() || matches!(c, '•' | '-' | '–'))
}

/// Classifies lines and paragraphs into blocks.
pub struct BlockClassifier {
    thresholds: LayoutThresholds,
    heading_blacklist: Regex,
    code_tokens: Regex,
    math_delimiters: Regex,
    display_delimiters: Regex,
    math_symbols: Regex,
    plain_letters: Regex,
    inline_math: Regex,
}

impl BlockClassifier {
    /// Create a classifier with default thresholds.
    pub fn new() -> Self {
        Self::with_thresholds(LayoutThresholds::default())
    }

    /// Create a classifier with custom thresholds.
    pub fn with_thresholds(thresholds: LayoutThresholds) -> Self {
        Self {
            thresholds,
            heading_blacklist: Regex::new(r"^(?:\d+\.|Figure|Table|Note:|•|-)").unwrap(),
            code_tokens: Regex::new(
                r"\b(?:function|var|let|const|return|class|async|await|def|fn|import|elif)\b|[{}()\[\];]|=>|==|!=|:=|//|/\*|#",
            )
            .unwrap(),
            math_delimiters: Regex::new(
                r"^(?:\$[\s\S]*\$|\(.+\)|\[[\s\S]*\]|\\\([\s\S]*\\\)|\\\[[\s\S]*\\\])$",
            )
            .unwrap(),
            display_delimiters: Regex::new(r"^(?:\$\$[\s\S]*\$\$|\\\[[\s\S]*\\\])$").unwrap(),
            math_symbols: Regex::new(
                r"[\x{03B1}-\x{03C9}\x{0391}-\x{03A9}∫∑∏∞√∂]|\\(?:frac|sum|int|prod|sqrt|infty|partial)",
            )
            .unwrap(),
            plain_letters: Regex::new(r"^[a-zA-Z\s]+$").unwrap(),
            inline_math: Regex::new(r"\b\w+\^\w+|\b(?:\d+|[A-Za-z])/(?:\d+|[A-Za-z])\b").unwrap(),
        }
    }

    /// The thresholds in use.
    pub fn thresholds(&self) -> &LayoutThresholds {
        &self.thresholds
    }

    /// Classify one line by the first matching rule.
    pub fn classify_line(&self, ctx: &LineContext<'_>) -> LineKind {
        LINE_RULES
            .iter()
            .find_map(|(name, rule)| {
                let kind = rule(self, ctx)?;
                log::trace!("line {} matched rule {}", ctx.index, name);
                Some(kind)
            })
            .unwrap_or(LineKind::Paragraph)
    }

    /// Heading level of a line, or 0 when it is not a heading.
    pub fn heading_level(&self, ctx: &LineContext<'_>) -> u8 {
        let t = &self.thresholds;
        let line = ctx.line();
        let text = line.text();
        let text = text.trim();

        if self.heading_blacklist.is_match(text) {
            return 0;
        }

        let before = ctx.gap_before();
        let after = ctx.gap_after();
        let surrounded = [before, after]
            .iter()
            .flatten()
            .any(|gap| *gap < t.surround_gap);
        if surrounded {
            return 0;
        }

        let isolated = [before, after]
            .iter()
            .all(|gap| gap.map_or(true, |g| g > t.isolation_gap));
        if !isolated {
            return 0;
        }

        let length = text.chars().count();
        if let Some(median) = ctx.stats.median_height {
            let size = line.max_height();
            if size >= t.h1_ratio * median && length <= t.h1_max_len {
                return 1;
            }
            if size >= t.h2_ratio * median && length <= t.h2_max_len {
                return 2;
            }
        }

        let followed_by_gap = after.is_some_and(|g| g > t.follow_gap);
        if (line.is_bold() || line.is_uppercase()) && length <= t.emphasis_max_len && followed_by_gap
        {
            return 2;
        }

        0
    }

    /// Whether a line reads as source code.
    pub fn is_code_line(&self, line: &Line) -> bool {
        if line.items.first().is_some_and(|r| r.is_monospace()) {
            return true;
        }
        let text = line.text();
        text.chars().count() > self.thresholds.code_min_len
            && self.code_tokens.find_iter(&text).count() >= self.thresholds.code_min_tokens
    }

    /// Whether text reads as a math expression.
    pub fn is_math(&self, text: &str) -> bool {
        let trimmed = text.trim();
        self.math_delimiters.is_match(trimmed)
            || (self.math_symbols.is_match(trimmed) && !self.plain_letters.is_match(trimmed))
            || self.inline_math.is_match(trimmed)
    }

    /// Whether math text is wrapped in display delimiters.
    pub fn is_display_math(&self, text: &str) -> bool {
        self.display_delimiters.is_match(text.trim())
    }

    /// Classify a non-table paragraph into blocks.
    ///
    /// `lines` is the page's full line sequence; the paragraph's lines are a
    /// sub-slice of it starting at `paragraph.start`.
    pub fn classify_paragraph(
        &self,
        page: u32,
        paragraph: &Paragraph<'_>,
        lines: &[Line],
        stats: &PageStats,
        blocks: &mut Vec<Block>,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        if paragraph.is_empty() {
            return;
        }

        if paragraph.len() > 1 && paragraph.lines.iter().any(|l| self.is_code_line(l)) {
            let text = paragraph
                .lines
                .iter()
                .map(Line::spaced_text)
                .collect::<Vec<_>>()
                .join("\n");
            let text = text.trim();
            if text.is_empty() {
                diagnostics.push(Diagnostic::empty_code(page, text));
            } else {
                blocks.push(Block::code(text));
            }
            return;
        }

        for offset in 0..paragraph.len() {
            let ctx = LineContext::new(lines, paragraph.line_index(offset), stats);
            let line = ctx.line();
            let text = line.text();

            match self.classify_line(&ctx) {
                LineKind::Empty => diagnostics.push(Diagnostic::empty_line(page, &text)),
                LineKind::Math { display } => blocks.push(Block::math(text, display)),
                LineKind::Heading(level) => {
                    let spans = spans_of(line);
                    let rendered = joined(&spans);
                    if rendered.trim().is_empty() {
                        diagnostics.push(Diagnostic::empty_heading(page, &rendered));
                    } else {
                        blocks.push(Block::heading(level, spans));
                    }
                }
                LineKind::Code => {
                    let code = line.spaced_text();
                    if code.trim().is_empty() {
                        diagnostics.push(Diagnostic::empty_code(page, &code));
                    } else {
                        blocks.push(Block::code(code));
                    }
                }
                LineKind::Paragraph => {
                    let spans = spans_of(line);
                    let rendered = joined(&spans);
                    if rendered.trim().is_empty() && !has_marker(&text) {
                        diagnostics.push(Diagnostic::empty_paragraph(page, &rendered));
                    } else {
                        blocks.push(Block::paragraph(spans));
                    }
                }
            }
        }
    }
}

impl Default for BlockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn spans_of(line: &Line) -> Vec<Span> {
    line.items.iter().map(Span::from_run).collect()
}

fn joined(spans: &[Span]) -> String {
    spans
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextRun;

    fn line(y: f32, text: &str, font: &str, height: f32) -> Line {
        Line::from_items(y, vec![TextRun::new(text, 10.0, y, font, height)])
    }

    fn stats(median: f32) -> PageStats {
        PageStats {
            median_height: Some(median),
            x_tolerance: 15.0,
        }
    }

    fn level_of(lines: &[Line], index: usize, median: f32) -> u8 {
        let stats = stats(median);
        BlockClassifier::new().heading_level(&LineContext::new(lines, index, &stats))
    }

    #[test]
    fn test_heading_level_one() {
        let lines = vec![
            line(700.0, "A twenty char title!", "Helvetica", 20.0),
            line(680.0, "Body text follows here.", "Helvetica", 10.0),
        ];
        assert_eq!(level_of(&lines, 0, 10.0), 1);
    }

    #[test]
    fn test_heading_level_two() {
        let title = "x".repeat(60);
        let lines = vec![
            line(700.0, &title, "Helvetica", 15.0),
            line(680.0, "Body text follows here.", "Helvetica", 10.0),
        ];
        assert_eq!(level_of(&lines, 0, 10.0), 2);
    }

    #[test]
    fn test_heading_thresholds_exact() {
        let lines = vec![line(700.0, "Edge", "Helvetica", 17.5)];
        assert_eq!(level_of(&lines, 0, 10.0), 1);

        let lines = vec![line(700.0, "Edge", "Helvetica", 13.9)];
        assert_eq!(level_of(&lines, 0, 10.0), 0);

        let long = "y".repeat(51);
        let lines = vec![line(700.0, &long, "Helvetica", 20.0)];
        assert_eq!(level_of(&lines, 0, 10.0), 2);
    }

    #[test]
    fn test_heading_blacklist() {
        let lines = vec![line(700.0, "1. Introduction", "Helvetica", 30.0)];
        assert_eq!(level_of(&lines, 0, 10.0), 0);

        let lines = vec![line(700.0, "Figure 3", "Helvetica", 30.0)];
        assert_eq!(level_of(&lines, 0, 10.0), 0);
    }

    #[test]
    fn test_heading_surrounded() {
        let lines = vec![
            line(700.0, "Big", "Helvetica", 30.0),
            line(697.0, "close neighbour", "Helvetica", 10.0),
        ];
        assert_eq!(level_of(&lines, 0, 10.0), 0);
    }

    #[test]
    fn test_heading_not_isolated() {
        let lines = vec![
            line(700.0, "Big", "Helvetica", 30.0),
            line(692.0, "neighbour", "Helvetica", 10.0),
        ];
        assert_eq!(level_of(&lines, 0, 10.0), 0);
    }

    #[test]
    fn test_bold_heading_needs_following_gap() {
        let lines = vec![
            line(700.0, "Summary", "Helvetica-Bold", 10.0),
            line(680.0, "Body text.", "Helvetica", 10.0),
        ];
        assert_eq!(level_of(&lines, 0, 10.0), 2);

        let lines = vec![
            line(700.0, "Summary", "Helvetica-Bold", 10.0),
            line(688.0, "Body text.", "Helvetica", 10.0),
        ];
        assert_eq!(level_of(&lines, 0, 10.0), 0);

        // last line has no following gap
        let lines = vec![line(700.0, "THE END", "Helvetica", 10.0)];
        assert_eq!(level_of(&lines, 0, 10.0), 0);
    }

    #[test]
    fn test_code_by_font() {
        let c = BlockClassifier::new();
        assert!(c.is_code_line(&line(0.0, "plain words", "CourierNew", 10.0)));
        assert!(c.is_code_line(&line(0.0, "x", "JetBrainsMono", 10.0)));
    }

    #[test]
    fn test_code_by_tokens() {
        let c = BlockClassifier::new();
        assert!(c.is_code_line(&line(0.0, "let total = sum(values);", "Helvetica", 10.0)));
        assert!(!c.is_code_line(&line(0.0, "f(x);", "Helvetica", 10.0)));
        assert!(!c.is_code_line(&line(
            0.0,
            "If we go for a walk, while it rains, we get wet.",
            "Helvetica",
            10.0
        )));
    }

    #[test]
    fn test_math_detection() {
        let c = BlockClassifier::new();
        assert!(c.is_math("$x^2+1$"));
        assert!(!c.is_display_math("$x^2+1$"));

        assert!(c.is_math("$$\\int_0^1 f(x)dx$$"));
        assert!(c.is_display_math("$$\\int_0^1 f(x)dx$$"));
        assert!(c.is_display_math("\\[a+b\\]"));

        assert!(c.is_math("Let α be the angle"));
        assert!(c.is_math("solve for 1/2 of it"));
        assert!(!c.is_math("Plain words only"));
        assert!(!c.is_math("this and/or that"));
        assert!(!c.is_math("call snake_case_name now"));
    }

    #[test]
    fn test_rule_precedence() {
        let c = BlockClassifier::new();
        let s = stats(10.0);

        // math wins over a heading-sized line
        let lines = vec![line(700.0, "$E = mc^2$", "Helvetica", 30.0)];
        assert_eq!(
            c.classify_line(&LineContext::new(&lines, 0, &s)),
            LineKind::Math { display: false }
        );

        // heading wins over code font
        let lines = vec![line(700.0, "Listing", "Courier", 30.0)];
        assert_eq!(
            c.classify_line(&LineContext::new(&lines, 0, &s)),
            LineKind::Heading(1)
        );

        let lines = vec![line(700.0, "", "Helvetica", 10.0)];
        assert_eq!(
            c.classify_line(&LineContext::new(&lines, 0, &s)),
            LineKind::Empty
        );

        let lines = vec![line(700.0, "Just a sentence of prose.", "Helvetica", 10.0)];
        assert_eq!(
            c.classify_line(&LineContext::new(&lines, 0, &s)),
            LineKind::Paragraph
        );
    }

    #[test]
    fn test_multiline_code_paragraph() {
        let lines = vec![
            line(700.0, "fn main() {", "Helvetica", 10.0),
            line(690.0, "println!(\"hi\");", "Helvetica", 10.0),
            line(680.0, "}", "Helvetica", 10.0),
        ];
        let paragraph = Paragraph::new(0, &lines);
        let mut blocks = Vec::new();
        let mut diagnostics = Vec::new();

        BlockClassifier::new().classify_paragraph(
            1,
            &paragraph,
            &lines,
            &stats(10.0),
            &mut blocks,
            &mut diagnostics,
        );

        assert!(diagnostics.is_empty());
        assert_eq!(blocks, vec![Block::code("fn main() {\nprintln!(\"hi\");\n}")]);
    }

    #[test]
    fn test_empty_line_diagnostic() {
        let lines = vec![line(700.0, "", "Helvetica", 10.0)];
        let paragraph = Paragraph::new(0, &lines);
        let mut blocks = Vec::new();
        let mut diagnostics = Vec::new();

        BlockClassifier::new().classify_paragraph(
            4,
            &paragraph,
            &lines,
            &stats(10.0),
            &mut blocks,
            &mut diagnostics,
        );

        assert!(blocks.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].page, 4);
    }
}
