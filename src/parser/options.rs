//! Layout heuristic thresholds.

/// Named constants for every layout and classification heuristic.
///
/// Distances are in PDF user-space units. Ratios for headings are relative
/// to the page's median glyph height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutThresholds {
    /// Maximum rounded-y difference for two runs to share a line
    pub line_y_tolerance: f32,
    /// Vertical gap above which a new paragraph starts
    pub paragraph_gap: f32,

    /// Lower bound of the adaptive column tolerance
    pub tolerance_floor: f32,
    /// Multiplier applied to the mean x-gap
    pub tolerance_factor: f32,
    /// Column tolerance used when a page has no positive x-gaps
    pub default_tolerance: f32,

    /// Size ratio for a level 1 heading
    pub h1_ratio: f32,
    /// Maximum text length for a level 1 heading
    pub h1_max_len: usize,
    /// Size ratio for a level 2 heading
    pub h2_ratio: f32,
    /// Maximum text length for a level 2 heading
    pub h2_max_len: usize,
    /// Maximum text length for a bold or uppercase level 2 heading
    pub emphasis_max_len: usize,
    /// A heading needs both neighbours further away than this
    pub isolation_gap: f32,
    /// A neighbour closer than this suppresses any heading
    pub surround_gap: f32,
    /// Gap to the following line required by emphasis headings
    pub follow_gap: f32,

    /// Code-token lines must be longer than this
    pub code_min_len: usize,
    /// Minimum code-token matches for a non-monospace code line
    pub code_min_tokens: usize,

    /// Minimum rows for a table
    pub table_min_rows: usize,
    /// Maximum spread between the widest and narrowest table row
    pub table_max_column_variance: usize,
    /// Minimum fraction of non-empty table cells
    pub table_min_fill: f32,
}

impl LayoutThresholds {
    /// Create thresholds with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the line grouping tolerance.
    pub fn with_line_y_tolerance(mut self, tolerance: f32) -> Self {
        self.line_y_tolerance = tolerance;
        self
    }

    /// Set the paragraph break gap.
    pub fn with_paragraph_gap(mut self, gap: f32) -> Self {
        self.paragraph_gap = gap;
        self
    }

    /// Set the heading size ratios.
    pub fn with_heading_ratios(mut self, h1: f32, h2: f32) -> Self {
        self.h1_ratio = h1;
        self.h2_ratio = h2;
        self
    }

    /// Set the minimum fraction of non-empty table cells.
    pub fn with_table_min_fill(mut self, fill: f32) -> Self {
        self.table_min_fill = fill;
        self
    }
}

impl Default for LayoutThresholds {
    fn default() -> Self {
        Self {
            line_y_tolerance: 5.0,
            paragraph_gap: 10.0,
            tolerance_floor: 10.0,
            tolerance_factor: 1.5,
            default_tolerance: 15.0,
            h1_ratio: 1.7,
            h1_max_len: 50,
            h2_ratio: 1.4,
            h2_max_len: 75,
            emphasis_max_len: 30,
            isolation_gap: 10.0,
            surround_gap: 5.0,
            follow_gap: 15.0,
            code_min_len: 10,
            code_min_tokens: 2,
            table_min_rows: 2,
            table_max_column_variance: 1,
            table_min_fill: 0.5,
        }
    }
}
